//! Operation endpoint handler
//!
//! Parses `n1`/`n2`, evaluates the operation and shapes the envelope.
//! Any panic raised while computing is caught and reported as a 500.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Response, StatusCode};
use std::panic::{self, AssertUnwindSafe};

use crate::calculator::{self, CalcError, Operation};
use crate::http::{build_envelope_response, Envelope, QueryParams};
use crate::logger::{panic_message, Log};

/// Serve one operation request
pub fn handle_operation(
    op: Operation,
    query: Option<&str>,
    log: &dyn Log,
    is_head: bool,
) -> Response<Full<Bytes>> {
    respond_guarded(log, is_head, || {
        let params = QueryParams::parse(query);
        calculator::evaluate(op, params.get("n1"), params.get("n2"), |n1, n2| {
            log.info(&format!("Parameters {n1} and {n2} received for {op}"));
        })
    })
}

/// Run `compute` and map its outcome, or a panic, onto an envelope response
fn respond_guarded(
    log: &dyn Log,
    is_head: bool,
    compute: impl FnOnce() -> Result<f64, CalcError>,
) -> Response<Full<Bytes>> {
    let outcome = panic::catch_unwind(AssertUnwindSafe(compute))
        .unwrap_or_else(|payload| Err(CalcError::Unhandled(panic_message(payload.as_ref()))));

    let envelope = match outcome {
        Ok(result) => Envelope::data(StatusCode::OK, result),
        Err(err) => {
            log.error(&err.to_string());
            Envelope::message(err.status(), err.client_message())
        }
    };

    build_envelope_response(&envelope, is_head)
}
