//! Request routing dispatch module
//!
//! Entry point for HTTP request processing: logs the inbound request, matches
//! the operation route, validates the method and dispatches.

use crate::calculator::Operation;
use crate::config::AppState;
use crate::handler::calculate;
use crate::http::{self, Envelope};
use crate::logger::{self, Log};
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Method, Request, Response, StatusCode};
use std::convert::Infallible;
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

/// Main entry point for HTTP request handling
///
/// The request body is never read, so any body type is accepted.
pub async fn handle_request<B>(
    req: Request<B>,
    peer_addr: SocketAddr,
    state: Arc<AppState>,
) -> Result<Response<Full<Bytes>>, Infallible> {
    Ok(route_request(&req, peer_addr.ip(), state.log.as_ref()))
}

/// Log, route and answer a single request
pub fn route_request<B>(req: &Request<B>, ip: IpAddr, log: &dyn Log) -> Response<Full<Bytes>> {
    let method = req.method();
    let uri = req.uri();
    let url = uri.path_and_query().map_or_else(|| uri.path(), |pq| pq.as_str());
    logger::log_incoming_request(log, method, url, ip);

    let is_head = *method == Method::HEAD;

    // 1. Match operation route
    let Some(op) = Operation::from_path(uri.path()) else {
        return http::build_envelope_response(
            &Envelope::message(StatusCode::NOT_FOUND, "Not Found"),
            is_head,
        );
    };

    // 2. Check HTTP method
    if let Some(resp) = check_http_method(method, log) {
        return resp;
    }

    // 3. Dispatch
    calculate::handle_operation(op, uri.query(), log, is_head)
}

/// Only GET and HEAD reach the operation handlers
fn check_http_method(method: &Method, log: &dyn Log) -> Option<Response<Full<Bytes>>> {
    match method {
        &Method::GET | &Method::HEAD => None,
        _ => {
            log.warn(&format!("Method not allowed: {method}"));
            Some(http::build_405_response(false))
        }
    }
}
