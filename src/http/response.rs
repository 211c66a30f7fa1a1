//! HTTP response building module
//!
//! Every response body is a JSON envelope carrying the status code and
//! either a `data` payload or a `msg`.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Response, StatusCode};
use serde::{Serialize, Serializer};

use crate::calculator::INTERNAL_ERROR_MSG;

pub const JSON_CONTENT_TYPE: &str = "application/json; charset=utf-8";

/// Whole numbers below this magnitude are written in integer notation
const INTEGER_NOTATION_LIMIT: f64 = 1e21;

/// Response envelope
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Envelope {
    pub statuscode: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<ResultNumber>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub msg: Option<String>,
}

impl Envelope {
    pub fn data(status: StatusCode, value: f64) -> Self {
        Self {
            statuscode: status.as_u16(),
            data: Some(ResultNumber(value)),
            msg: None,
        }
    }

    pub fn message(status: StatusCode, msg: impl Into<String>) -> Self {
        Self {
            statuscode: status.as_u16(),
            data: None,
            msg: Some(msg.into()),
        }
    }
}

/// Numeric result as written in the `data` field
///
/// Whole values below 1e21 in magnitude are written as plain integers
/// (`5`, `100000000000000000`); everything else uses the shortest
/// round-trip float form (`4.5`, `1e+21`).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResultNumber(pub f64);

impl Serialize for ResultNumber {
    #[allow(clippy::cast_possible_truncation)]
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let value = self.0;
        if value.fract() == 0.0 && value.abs() < INTEGER_NOTATION_LIMIT {
            // exact: |value| < 1e21 < 2^70
            serializer.serialize_i128(value as i128)
        } else {
            serializer.serialize_f64(value)
        }
    }
}

/// Build a JSON envelope response
///
/// `is_head` keeps the headers but drops the body.
pub fn build_envelope_response(envelope: &Envelope, is_head: bool) -> Response<Full<Bytes>> {
    let status = StatusCode::from_u16(envelope.statuscode)
        .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    let json = match serde_json::to_string(envelope) {
        Ok(j) => j,
        Err(_) => return build_internal_error_response(),
    };
    build_json_response(status, json, is_head, &[])
}

/// Build 405 response advertising the allowed methods
pub fn build_405_response(is_head: bool) -> Response<Full<Bytes>> {
    let envelope = Envelope::message(StatusCode::METHOD_NOT_ALLOWED, "Method Not Allowed");
    let json = serde_json::to_string(&envelope).unwrap_or_default();
    build_json_response(
        StatusCode::METHOD_NOT_ALLOWED,
        json,
        is_head,
        &[("Allow", "GET, HEAD")],
    )
}

/// Fallback 500 response built without serialization
pub fn build_internal_error_response() -> Response<Full<Bytes>> {
    let body = format!(r#"{{"statuscode":500,"msg":"{INTERNAL_ERROR_MSG}"}}"#);
    build_json_response(StatusCode::INTERNAL_SERVER_ERROR, body, false, &[])
}

fn build_json_response(
    status: StatusCode,
    json: String,
    is_head: bool,
    extra_headers: &[(&str, &str)],
) -> Response<Full<Bytes>> {
    let content_length = json.len();
    let body = if is_head {
        Bytes::new()
    } else {
        Bytes::from(json)
    };

    let mut builder = Response::builder()
        .status(status)
        .header("Content-Type", JSON_CONTENT_TYPE)
        .header("Content-Length", content_length);
    for (name, value) in extra_headers {
        builder = builder.header(*name, *value);
    }

    builder.body(Full::new(body)).unwrap_or_else(|_| {
        let mut resp = Response::new(Full::new(Bytes::new()));
        *resp.status_mut() = StatusCode::INTERNAL_SERVER_ERROR;
        resp
    })
}
