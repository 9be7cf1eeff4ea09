//! JSON responses with permissive CORS headers

use crate::error::AdminError;
use lambda_http::http::header::{CONTENT_TYPE, HeaderName, HeaderValue};
use lambda_http::http::StatusCode;
use lambda_http::{Body, Response};
use serde::Serialize;

const CORS_HEADERS: [(&str, &str); 3] = [
    ("access-control-allow-origin", "*"),
    ("access-control-allow-headers", "*"),
    ("access-control-allow-methods", "OPTIONS,POST"),
];

fn with_cors(status: StatusCode, body: Body) -> Response<Body> {
    let mut response = Response::new(body);
    *response.status_mut() = status;
    let headers = response.headers_mut();
    for (name, value) in CORS_HEADERS {
        headers.insert(
            HeaderName::from_static(name),
            HeaderValue::from_static(value),
        );
    }
    response
}

pub fn json<T: Serialize>(status: StatusCode, value: &T) -> Response<Body> {
    match serde_json::to_string(value) {
        Ok(text) => {
            let mut response = with_cors(status, Body::Text(text));
            response
                .headers_mut()
                .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
            response
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to serialize response body");
            with_cors(StatusCode::INTERNAL_SERVER_ERROR, Body::Empty)
        }
    }
}

/// `{"Error": "<message>"}` with the error's status
pub fn error(err: &AdminError) -> Response<Body> {
    json(
        err.status(),
        &serde_json::json!({ "Error": err.public_message() }),
    )
}

/// Answer to a CORS preflight request
pub fn preflight() -> Response<Body> {
    with_cors(StatusCode::OK, Body::Empty)
}
