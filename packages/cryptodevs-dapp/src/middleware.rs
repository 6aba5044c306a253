//! Request correlation middleware.

use axum::extract::Request;
use axum::http::{HeaderMap, HeaderName, HeaderValue};
use axum::middleware::Next;
use axum::response::Response;
use rand::Rng;

const X_REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");

/// Correlation id for one request, available to handlers as an extension.
#[derive(Clone, Debug)]
pub struct RequestId(pub String);

impl RequestId {
    /// Caller-supplied id if it is a printable header value, else a fresh one.
    fn for_request(headers: &HeaderMap) -> (Self, HeaderValue) {
        if let Some(value) = headers.get(&X_REQUEST_ID) {
            if let Ok(id) = value.to_str() {
                return (Self(id.to_owned()), value.clone());
            }
        }
        let id = format!("cd-{:016x}", rand::thread_rng().gen::<u64>());
        let value = HeaderValue::from_str(&id).unwrap_or(HeaderValue::from_static("cd-unknown"));
        (Self(id), value)
    }
}

/// Tag the request and its response with an `x-request-id`.
pub async fn inject_request_id(mut request: Request, next: Next) -> Response {
    let (id, header) = RequestId::for_request(request.headers());
    request.extensions_mut().insert(id);

    let mut response = next.run(request).await;
    response.headers_mut().insert(X_REQUEST_ID, header);
    response
}
