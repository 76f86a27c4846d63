//! Response helpers shared by the routing layer and handlers.

use axum::http::{HeaderMap, HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};

/// `Cache-Control` value for responses that must never be cached.
pub const NO_STORE: &str = "no-store, no-cache, must-revalidate, max-age=0";

/// Marks a response as uncacheable by browsers and intermediaries.
pub fn apply_no_store(headers: &mut HeaderMap) {
    headers.insert(header::CACHE_CONTROL, HeaderValue::from_static(NO_STORE));
    headers.insert(header::PRAGMA, HeaderValue::from_static("no-cache"));
    headers.insert(header::EXPIRES, HeaderValue::from_static("0"));
}

/// `302 Found` to `location` with no-store headers.
///
/// Falls back to `500` if `location` is not a valid header value; callers
/// validate URLs before redirecting, so this only guards against bugs.
pub fn found_no_store(location: &str) -> Response {
    let Ok(location) = HeaderValue::from_str(location) else {
        tracing::error!("Refusing to redirect to invalid location {:?}", location);
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    };

    let mut response = StatusCode::FOUND.into_response();
    let headers = response.headers_mut();
    headers.insert(header::LOCATION, location);
    apply_no_store(headers);
    response
}
