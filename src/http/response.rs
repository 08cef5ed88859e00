//! HTTP response building module
//!
//! Builders for every status the file server produces. Bodies are boxed so that
//! buffered text and streamed files share one response type.

use bytes::Bytes;
use http_body_util::combinators::BoxBody;
use http_body_util::{BodyExt, Empty, Full};
use hyper::header::{self, HeaderValue};
use hyper::Response;

use super::cache::Validators;
use super::range::{RangeHeaders, ACCEPT_RANGES};

/// Body type of every response
pub type ResponseBody = BoxBody<Bytes, std::io::Error>;

/// Methods advertised on `OPTIONS` and 405 responses
pub const ALLOWED_METHODS: &str = "OPTIONS, GET, HEAD";

/// Diagnostic body of a 416 response
pub const RANGE_NOT_SATISFIABLE_BODY: &str = "Range Not Satisfiable";

/// Buffered body
pub fn full_body(data: impl Into<Bytes>) -> ResponseBody {
    Full::new(data.into()).map_err(|never| match never {}).boxed()
}

/// Empty body
pub fn empty_body() -> ResponseBody {
    Empty::<Bytes>::new().map_err(|never| match never {}).boxed()
}

/// Build 204 response to an `OPTIONS` request
pub fn build_options_response() -> Response<ResponseBody> {
    Response::builder()
        .status(204)
        .header("Allow", ALLOWED_METHODS)
        .body(empty_body())
        .unwrap_or_else(|e| fallback("OPTIONS", &e))
}

/// Build 304 Not Modified response
pub fn build_304_response() -> Response<ResponseBody> {
    Response::builder()
        .status(304)
        .body(empty_body())
        .unwrap_or_else(|e| fallback("304", &e))
}

/// Build 400 Bad Request response for a rejected `Range` header
pub fn build_400_response(reason: &str) -> Response<ResponseBody> {
    let mut response = text_response(400, reason.to_string());
    response
        .headers_mut()
        .insert(header::ACCEPT_RANGES, HeaderValue::from_static(ACCEPT_RANGES));
    response
}

/// Build 403 Forbidden response
pub fn build_403_response() -> Response<ResponseBody> {
    text_response(403, "403 Forbidden")
}

/// Build 404 Not Found response
pub fn build_404_response() -> Response<ResponseBody> {
    text_response(404, "404 Not Found")
}

/// Build 405 Method Not Allowed response
pub fn build_405_response() -> Response<ResponseBody> {
    let mut response = text_response(405, "405 Method Not Allowed");
    response
        .headers_mut()
        .insert(header::ALLOW, HeaderValue::from_static(ALLOWED_METHODS));
    response
}

/// Build 416 Range Not Satisfiable response from resolved range headers
pub fn build_416_response(range: &RangeHeaders) -> Response<ResponseBody> {
    let mut builder = Response::builder()
        .status(416)
        .header("Content-Type", "text/plain")
        .header("Accept-Ranges", ACCEPT_RANGES);
    if let Some(content_range) = &range.content_range {
        builder = builder.header("Content-Range", content_range);
    }
    builder
        .body(full_body(RANGE_NOT_SATISFIABLE_BODY))
        .unwrap_or_else(|e| fallback("416", &e))
}

/// Build 200 response around an in-memory body
pub fn build_inline_response(data: Bytes, content_type: Option<&str>) -> Response<ResponseBody> {
    let mut builder = Response::builder()
        .status(200)
        .header("Content-Length", data.len());
    if let Some(content_type) = content_type {
        builder = builder.header("Content-Type", content_type);
    }
    builder
        .body(full_body(data))
        .unwrap_or_else(|e| fallback("200", &e))
}

/// Build 200/206 response around a file body using resolved range headers
pub fn build_range_response(
    range: &RangeHeaders,
    content_type: Option<&str>,
    body: ResponseBody,
) -> Response<ResponseBody> {
    let mut builder = Response::builder()
        .status(range.status)
        .header("Accept-Ranges", ACCEPT_RANGES);
    if let Some(content_range) = &range.content_range {
        builder = builder.header("Content-Range", content_range);
    }
    if let Some(content_length) = range.content_length {
        builder = builder.header("Content-Length", content_length);
    }
    if let Some(content_type) = content_type {
        builder = builder.header("Content-Type", content_type);
    }
    builder
        .body(body)
        .unwrap_or_else(|e| fallback(range.status.to_string().as_str(), &e))
}

/// Attach `Last-Modified` and `ETag` to a response
pub fn attach_validators(response: &mut Response<ResponseBody>, validators: &Validators) {
    let headers = response.headers_mut();
    if let Ok(value) = HeaderValue::from_str(&validators.last_modified) {
        headers.insert(header::LAST_MODIFIED, value);
    }
    if let Ok(value) = HeaderValue::from_str(&validators.etag) {
        headers.insert(header::ETAG, value);
    }
}

/// Build a plain-text response
fn text_response(status: u16, body: impl Into<Bytes>) -> Response<ResponseBody> {
    let body = body.into();
    Response::builder()
        .status(status)
        .header("Content-Type", "text/plain")
        .header("Content-Length", body.len())
        .body(full_body(body))
        .unwrap_or_else(|e| fallback(status.to_string().as_str(), &e))
}

/// Log response build error and fall back to an empty response
fn fallback(status: &str, error: &hyper::http::Error) -> Response<ResponseBody> {
    crate::logger::log_error(&format!("Failed to build {status} response: {error}"));
    Response::new(empty_body())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::range::RangeOutcome;
    use std::time::{Duration, UNIX_EPOCH};

    #[test]
    fn test_options_response() {
        let response = build_options_response();
        assert_eq!(response.status(), 204);
        assert_eq!(response.headers()["allow"], "OPTIONS, GET, HEAD");
    }

    #[test]
    fn test_405_response() {
        let response = build_405_response();
        assert_eq!(response.status(), 405);
        assert_eq!(response.headers()["allow"], ALLOWED_METHODS);
    }

    #[test]
    fn test_400_response_keeps_accept_ranges() {
        let response = build_400_response("bad range");
        assert_eq!(response.status(), 400);
        assert_eq!(response.headers()["accept-ranges"], "bytes");
        assert_eq!(response.headers()["content-length"], "9");
    }

    #[test]
    fn test_416_response() {
        let range = RangeOutcome::Unsatisfiable.headers(Some(1000));
        let response = build_416_response(&range);
        assert_eq!(response.status(), 416);
        assert_eq!(response.headers()["content-range"], "bytes */1000");
        assert_eq!(response.headers()["accept-ranges"], "bytes");
        assert!(response.headers().get("content-length").is_none());
    }

    #[test]
    fn test_range_response_headers() {
        let range = RangeOutcome::Partial { start: 0, end: 499 }.headers(Some(1000));
        let response = build_range_response(&range, Some("video/mp4"), empty_body());
        assert_eq!(response.status(), 206);
        assert_eq!(response.headers()["content-range"], "bytes 0-499/1000");
        assert_eq!(response.headers()["content-length"], "500");
        assert_eq!(response.headers()["content-type"], "video/mp4");
        assert_eq!(response.headers()["accept-ranges"], "bytes");
    }

    #[test]
    fn test_range_response_without_type() {
        let range = RangeOutcome::Full.headers(Some(10));
        let response = build_range_response(&range, None, empty_body());
        assert_eq!(response.status(), 200);
        assert!(response.headers().get("content-type").is_none());
        assert!(response.headers().get("content-range").is_none());
    }

    #[test]
    fn test_attach_validators() {
        let validators = Validators::new(3, UNIX_EPOCH + Duration::from_secs(60));
        let mut response = build_304_response();
        attach_validators(&mut response, &validators);
        assert_eq!(response.headers()["last-modified"], "Thu, 01 Jan 1970 00:01:00 GMT");
        assert_eq!(response.headers()["etag"], "W/\"3-3c\"");
    }
}
