//! Request routing dispatch module
//!
//! Entry point for HTTP request processing: referer gating, mount resolution,
//! dispatch to the file responder, and access logging.

use hyper::header::{self, HeaderValue};
use hyper::{Method, Request, Response, Version};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Instant;

use crate::config::AppState;
use crate::handler::static_files;
use crate::http::cache::Conditional;
use crate::http::{self, referer, AccessDecision, ResponseBody};
use crate::logger::{self, AccessLogEntry};

/// Request context encapsulating information needed for request processing
#[derive(Debug, Default)]
pub struct RequestContext<'a> {
    pub method: Method,
    pub path: &'a str,
    pub range_header: Option<&'a str>,
    pub if_none_match: Option<&'a str>,
    pub if_modified_since: Option<&'a str>,
    pub cache_control: Option<&'a str>,
    pub referer: Option<&'a str>,
    pub host: Option<&'a str>,
}

impl<'a> RequestContext<'a> {
    pub fn from_request<B>(req: &'a Request<B>) -> Self {
        let headers = req.headers();
        let get = move |name: header::HeaderName| headers.get(name).and_then(|v| v.to_str().ok());

        Self {
            method: req.method().clone(),
            path: req.uri().path(),
            range_header: get(header::RANGE),
            if_none_match: get(header::IF_NONE_MATCH),
            if_modified_since: get(header::IF_MODIFIED_SINCE),
            cache_control: get(header::CACHE_CONTROL),
            referer: get(header::REFERER),
            host: get(header::HOST).or_else(|| req.uri().host()),
        }
    }

    /// Conditional headers used for the freshness check
    pub const fn conditional(&self) -> Conditional<'a> {
        Conditional {
            if_none_match: self.if_none_match,
            if_modified_since: self.if_modified_since,
            cache_control: self.cache_control,
        }
    }
}

/// Main entry point for HTTP request handling
pub async fn handle_request<B>(
    req: Request<B>,
    state: Arc<AppState>,
    peer: Option<SocketAddr>,
) -> Result<Response<ResponseBody>, Infallible> {
    let started = Instant::now();
    // Held for the whole request; a reload only affects later requests
    let serve = state.snapshot().await;
    let ctx = RequestContext::from_request(&req);

    let mut response = match referer::check(ctx.referer, ctx.host, serve.allow_referer.as_ref()) {
        AccessDecision::Denied => {
            logger::log_access_denied(ctx.referer.unwrap_or("-"), ctx.path);
            http::build_403_response()
        }
        AccessDecision::Allowed => {
            let target = serve.mounts.resolve(ctx.path).unwrap_or_default();
            static_files::respond(&ctx, &target, &serve.mime_overrides)
                .await
                .unwrap_or_else(http::build_404_response)
        }
    };

    if let Ok(value) = HeaderValue::from_str(&serve.server_name) {
        response.headers_mut().insert(header::SERVER, value);
    }

    if state.cached_access_log.load(Ordering::Relaxed) {
        let entry = access_entry(&req, &response, peer, started);
        logger::log_access(&entry, &serve.access_log_format);
    }

    Ok(response)
}

/// Build the access log entry for a finished request
fn access_entry<B>(
    req: &Request<B>,
    response: &Response<ResponseBody>,
    peer: Option<SocketAddr>,
    started: Instant,
) -> AccessLogEntry {
    let request_header = |name: header::HeaderName| {
        req.headers()
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(ToString::to_string)
    };

    let mut entry = AccessLogEntry::new(
        peer.map_or_else(|| "-".to_string(), |addr| addr.ip().to_string()),
        req.method().to_string(),
        req.uri().path().to_string(),
    );
    entry.query = req.uri().query().map(ToString::to_string);
    entry.http_version = version_label(req.version()).to_string();
    entry.status = response.status().as_u16();
    entry.body_bytes = response
        .headers()
        .get(header::CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse().ok())
        .unwrap_or(0);
    entry.referer = request_header(header::REFERER);
    entry.user_agent = request_header(header::USER_AGENT);
    entry.range = request_header(header::RANGE);
    entry.request_time_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);
    entry
}

const fn version_label(version: Version) -> &'static str {
    match version {
        Version::HTTP_09 => "0.9",
        Version::HTTP_10 => "1.0",
        Version::HTTP_2 => "2",
        Version::HTTP_3 => "3",
        _ => "1.1",
    }
}
