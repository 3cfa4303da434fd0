//! Request routing dispatch
//!
//! Entry point for HTTP request processing: method validation, dispatch to
//! the page and data file handlers, and access logging. Handlers share no
//! mutable state, so every request is independent.

use crate::config::AppState;
use crate::handler::{files, pages};
use crate::http;
use crate::logger::{self, AccessLogEntry};
use http_body_util::Full;
use hyper::body::{Body, Bytes};
use hyper::header::{HeaderValue, SERVER};
use hyper::{Method, Request, Response, Version};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

/// Request context handed to the page and file handlers
pub struct RequestContext<'a> {
    pub path: &'a str,
    pub is_head: bool,
    pub if_none_match: Option<String>,
    pub range_header: Option<String>,
}

/// Main entry point for HTTP request handling
pub async fn handle_request(
    req: Request<hyper::body::Incoming>,
    peer_addr: SocketAddr,
    state: Arc<AppState>,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let started = Instant::now();
    let is_head = *req.method() == Method::HEAD;

    // 1. Method gate: only GET/HEAD reach the route table
    let mut response =
        if let Some(resp) = check_http_method(req.method(), state.config.http.enable_cors) {
            resp
        // 2. Declared request bodies above the cap are refused outright
        } else if let Some(resp) = check_body_size(&req, state.config.http.max_body_size) {
            resp
        } else {
            logger::log_headers_count(req.headers().len(), state.config.logging.show_headers);

            let ctx = RequestContext {
                path: req.uri().path(),
                is_head,
                if_none_match: header_string(&req, "if-none-match"),
                range_header: header_string(&req, "range"),
            };
            route_request(&ctx, &state).await
        };

    if let Ok(value) = HeaderValue::from_str(&state.config.http.server_name) {
        response.headers_mut().insert(SERVER, value);
    }

    if state.access_log() {
        let entry = access_entry(&req, peer_addr, &response, started);
        logger::log_access(&entry, &state.config.logging.access_log_format);
    }

    Ok(response)
}

/// Route a request to a handler based on its path.
///
/// Dispatch order: exact page match, then the trailing-slash redirect for
/// page routes, then the data route prefix. Anything else is a 404.
async fn route_request(ctx: &RequestContext<'_>, state: &Arc<AppState>) -> Response<Full<Bytes>> {
    let site = &state.config.site;

    if let Some(template) = site.pages.get(ctx.path) {
        return pages::serve_page(ctx, site, template).await;
    }

    // Strict-slash rule: /xd2 redirects to /xd2/
    if !ctx.path.ends_with('/') {
        let slashed = format!("{}/", ctx.path);
        if site.pages.contains_key(&slashed) {
            return http::build_redirect_response(&slashed);
        }
    }

    if let Some(filename) = ctx.path.strip_prefix(&state.data_prefix) {
        return files::serve_data_file(ctx, site, filename).await;
    }

    http::build_404_response()
}

/// Check the HTTP method; returns a response for anything but GET/HEAD
fn check_http_method(method: &Method, enable_cors: bool) -> Option<Response<Full<Bytes>>> {
    match method {
        &Method::GET | &Method::HEAD => None,
        &Method::OPTIONS => Some(http::build_options_response(enable_cors)),
        _ => {
            logger::log_warning(&format!("Method not allowed: {method}"));
            Some(http::build_405_response())
        }
    }
}

/// Validate the Content-Length header and return 413 if it exceeds the cap
fn check_body_size(
    req: &Request<hyper::body::Incoming>,
    max_body_size: u64,
) -> Option<Response<Full<Bytes>>> {
    let size_str = req.headers().get("content-length")?.to_str().ok()?;
    match size_str.parse::<u64>() {
        Ok(size) if size > max_body_size => {
            logger::log_warning(&format!(
                "Request body too large: {size} bytes (max: {max_body_size})"
            ));
            Some(http::build_413_response())
        }
        Ok(_) => None,
        Err(_) => {
            logger::log_warning(&format!(
                "Invalid Content-Length value: '{size_str}', skipping size check"
            ));
            None
        }
    }
}

fn header_string(req: &Request<hyper::body::Incoming>, name: &str) -> Option<String> {
    req.headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(ToString::to_string)
}

/// Assemble the access log entry for a finished request
fn access_entry(
    req: &Request<hyper::body::Incoming>,
    peer_addr: SocketAddr,
    response: &Response<Full<Bytes>>,
    started: Instant,
) -> AccessLogEntry {
    let mut entry = AccessLogEntry::new(
        peer_addr.ip().to_string(),
        req.method().to_string(),
        req.uri().path().to_string(),
    );
    entry.query = req.uri().query().map(ToString::to_string);
    entry.http_version = version_label(req.version()).to_string();
    entry.status = response.status().as_u16();
    entry.body_bytes = response.body().size_hint().exact().unwrap_or(0);
    entry.referer = header_string(req, "referer");
    entry.user_agent = header_string(req, "user-agent");
    entry.request_time_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);
    entry
}

fn version_label(version: Version) -> &'static str {
    match version {
        Version::HTTP_10 => "1.0",
        Version::HTTP_2 => "2",
        Version::HTTP_3 => "3",
        _ => "1.1",
    }
}
