//! Request identity and client addressing.
//!
//! # Responsibilities
//! - Generate and propagate `x-request-id` for log correlation
//! - Derive the rate-limit key from the trusted client-IP header
//!
//! # Design Decisions
//! - The trusted header is stamped by the fronting edge; the socket address
//!   is NAT noise and never consulted
//! - An absent header yields the empty key: anonymous callers share a bucket

use axum::http::{HeaderMap, HeaderValue, Request};
use tower_http::request_id::{MakeRequestId, RequestId};
use uuid::Uuid;

/// Header carrying the request ID.
pub const X_REQUEST_ID: &str = "x-request-id";

/// Creates a v4 UUID request ID for requests that arrive without one.
#[derive(Debug, Clone, Copy, Default)]
pub struct MakeRequestUuid;

impl MakeRequestId for MakeRequestUuid {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        let id = HeaderValue::from_str(&Uuid::new_v4().to_string()).ok()?;
        Some(RequestId::new(id))
    }
}

/// Derive the rate-limit key for a request from the trusted client-IP header.
///
/// Requests without the header all map to the empty key.
pub fn client_key(headers: &HeaderMap, trusted_header: &str) -> String {
    headers
        .get(trusted_header)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("")
        .to_string()
}
