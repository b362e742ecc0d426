//! Request handling.
//!
//! # Responsibilities
//! - Generate unique request ID (UUID v4)
//! - Extract routing-relevant information (method, target, host, scheme)
//!
//! # Design Decisions
//! - Request ID added as early as possible for tracing
//! - An incoming `x-request-id` is kept, not replaced
//! - `x-forwarded-proto` overrides the configured scheme when it is http(s)

use std::task::{Context, Poll};

use axum::http::{header, HeaderValue, Request};
use tower::{Layer, Service};
use uuid::Uuid;

use crate::config::ServerConfig;
use crate::routing::RequestInfo;

/// Header carrying the request ID.
pub const X_REQUEST_ID: &str = "x-request-id";

/// Request ID stored in request extensions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestId(pub String);

/// Access to the request ID of a request.
pub trait RequestIdExt {
    fn request_id(&self) -> &str;
}

impl<B> RequestIdExt for Request<B> {
    fn request_id(&self) -> &str {
        self.extensions()
            .get::<RequestId>()
            .map(|id| id.0.as_str())
            .or_else(|| self.headers().get(X_REQUEST_ID).and_then(|v| v.to_str().ok()))
            .unwrap_or("unknown")
    }
}

/// Layer stamping every request with an ID.
#[derive(Debug, Clone, Copy, Default)]
pub struct RequestIdLayer;

impl<S> Layer<S> for RequestIdLayer {
    type Service = RequestIdService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        RequestIdService { inner }
    }
}

/// Service produced by [`RequestIdLayer`].
#[derive(Debug, Clone)]
pub struct RequestIdService<S> {
    inner: S,
}

impl<S, B> Service<Request<B>> for RequestIdService<S>
where
    S: Service<Request<B>>,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = S::Future;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: Request<B>) -> Self::Future {
        let existing = req
            .headers()
            .get(X_REQUEST_ID)
            .and_then(|v| v.to_str().ok())
            .filter(|v| !v.is_empty())
            .map(str::to_owned);

        let id = match existing {
            Some(id) => id,
            None => {
                let id = Uuid::new_v4().to_string();
                if let Ok(value) = HeaderValue::from_str(&id) {
                    req.headers_mut().insert(X_REQUEST_ID, value);
                }
                id
            }
        };
        req.extensions_mut().insert(RequestId(id));
        self.inner.call(req)
    }
}

/// Owned request facts; borrowed as a [`RequestInfo`] for resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestFacts {
    pub method: String,
    pub target: String,
    pub scheme: String,
    pub host: String,
}

impl RequestFacts {
    pub fn from_request<B>(req: &Request<B>, server: &ServerConfig) -> Self {
        let target = req
            .uri()
            .path_and_query()
            .map(|pq| pq.as_str().to_string())
            .unwrap_or_else(|| req.uri().path().to_string());

        let host = req
            .headers()
            .get(header::HOST)
            .and_then(|h| h.to_str().ok())
            .filter(|h| !h.is_empty())
            .map(str::to_owned)
            .or_else(|| req.uri().authority().map(|a| a.to_string()))
            .unwrap_or_else(|| server.canonical_host.clone());

        let scheme = req
            .headers()
            .get("x-forwarded-proto")
            .and_then(|v| v.to_str().ok())
            .map(str::to_ascii_lowercase)
            .filter(|p| p == "http" || p == "https")
            .unwrap_or_else(|| server.scheme.clone());

        Self {
            method: req.method().as_str().to_string(),
            target,
            scheme,
            host,
        }
    }

    pub fn as_info(&self) -> RequestInfo<'_> {
        RequestInfo {
            method: &self.method,
            target: &self.target,
            scheme: &self.scheme,
            host: &self.host,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;

    #[test]
    fn test_request_facts() {
        let req = Request::builder()
            .method("POST")
            .uri("/es/about/?a=1")
            .header("Host", "example.com")
            .header("X-Forwarded-Proto", "HTTPS")
            .body(Body::empty())
            .unwrap();
        let facts = RequestFacts::from_request(&req, &ServerConfig::default());
        assert_eq!(facts.method, "POST");
        assert_eq!(facts.target, "/es/about/?a=1");
        assert_eq!(facts.host, "example.com");
        assert_eq!(facts.scheme, "https");
    }

    #[test]
    fn test_request_facts_fallbacks() {
        let req = Request::builder()
            .uri("/about/")
            .header("X-Forwarded-Proto", "gopher")
            .body(Body::empty())
            .unwrap();
        let facts = RequestFacts::from_request(&req, &ServerConfig::default());
        assert_eq!(facts.host, "localhost");
        assert_eq!(facts.scheme, "http");
        assert_eq!(facts.as_info().target, "/about/");
    }

    #[test]
    fn test_request_id_from_header() {
        let req = Request::builder()
            .header(X_REQUEST_ID, "abc-123")
            .body(Body::empty())
            .unwrap();
        assert_eq!(req.request_id(), "abc-123");

        let req = Request::builder().body(Body::empty()).unwrap();
        assert_eq!(req.request_id(), "unknown");
    }
}
