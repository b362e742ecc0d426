//! Language-aware URL router.
//!
//! Route templates are compiled into anchored patterns grouped by language.
//! Requests are canonicalized (base path, trailing slash, language segment)
//! and matched first-wins against their language's routes, yielding a
//! 200 / 403 / 404 outcome or a redirect to the canonical path.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod routing;

pub use config::schema::RouterConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use routing::{MatchOutcome, RequestInfo, Resolution, Router};
