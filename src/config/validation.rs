//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate language codes, methods and controllers of every route
//! - Validate addresses, scheme and canonical host
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: RouterConfig → Result<(), Vec<ValidationError>>
//! - Pattern and duplicate-name checks belong to route table construction

use std::net::SocketAddr;

use thiserror::Error;
use url::Url;

use crate::config::schema::RouterConfig;
use crate::routing::table::normalize_language;

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("default_language `{0}` is not a two-letter code")]
    DefaultLanguage(String),

    #[error("base_path `{0}` must not contain `?` or `#`")]
    BasePath(String),

    #[error("route #{index}: language `{language}` is not a two-letter code")]
    RouteLanguage { index: usize, language: String },

    #[error("route #{index}: no methods")]
    RouteMethods { index: usize },

    #[error("route #{index}: empty controller")]
    RouteController { index: usize },

    #[error("scheme `{0}` must be http or https")]
    Scheme(String),

    #[error("canonical_host `{0}` is not a valid host")]
    CanonicalHost(String),

    #[error("{field} `{value}` is not a socket address")]
    Address { field: &'static str, value: String },

    #[error("request_timeout_secs must be greater than zero")]
    Timeout,
}

/// Check a configuration for semantic errors.
pub fn validate_config(config: &RouterConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if normalize_language(&config.router.default_language).is_none() {
        errors.push(ValidationError::DefaultLanguage(
            config.router.default_language.clone(),
        ));
    }
    if config.router.base_path.contains(['?', '#']) {
        errors.push(ValidationError::BasePath(config.router.base_path.clone()));
    }

    for (index, route) in config.routes.iter().enumerate() {
        if let Some(language) = route.language.as_deref().filter(|l| !l.is_empty()) {
            if normalize_language(language).is_none() {
                errors.push(ValidationError::RouteLanguage {
                    index,
                    language: language.to_string(),
                });
            }
        }
        if route.methods.iter().all(|m| m.trim().is_empty()) {
            errors.push(ValidationError::RouteMethods { index });
        }
        if route.controller.trim().is_empty() {
            errors.push(ValidationError::RouteController { index });
        }
    }

    let server = &config.server;
    if server.scheme != "http" && server.scheme != "https" {
        errors.push(ValidationError::Scheme(server.scheme.clone()));
    } else if Url::parse(&format!("{}://{}", server.scheme, server.canonical_host))
        .ok()
        .and_then(|u| u.host_str().map(str::to_owned))
        .is_none()
    {
        errors.push(ValidationError::CanonicalHost(server.canonical_host.clone()));
    }
    if server.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::Address {
            field: "bind_address",
            value: server.bind_address.clone(),
        });
    }
    if server.request_timeout_secs == 0 {
        errors.push(ValidationError::Timeout);
    }

    let observability = &config.observability;
    if observability.metrics_enabled && observability.metrics_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::Address {
            field: "metrics_address",
            value: observability.metrics_address.clone(),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
