//! Route lookup entry point.
//!
//! # Responsibilities
//! - Build the route table from configuration
//! - Resolve a raw request to a redirect or a match outcome
//! - Compose base URLs and generate paths for named routes
//!
//! # Design Decisions
//! - Immutable after construction (thread-safe without locks)
//! - Status travels with the outcome; there is no shared "last status"
//! - Explicit NoMatch rather than silent default

use crate::config::schema::{RouteConfig, RouterConfig};
use crate::routing::error::{RouteError, RouteResult};
use crate::routing::matcher::Matcher;
use crate::routing::normalize::{Normalization, Redirect, UriNormalizer};
use crate::routing::outcome::MatchOutcome;
use crate::routing::pattern::fill_template;
use crate::routing::table::{LanguageSettings, RouteDeclaration, RouteTable};

/// Request facts supplied by the host adapter.
#[derive(Debug, Clone, Copy)]
pub struct RequestInfo<'a> {
    /// HTTP method, any case.
    pub method: &'a str,
    /// Raw path plus query string.
    pub target: &'a str,
    /// `http` or `https`.
    pub scheme: &'a str,
    /// Host name (with port, if any).
    pub host: &'a str,
}

/// What the host adapter should do with a request.
#[derive(Debug, Clone)]
pub enum Resolution<'r> {
    /// The path is not canonical; answer with a permanent redirect.
    Redirect(Redirect),
    /// The path is canonical and was matched.
    Outcome(MatchOutcome<'r>),
}

/// Compiled routes plus the URI rules they are served under.
#[derive(Debug, Clone, Default)]
pub struct Router {
    table: RouteTable,
    normalizer: UriNormalizer,
}

impl From<&RouteConfig> for RouteDeclaration {
    fn from(config: &RouteConfig) -> Self {
        Self {
            methods: config.methods.clone(),
            template: config.template.clone(),
            controller: config.controller.clone(),
            name: config.name.clone(),
            language: config.language.clone(),
            case_insensitive: config.case_insensitive,
            middleware: config.middleware.clone(),
        }
    }
}

impl Router {
    pub fn new(table: RouteTable, normalizer: UriNormalizer) -> Self {
        Self { table, normalizer }
    }

    /// Builds a router from configuration, registering routes in file order.
    pub fn from_config(config: &RouterConfig) -> RouteResult<Self> {
        let settings = LanguageSettings {
            default_language: config.router.default_language.to_ascii_lowercase(),
            always_prefix_default: config.router.always_prefix_default,
        };
        let mut table = RouteTable::new(settings);
        for route in &config.routes {
            table.add_route(RouteDeclaration::from(route))?;
        }

        tracing::info!(
            routes = table.len(),
            languages = ?table.languages(),
            base_path = %config.router.base_path,
            "Route table built"
        );

        Ok(Self::new(table, UriNormalizer::new(&config.router.base_path)))
    }

    pub fn table(&self) -> &RouteTable {
        &self.table
    }

    pub fn normalizer(&self) -> &UriNormalizer {
        &self.normalizer
    }

    /// The configured base path; `/` for the root mount.
    pub fn base_path(&self) -> &str {
        self.normalizer.base_path()
    }

    /// `scheme://host` followed by the base path.
    pub fn base_url(&self, scheme: &str, host: &str) -> String {
        format!(
            "{}://{}{}",
            scheme,
            host.trim_end_matches('/'),
            self.normalizer.base_path()
        )
    }

    /// Normalizes and matches a raw request.
    ///
    /// A path outside the base path is reported as `NoMatch`.
    pub fn resolve(&self, request: &RequestInfo<'_>) -> Resolution<'_> {
        let normalized = match self.normalizer.normalize(request.target, &self.table) {
            Ok(Normalization::Canonical(path)) => path,
            Ok(Normalization::Redirect(redirect)) => return Resolution::Redirect(redirect),
            Err(e) => {
                tracing::debug!(error = %e, "Request outside base path");
                return Resolution::Outcome(MatchOutcome::NoMatch);
            }
        };

        let base_url = self.base_url(request.scheme, request.host);
        Resolution::Outcome(self.match_path(
            &normalized.request_path,
            &normalized.language,
            request.method,
            &base_url,
        ))
    }

    /// Matches an already normalized path in one language bucket.
    pub fn match_path(
        &self,
        request_path: &str,
        language: &str,
        method: &str,
        base_url: &str,
    ) -> MatchOutcome<'_> {
        Matcher::new(&self.table).match_path(request_path, language, method, base_url)
    }

    /// Builds the path (base path included) of a named route.
    ///
    /// `params` are positional, as reported by a match of the same route.
    pub fn path_for(&self, language: &str, name: &str, params: &[Option<&str>]) -> RouteResult<String> {
        let route = self
            .table
            .route_by_name(language, name)
            .ok_or_else(|| RouteError::UnknownRouteName {
                name: name.to_string(),
                language: language.to_string(),
            })?;

        let path = fill_template(route.template(), params).map_err(|index| {
            RouteError::MissingParameter {
                name: name.to_string(),
                index,
            }
        })?;
        let path = format!("{}{}", route.prefix().unwrap_or(""), path);

        if !route.pattern().is_match(&path) {
            return Err(RouteError::ParameterMismatch {
                name: name.to_string(),
                path,
            });
        }
        Ok(format!("{}{}", self.normalizer.mount(), path))
    }
}
