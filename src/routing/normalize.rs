//! Request path normalization.
//!
//! # Responsibilities
//! - Split the request target into path and query string
//! - Strip the application base path
//! - Enforce the single trailing slash canonical form
//! - Detect a language segment in the path
//!
//! # Design Decisions
//! - A non-canonical path is not matched; the caller gets a redirect target
//! - The query string survives the redirect untouched
//! - Only languages with registered routes are recognized in paths
//! - Detection ignores case (`/ES/` selects `es`); the `/es` prefix in each
//!   pattern is still matched with the route's own case sensitivity

use axum::http::StatusCode;
use thiserror::Error;

use crate::routing::table::RouteTable;

/// Errors raised while normalizing a request target.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum NormalizeError {
    /// The request path does not live under the configured base path.
    #[error("path `{path}` is outside base path `{base_path}`")]
    OutsideBasePath { path: String, base_path: String },
}

/// A permanent redirect to the canonical form of the request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Redirect {
    location: String,
}

impl Redirect {
    /// Path (with base path and query string) to redirect to.
    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn status(&self) -> StatusCode {
        StatusCode::MOVED_PERMANENTLY
    }
}

/// A canonical request path ready for matching.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedPath {
    /// Path below the base path, always ending in exactly one `/`.
    pub request_path: String,
    /// Raw query string, without the `?`.
    pub query: Option<String>,
    /// Resolved request language.
    pub language: String,
    /// Whether the language came from a path segment.
    pub language_in_path: bool,
}

/// Result of normalizing a request target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Normalization {
    Canonical(NormalizedPath),
    Redirect(Redirect),
}

/// Splits a request target at the first `?`.
pub fn split_target(target: &str) -> (&str, Option<&str>) {
    match target.split_once('?') {
        Some((path, query)) => (path, Some(query)),
        None => (target, None),
    }
}

/// Whether a path ends with exactly one `/`.
pub fn is_canonical(path: &str) -> bool {
    path.ends_with('/') && !path.ends_with("//")
}

/// First `/xx/` segment made of two ASCII letters, if any.
pub fn language_segment(path: &str) -> Option<&str> {
    let pieces: Vec<&str> = path.split('/').collect();
    if pieces.len() < 3 {
        return None;
    }
    // Interior pieces are the ones with a slash on both sides.
    pieces[1..pieces.len() - 1]
        .iter()
        .copied()
        .find(|s| s.len() == 2 && s.bytes().all(|b| b.is_ascii_alphabetic()))
}

/// Strips the base path and canonicalizes trailing slashes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UriNormalizer {
    /// Base path without trailing slash; empty for the root mount.
    mount: String,
}

impl UriNormalizer {
    pub fn new(base_path: &str) -> Self {
        let trimmed = base_path.trim_matches('/');
        let mount = if trimmed.is_empty() {
            String::new()
        } else {
            format!("/{}", trimmed)
        };
        Self { mount }
    }

    /// The configured base path; `/` for the root mount.
    pub fn base_path(&self) -> &str {
        if self.mount.is_empty() {
            "/"
        } else {
            &self.mount
        }
    }

    /// The base path as a prefix to join paths onto; empty for the root mount.
    pub fn mount(&self) -> &str {
        &self.mount
    }

    /// Normalizes a raw request target (`path?query`).
    pub fn normalize(&self, target: &str, table: &RouteTable) -> Result<Normalization, NormalizeError> {
        let (raw_path, query) = split_target(target);

        let request_path = raw_path
            .strip_prefix(self.mount.as_str())
            .filter(|rest| rest.is_empty() || rest.starts_with('/'))
            .ok_or_else(|| NormalizeError::OutsideBasePath {
                path: raw_path.to_string(),
                base_path: self.base_path().to_string(),
            })?;

        let query = query.filter(|q| !q.is_empty());

        if !is_canonical(request_path) {
            let mut location = format!("{}{}/", self.mount, request_path.trim_end_matches('/'));
            if let Some(query) = query {
                location.push('?');
                location.push_str(query);
            }
            tracing::debug!(path = %raw_path, location = %location, "Non-canonical path");
            return Ok(Normalization::Redirect(Redirect { location }));
        }

        let detected = language_segment(request_path)
            .map(|code| code.to_ascii_lowercase())
            .filter(|code| table.has_language(code));
        let language_in_path = detected.is_some();
        let language = detected.unwrap_or_else(|| table.default_language().to_string());

        Ok(Normalization::Canonical(NormalizedPath {
            request_path: request_path.to_string(),
            query: query.map(str::to_string),
            language,
            language_in_path,
        }))
    }
}

impl Default for UriNormalizer {
    fn default() -> Self {
        Self::new("/")
    }
}
