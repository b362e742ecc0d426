//! Registration and URL generation errors.

use thiserror::Error;

/// Errors raised while building the route table or generating URLs.
///
/// Everything here is a configuration problem: a failing registration
/// should abort startup (or a reload), never surface per request.
#[derive(Debug, Error)]
pub enum RouteError {
    /// A named route already exists in this language bucket.
    #[error("duplicate route name `{name}` for language `{language}`")]
    DuplicateRouteName { name: String, language: String },

    /// The compiled template is not a valid pattern.
    #[error("invalid route pattern `{template}`: {source}")]
    InvalidRoutePattern {
        template: String,
        #[source]
        source: regex::Error,
    },

    /// Language codes are two ASCII letters.
    #[error("invalid language code `{0}`")]
    InvalidLanguage(String),

    /// A method token that is not a valid HTTP method.
    #[error("invalid HTTP method `{method}` on route `{template}`")]
    InvalidMethod { method: String, template: String },

    /// A route must accept at least one method.
    #[error("route `{0}` declares no methods")]
    NoMethods(String),

    /// No route of that name in the requested language.
    #[error("no route named `{name}` for language `{language}`")]
    UnknownRouteName { name: String, language: String },

    /// A required group had no value to substitute.
    #[error("route `{name}` needs a value for parameter {index}")]
    MissingParameter { name: String, index: usize },

    /// The substituted path is rejected by the route's own pattern.
    #[error("generated path `{path}` does not match route `{name}`")]
    ParameterMismatch { name: String, path: String },
}

/// Result type for routing operations.
pub type RouteResult<T> = Result<T, RouteError>;
