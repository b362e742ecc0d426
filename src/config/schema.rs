//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the router.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the router service.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct RouterConfig {
    /// HTTP listener settings.
    pub server: ServerConfig,

    /// Base path and language rules.
    pub router: RouterSettings,

    /// Route declarations, in match order.
    pub routes: Vec<RouteConfig>,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// HTTP listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,

    /// Scheme used to compose base URLs (`http` or `https`).
    pub scheme: String,

    /// Host used when a request carries no Host header.
    pub canonical_host: String,

    /// Request timeout in seconds.
    pub request_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
            scheme: "http".to_string(),
            canonical_host: "localhost".to_string(),
            request_timeout_secs: 30,
        }
    }
}

/// Base path and language rules.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RouterSettings {
    /// Path the application is mounted under ("/" for the root).
    pub base_path: String,

    /// Language of routes and requests that name none.
    pub default_language: String,

    /// Require the language prefix for the default language too.
    pub always_prefix_default: bool,
}

impl Default for RouterSettings {
    fn default() -> Self {
        Self {
            base_path: "/".to_string(),
            default_language: "en".to_string(),
            always_prefix_default: false,
        }
    }
}

/// A single route declaration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RouteConfig {
    /// Accepted HTTP methods, any case.
    pub methods: Vec<String>,

    /// Route template (a regular expression over the path).
    pub template: String,

    /// Opaque handler identifier passed to the dispatcher.
    pub controller: String,

    /// Unique name within the route's language.
    #[serde(default)]
    pub name: Option<String>,

    /// Two-letter language code; the default language when absent.
    #[serde(default)]
    pub language: Option<String>,

    /// Match the template case-insensitively.
    #[serde(default)]
    pub case_insensitive: bool,

    /// Middleware identifiers passed to the dispatcher.
    #[serde(default)]
    pub middleware: Vec<String>,
}

impl RouteConfig {
    pub fn new<M, S>(methods: M, template: impl Into<String>, controller: impl Into<String>) -> Self
    where
        M: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            methods: methods.into_iter().map(Into::into).collect(),
            template: template.into(),
            controller: controller.into(),
            name: None,
            language: None,
            case_insensitive: false,
            middleware: Vec::new(),
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn in_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Log output format.
    pub log_format: LogFormat,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}
