//! Route storage.
//!
//! # Responsibilities
//! - Compile declarations into routes
//! - Keep one ordered bucket of routes per language
//! - Index named routes per language
//! - Answer which languages are known (for URI prefix detection)
//!
//! # Design Decisions
//! - Insertion order is match order; routes are never reordered
//! - A language is known iff at least one route was registered for it
//! - Duplicate names within a language are rejected, not overwritten

use std::collections::{BTreeSet, HashMap};

use axum::http::Method;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::routing::error::{RouteError, RouteResult};
use crate::routing::pattern::compile_pattern;

/// Language handling shared by registration and request normalization.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct LanguageSettings {
    /// Language used when a declaration or a request names none.
    pub default_language: String,

    /// Also require the `/xx` prefix on routes of the default language.
    pub always_prefix_default: bool,
}

impl Default for LanguageSettings {
    fn default() -> Self {
        Self {
            default_language: "en".to_string(),
            always_prefix_default: false,
        }
    }
}

/// Returns the lower-cased code if `code` is two ASCII letters.
pub fn normalize_language(code: &str) -> Option<String> {
    if code.len() == 2 && code.bytes().all(|b| b.is_ascii_alphabetic()) {
        Some(code.to_ascii_lowercase())
    } else {
        None
    }
}

/// A route as declared, before compilation.
#[derive(Debug, Clone, Default)]
pub struct RouteDeclaration {
    pub methods: Vec<String>,
    pub template: String,
    pub controller: String,
    pub name: Option<String>,
    pub language: Option<String>,
    pub case_insensitive: bool,
    pub middleware: Vec<String>,
}

impl RouteDeclaration {
    pub fn new<M, S>(methods: M, template: impl Into<String>, controller: impl Into<String>) -> Self
    where
        M: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            methods: methods.into_iter().map(Into::into).collect(),
            template: template.into(),
            controller: controller.into(),
            ..Self::default()
        }
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }
}

/// A compiled route.
#[derive(Debug, Clone)]
pub struct Route {
    methods: BTreeSet<String>,
    template: String,
    prefix: Option<String>,
    pattern: Regex,
    controller: String,
    name: Option<String>,
    language: String,
    case_insensitive: bool,
    middleware: Vec<String>,
}

impl Route {
    /// Lower-cased method tokens.
    pub fn methods(&self) -> &BTreeSet<String> {
        &self.methods
    }

    /// Method check, case-insensitive on the request side.
    pub fn allows(&self, method: &str) -> bool {
        self.methods.contains(&method.to_ascii_lowercase())
    }

    pub fn template(&self) -> &str {
        &self.template
    }

    /// Literal language prefix (`/es`) baked into the pattern, if any.
    pub fn prefix(&self) -> Option<&str> {
        self.prefix.as_deref()
    }

    pub fn pattern(&self) -> &Regex {
        &self.pattern
    }

    pub fn controller(&self) -> &str {
        &self.controller
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn is_case_insensitive(&self) -> bool {
        self.case_insensitive
    }

    pub fn middleware(&self) -> &[String] {
        &self.middleware
    }

    /// Recompiles the pattern with or without the case-insensitive flag.
    pub fn set_case_insensitive(&mut self, enabled: bool) -> RouteResult<&mut Self> {
        if enabled != self.case_insensitive {
            self.pattern = compile_pattern(&self.template, self.prefix.as_deref(), enabled)?;
            self.case_insensitive = enabled;
        }
        Ok(self)
    }

    pub fn with_middleware(&mut self, name: impl Into<String>) -> &mut Self {
        self.middleware.push(name.into());
        self
    }
}

/// Routes of one language, in registration order.
#[derive(Debug, Clone, Default)]
struct LanguageBucket {
    routes: Vec<Route>,
    names: HashMap<String, usize>,
}

/// All compiled routes, bucketed by language.
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    settings: LanguageSettings,
    buckets: HashMap<String, LanguageBucket>,
}

impl RouteTable {
    pub fn new(mut settings: LanguageSettings) -> Self {
        settings.default_language.make_ascii_lowercase();
        Self {
            settings,
            buckets: HashMap::new(),
        }
    }

    pub fn settings(&self) -> &LanguageSettings {
        &self.settings
    }

    pub fn default_language(&self) -> &str {
        &self.settings.default_language
    }

    /// Compiles and stores a route.
    ///
    /// Returns a handle so options can be attached before serving starts.
    pub fn add_route(&mut self, decl: RouteDeclaration) -> RouteResult<&mut Route> {
        let requested = decl
            .language
            .as_deref()
            .filter(|l| !l.is_empty())
            .unwrap_or(self.settings.default_language.as_str());
        let language = normalize_language(requested)
            .ok_or_else(|| RouteError::InvalidLanguage(requested.to_string()))?;

        let methods = parse_methods(&decl.methods, &decl.template)?;

        let name = decl.name.filter(|n| !n.is_empty());
        if let Some(name) = &name {
            let taken = self
                .buckets
                .get(&language)
                .is_some_and(|b| b.names.contains_key(name));
            if taken {
                return Err(RouteError::DuplicateRouteName {
                    name: name.clone(),
                    language,
                });
            }
        }

        let needs_prefix = self.settings.always_prefix_default
            || !language.eq_ignore_ascii_case(&self.settings.default_language);
        let prefix = needs_prefix.then(|| format!("/{}", language));
        let pattern = compile_pattern(&decl.template, prefix.as_deref(), decl.case_insensitive)?;

        tracing::debug!(
            template = %decl.template,
            pattern = %pattern.as_str(),
            language = %language,
            name = ?name,
            controller = %decl.controller,
            "Route registered"
        );

        let route = Route {
            methods,
            template: decl.template,
            prefix,
            pattern,
            controller: decl.controller,
            name: name.clone(),
            language: language.clone(),
            case_insensitive: decl.case_insensitive,
            middleware: decl.middleware,
        };

        let bucket = self.buckets.entry(language).or_default();
        let index = bucket.routes.len();
        if let Some(name) = name {
            bucket.names.insert(name, index);
        }
        bucket.routes.push(route);
        Ok(&mut bucket.routes[index])
    }

    /// Candidate routes for a language, in match order.
    ///
    /// An unknown language has no candidates.
    pub fn routes_for(&self, language: &str) -> &[Route] {
        self.buckets
            .get(&language.to_ascii_lowercase())
            .map(|b| b.routes.as_slice())
            .unwrap_or(&[])
    }

    pub fn route_by_name(&self, language: &str, name: &str) -> Option<&Route> {
        let bucket = self.buckets.get(&language.to_ascii_lowercase())?;
        bucket.names.get(name).map(|&i| &bucket.routes[i])
    }

    /// Whether any route was registered under `language` (case-insensitive).
    pub fn has_language(&self, language: &str) -> bool {
        self.buckets.contains_key(&language.to_ascii_lowercase())
    }

    /// Known languages, sorted.
    pub fn languages(&self) -> Vec<&str> {
        let mut languages: Vec<&str> = self.buckets.keys().map(String::as_str).collect();
        languages.sort_unstable();
        languages
    }

    pub fn len(&self) -> usize {
        self.buckets.values().map(|b| b.routes.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }
}

fn parse_methods(methods: &[String], template: &str) -> RouteResult<BTreeSet<String>> {
    let mut parsed = BTreeSet::new();
    for method in methods {
        let token = method.trim();
        if token.is_empty() || Method::from_bytes(token.as_bytes()).is_err() {
            return Err(RouteError::InvalidMethod {
                method: method.clone(),
                template: template.to_string(),
            });
        }
        parsed.insert(token.to_ascii_lowercase());
    }
    if parsed.is_empty() {
        return Err(RouteError::NoMethods(template.to_string()));
    }
    Ok(parsed)
}
