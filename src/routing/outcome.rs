//! Match results handed to the dispatch layer.

use axum::http::StatusCode;
use serde::Serialize;

use crate::routing::table::Route;

/// Positional parameters, one per capturing group in capture order.
///
/// Index 0 is the first capturing group. `None` marks a group that did
/// not take part in the match, which is not the same as `Some("")`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Params(Vec<Option<String>>);

impl Params {
    pub fn new(values: Vec<Option<String>>) -> Self {
        Self(values)
    }

    /// Value of a group, `None` if absent or out of range.
    pub fn get(&self, index: usize) -> Option<&str> {
        self.0.get(index).and_then(|v| v.as_deref())
    }

    /// Whether the group at `index` participated in the match.
    pub fn is_present(&self, index: usize) -> bool {
        matches!(self.0.get(index), Some(Some(_)))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = Option<&str>> {
        self.0.iter().map(|v| v.as_deref())
    }

    pub fn into_inner(self) -> Vec<Option<String>> {
        self.0
    }
}

/// A route whose pattern matched the request path.
#[derive(Debug, Clone)]
pub struct RouteMatch<'r> {
    route: &'r Route,
    params: Params,
    base_url: String,
}

impl<'r> RouteMatch<'r> {
    pub fn new(route: &'r Route, params: Params, base_url: String) -> Self {
        Self {
            route,
            params,
            base_url,
        }
    }

    pub fn route(&self) -> &'r Route {
        self.route
    }

    pub fn params(&self) -> &Params {
        &self.params
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn controller(&self) -> &'r str {
        self.route.controller()
    }

    pub fn name(&self) -> Option<&'r str> {
        self.route.name()
    }

    pub fn language(&self) -> &'r str {
        self.route.language()
    }
}

/// Outcome of matching one request.
#[derive(Debug, Clone)]
pub enum MatchOutcome<'r> {
    /// No route pattern matched the path.
    NoMatch,
    /// A route matched the path but does not accept the method.
    MethodMismatch(RouteMatch<'r>),
    /// A route matched the path and accepts the method.
    Matched(RouteMatch<'r>),
}

impl<'r> MatchOutcome<'r> {
    pub fn status(&self) -> StatusCode {
        match self {
            MatchOutcome::NoMatch => StatusCode::NOT_FOUND,
            MatchOutcome::MethodMismatch(_) => StatusCode::FORBIDDEN,
            MatchOutcome::Matched(_) => StatusCode::OK,
        }
    }

    /// The matched route, also available for a method mismatch.
    pub fn route_match(&self) -> Option<&RouteMatch<'r>> {
        match self {
            MatchOutcome::NoMatch => None,
            MatchOutcome::MethodMismatch(m) | MatchOutcome::Matched(m) => Some(m),
        }
    }

    pub fn is_matched(&self) -> bool {
        matches!(self, MatchOutcome::Matched(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_params_absent_vs_empty() {
        let params = Params::new(vec![None, Some(String::new()), Some("7".into())]);
        assert_eq!(params.len(), 3);
        assert!(!params.is_present(0));
        assert!(params.is_present(1));
        assert_eq!(params.get(1), Some(""));
        assert_eq!(params.get(2), Some("7"));
        assert_eq!(params.get(9), None);
    }

    #[test]
    fn test_params_serialize_positionally() {
        let params = Params::new(vec![None, Some("en".into())]);
        assert_eq!(serde_json::to_string(&params).unwrap(), r#"[null,"en"]"#);
    }

    #[test]
    fn test_no_match_status() {
        assert_eq!(MatchOutcome::NoMatch.status(), StatusCode::NOT_FOUND);
        assert!(MatchOutcome::NoMatch.route_match().is_none());
    }
}
