//! Route matching logic.
//!
//! # Responsibilities
//! - Pick the candidate routes for the request language
//! - Scan them in registration order, first full-path match wins
//! - Validate the request method against the winner
//! - Extract positional parameters
//!
//! # Design Decisions
//! - An unknown language has no candidates; it is a miss, not an error
//! - No fallback to the default language bucket
//! - A method mismatch stops the scan (403), it does not try later routes

use crate::routing::outcome::{MatchOutcome, Params, RouteMatch};
use crate::routing::table::{Route, RouteTable};

/// Matches normalized paths against a route table.
#[derive(Debug, Clone, Copy)]
pub struct Matcher<'t> {
    table: &'t RouteTable,
}

impl<'t> Matcher<'t> {
    pub fn new(table: &'t RouteTable) -> Self {
        Self { table }
    }

    /// Finds the route for `request_path` in the `language` bucket.
    ///
    /// `base_url` is carried into the result for the dispatch layer.
    pub fn match_path(
        &self,
        request_path: &str,
        language: &str,
        method: &str,
        base_url: &str,
    ) -> MatchOutcome<'t> {
        let candidates = self.table.routes_for(language);

        let Some((route, params)) = first_match(candidates, request_path) else {
            tracing::debug!(
                path = %request_path,
                language = %language,
                candidates = candidates.len(),
                "No route matched"
            );
            return MatchOutcome::NoMatch;
        };

        let found = RouteMatch::new(route, params, base_url.to_string());
        if route.allows(method) {
            tracing::debug!(
                path = %request_path,
                language = %language,
                controller = %route.controller(),
                "Route matched"
            );
            MatchOutcome::Matched(found)
        } else {
            tracing::debug!(
                path = %request_path,
                method = %method,
                allowed = ?route.methods(),
                "Method not allowed for route"
            );
            MatchOutcome::MethodMismatch(found)
        }
    }
}

/// Linear scan; returns the first route whose pattern matches the whole path.
fn first_match<'t>(candidates: &'t [Route], path: &str) -> Option<(&'t Route, Params)> {
    candidates.iter().find_map(|route| {
        let captures = route.pattern().captures(path)?;
        let params = captures
            .iter()
            .skip(1)
            .map(|group| group.map(|m| m.as_str().to_string()))
            .collect();
        Some((route, Params::new(params)))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::table::{LanguageSettings, RouteDeclaration};
    use axum::http::StatusCode;

    fn table() -> RouteTable {
        let mut table = RouteTable::new(LanguageSettings::default());
        table
            .add_route(RouteDeclaration::new(["get"], "", "Home@index").name("home"))
            .unwrap();
        table
            .add_route(RouteDeclaration::new(["get"], "/user/([0-9]+)/", "User@show"))
            .unwrap();
        table
            .add_route(RouteDeclaration::new(["get", "post"], "/user/([a-z]+)/", "User@byName"))
            .unwrap();
        table
            .add_route(RouteDeclaration::new(["get"], "/([a-z]+)?/reviews/", "Reviews@index"))
            .unwrap();
        table
    }

    #[test]
    fn test_matches_home() {
        let table = table();
        let outcome = Matcher::new(&table).match_path("/", "en", "GET", "");
        assert_eq!(outcome.status(), StatusCode::OK);
        assert_eq!(outcome.route_match().unwrap().controller(), "Home@index");
        assert!(outcome.route_match().unwrap().params().is_empty());
    }

    #[test]
    fn test_extracts_params() {
        let table = table();
        let outcome = Matcher::new(&table).match_path("/user/42/", "en", "get", "");
        let m = outcome.route_match().unwrap();
        assert_eq!(m.controller(), "User@show");
        assert_eq!(m.params().get(0), Some("42"));
    }

    #[test]
    fn test_first_match_wins() {
        let mut table = table();
        table
            .add_route(RouteDeclaration::new(["get"], "/user/(.+)/", "User@fallback"))
            .unwrap();
        let matcher = Matcher::new(&table);

        let outcome = matcher.match_path("/user/7/", "en", "GET", "");
        assert_eq!(outcome.route_match().unwrap().controller(), "User@show");

        let outcome = matcher.match_path("/user/7-x/", "en", "GET", "");
        assert_eq!(outcome.route_match().unwrap().controller(), "User@fallback");
    }

    #[test]
    fn test_method_mismatch() {
        let table = table();
        let outcome = Matcher::new(&table).match_path("/user/42/", "en", "POST", "");
        assert_eq!(outcome.status(), StatusCode::FORBIDDEN);
        assert!(matches!(outcome, MatchOutcome::MethodMismatch(_)));
        // Route metadata is still reported.
        assert_eq!(outcome.route_match().unwrap().controller(), "User@show");
    }

    #[test]
    fn test_optional_group_absent_and_present() {
        let table = table();
        let matcher = Matcher::new(&table);

        let outcome = matcher.match_path("/reviews/", "en", "GET", "");
        let m = outcome.route_match().unwrap();
        assert_eq!(m.controller(), "Reviews@index");
        assert_eq!(m.params().len(), 1);
        assert!(!m.params().is_present(0));

        let outcome = matcher.match_path("/en/reviews/", "en", "GET", "");
        assert_eq!(outcome.route_match().unwrap().params().get(0), Some("en"));
    }

    #[test]
    fn test_unknown_language_is_no_match() {
        let table = table();
        let outcome = Matcher::new(&table).match_path("/", "fr", "GET", "");
        assert!(matches!(outcome, MatchOutcome::NoMatch));
        assert_eq!(outcome.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_no_structural_match() {
        let table = table();
        let outcome = Matcher::new(&table).match_path("/nothing/here/", "en", "GET", "");
        assert!(matches!(outcome, MatchOutcome::NoMatch));
    }
}
