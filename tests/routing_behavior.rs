//! End-to-end routing behavior through the public `Router` API.

use axum::http::StatusCode;
use locale_router::config::{RouteConfig, RouterConfig};
use locale_router::routing::{
    LanguageSettings, MatchOutcome, RequestInfo, Resolution, RouteDeclaration, RouteError,
    RouteTable, Router, UriNormalizer,
};

mod common;

fn get(target: &str) -> RequestInfo<'_> {
    request("GET", target)
}

fn request<'a>(method: &'a str, target: &'a str) -> RequestInfo<'a> {
    RequestInfo {
        method,
        target,
        scheme: "https",
        host: "example.com",
    }
}

fn outcome<'r>(resolution: Resolution<'r>) -> MatchOutcome<'r> {
    match resolution {
        Resolution::Outcome(outcome) => outcome,
        Resolution::Redirect(r) => panic!("unexpected redirect to {}", r.location()),
    }
}

fn location(resolution: Resolution<'_>) -> String {
    match resolution {
        Resolution::Redirect(r) => r.location().to_string(),
        Resolution::Outcome(o) => panic!("expected redirect, got {}", o.status()),
    }
}

fn controller(outcome: &MatchOutcome<'_>) -> Option<String> {
    outcome.route_match().map(|m| m.controller().to_string())
}

#[test]
fn test_every_route_matches_its_canonical_expansion() {
    let cases = [
        ("about", "/about/", "A"),
        ("/about/", "/about/", "A2"),
        ("", "/", "Home"),
        ("/user/([0-9]+)/", "/user/12/", "User"),
        ("blog/([a-z-]+)", "/blog/hello-world/", "Blog"),
    ];

    for (template, path, ctrl) in cases {
        let mut table = RouteTable::new(LanguageSettings::default());
        table
            .add_route(RouteDeclaration::new(["get"], template, ctrl))
            .unwrap();
        let router = Router::new(table, UriNormalizer::default());

        let outcome = outcome(router.resolve(&get(path)));
        assert_eq!(outcome.status(), StatusCode::OK, "{template} must match {path}");
        assert_eq!(controller(&outcome).as_deref(), Some(ctrl));
    }
}

#[test]
fn test_canonicalization_is_idempotent() {
    let router = Router::from_config(&common::site_config()).unwrap();
    for target in ["/", "/about/", "/about/?a=1", "/missing/", "/es/about/"] {
        assert!(
            matches!(router.resolve(&get(target)), Resolution::Outcome(_)),
            "{target} is canonical"
        );
    }
}

#[test]
fn test_non_canonical_paths_redirect() {
    let router = Router::from_config(&common::site_config()).unwrap();
    assert_eq!(location(router.resolve(&get("/about"))), "/about/");
    assert_eq!(location(router.resolve(&get("/about//"))), "/about/");
    assert_eq!(location(router.resolve(&get("/about///?x=1&y=2"))), "/about/?x=1&y=2");
    assert_eq!(location(router.resolve(&get("/user/5?tab=info"))), "/user/5/?tab=info");

    // Following the redirect lands on a match.
    let target = location(router.resolve(&get("/about")));
    assert!(outcome(router.resolve(&get(&target))).is_matched());
}

#[test]
fn test_redirect_keeps_base_path() {
    let mut config = common::site_config();
    config.router.base_path = "/app/".into();
    let router = Router::from_config(&config).unwrap();

    assert_eq!(location(router.resolve(&get("/app/about"))), "/app/about/");
    assert_eq!(location(router.resolve(&get("/app"))), "/app/");
    assert_eq!(
        controller(&outcome(router.resolve(&get("/app/about/")))).as_deref(),
        Some("Pages@about")
    );
}

#[test]
fn test_optional_segment_folding() {
    let router = Router::from_config(&common::site_config()).unwrap();

    let without = outcome(router.resolve(&get("/reviews/")));
    let m = without.route_match().unwrap();
    assert_eq!(m.controller(), "Reviews@index");
    assert!(!m.params().is_present(0));

    let with = outcome(router.resolve(&get("/en/reviews/")));
    let m = with.route_match().unwrap();
    assert_eq!(m.controller(), "Reviews@index");
    assert_eq!(m.params().get(0), Some("en"));
}

#[test]
fn test_unknown_language_segment_stays_in_default_bucket() {
    let router = Router::from_config(&common::site_config()).unwrap();
    let outcome = outcome(router.resolve(&get("/fr/reviews/")));
    let m = outcome.route_match().unwrap();
    assert_eq!(m.language(), "en");
    assert_eq!(m.params().get(0), Some("fr"));
}

#[test]
fn test_method_mismatch_is_forbidden() {
    let router = Router::from_config(&common::site_config()).unwrap();

    let outcome = outcome(router.resolve(&request("POST", "/about/")));
    assert!(matches!(outcome, MatchOutcome::MethodMismatch(_)));
    assert_eq!(outcome.status(), StatusCode::FORBIDDEN);
    assert_eq!(controller(&outcome).as_deref(), Some("Pages@about"));

    let outcome = self::outcome(router.resolve(&request("post", "/contact/")));
    assert_eq!(outcome.status(), StatusCode::OK);
}

#[test]
fn test_language_resolution() {
    let router = Router::from_config(&common::site_config()).unwrap();

    let es = outcome(router.resolve(&get("/es/about/")));
    assert_eq!(controller(&es).as_deref(), Some("Paginas@acerca"));
    assert_eq!(es.route_match().unwrap().language(), "es");

    let en = outcome(router.resolve(&get("/about/")));
    assert_eq!(controller(&en).as_deref(), Some("Pages@about"));

    // Spanish routes only exist with their prefix.
    let missing = outcome(router.resolve(&get("/es/user/3/")));
    assert!(matches!(missing, MatchOutcome::NoMatch));
}

#[test]
fn test_unprefixed_path_without_default_route_is_no_match() {
    let mut config = RouterConfig::default();
    config.routes = vec![RouteConfig::new(["get"], "/about/", "Acerca").in_language("es")];
    let router = Router::from_config(&config).unwrap();

    assert!(outcome(router.resolve(&get("/es/about/"))).is_matched());
    // The default language has no bucket at all: a plain miss, not an error.
    let outcome = outcome(router.resolve(&get("/about/")));
    assert!(matches!(outcome, MatchOutcome::NoMatch));
    assert_eq!(outcome.status(), StatusCode::NOT_FOUND);
}

#[test]
fn test_always_prefix_default_language() {
    let mut config = common::site_config();
    config.router.always_prefix_default = true;
    let router = Router::from_config(&config).unwrap();

    assert!(outcome(router.resolve(&get("/en/about/"))).is_matched());
    assert!(matches!(
        outcome(router.resolve(&get("/about/"))),
        MatchOutcome::NoMatch
    ));
}

#[test]
fn test_duplicate_route_name_rejected() {
    let mut config = common::site_config();
    config
        .routes
        .push(RouteConfig::new(["get"], "/elsewhere/", "Other").named("about"));
    let err = Router::from_config(&config).unwrap_err();
    assert!(matches!(
        err,
        RouteError::DuplicateRouteName { ref name, ref language } if name == "about" && language == "en"
    ));
}

#[test]
fn test_base_url_composition() {
    let mut config = common::site_config();
    config.router.base_path = "/app".into();
    let router = Router::from_config(&config).unwrap();
    assert_eq!(router.base_url("https", "example.com"), "https://example.com/app");

    let m = outcome(router.resolve(&get("/app/about/")));
    assert_eq!(m.route_match().unwrap().base_url(), "https://example.com/app");
}

#[test]
fn test_named_route_paths_round_trip_through_matching() {
    let router = Router::from_config(&common::site_config()).unwrap();

    let path = router.path_for("en", "user", &[Some("77")]).unwrap();
    let matched = outcome(router.resolve(&get(&path)));
    assert_eq!(controller(&matched).as_deref(), Some("Users@show"));
    assert_eq!(matched.route_match().unwrap().params().get(0), Some("77"));

    assert_eq!(router.path_for("en", "reviews", &[None]).unwrap(), "/reviews/");
    assert_eq!(router.path_for("es", "about", &[]).unwrap(), "/es/about/");
}

#[test]
fn test_named_route_paths_with_non_capturing_and_lazy_groups() {
    let mut table = RouteTable::new(LanguageSettings::default());
    table
        .add_route(RouteDeclaration::new(["get"], "/(?:feed)/([0-9]+)/", "Feed@show").name("feed"))
        .unwrap();
    table
        .add_route(RouteDeclaration::new(["get"], "/([a-z]+)??/archive/", "Archive@index").name("archive"))
        .unwrap();
    let router = Router::new(table, UriNormalizer::new("/app"));

    let path = router.path_for("en", "feed", &[Some("3")]).unwrap();
    assert_eq!(path, "/app/feed/3/");
    let matched = outcome(router.resolve(&get(&path)));
    assert_eq!(controller(&matched).as_deref(), Some("Feed@show"));
    assert_eq!(matched.route_match().unwrap().params().get(0), Some("3"));

    let path = router.path_for("en", "archive", &[None]).unwrap();
    assert_eq!(path, "/app/archive/");
    assert_eq!(
        controller(&outcome(router.resolve(&get(&path)))).as_deref(),
        Some("Archive@index")
    );
}

#[test]
fn test_router_is_shareable_across_threads() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Router>();
    assert_send_sync::<RouteTable>();
}

#[test]
fn test_uppercase_language_segment_follows_route_case_sensitivity() {
    // `ES` selects the `es` bucket, whose case-sensitive `/es` prefix rejects it.
    let router = Router::from_config(&common::site_config()).unwrap();
    let strict = outcome(router.resolve(&get("/ES/about/")));
    assert!(matches!(strict, MatchOutcome::NoMatch));

    let mut config = common::site_config();
    for route in config.routes.iter_mut().filter(|r| r.language.as_deref() == Some("es")) {
        route.case_insensitive = true;
    }
    let router = Router::from_config(&config).unwrap();
    let relaxed = outcome(router.resolve(&get("/ES/about/")));
    assert_eq!(controller(&relaxed).as_deref(), Some("Paginas@acerca"));
    assert_eq!(relaxed.route_match().unwrap().language(), "es");
}
