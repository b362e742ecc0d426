//! Shared utilities for integration tests.

use std::net::SocketAddr;
use std::time::Duration;

use tokio::sync::mpsc;

use locale_router::config::{RouteConfig, RouterConfig};
use locale_router::http::HttpServer;
use locale_router::lifecycle::Shutdown;

/// A small bilingual site: English unprefixed, Spanish under `/es`.
pub fn site_config() -> RouterConfig {
    let mut config = RouterConfig::default();
    config.routes = vec![
        RouteConfig::new(["get"], "/", "Home@index").named("home"),
        RouteConfig::new(["get"], "/about/", "Pages@about").named("about"),
        RouteConfig::new(["get"], "/user/([0-9]+)/", "Users@show").named("user"),
        RouteConfig::new(["get", "post"], "/contact/", "Contact@form"),
        RouteConfig::new(["get"], "/([a-z]+)?/reviews/", "Reviews@index").named("reviews"),
        RouteConfig::new(["get"], "/about/", "Paginas@acerca")
            .named("about")
            .in_language("es"),
    ];
    config
}

/// Start the HTTP server on `addr`; returns the handle that stops it.
#[allow(dead_code)]
pub async fn start_server(
    addr: SocketAddr,
    mut config: RouterConfig,
) -> (Shutdown, mpsc::UnboundedSender<RouterConfig>) {
    config.server.bind_address = addr.to_string();

    let shutdown = Shutdown::new();
    let (updates_tx, updates_rx) = mpsc::unbounded_channel();
    let server = HttpServer::new(config).expect("test routes must compile");
    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    let server_shutdown = shutdown.subscribe();

    tokio::spawn(async move {
        let _ = server.run(listener, updates_rx, server_shutdown).await;
    });

    // Wait for server to start
    tokio::time::sleep(Duration::from_millis(200)).await;
    (shutdown, updates_tx)
}

/// Client that reports redirects instead of following them.
#[allow(dead_code)]
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}
