//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with a catch-all handler
//! - Wire up middleware (tracing, timeout, request ID)
//! - Resolve every request against the active route table
//! - Swap in a rebuilt route table when the configuration changes
//! - Observability (metrics, correlation IDs)

use std::sync::Arc;
use std::time::{Duration, Instant};

use arc_swap::ArcSwap;
use axum::{
    body::Body,
    extract::State,
    http::Request,
    response::Response,
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::{broadcast, mpsc};
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::{RouterConfig, ServerConfig};
use crate::http::request::{RequestFacts, RequestIdExt, RequestIdLayer};
use crate::http::response::resolution_response;
use crate::observability::metrics;
use crate::routing::{Resolution, RouteResult, Router as LocaleRouter};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub routes: Arc<ArcSwap<LocaleRouter>>,
    pub server: ServerConfig,
}

/// HTTP host for the route table.
pub struct HttpServer {
    router: Router,
    config: RouterConfig,
    routes: Arc<ArcSwap<LocaleRouter>>,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    ///
    /// Fails if the configured routes do not compile.
    pub fn new(config: RouterConfig) -> RouteResult<Self> {
        let initial = LocaleRouter::from_config(&config)?;
        metrics::record_routes_loaded(initial.table().len());
        let routes = Arc::new(ArcSwap::from_pointee(initial));

        let state = AppState {
            routes: routes.clone(),
            server: config.server.clone(),
        };

        let router = Self::build_router(&config, state);
        Ok(Self {
            router,
            config,
            routes,
        })
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &RouterConfig, state: AppState) -> Router {
        Router::new()
            .fallback(route_handler)
            .with_state(state)
            .layer(TimeoutLayer::new(Duration::from_secs(config.server.request_timeout_secs)))
            .layer(RequestIdLayer)
            .layer(TraceLayer::new_for_http())
    }

    /// Run the server, accepting connections on the given listener.
    ///
    /// Each configuration received on `config_updates` replaces the route
    /// table; listener settings are not reloaded.
    pub async fn run(
        self,
        listener: TcpListener,
        mut config_updates: mpsc::UnboundedReceiver<RouterConfig>,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        let routes = self.routes.clone();
        let reloader = tokio::spawn(async move {
            while let Some(config) = config_updates.recv().await {
                match LocaleRouter::from_config(&config) {
                    Ok(router) => {
                        metrics::record_routes_loaded(router.table().len());
                        routes.store(Arc::new(router));
                        tracing::info!("Route table reloaded");
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "Rejected reloaded routes, keeping current table");
                    }
                }
            }
        });

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        reloader.abort();
        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &RouterConfig {
        &self.config
    }

    /// Snapshot of the active route table.
    pub fn routes(&self) -> Arc<LocaleRouter> {
        self.routes.load_full()
    }
}

/// Catch-all handler: resolve, record, render.
async fn route_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let start = Instant::now();
    let facts = RequestFacts::from_request(&request, &state.server);
    let router = state.routes.load_full();
    let resolution = router.resolve(&facts.as_info());

    match &resolution {
        Resolution::Redirect(redirect) => {
            tracing::debug!(
                request_id = %request.request_id(),
                target = %facts.target,
                location = %redirect.location(),
                "Redirecting to canonical path"
            );
            metrics::record_redirect();
        }
        Resolution::Outcome(outcome) => {
            let status = outcome.status();
            let language = outcome.route_match().map(|m| m.language()).unwrap_or("none");
            tracing::debug!(
                request_id = %request.request_id(),
                method = %facts.method,
                target = %facts.target,
                status = status.as_u16(),
                controller = outcome.route_match().map(|m| m.controller()),
                "Request resolved"
            );
            metrics::record_match(status.as_u16(), language, start);
        }
    }

    resolution_response(&resolution)
}
