//! # HTTP Server
//!
//! Combines every endpoint router behind CORS and request tracing, and
//! runs it until shutdown is signalled.

use std::future::Future;

use axum::http::HeaderValue;
use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use super::config::HttpServerConfig;
use super::geo_routes::geo_routes;
use super::observability_routes::{not_found_handler, observability_routes};
use super::pop_places_routes::pop_places_routes;
use super::verse_routes::verse_routes;
use crate::context::AppContext;

/// HTTP server for the data API
pub struct HttpServer {
    config: HttpServerConfig,
    router: Router,
}

impl HttpServer {
    /// Create a server over an already-built context
    pub fn new(config: HttpServerConfig, ctx: AppContext) -> Self {
        let router = Self::build_router(&config, ctx);
        Self { config, router }
    }

    /// Build the combined router with all endpoints
    pub fn build_router(config: &HttpServerConfig, ctx: AppContext) -> Router {
        let cors = if config.cors_origins.is_empty() {
            CorsLayer::new().allow_origin(Any).allow_methods(Any)
        } else {
            let origins: Vec<HeaderValue> = config
                .cors_origins
                .iter()
                .filter_map(|s| match s.parse() {
                    Ok(origin) => Some(origin),
                    Err(_) => {
                        warn!(origin = %s, "ignoring unparseable CORS origin");
                        None
                    }
                })
                .collect();

            CorsLayer::new()
                .allow_origin(AllowOrigin::list(origins))
                .allow_methods(Any)
        };

        let router = Router::new()
            .merge(observability_routes())
            .merge(verse_routes(ctx.clone()))
            .nest("/geo", geo_routes(ctx.clone()))
            .nest("/pop-places", pop_places_routes(ctx))
            .fallback(not_found_handler)
            .layer(cors);

        if config.request_logging {
            router.layer(TraceLayer::new_for_http())
        } else {
            router
        }
    }

    /// Get the socket address
    pub fn socket_addr(&self) -> String {
        self.config.socket_addr()
    }

    /// Get the router (for testing)
    pub fn router(self) -> Router {
        self.router
    }

    /// Serve until `shutdown` resolves, then drain in-flight requests
    pub async fn start<F>(self, shutdown: F) -> Result<(), std::io::Error>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let listener = TcpListener::bind(self.config.socket_addr()).await?;
        info!(addr = %listener.local_addr()?, "data API listening");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown)
            .await?;

        info!("HTTP server stopped");
        Ok(())
    }
}
