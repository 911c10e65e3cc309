//! # HTTP Server
//!
//! Combines the tracking API, the platform routes and the static map
//! bundle behind Basic authentication.

use std::io;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::{middleware, Router};
use tokio::net::TcpListener;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::auth::UserDirectory;
use crate::store::DocumentStore;
use crate::tracking::TrackingService;

use super::auth_layer::{require_basic_auth, AuthState};
use super::config::HttpServerConfig;
use super::platform_routes::{health_check_routes, maps_proxy_routes, MapsProxyState};
use super::tracking_routes::{tracking_routes, TrackingState};

/// HTTP server for the tracking API
pub struct HttpServer {
    config: HttpServerConfig,
    router: Router,
}

impl HttpServer {
    /// Create a server over the given store handle
    pub fn new(config: HttpServerConfig, store: Arc<dyn DocumentStore>) -> Self {
        let router = Self::build_router(&config, store);
        Self { config, router }
    }

    /// Build the combined router with all endpoints
    fn build_router(config: &HttpServerConfig, store: Arc<dyn DocumentStore>) -> Router {
        let tracking_state = Arc::new(TrackingState::new(TrackingService::new(store.clone())));
        let auth_state = Arc::new(AuthState::new(
            UserDirectory::new(store),
            config.realm.clone(),
        ));
        let maps_state = Arc::new(MapsProxyState {
            api_key: config.maps_api_key.clone(),
        });

        let api = Router::new()
            .merge(tracking_routes(tracking_state))
            .merge(maps_proxy_routes(maps_state));

        let router = Router::new().merge(health_check_routes());
        let router = match config.api_mount() {
            Some(mount) => router.nest(&mount, api),
            None => router.merge(api),
        };

        let static_files = ServeDir::new(&config.static_dir);
        router
            .nest_service("/map", static_files.clone())
            .fallback_service(static_files)
            .layer(middleware::from_fn_with_state(auth_state, require_basic_auth))
            .layer(TraceLayer::new_for_http())
    }

    /// Get the socket address
    pub fn socket_addr(&self) -> String {
        self.config.socket_addr()
    }

    /// Get the router (for testing)
    pub fn router(self) -> Router {
        self.router
    }

    /// Serve until interrupted
    pub async fn start(self) -> io::Result<()> {
        let addr: SocketAddr = self.config.socket_addr().parse().map_err(|e| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("invalid socket address {}: {}", self.config.socket_addr(), e),
            )
        })?;

        let listener = TcpListener::bind(addr).await?;
        let mount = self.config.api_mount().unwrap_or_else(|| "/".to_string());
        info!(
            %addr,
            api = %mount,
            static_dir = %self.config.static_dir.display(),
            "geotrack listening"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await
    }
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("shutdown requested");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn store() -> Arc<dyn DocumentStore> {
        Arc::new(MemoryStore::new())
    }

    #[test]
    fn test_server_creation() {
        let server = HttpServer::new(HttpServerConfig::default(), store());
        assert_eq!(server.socket_addr(), "0.0.0.0:8080");
    }

    #[test]
    fn test_server_with_custom_port() {
        let config = HttpServerConfig::with_port(9090);
        let server = HttpServer::new(config, store());
        assert_eq!(server.socket_addr(), "0.0.0.0:9090");
    }

    #[test]
    fn test_router_builds_at_root() {
        let config = HttpServerConfig {
            api_prefix: "/".to_string(),
            ..Default::default()
        };
        let _router = HttpServer::new(config, store()).router();
    }
}
