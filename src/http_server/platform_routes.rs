//! Platform Routes
//!
//! The hosting platform's operation hook and the maps script redirect.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{any, get},
    Router,
};
use tracing::debug;

/// Hosting platform operation hook (e.g. `/_ah/warmup`), unauthenticated
pub const HEALTH_CHECK_ROUTE: &str = "/_ah/:operation";

const HEALTH_CHECK_PREFIX: &str = "/_ah/";
const MAPS_SCRIPT_URL: &str = "https://maps.googleapis.com/maps/api/js";

/// True for paths served by [`HEALTH_CHECK_ROUTE`]
pub fn is_health_check_path(path: &str) -> bool {
    path.strip_prefix(HEALTH_CHECK_PREFIX)
        .map(|operation| !operation.is_empty() && !operation.contains('/'))
        .unwrap_or(false)
}

/// Health-check route, mounted at the root
pub fn health_check_routes() -> Router {
    Router::new().route(HEALTH_CHECK_ROUTE, any(operation_handler))
}

async fn operation_handler(Path(operation): Path<String>) -> StatusCode {
    debug!(%operation, "platform operation");
    StatusCode::NOT_FOUND
}

/// Maps proxy state
#[derive(Debug, Default)]
pub struct MapsProxyState {
    pub api_key: String,
}

/// Maps script redirect, mounted under the API prefix
pub fn maps_proxy_routes(state: Arc<MapsProxyState>) -> Router {
    Router::new()
        .route("/proxy/maps.api.js", get(maps_script_handler))
        .with_state(state)
}

/// Script URL the browser is redirected to
pub fn maps_script_url(api_key: &str) -> String {
    format!(
        "{}?key={}&callback=initMap&libraries=&v=weekly",
        MAPS_SCRIPT_URL, api_key
    )
}

async fn maps_script_handler(State(state): State<Arc<MapsProxyState>>) -> Response {
    (
        StatusCode::MOVED_PERMANENTLY,
        [(header::LOCATION, maps_script_url(&state.api_key))],
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_health_check_paths() {
        assert!(is_health_check_path("/_ah/warmup"));
        assert!(is_health_check_path("/_ah/health"));
        assert!(!is_health_check_path("/_ah/"));
        assert!(!is_health_check_path("/_ah/a/b"));
        assert!(!is_health_check_path("/api/v1/_ah/warmup"));
        assert!(!is_health_check_path("/_ahwarmup"));
    }

    #[test]
    fn test_maps_script_url() {
        assert_eq!(
            maps_script_url("KEY123"),
            "https://maps.googleapis.com/maps/api/js?key=KEY123&callback=initMap&libraries=&v=weekly"
        );
    }
}
