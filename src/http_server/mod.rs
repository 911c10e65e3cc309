//! # HTTP Server Module
//!
//! axum server exposing the tracking API.
//!
//! # Endpoints
//!
//! - `{prefix}/record/:entity` - GET recent records, POST a new record
//! - `{prefix}/position/:entity` - Latest position snapshot
//! - `{prefix}/entity` - Entity listing
//! - `{prefix}/proxy/maps.api.js` - Maps script redirect
//! - `/_ah/:operation` - Platform hook, no auth
//! - `/`, `/map/` - Static map bundle

pub mod auth_layer;
pub mod config;
pub mod errors;
pub mod platform_routes;
pub mod server;
pub mod tracking_routes;

pub use config::HttpServerConfig;
pub use errors::{ApiError, ApiResult};
pub use server::HttpServer;
