//! geotrack - geolocation records and positions for named entities
//!
//! An HTTP service over a document store: records are appended per
//! entity, the latest one is kept as the entity's position, and every
//! route sits behind HTTP Basic authentication.

pub mod auth;
pub mod cli;
pub mod http_server;
pub mod observability;
pub mod store;
pub mod tracking;
