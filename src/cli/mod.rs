//! CLI module for geotrack
//!
//! Loads the env file, parses options, builds the store, and runs the
//! HTTP server.

mod args;
mod commands;
mod errors;

pub use args::{Cli, StoreBackend};
pub use commands::{build_store, run, serve, ENV_FILE_VAR};
pub use errors::{CliError, CliErrorCode, CliResult};
