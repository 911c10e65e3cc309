//! CLI argument definitions using clap
//!
//! Every option can also come from the environment (or the env file
//! loaded before parsing).

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::http_server::HttpServerConfig;
use crate::store::FirestoreConfig;

use super::errors::{CliError, CliResult};

/// Which document store backs the service
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StoreBackend {
    /// Firestore REST API (managed service or emulator)
    Firestore,
    /// Process-local store, optionally seeded from a JSON file
    Memory,
}

/// geotrack - geolocation records and positions for named entities
#[derive(Parser, Debug, Clone)]
#[command(name = "geotrack")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Host to bind to
    #[arg(long, env = "BIND_HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port to listen on
    #[arg(long, env = "PORT", default_value_t = 8080)]
    pub port: u16,

    /// Mount point of the tracking API ("/" for the root)
    #[arg(long, env = "API_PREFIX", default_value = "/api/v1")]
    pub api_prefix: String,

    /// Directory holding the map UI bundle
    #[arg(long, env = "STATIC_DIR", default_value = "map")]
    pub static_dir: PathBuf,

    /// Basic auth realm
    #[arg(long, env = "AUTH_REALM", default_value = "Restricted")]
    pub realm: String,

    /// Google Maps API key used by the script redirect
    #[arg(long, env = "GOOGLE_MAPS_API_KEY", default_value = "", hide_env_values = true)]
    pub maps_api_key: String,

    /// Document store backend
    #[arg(long, env = "STORE_BACKEND", value_enum, default_value_t = StoreBackend::Firestore)]
    pub store: StoreBackend,

    /// GCP project id (firestore backend)
    #[arg(long, env = "GCP_PROJECT_ID")]
    pub project_id: Option<String>,

    /// Firestore database id
    #[arg(long, env = "FIRESTORE_DATABASE", default_value = "(default)")]
    pub database: String,

    /// Service-account key file; the metadata server is used when absent
    #[arg(long, env = "GOOGLE_APPLICATION_CREDENTIALS")]
    pub credentials: Option<PathBuf>,

    /// Firestore emulator host:port
    #[arg(long, env = "FIRESTORE_EMULATOR_HOST")]
    pub emulator_host: Option<String>,

    /// JSON seed file (memory backend)
    #[arg(long, env = "STORE_SEED")]
    pub seed: Option<PathBuf>,
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }

    pub fn http_config(&self) -> HttpServerConfig {
        HttpServerConfig {
            host: self.host.clone(),
            port: self.port,
            api_prefix: self.api_prefix.clone(),
            static_dir: self.static_dir.clone(),
            realm: self.realm.clone(),
            maps_api_key: self.maps_api_key.clone(),
        }
    }

    pub fn firestore_config(&self) -> CliResult<FirestoreConfig> {
        let project_id = self
            .project_id
            .clone()
            .filter(|p| !p.is_empty())
            .ok_or_else(|| {
                CliError::config_error("GCP_PROJECT_ID (--project-id) is required for firestore")
            })?;
        Ok(FirestoreConfig {
            project_id,
            database: self.database.clone(),
            emulator_host: self.emulator_host.clone().filter(|h| !h.is_empty()),
            credentials: self.credentials.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Values come only from the given argv when every option is passed
    // explicitly; defaults may be shadowed by the test environment.
    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("geotrack").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_http_config() {
        let cli = parse(&[
            "--host", "127.0.0.1",
            "--port", "9000",
            "--api-prefix", "/",
            "--static-dir", "public",
            "--realm", "Fleet",
            "--maps-api-key", "abc",
        ]);
        let config = cli.http_config();
        assert_eq!(config.socket_addr(), "127.0.0.1:9000");
        assert_eq!(config.api_mount(), None);
        assert_eq!(config.static_dir, PathBuf::from("public"));
        assert_eq!(config.realm, "Fleet");
        assert_eq!(config.maps_api_key, "abc");
    }

    #[test]
    fn test_memory_backend() {
        let cli = parse(&["--store", "memory", "--seed", "seed.json"]);
        assert_eq!(cli.store, StoreBackend::Memory);
        assert_eq!(cli.seed, Some(PathBuf::from("seed.json")));
    }

    #[test]
    fn test_firestore_config() {
        let cli = parse(&[
            "--project-id", "demo",
            "--database", "tracks",
            "--emulator-host", "localhost:8081",
        ]);
        let config = cli.firestore_config().unwrap();
        assert_eq!(config.project_id, "demo");
        assert_eq!(config.database, "tracks");
        assert_eq!(config.emulator_host.as_deref(), Some("localhost:8081"));
    }

    #[test]
    fn test_firestore_requires_project() {
        let mut cli = parse(&[]);
        cli.project_id = None;
        let err = cli.firestore_config().unwrap_err();
        assert_eq!(err.code_str(), "GEO_CLI_CONFIG_ERROR");
    }

    #[test]
    fn test_rejects_unknown_backend() {
        assert!(Cli::try_parse_from(["geotrack", "--store", "redis"]).is_err());
    }
}
