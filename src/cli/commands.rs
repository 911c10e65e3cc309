//! CLI command implementations
//!
//! Boot order: env file, tracing, arguments, store, server.

use std::env;
use std::path::PathBuf;
use std::sync::Arc;

use tracing::{debug, info};

use crate::http_server::HttpServer;
use crate::observability;
use crate::store::{DocumentStore, FirestoreStore, MemoryStore};

use super::args::{Cli, StoreBackend};
use super::errors::{CliError, CliResult};

/// Variable naming the env file to load
pub const ENV_FILE_VAR: &str = "DOTENV_FILE";
const DEFAULT_ENV_FILE: &str = ".env";

/// Main CLI entry point
///
/// This is the only function that main.rs should call.
pub fn run() -> CliResult<()> {
    let env_file = env::var(ENV_FILE_VAR)
        .ok()
        .filter(|f| !f.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_ENV_FILE));
    // Variables already present in the environment take precedence
    let loaded = dotenvy::from_path(&env_file);

    observability::init_tracing();
    match loaded {
        Ok(()) => info!(env_file = %env_file.display(), "environment file loaded"),
        Err(e) => debug!(env_file = %env_file.display(), error = %e, "environment file not loaded"),
    }

    serve(&Cli::parse_args())
}

/// Build the store and run the HTTP server until shutdown
pub fn serve(cli: &Cli) -> CliResult<()> {
    let store = build_store(cli)?;
    let server = HttpServer::new(cli.http_config(), store);

    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| CliError::boot_failed(format!("Failed to create tokio runtime: {}", e)))?;
    rt.block_on(server.start())
        .map_err(|e| CliError::boot_failed(format!("HTTP server failed: {}", e)))
}

/// Create the shared store handle for the selected backend
pub fn build_store(cli: &Cli) -> CliResult<Arc<dyn DocumentStore>> {
    match cli.store {
        StoreBackend::Memory => {
            let store = match &cli.seed {
                Some(path) => MemoryStore::from_seed_file(path)?,
                None => MemoryStore::new(),
            };
            info!(
                seed = ?cli.seed,
                "using in-memory store"
            );
            Ok(Arc::new(store))
        }
        StoreBackend::Firestore => {
            let config = cli.firestore_config()?;
            let store = FirestoreStore::new(&config)?;
            info!(
                project = %config.project_id,
                database = %config.database,
                emulator = ?config.emulator_host,
                "using firestore store"
            );
            Ok(Arc::new(store))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::Collection;
    use clap::Parser;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[tokio::test]
    async fn test_build_seeded_memory_store() {
        let mut seed = NamedTempFile::new().unwrap();
        write!(seed, r#"{{"users": {{"alice": {{"username": "alice", "password": "pw"}}}}}}"#)
            .unwrap();
        let seed_path = seed.path().to_str().unwrap().to_string();

        let cli = Cli::try_parse_from(["geotrack", "--store", "memory", "--seed", seed_path.as_str()])
            .unwrap();
        let store = build_store(&cli).unwrap();
        let user = store.get(Collection::Users, "alice").await.unwrap();
        assert_eq!(user.id, "alice");
    }

    #[test]
    fn test_bad_seed_is_store_error() {
        let cli = Cli::try_parse_from([
            "geotrack",
            "--store",
            "memory",
            "--seed",
            "/nonexistent/seed.json",
        ])
        .unwrap();
        let err = build_store(&cli).unwrap_err();
        assert_eq!(err.code_str(), "GEO_CLI_STORE_ERROR");
    }

    #[test]
    fn test_emulator_store() {
        let cli = Cli::try_parse_from([
            "geotrack",
            "--store",
            "firestore",
            "--project-id",
            "demo",
            "--emulator-host",
            "localhost:8081",
        ])
        .unwrap();
        assert!(build_store(&cli).is_ok());
    }
}
