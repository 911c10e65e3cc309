//! HTTP Server Configuration
//!
//! Bind address, API mount point, static bundle location, and the
//! values handed to individual routes.

use std::path::PathBuf;

/// HTTP server configuration
#[derive(Debug, Clone, PartialEq)]
pub struct HttpServerConfig {
    /// Host to bind to (default: "0.0.0.0")
    pub host: String,

    /// Port to bind to (default: 8080)
    pub port: u16,

    /// Mount point of the tracking API (default: "/api/v1")
    pub api_prefix: String,

    /// Directory holding the map UI bundle (default: "map")
    pub static_dir: PathBuf,

    /// Basic auth realm (default: "Restricted")
    pub realm: String,

    /// Key appended to the maps script redirect
    pub maps_api_key: String,
}

impl Default for HttpServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            api_prefix: "/api/v1".to_string(),
            static_dir: PathBuf::from("map"),
            realm: "Restricted".to_string(),
            maps_api_key: String::new(),
        }
    }
}

impl HttpServerConfig {
    /// Create a new config with specified port
    pub fn with_port(port: u16) -> Self {
        Self {
            port,
            ..Default::default()
        }
    }

    /// Get the socket address string
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Normalized API mount point, `None` when the API sits at the root
    pub fn api_mount(&self) -> Option<String> {
        let trimmed = self.api_prefix.trim().trim_matches('/');
        if trimmed.is_empty() {
            None
        } else {
            Some(format!("/{}", trimmed))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = HttpServerConfig::default();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 8080);
        assert_eq!(config.realm, "Restricted");
        assert_eq!(config.static_dir, PathBuf::from("map"));
        assert!(config.maps_api_key.is_empty());
    }

    #[test]
    fn test_socket_addr() {
        let config = HttpServerConfig::with_port(9000);
        assert_eq!(config.socket_addr(), "0.0.0.0:9000");
    }

    #[test]
    fn test_api_mount() {
        let mut config = HttpServerConfig::default();
        assert_eq!(config.api_mount().as_deref(), Some("/api/v1"));

        config.api_prefix = "api/v2/".to_string();
        assert_eq!(config.api_mount().as_deref(), Some("/api/v2"));

        for root in ["", "/", "  "] {
            config.api_prefix = root.to_string();
            assert_eq!(config.api_mount(), None);
        }
    }
}
