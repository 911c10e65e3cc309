//! Access tokens for the Firestore REST API.

use std::fs;
use std::path::Path;
use std::time::{Duration, Instant};

use chrono::Utc;
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::store::errors::{StoreError, StoreResult};

const DATASTORE_SCOPE: &str = "https://www.googleapis.com/auth/datastore";
const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";
const METADATA_TOKEN_URL: &str =
    "http://metadata.google.internal/computeMetadata/v1/instance/service-accounts/default/token";
const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
const ASSERTION_LIFETIME_SECS: i64 = 3600;
const REFRESH_MARGIN: Duration = Duration::from_secs(60);
const DEFAULT_TOKEN_LIFETIME_SECS: u64 = 3600;
const MAX_TOKEN_LIFETIME_SECS: u64 = 24 * 3600;

/// Fields used from a service-account key file
#[derive(Clone, Deserialize)]
pub struct ServiceAccountKey {
    pub client_email: String,
    pub private_key: String,
    #[serde(default)]
    pub private_key_id: Option<String>,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

impl std::fmt::Debug for ServiceAccountKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceAccountKey")
            .field("client_email", &self.client_email)
            .field("private_key_id", &self.private_key_id)
            .field("token_uri", &self.token_uri)
            .finish_non_exhaustive()
    }
}

fn default_token_uri() -> String {
    DEFAULT_TOKEN_URI.to_string()
}

impl ServiceAccountKey {
    pub fn from_file(path: &Path) -> StoreResult<Self> {
        let raw = fs::read_to_string(path)
            .map_err(|e| StoreError::Credentials(format!("{}: {}", path.display(), e)))?;
        serde_json::from_str(&raw)
            .map_err(|e| StoreError::Credentials(format!("{}: {}", path.display(), e)))
    }
}

/// Where access tokens come from
#[derive(Debug, Clone)]
pub enum TokenSource {
    /// Local emulator, accepts the fixed `owner` token
    Emulator,
    /// Signed JWT exchanged at the key's token endpoint
    ServiceAccount(ServiceAccountKey),
    /// GCE / Cloud Run metadata server
    Metadata,
}

#[derive(Debug, Serialize)]
struct AssertionClaims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    iat: i64,
    exp: i64,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<u64>,
}

#[derive(Debug)]
struct CachedToken {
    value: String,
    expires_at: Instant,
}

/// Caching access token provider
#[derive(Debug)]
pub struct TokenProvider {
    source: TokenSource,
    cache: Mutex<Option<CachedToken>>,
}

impl TokenProvider {
    pub fn new(source: TokenSource) -> Self {
        Self {
            source,
            cache: Mutex::new(None),
        }
    }

    /// Current bearer token, refreshed shortly before it expires
    pub async fn bearer(&self, client: &reqwest::Client) -> StoreResult<String> {
        let service_account = match &self.source {
            TokenSource::Emulator => return Ok("owner".to_string()),
            TokenSource::ServiceAccount(key) => Some(key),
            TokenSource::Metadata => None,
        };

        let mut cache = self.cache.lock().await;
        if let Some(token) = cache.as_ref() {
            if Instant::now() + REFRESH_MARGIN < token.expires_at {
                return Ok(token.value.clone());
            }
        }

        let response = match service_account {
            Some(key) => exchange_assertion(client, key).await?,
            None => fetch_metadata_token(client).await?,
        };
        tracing::debug!(expires_in = ?response.expires_in, "refreshed firestore access token");

        let value = response.access_token;
        *cache = Some(CachedToken {
            value: value.clone(),
            expires_at: token_expiry(Instant::now(), response.expires_in),
        });
        Ok(value)
    }
}

/// When a token issued at `now` stops being usable. Lifetimes are capped at a
/// day; an unrepresentable instant makes the token stale immediately.
fn token_expiry(now: Instant, expires_in: Option<u64>) -> Instant {
    let secs = expires_in
        .unwrap_or(DEFAULT_TOKEN_LIFETIME_SECS)
        .min(MAX_TOKEN_LIFETIME_SECS);
    now.checked_add(Duration::from_secs(secs)).unwrap_or(now)
}

/// Build the RS256-signed assertion for the token exchange
pub fn sign_assertion(key: &ServiceAccountKey, issued_at: i64) -> StoreResult<String> {
    let claims = AssertionClaims {
        iss: &key.client_email,
        scope: DATASTORE_SCOPE,
        aud: &key.token_uri,
        iat: issued_at,
        exp: issued_at + ASSERTION_LIFETIME_SECS,
    };
    let mut header = Header::new(Algorithm::RS256);
    header.kid = key.private_key_id.clone();

    let signing_key = EncodingKey::from_rsa_pem(key.private_key.as_bytes())
        .map_err(|e| StoreError::Credentials(format!("invalid private key: {}", e)))?;
    jsonwebtoken::encode(&header, &claims, &signing_key)
        .map_err(|e| StoreError::Credentials(format!("signing assertion failed: {}", e)))
}

async fn exchange_assertion(
    client: &reqwest::Client,
    key: &ServiceAccountKey,
) -> StoreResult<TokenResponse> {
    let assertion = sign_assertion(key, Utc::now().timestamp())?;
    let response = client
        .post(&key.token_uri)
        .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())])
        .send()
        .await
        .map_err(|e| StoreError::Credentials(e.to_string()))?;
    read_token(response).await
}

async fn fetch_metadata_token(client: &reqwest::Client) -> StoreResult<TokenResponse> {
    let response = client
        .get(METADATA_TOKEN_URL)
        .header("Metadata-Flavor", "Google")
        .send()
        .await
        .map_err(|e| StoreError::Credentials(format!("metadata server unreachable: {}", e)))?;
    read_token(response).await
}

async fn read_token(response: reqwest::Response) -> StoreResult<TokenResponse> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(StoreError::Credentials(format!(
            "token endpoint returned {}: {}",
            status, body
        )));
    }
    response
        .json()
        .await
        .map_err(|e| StoreError::Credentials(format!("malformed token response: {}", e)))
}
