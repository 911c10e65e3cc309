//! Basic Auth Middleware
//!
//! Gates every route except the platform health-check path.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::auth::{Credentials, UserDirectory};

use super::platform_routes::is_health_check_path;

/// State for the auth middleware
#[derive(Debug)]
pub struct AuthState {
    pub users: UserDirectory,
    pub realm: String,
}

impl AuthState {
    pub fn new(users: UserDirectory, realm: impl Into<String>) -> Self {
        Self {
            users,
            realm: realm.into(),
        }
    }
}

/// Reject requests without valid Basic credentials
pub async fn require_basic_auth(
    State(state): State<Arc<AuthState>>,
    request: Request,
    next: Next,
) -> Response {
    if is_health_check_path(request.uri().path()) {
        return next.run(request).await;
    }

    let credentials = match Credentials::from_headers(request.headers()) {
        Ok(credentials) => credentials,
        Err(e) => return e.into_challenge(&state.realm),
    };
    if let Err(e) = state.users.verify(&credentials).await {
        return e.into_challenge(&state.realm);
    }

    next.run(request).await
}
