//! Shared application state.
//!
//! Constructed once at startup and passed to every handler through axum's
//! state mechanism; there is no global mutable state.

use newsroom_access::RoleDirectory;
use sqlx::PgPool;

use crate::auth::OidcClient;
use crate::config::{NewsConfig, SessionConfig};

/// Shared application state.
pub struct AppState {
    /// Database connection pool (sessions and comments).
    pub db_pool: PgPool,
    /// OIDC client for authentication.
    pub oidc: OidcClient,
    /// HTTP client for the news proxy.
    pub http: reqwest::Client,
    /// Email allow-list resolving elevated roles.
    pub roles: RoleDirectory,
    /// Session configuration.
    pub session_config: SessionConfig,
    /// News proxy configuration.
    pub news: NewsConfig,
    /// Where the browser lands after auth redirects.
    pub landing_url: String,
}

impl AppState {
    /// Creates a new application state.
    pub fn new(
        db_pool: PgPool,
        oidc: OidcClient,
        http: reqwest::Client,
        roles: RoleDirectory,
        session_config: SessionConfig,
        news: NewsConfig,
        landing_url: String,
    ) -> Self {
        Self {
            db_pool,
            oidc,
            http,
            roles,
            session_config,
            news,
            landing_url,
        }
    }
}
