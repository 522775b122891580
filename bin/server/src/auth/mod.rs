//! Authentication for the newsroom server.
//!
//! This module provides:
//! - The OIDC client (discovery, code exchange, userinfo merge)
//! - The database-backed session store
//! - The login/callback/userinfo/logout routes
//! - The `CurrentSession` extractor for Axum handlers
//!
//! # Authorization Model
//!
//! Authentication establishes an [`newsroom_access::Identity`] in the
//! session; its role set comes from the configured email allow-list, never
//! from provider claims. Handlers authorize mutations by passing the
//! extracted session to the pure gate in `newsroom_access::capability`.
//! Role changes take effect on next login.

pub mod db;
pub mod middleware;
pub mod oidc;
pub mod routes;

pub use middleware::CurrentSession;
pub use oidc::OidcClient;
pub use routes::{callback, login, logout, userinfo};
