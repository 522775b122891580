//! newsroom web server.
//!
//! HTTP surface: OIDC login/session endpoints under `/api/auth`, threaded
//! article comments under `/api/articles/{slug}/comments`, a news search
//! proxy at `/api/stories`, and the built front-end bundle for everything
//! else.

pub mod auth;
pub mod comments;
pub mod config;
pub mod error;
pub mod news;
pub mod state;
