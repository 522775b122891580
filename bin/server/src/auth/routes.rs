//! Authentication routes: login, callback, userinfo, and logout.
//!
//! The three-step flow: login mints a nonce into the caller's session and
//! redirects to the provider; the callback consumes the nonce, verifies it,
//! exchanges the code, and stores the mapped identity; logout destroys the
//! session. Any callback failure leaves the session unauthenticated.

use axum::Json;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Redirect};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use chrono::Duration as ChronoDuration;
use newsroom_access::{Identity, Session, SessionId, nonce};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use time::Duration as TimeDuration;

use super::db::{SessionRepository, generate_session_id};
use super::middleware::{CurrentSession, SESSION_COOKIE};
use crate::error::ApiError;
use crate::state::AppState;

/// Query parameters for the OIDC callback.
#[derive(Debug, Deserialize)]
pub struct CallbackQuery {
    code: String,
    state: String,
}

/// Initiates the OIDC login flow by redirecting to the identity provider.
///
/// Reuses the caller's live session row if one exists, otherwise creates
/// one, then stores the freshly minted nonce as the session's pending
/// login state.
pub async fn login(
    State(state): State<Arc<AppState>>,
    CurrentSession(existing): CurrentSession,
    jar: CookieJar,
) -> Result<impl IntoResponse, ApiError> {
    let repo = SessionRepository::new(state.db_pool.clone());
    let login_nonce = nonce::generate();

    let session = match existing {
        Some(mut session) => {
            session.begin_login(login_nonce.clone());
            repo.update(&session).await?;
            session
        }
        None => {
            let mut session = Session::new(
                generate_session_id(),
                ChronoDuration::minutes(state.session_config.duration_minutes),
            );
            session.begin_login(login_nonce.clone());
            repo.create(&session).await?;
            session
        }
    };

    let auth_url = state.oidc.authorization_url(&login_nonce);
    let cookie = session_cookie(
        session.id(),
        state.session_config.secure_cookies,
        TimeDuration::minutes(state.session_config.duration_minutes),
    );

    Ok((jar.add(cookie), Redirect::to(&auth_url)))
}

/// Handles the OIDC callback after the user authenticates with the provider.
///
/// The pending nonce is consumed and persisted as consumed before any
/// verification, so a failed or forged callback still burns it. The
/// identity is written only after the full exchange succeeds.
pub async fn callback(
    State(state): State<Arc<AppState>>,
    CurrentSession(session): CurrentSession,
    Query(query): Query<CallbackQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let mut session = session
        .ok_or_else(|| ApiError::Validation("no login in progress".to_string()))?;

    let repo = SessionRepository::new(state.db_pool.clone());

    // Single-use: cleared before verification, match or not.
    let pending = session.take_pending_nonce();
    repo.update(&session).await?;

    let pending =
        pending.ok_or_else(|| ApiError::Validation("no login in progress".to_string()))?;
    if pending != query.state {
        return Err(ApiError::Validation("login state mismatch".to_string()));
    }

    let claims = state
        .oidc
        .exchange_code(&query.code, &pending)
        .await
        .map_err(|e| ApiError::Upstream(e.to_string()))?;

    let identity = Identity::from_claims(&claims, &state.roles)?;
    tracing::info!(email = identity.email(), "user authenticated");

    session.set_identity(identity);
    repo.update(&session).await?;

    Ok(Redirect::to(&state.landing_url))
}

/// Returns the authenticated identity, or 401 with an empty body.
pub async fn userinfo(CurrentSession(session): CurrentSession) -> impl IntoResponse {
    match session.as_ref().and_then(|s| s.identity()) {
        Some(identity) => (
            StatusCode::OK,
            Json(json!({
                "email": identity.email(),
                "groups": identity.roles(),
            })),
        ),
        None => (StatusCode::UNAUTHORIZED, Json(json!({}))),
    }
}

/// Logs out by destroying the session. Idempotent: a missing session is
/// not an error.
pub async fn logout(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
) -> Result<impl IntoResponse, ApiError> {
    if let Some(cookie) = jar.get(SESSION_COOKIE) {
        let session_id = SessionId::new(cookie.value().to_string());
        let repo = SessionRepository::new(state.db_pool.clone());
        repo.delete(&session_id).await?;
    }

    let remove_session = Cookie::build((SESSION_COOKIE, ""))
        .path("/")
        .max_age(TimeDuration::ZERO);

    Ok((jar.add(remove_session), Redirect::to(&state.landing_url)))
}

fn session_cookie(id: &SessionId, secure: bool, max_age: TimeDuration) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, id.as_str().to_string()))
        .path("/")
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax)
        .max_age(max_age)
        .build()
}
