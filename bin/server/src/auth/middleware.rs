//! Session extractor for Axum handlers.
//!
//! Loads the caller's session from the cookie, if any. Authorization stays
//! out of here: handlers pass the extracted session to the pure gate in
//! `newsroom_access::capability` and map its deny reasons to 401/403.

use axum::extract::{FromRef, FromRequestParts};
use axum::http::request::Parts;
use axum_extra::extract::CookieJar;
use newsroom_access::{Session, SessionId};
use std::sync::Arc;

use super::db::SessionRepository;
use crate::error::ApiError;
use crate::state::AppState;

/// Session cookie name.
pub const SESSION_COOKIE: &str = "session";

/// Extractor yielding the caller's session, if one exists and is live.
///
/// Expired sessions are deleted on sight and reported as absent, and a
/// cookie-less request simply carries `None`. A session-store failure
/// rejects the request with a server error; an outage must not read as
/// not-authenticated.
pub struct CurrentSession(pub Option<Session>);

impl<S> FromRequestParts<S> for CurrentSession
where
    Arc<AppState>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = Arc::<AppState>::from_ref(state);
        let jar = match CookieJar::from_request_parts(parts, state).await {
            Ok(jar) => jar,
            Err(never) => match never {},
        };

        let Some(cookie) = jar.get(SESSION_COOKIE) else {
            return Ok(CurrentSession(None));
        };
        let session_id = SessionId::new(cookie.value().to_string());

        let repo = SessionRepository::new(app_state.db_pool.clone());
        let session = repo.find_by_id(&session_id).await?;

        match session {
            Some(session) if session.is_expired() => {
                let _ = repo.delete(&session_id).await;
                Ok(CurrentSession(None))
            }
            other => Ok(CurrentSession(other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use axum::response::IntoResponse;

    #[test]
    fn store_failure_rejects_with_server_error() {
        // The extractor propagates lookup failures as its rejection; the
        // response must be a 5xx, never 401.
        let rejection: ApiError = sqlx::Error::PoolClosed.into();
        let status = rejection.into_response().status();
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_ne!(status, StatusCode::UNAUTHORIZED);
    }
}
