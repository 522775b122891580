//! Comment API routes.
//!
//! Reads are public. Every mutation goes through the authorization gate
//! before touching the store; the author stamped on a new comment is
//! always the session identity's email, never client input.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use newsroom_access::{Capability, authorize};
use newsroom_core::CommentId;
use serde::Deserialize;
use std::str::FromStr;
use std::sync::Arc;

use super::db::{CommentRepository, CommentStoreError};
use crate::auth::CurrentSession;
use crate::error::ApiError;
use crate::state::AppState;

/// Request body for creating a comment.
///
/// Deliberately has no author field; anything extra a client sends is
/// ignored by deserialization.
#[derive(Debug, Deserialize)]
pub struct CreateComment {
    text: String,
    #[serde(default)]
    parent: Option<CommentId>,
}

/// Lists an article's comments. Public.
pub async fn list_comments(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let repo = CommentRepository::new(state.db_pool.clone());
    let comments = repo.list(&slug).await?;
    Ok(Json(comments))
}

/// Creates a comment as the authenticated identity.
pub async fn create_comment(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
    CurrentSession(session): CurrentSession,
    Json(body): Json<CreateComment>,
) -> Result<impl IntoResponse, ApiError> {
    let session = session.ok_or(ApiError::Unauthenticated)?;
    let identity = authorize(&session, Capability::WriteComment)?;

    let repo = CommentRepository::new(state.db_pool.clone());
    let comment = repo
        .create(&slug, &body.text, identity.email(), body.parent)
        .await
        .map_err(|e| match e {
            CommentStoreError::Validation(msg) => ApiError::Validation(msg),
            CommentStoreError::Database(e) => e.into(),
        })?;

    Ok((StatusCode::CREATED, Json(comment)))
}

/// Deletes a comment. Moderators only.
pub async fn delete_comment(
    State(state): State<Arc<AppState>>,
    Path((slug, id)): Path<(String, String)>,
    CurrentSession(session): CurrentSession,
) -> Result<impl IntoResponse, ApiError> {
    let session = session.ok_or(ApiError::Unauthenticated)?;
    let identity = authorize(&session, Capability::DeleteComment)?;

    // An unparseable id cannot name a stored comment.
    let comment_id = CommentId::from_str(&id).map_err(|_| ApiError::NotFound)?;

    let repo = CommentRepository::new(state.db_pool.clone());
    let deleted = repo.delete(&slug, comment_id).await?;
    if !deleted {
        return Err(ApiError::NotFound);
    }

    tracing::info!(
        moderator = identity.email(),
        article = %slug,
        comment = %comment_id,
        "comment deleted"
    );

    Ok(StatusCode::NO_CONTENT)
}
