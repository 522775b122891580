//! The comment store.
//!
//! Comments are keyed by article slug and immutable once created, apart
//! from deletion. The store performs no authorization: callers gate
//! mutations through `newsroom_access::capability` first and hand in the
//! authenticated author.

use chrono::{DateTime, Utc};
use newsroom_core::CommentId;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use std::fmt;
use std::str::FromStr;

/// A stored comment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentRecord {
    /// Store-generated ID, immutable.
    pub id: CommentId,
    /// Slug of the article the comment belongs to.
    pub article: String,
    /// Email of the authenticated author.
    pub author: String,
    /// Comment body, non-empty after trimming.
    pub text: String,
    /// Server-side insertion time.
    pub created: DateTime<Utc>,
    /// Parent comment in the same article, for threading.
    pub parent: Option<CommentId>,
}

/// Row type for comment queries.
#[derive(FromRow)]
struct CommentRow {
    id: String,
    article: String,
    author: String,
    text: String,
    created: DateTime<Utc>,
    parent: Option<String>,
}

impl CommentRow {
    fn try_into_record(self) -> Result<CommentRecord, sqlx::Error> {
        let id = CommentId::from_str(&self.id).map_err(|e| decode_error(&self.id, e))?;
        let parent = self
            .parent
            .map(|p| CommentId::from_str(&p).map_err(|e| decode_error(&p, e)))
            .transpose()?;

        Ok(CommentRecord {
            id,
            article: self.article,
            author: self.author,
            text: self.text,
            created: self.created,
            parent,
        })
    }
}

fn decode_error(raw: &str, e: newsroom_core::ParseIdError) -> sqlx::Error {
    sqlx::Error::Decode(Box::new(std::io::Error::new(
        std::io::ErrorKind::InvalidData,
        format!("invalid comment id '{}': {}", raw, e),
    )))
}

/// Errors from comment store operations.
#[derive(Debug)]
pub enum CommentStoreError {
    /// The comment text was empty after trimming.
    Validation(String),
    /// The underlying store failed.
    Database(sqlx::Error),
}

impl fmt::Display for CommentStoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Validation(msg) => write!(f, "invalid comment: {msg}"),
            Self::Database(e) => write!(f, "comment store error: {e}"),
        }
    }
}

impl std::error::Error for CommentStoreError {}

impl From<sqlx::Error> for CommentStoreError {
    fn from(e: sqlx::Error) -> Self {
        Self::Database(e)
    }
}

/// Checks that comment text is non-empty after trimming.
///
/// The text is stored as submitted; trimming is for validation only.
pub fn validate_text(text: &str) -> Result<(), CommentStoreError> {
    if text.trim().is_empty() {
        return Err(CommentStoreError::Validation(
            "text must not be empty".to_string(),
        ));
    }
    Ok(())
}

/// Repository for comment operations.
pub struct CommentRepository {
    pool: PgPool,
}

impl CommentRepository {
    /// Creates a new comment repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Lists an article's comments in insertion order.
    ///
    /// Each call re-reads current state. No authorization required.
    pub async fn list(&self, article: &str) -> Result<Vec<CommentRecord>, sqlx::Error> {
        let rows: Vec<CommentRow> = sqlx::query_as(
            r#"
            SELECT id, article, author, text, created, parent
            FROM comments
            WHERE article = $1
            ORDER BY created, id
            "#,
        )
        .bind(article)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(CommentRow::try_into_record).collect()
    }

    /// Creates a comment, stamping the server time and a fresh ID.
    ///
    /// `parent` is stored as given: the store does not verify it names an
    /// existing comment in the article. Deletion already orphans children,
    /// so readers must tolerate dangling parents either way.
    ///
    /// # Errors
    ///
    /// [`CommentStoreError::Validation`] when `text` trims to empty; the
    /// check runs before anything is written.
    pub async fn create(
        &self,
        article: &str,
        text: &str,
        author: &str,
        parent: Option<CommentId>,
    ) -> Result<CommentRecord, CommentStoreError> {
        validate_text(text)?;

        let record = CommentRecord {
            id: CommentId::new(),
            article: article.to_string(),
            author: author.to_string(),
            text: text.to_string(),
            created: Utc::now(),
            parent,
        };

        sqlx::query(
            r#"
            INSERT INTO comments (id, article, author, text, created, parent)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(record.id.to_string())
        .bind(&record.article)
        .bind(&record.author)
        .bind(&record.text)
        .bind(record.created)
        .bind(record.parent.map(|p| p.to_string()))
        .execute(&self.pool)
        .await?;

        Ok(record)
    }

    /// Deletes the comment matching both article and ID.
    ///
    /// Returns false when nothing matched (wrong id, wrong article, or
    /// already deleted); callers map that to 404.
    pub async fn delete(&self, article: &str, id: CommentId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            r#"
            DELETE FROM comments
            WHERE article = $1 AND id = $2
            "#,
        )
        .bind(article)
        .bind(id.to_string())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whitespace_only_text_is_rejected() {
        for text in ["", " ", "\t\n", "   \r\n  "] {
            assert!(
                matches!(validate_text(text), Err(CommentStoreError::Validation(_))),
                "{text:?} should fail validation"
            );
        }
    }

    #[test]
    fn text_with_content_passes() {
        assert!(validate_text("hello").is_ok());
        assert!(validate_text("  padded  ").is_ok());
    }

    #[test]
    fn record_serializes_with_api_field_names() {
        let record = CommentRecord {
            id: CommentId::new(),
            article: "foo".to_string(),
            author: "reader@example.com".to_string(),
            text: "hello".to_string(),
            created: Utc::now(),
            parent: None,
        };

        let value = serde_json::to_value(&record).expect("serialize");
        for field in ["id", "article", "author", "text", "created", "parent"] {
            assert!(value.get(field).is_some(), "missing field {field}");
        }
        assert!(value["parent"].is_null());
    }

    #[test]
    fn parent_round_trips_through_json() {
        let parent = CommentId::new();
        let record = CommentRecord {
            id: CommentId::new(),
            article: "foo".to_string(),
            author: "reader@example.com".to_string(),
            text: "reply".to_string(),
            created: Utc::now(),
            parent: Some(parent),
        };

        let json = serde_json::to_string(&record).expect("serialize");
        let parsed: CommentRecord = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(parsed.parent, Some(parent));
    }
}
