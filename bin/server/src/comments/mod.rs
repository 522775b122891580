//! Threaded article comments: storage and API routes.

pub mod db;
pub mod routes;

pub use db::{CommentRecord, CommentRepository, CommentStoreError};
pub use routes::{create_comment, delete_comment, list_comments};
