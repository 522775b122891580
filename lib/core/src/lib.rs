//! Core domain types shared across the newsroom workspace.
//!
//! Currently this is the strongly-typed comment identifier and its parse
//! error. IDs use ULID format, providing uniqueness and temporal ordering.

pub mod id;

pub use id::{CommentId, ParseIdError};
