//! Authentication and authorization domain for the newsroom platform.
//!
//! This crate provides:
//! - Cryptographic login nonces (`nonce`)
//! - Role-based access control (`Role`, `RoleSet`)
//! - Identity mapping from provider claims (`Identity`, `RoleDirectory`)
//! - The per-browser session state machine (`Session`, `SessionId`)
//! - The pure authorization gate (`Capability`, `authorize`)
//!
//! Everything here is pure with respect to its inputs: no network access,
//! no storage. Persistence and the OIDC wire protocol live in the server.
//!
//! # Access Control Model
//!
//! Identities carry an email and a role set derived from that email through
//! a static allow-list (`RoleDirectory`). The provider is trusted for the
//! email claim only; roles are never read from provider claims. Any
//! authenticated identity may write comments; deleting comments requires
//! the moderator role.
//!
//! # Example
//!
//! ```
//! use newsroom_access::{
//!     Capability, Identity, ProviderClaims, RoleDirectory, RoleSet, Session, SessionId,
//!     authorize, nonce,
//! };
//! use chrono::Duration;
//!
//! let mut directory = RoleDirectory::new();
//! directory.assign("mod@example.com".to_string(), RoleSet::moderator());
//!
//! let claims = ProviderClaims::new(
//!     "sub_123".to_string(),
//!     "https://auth.example.com".to_string(),
//! )
//! .with_email(Some("mod@example.com".to_string()));
//! let identity = Identity::from_claims(&claims, &directory).unwrap();
//!
//! let mut session = Session::new(SessionId::new(nonce::generate()), Duration::hours(8));
//! session.set_identity(identity);
//!
//! assert!(authorize(&session, Capability::DeleteComment).is_ok());
//! ```

pub mod capability;
pub mod error;
pub mod identity;
pub mod nonce;
pub mod role;
pub mod session;

// Re-export main types at crate root
pub use capability::{Capability, authorize};
pub use error::AccessError;
pub use identity::{Identity, ProviderClaims, RoleDirectory};
pub use role::{Role, RoleSet};
pub use session::{Session, SessionId};
