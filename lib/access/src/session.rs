//! The per-browser session state machine.
//!
//! A session is keyed by an opaque token presented in a cookie and carries
//! exactly two pieces of domain state: the pending login nonce (present
//! only between login initiation and callback) and the authenticated
//! identity (present after a successful callback). The whole session is
//! destroyed at logout or expiry.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::identity::Identity;

/// Unique identifier for a session.
///
/// Session IDs are opaque strings generated server-side and presented by
/// the browser; they are the only key a session can be read under.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    /// Creates a new session ID from a string.
    #[must_use]
    pub fn new(id: String) -> Self {
        Self(id)
    }

    /// Returns the session ID as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for SessionId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for SessionId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Transient per-browser authentication state.
///
/// State transitions:
/// - `begin_login` sets the pending nonce (and drops any identity left by
///   an interrupted flow)
/// - `take_pending_nonce` consumes the nonce at callback time, match or not
/// - `set_identity` records the verified identity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Opaque browser-presented key.
    id: SessionId,
    /// Nonce minted at login initiation, consumed at callback.
    pending_nonce: Option<String>,
    /// The authenticated identity, set only after nonce verification.
    identity: Option<Identity>,
    /// When the session was created.
    created_at: DateTime<Utc>,
    /// When the session expires.
    expires_at: DateTime<Utc>,
}

impl Session {
    /// Creates a fresh unauthenticated session valid for `duration`.
    #[must_use]
    pub fn new(id: SessionId, duration: Duration) -> Self {
        let now = Utc::now();
        Self {
            id,
            pending_nonce: None,
            identity: None,
            created_at: now,
            expires_at: now + duration,
        }
    }

    /// Reconstitutes a session from storage.
    #[must_use]
    pub fn from_parts(
        id: SessionId,
        pending_nonce: Option<String>,
        identity: Option<Identity>,
        created_at: DateTime<Utc>,
        expires_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            pending_nonce,
            identity,
            created_at,
            expires_at,
        }
    }

    /// Returns the session ID.
    #[must_use]
    pub fn id(&self) -> &SessionId {
        &self.id
    }

    /// Returns the pending login nonce, if a login is in flight.
    #[must_use]
    pub fn pending_nonce(&self) -> Option<&str> {
        self.pending_nonce.as_deref()
    }

    /// Returns the authenticated identity, if any.
    #[must_use]
    pub fn identity(&self) -> Option<&Identity> {
        self.identity.as_ref()
    }

    /// Returns when the session was created.
    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns when the session expires.
    #[must_use]
    pub fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }

    /// Returns true if the session has expired.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        Utc::now() >= self.expires_at
    }

    /// Returns true if the session holds an authenticated identity.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.identity.is_some()
    }

    /// Starts a login attempt: stores the nonce to be verified at callback.
    ///
    /// Any identity from a previous login is dropped so a half-finished
    /// re-login can never leave stale credentials behind.
    pub fn begin_login(&mut self, nonce: String) {
        self.pending_nonce = Some(nonce);
        self.identity = None;
    }

    /// Consumes and returns the pending nonce.
    ///
    /// The nonce is single-use: callers must persist the cleared state
    /// whether or not verification subsequently succeeds.
    pub fn take_pending_nonce(&mut self) -> Option<String> {
        self.pending_nonce.take()
    }

    /// Records the verified identity after a successful callback.
    pub fn set_identity(&mut self, identity: Identity) {
        self.identity = Some(identity);
    }
}
