//! The authorization gate.
//!
//! A pure function from (session, required capability) to allow/deny,
//! consulted before every mutating comment operation. The two deny reasons
//! are distinct so callers can surface 401 versus 403.

use crate::error::AccessError;
use crate::identity::Identity;
use crate::role::Role;
use crate::session::Session;

/// Capabilities checked before comment mutations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    /// Create a comment. Any authenticated identity qualifies.
    WriteComment,
    /// Delete a comment. Requires the moderator role.
    DeleteComment,
}

/// Checks whether the session's identity may exercise a capability.
///
/// Consults only the session passed to it. On allow, returns the identity
/// so callers can stamp the authenticated email on the mutation.
///
/// # Errors
///
/// - [`AccessError::NotAuthenticated`] when the session holds no identity
///   (callers surface this as 401)
/// - [`AccessError::InsufficientRole`] when the identity lacks the required
///   role (403)
pub fn authorize(session: &Session, capability: Capability) -> Result<&Identity, AccessError> {
    let identity = session.identity().ok_or(AccessError::NotAuthenticated)?;

    match capability {
        Capability::WriteComment => {
            if identity.email().is_empty() {
                return Err(AccessError::NotAuthenticated);
            }
        }
        Capability::DeleteComment => {
            if !identity.roles().is_moderator() {
                return Err(AccessError::InsufficientRole {
                    required: Role::Moderator,
                });
            }
        }
    }

    Ok(identity)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::role::RoleSet;
    use crate::session::SessionId;
    use chrono::Duration;

    fn session_with(identity: Option<Identity>) -> Session {
        let mut session = Session::new(
            SessionId::new("sess_test".to_string()),
            Duration::hours(8),
        );
        if let Some(identity) = identity {
            session.set_identity(identity);
        }
        session
    }

    #[test]
    fn anonymous_session_denied_both_capabilities() {
        let session = session_with(None);
        assert_eq!(
            authorize(&session, Capability::WriteComment).unwrap_err(),
            AccessError::NotAuthenticated
        );
        assert_eq!(
            authorize(&session, Capability::DeleteComment).unwrap_err(),
            AccessError::NotAuthenticated
        );
    }

    #[test]
    fn any_identity_may_write() {
        let session = session_with(Some(Identity::new(
            "reader@example.com".to_string(),
            RoleSet::none(),
        )));
        let identity = authorize(&session, Capability::WriteComment).expect("allow");
        assert_eq!(identity.email(), "reader@example.com");
    }

    #[test]
    fn empty_email_cannot_write() {
        let session = session_with(Some(Identity::new(String::new(), RoleSet::none())));
        assert_eq!(
            authorize(&session, Capability::WriteComment).unwrap_err(),
            AccessError::NotAuthenticated
        );
    }

    #[test]
    fn non_moderators_cannot_delete_regardless_of_email() {
        for email in ["reader@example.com", "other@example.org", "admin@elsewhere.com"] {
            let session = session_with(Some(Identity::new(email.to_string(), RoleSet::none())));
            assert_eq!(
                authorize(&session, Capability::DeleteComment).unwrap_err(),
                AccessError::InsufficientRole {
                    required: Role::Moderator
                },
                "{email} should be denied"
            );
        }
    }

    #[test]
    fn moderator_may_delete() {
        let session = session_with(Some(Identity::new(
            "mod@example.com".to_string(),
            RoleSet::moderator(),
        )));
        assert!(authorize(&session, Capability::DeleteComment).is_ok());
    }

    #[test]
    fn admin_may_delete() {
        let session = session_with(Some(Identity::new(
            "admin@example.com".to_string(),
            RoleSet::admin(),
        )));
        assert!(authorize(&session, Capability::DeleteComment).is_ok());
    }
}
