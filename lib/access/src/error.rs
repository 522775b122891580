//! Error types for the access crate.

use std::fmt;

use crate::role::Role;

/// Errors from identity mapping and authorization checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessError {
    /// No authenticated identity in the session.
    NotAuthenticated,
    /// Identity present but missing the required role.
    InsufficientRole { required: Role },
    /// A required claim was absent from the provider's response.
    MissingClaim { claim: String },
}

impl fmt::Display for AccessError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotAuthenticated => {
                write!(f, "not authenticated")
            }
            Self::InsufficientRole { required } => {
                write!(f, "requires the {required:?} role")
            }
            Self::MissingClaim { claim } => {
                write!(f, "missing required claim: {claim}")
            }
        }
    }
}

impl std::error::Error for AccessError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_authenticated_display() {
        assert_eq!(AccessError::NotAuthenticated.to_string(), "not authenticated");
    }

    #[test]
    fn insufficient_role_names_the_role() {
        let err = AccessError::InsufficientRole {
            required: Role::Moderator,
        };
        assert!(err.to_string().contains("Moderator"));
    }

    #[test]
    fn missing_claim_names_the_claim() {
        let err = AccessError::MissingClaim {
            claim: "email".to_string(),
        };
        assert!(err.to_string().contains("email"));
    }
}
