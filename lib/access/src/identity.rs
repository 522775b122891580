//! Identity mapping from provider claims to internal user records.
//!
//! The identity provider is trusted for the email claim only. Roles are
//! derived deterministically from that email through a static allow-list,
//! the `RoleDirectory`. The directory is a plain value built from
//! configuration, so a richer role-resolution strategy can be swapped in
//! without changing the mapping contract.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::AccessError;
use crate::role::RoleSet;

/// Claims extracted from the identity provider after token verification.
///
/// This is the merged view of the ID token plus any supplementary userinfo
/// response. Built with the builder-style setters as claims become known.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderClaims {
    /// OIDC subject claim.
    pub subject: String,
    /// OIDC issuer URL.
    pub issuer: String,
    /// Email claim, if the provider supplied one.
    pub email: Option<String>,
    /// Display name (name or preferred_username claim).
    pub display_name: Option<String>,
}

impl ProviderClaims {
    /// Creates a claim set with the required subject and issuer.
    #[must_use]
    pub fn new(subject: String, issuer: String) -> Self {
        Self {
            subject,
            issuer,
            email: None,
            display_name: None,
        }
    }

    /// Sets the email claim.
    #[must_use]
    pub fn with_email(mut self, email: Option<String>) -> Self {
        self.email = email;
        self
    }

    /// Sets the display name.
    #[must_use]
    pub fn with_display_name(mut self, name: Option<String>) -> Self {
        self.display_name = name;
        self
    }

    /// Fills any missing claims from a supplementary claim set.
    ///
    /// Existing values win; this is how the optional userinfo response
    /// supplements a sparse ID token.
    #[must_use]
    pub fn merged_with(mut self, supplement: ProviderClaims) -> Self {
        if self.email.is_none() {
            self.email = supplement.email;
        }
        if self.display_name.is_none() {
            self.display_name = supplement.display_name;
        }
        self
    }
}

/// The internal user record derived from provider claims.
///
/// Roles are always present, possibly empty. Stored in the session after a
/// successful callback and consulted by the authorization gate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    email: String,
    roles: RoleSet,
}

impl Identity {
    /// Creates an identity directly from its parts.
    ///
    /// Use this when reconstituting an identity from storage; new logins
    /// should go through [`Identity::from_claims`].
    #[must_use]
    pub fn new(email: String, roles: RoleSet) -> Self {
        Self { email, roles }
    }

    /// Maps verified provider claims to an internal identity.
    ///
    /// Deterministic and pure: the role set is whatever the directory
    /// resolves for the email claim, an empty set for anyone unlisted.
    ///
    /// # Errors
    ///
    /// Returns [`AccessError::MissingClaim`] when the merged claim set has
    /// no email.
    pub fn from_claims(
        claims: &ProviderClaims,
        directory: &RoleDirectory,
    ) -> Result<Self, AccessError> {
        let email = claims.email.clone().ok_or(AccessError::MissingClaim {
            claim: "email".to_string(),
        })?;
        let roles = directory.resolve(&email);
        Ok(Self { email, roles })
    }

    /// Returns the identity's email address.
    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
    }

    /// Returns the identity's role set.
    #[must_use]
    pub fn roles(&self) -> &RoleSet {
        &self.roles
    }
}

/// Static allow-list mapping emails to elevated role sets.
///
/// Every email not present maps to `RoleSet::none()`. Deliberately simple:
/// this stands in for a real role-management system, and the mapping
/// contract (claims in, identity out) survives replacing it.
#[derive(Debug, Clone, Default)]
pub struct RoleDirectory {
    entries: HashMap<String, RoleSet>,
}

impl RoleDirectory {
    /// Creates an empty directory: every identity resolves to no roles.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Assigns a role set to an email, replacing any previous entry.
    pub fn assign(&mut self, email: String, roles: RoleSet) {
        self.entries.insert(email, roles);
    }

    /// Resolves the role set for an email.
    ///
    /// Always returns a role set; unlisted emails get an empty one.
    #[must_use]
    pub fn resolve(&self, email: &str) -> RoleSet {
        self.entries.get(email).cloned().unwrap_or_default()
    }

    /// Returns the number of emails with elevated roles.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no email has elevated roles.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claims_with_email(email: &str) -> ProviderClaims {
        ProviderClaims::new(
            "sub_123".to_string(),
            "https://auth.example.com".to_string(),
        )
        .with_email(Some(email.to_string()))
    }

    fn directory() -> RoleDirectory {
        let mut dir = RoleDirectory::new();
        dir.assign("admin@example.com".to_string(), RoleSet::admin());
        dir.assign("mod@example.com".to_string(), RoleSet::moderator());
        dir
    }

    #[test]
    fn unlisted_email_maps_to_empty_roles() {
        let dir = directory();
        for email in ["reader@example.com", "", "ADMIN@example.com", "admin"] {
            let identity = Identity::from_claims(&claims_with_email(email), &dir).expect("map");
            assert!(identity.roles().is_empty(), "expected no roles for {email:?}");
        }
    }

    #[test]
    fn listed_emails_get_their_roles() {
        let dir = directory();

        let admin = Identity::from_claims(&claims_with_email("admin@example.com"), &dir).unwrap();
        assert!(admin.roles().is_admin());
        assert!(admin.roles().is_moderator());

        let moderator = Identity::from_claims(&claims_with_email("mod@example.com"), &dir).unwrap();
        assert!(moderator.roles().is_moderator());
        assert!(!moderator.roles().is_admin());
    }

    #[test]
    fn mapping_is_deterministic() {
        let dir = directory();
        let a = Identity::from_claims(&claims_with_email("mod@example.com"), &dir).unwrap();
        let b = Identity::from_claims(&claims_with_email("mod@example.com"), &dir).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn missing_email_fails() {
        let claims = ProviderClaims::new(
            "sub_123".to_string(),
            "https://auth.example.com".to_string(),
        );
        let err = Identity::from_claims(&claims, &directory()).unwrap_err();
        assert_eq!(
            err,
            AccessError::MissingClaim {
                claim: "email".to_string()
            }
        );
    }

    #[test]
    fn merge_prefers_existing_claims() {
        let id_token = claims_with_email("token@example.com");
        let userinfo = claims_with_email("userinfo@example.com")
            .with_display_name(Some("User Info".to_string()));

        let merged = id_token.merged_with(userinfo);
        assert_eq!(merged.email.as_deref(), Some("token@example.com"));
        assert_eq!(merged.display_name.as_deref(), Some("User Info"));
    }

    #[test]
    fn merge_fills_missing_email() {
        let id_token = ProviderClaims::new(
            "sub_123".to_string(),
            "https://auth.example.com".to_string(),
        );
        let merged = id_token.merged_with(claims_with_email("userinfo@example.com"));
        assert_eq!(merged.email.as_deref(), Some("userinfo@example.com"));
    }

    #[test]
    fn identity_serialization_roundtrip() {
        let identity = Identity::new("mod@example.com".to_string(), RoleSet::moderator());
        let json = serde_json::to_string(&identity).expect("serialize");
        let parsed: Identity = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(identity, parsed);
    }
}
