//! Role types for comment moderation access control.
//!
//! Roles are derived from the authenticated email through a static
//! allow-list (see [`crate::identity::RoleDirectory`]); they are never read
//! from provider claims.

use serde::{Deserialize, Serialize};

/// A moderation role held by an identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// May delete comments on any article.
    Moderator,
    /// Platform administrator. Implies moderator capabilities.
    Admin,
}

impl Role {
    /// Returns true if this role grants moderation capability.
    #[must_use]
    pub fn can_moderate(&self) -> bool {
        matches!(self, Self::Moderator | Self::Admin)
    }
}

/// Set of roles assigned to an identity.
///
/// Always present on an identity, possibly empty. An empty set is an
/// ordinary authenticated user with no elevated capabilities.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoleSet {
    roles: Vec<Role>,
}

impl RoleSet {
    /// Creates an empty role set (no elevated access).
    #[must_use]
    pub fn none() -> Self {
        Self { roles: Vec::new() }
    }

    /// Creates a role set with moderator access only.
    #[must_use]
    pub fn moderator() -> Self {
        Self {
            roles: vec![Role::Moderator],
        }
    }

    /// Creates a role set with admin access (implies moderator).
    #[must_use]
    pub fn admin() -> Self {
        Self {
            roles: vec![Role::Moderator, Role::Admin],
        }
    }

    /// Returns true if the set contains the given role.
    #[must_use]
    pub fn contains(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }

    /// Returns true if any held role grants moderation capability.
    #[must_use]
    pub fn is_moderator(&self) -> bool {
        self.roles.iter().any(Role::can_moderate)
    }

    /// Returns true if the set contains the admin role.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.contains(Role::Admin)
    }

    /// Returns true if the set holds no roles.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.roles.is_empty()
    }

    /// Returns the roles as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[Role] {
        &self.roles
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_can_moderate() {
        assert!(Role::Moderator.can_moderate());
        assert!(Role::Admin.can_moderate());
    }

    #[test]
    fn empty_set_grants_nothing() {
        let roles = RoleSet::none();
        assert!(roles.is_empty());
        assert!(!roles.is_moderator());
        assert!(!roles.is_admin());
    }

    #[test]
    fn moderator_set_is_not_admin() {
        let roles = RoleSet::moderator();
        assert!(roles.is_moderator());
        assert!(!roles.is_admin());
        assert_eq!(roles.as_slice(), &[Role::Moderator]);
    }

    #[test]
    fn admin_set_implies_moderator() {
        let roles = RoleSet::admin();
        assert!(roles.is_moderator());
        assert!(roles.is_admin());
        assert!(roles.contains(Role::Moderator));
    }

    #[test]
    fn default_is_empty() {
        assert!(RoleSet::default().is_empty());
    }

    #[test]
    fn serializes_as_string_array() {
        let json = serde_json::to_string(&RoleSet::admin()).expect("serialize");
        assert_eq!(json, r#"["moderator","admin"]"#);

        let parsed: RoleSet = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(parsed, RoleSet::admin());
    }
}
