// ABOUTME: Role and permission evaluation against an explicit request identity
// ABOUTME: Provides Identity, AccessPolicy, and the role-OR / permission-AND decision rules
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

//! # Authorization
//!
//! Access decisions take the caller's identity as an explicit argument; there
//! is no ambient "current user". Policies are declared as plain data
//! ([`AccessPolicy`]) and evaluated against the role set resolved for the
//! subject.
//!
//! Decision rules:
//! - **Roles**: the subject needs ANY of the required roles
//! - **Permissions**: the subject needs ALL of the required permissions, where
//!   each permission may come from any of the subject's roles
//! - Empty requirements grant access (vacuous truth)
//! - An anonymous identity is denied whenever any requirement is non-empty

use uuid::Uuid;

use crate::errors::{AppError, AppResult};
use crate::models::RoleDetail;

/// The resolved identity of the caller for one operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Identity {
    /// No credentials were presented or they did not resolve to a user
    Anonymous,
    /// Credentials resolved to this user
    Authenticated { user_id: Uuid },
}

impl Identity {
    /// The user ID if authenticated
    #[must_use]
    pub const fn user_id(&self) -> Option<Uuid> {
        match self {
            Self::Anonymous => None,
            Self::Authenticated { user_id } => Some(*user_id),
        }
    }
}

/// Declarative access requirements for an operation
#[derive(Debug, Clone, Default)]
pub struct AccessPolicy {
    /// Roles of which the subject must hold at least one
    pub required_roles: Vec<String>,
    /// Permissions the subject must hold all of
    pub required_permissions: Vec<String>,
}

impl AccessPolicy {
    /// A policy with no requirements; grants access to everyone
    #[must_use]
    pub fn allow_all() -> Self {
        Self::default()
    }

    /// Require at least one of the given roles
    #[must_use]
    pub fn any_role<I, S>(roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            required_roles: roles.into_iter().map(Into::into).collect(),
            required_permissions: Vec::new(),
        }
    }

    /// Require all of the given permissions
    #[must_use]
    pub fn all_permissions<I, S>(permissions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            required_roles: Vec::new(),
            required_permissions: permissions.into_iter().map(Into::into).collect(),
        }
    }

    /// Add a role requirement to an existing policy
    #[must_use]
    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.required_roles.push(role.into());
        self
    }

    /// Add a permission requirement to an existing policy
    #[must_use]
    pub fn with_permission(mut self, permission: impl Into<String>) -> Self {
        self.required_permissions.push(permission.into());
        self
    }

    /// Whether this policy imposes any requirement at all
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.required_roles.is_empty() && self.required_permissions.is_empty()
    }

    /// Evaluate the policy for the given identity and resolved role set
    ///
    /// `granted` is the subject's roles with their permission sets already
    /// resolved; for [`Identity::Anonymous`] it is ignored.
    ///
    /// # Errors
    ///
    /// - [`AppError::auth_required`] for an anonymous identity when the policy
    ///   is not open
    /// - [`AppError::permission_denied`] when the role or permission rule fails
    pub fn authorize(&self, identity: Identity, granted: &[RoleDetail]) -> AppResult<()> {
        if self.is_open() {
            return Ok(());
        }
        let Identity::Authenticated { user_id } = identity else {
            return Err(AppError::auth_required());
        };

        if !has_any_role(granted, &self.required_roles) {
            return Err(AppError::permission_denied(format!(
                "requires one of roles: {}",
                self.required_roles.join(", ")
            ))
            .with_user_id(user_id));
        }
        if !has_all_permissions(granted, &self.required_permissions) {
            return Err(AppError::permission_denied(format!(
                "requires permissions: {}",
                self.required_permissions.join(", ")
            ))
            .with_user_id(user_id));
        }
        Ok(())
    }
}

/// Whether the subject holds at least one of the required roles
///
/// Empty `required` grants access.
#[must_use]
pub fn has_any_role(granted: &[RoleDetail], required: &[String]) -> bool {
    if required.is_empty() {
        return true;
    }
    granted
        .iter()
        .any(|detail| required.iter().any(|name| *name == detail.role.name))
}

/// Whether the subject holds every required permission
///
/// Each required permission may be contributed by any of the subject's roles.
/// Empty `required` grants access.
#[must_use]
pub fn has_all_permissions(granted: &[RoleDetail], required: &[String]) -> bool {
    required.iter().all(|needed| {
        granted
            .iter()
            .any(|detail| detail.permissions.iter().any(|p| p.name == *needed))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Permission, Role};

    fn role_with(name: &str, permissions: &[&str]) -> RoleDetail {
        RoleDetail {
            role: Role::new(name.into(), None, false),
            permissions: permissions
                .iter()
                .map(|p| {
                    Permission::new((*p).into(), None, "test".into(), "test".into())
                })
                .collect(),
        }
    }

    fn authed() -> Identity {
        Identity::Authenticated {
            user_id: Uuid::new_v4(),
        }
    }

    #[test]
    fn test_open_policy_admits_anonymous() {
        let policy = AccessPolicy::allow_all();
        assert!(policy.authorize(Identity::Anonymous, &[]).is_ok());
    }

    #[test]
    fn test_anonymous_denied_when_requirements_exist() {
        let policy = AccessPolicy::any_role(["editor"]);
        let err = policy.authorize(Identity::Anonymous, &[]).unwrap_err();
        assert_eq!(err.code, crate::errors::ErrorCode::AuthRequired);

        let policy = AccessPolicy::all_permissions(["read:brand"]);
        assert!(policy.authorize(Identity::Anonymous, &[]).is_err());
    }

    #[test]
    fn test_role_check_is_any_of() {
        let granted = vec![role_with("viewer", &[])];

        let policy = AccessPolicy::any_role(["admin", "viewer"]);
        assert!(policy.authorize(authed(), &granted).is_ok());

        let policy = AccessPolicy::any_role(["admin", "editor"]);
        let err = policy.authorize(authed(), &granted).unwrap_err();
        assert_eq!(err.code, crate::errors::ErrorCode::PermissionDenied);
    }

    #[test]
    fn test_permission_check_is_all_of() {
        let granted = vec![
            role_with("reader", &["read:brand"]),
            role_with("writer", &["update:brand"]),
        ];

        // All required permissions held, drawn from different roles
        let policy = AccessPolicy::all_permissions(["read:brand", "update:brand"]);
        assert!(policy.authorize(authed(), &granted).is_ok());

        // One missing permission fails the whole check
        let policy = AccessPolicy::all_permissions(["read:brand", "delete:brand"]);
        assert!(policy.authorize(authed(), &granted).is_err());
    }

    #[test]
    fn test_combined_role_and_permission_requirements() {
        let granted = vec![role_with("manager", &["create:document"])];

        let policy = AccessPolicy::any_role(["manager"]).with_permission("create:document");
        assert!(policy.authorize(authed(), &granted).is_ok());

        let policy = AccessPolicy::any_role(["manager"]).with_permission("delete:document");
        assert!(policy.authorize(authed(), &granted).is_err());
    }

    #[test]
    fn test_empty_required_sets_are_vacuously_true() {
        assert!(has_any_role(&[], &[]));
        assert!(has_all_permissions(&[], &[]));
    }

    #[test]
    fn test_subject_with_no_roles_fails_non_empty_requirements() {
        assert!(!has_any_role(&[], &["admin".into()]));
        assert!(!has_all_permissions(&[], &["read:brand".into()]));
    }
}
