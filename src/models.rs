// ABOUTME: Core data models for the Banquise identity platform
// ABOUTME: Defines User, Role, Permission, Brand, Status and refresh-token structures
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

//! # Data Models
//!
//! Domain entities for identity and access control. Many-to-many relations
//! (user→role, role→permission) are resolved through explicit join-table
//! lookups in the persistence layer rather than live object graphs, so none of
//! these structs own references to each other.
//!
//! ## Design Principles
//!
//! - **Serializable**: all models support JSON serialization for boundary layers
//! - **No password leakage**: [`UserProfile`] is the only user shape that
//!   crosses the service boundary, and it carries no password hash

use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ================================================================================================
// User
// ================================================================================================

/// Represents a user in the multi-tenant identity system
///
/// The password hash never leaves the persistence/credential boundary; use
/// [`User::into_profile`] before returning user data to callers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Unique user identifier
    pub id: Uuid,
    /// First name
    pub first_name: String,
    /// Last name
    pub last_name: String,
    /// Email address, unique system-wide
    pub email: String,
    /// Phone number
    pub phone: String,
    /// Hashed password for authentication
    pub password_hash: String,
    /// Brand this user is affiliated with, if any
    pub brand_id: Option<Uuid>,
    /// Current status of the user, if any
    pub status_id: Option<Uuid>,
    /// When the user account was created
    pub created_at: DateTime<Utc>,
    /// When the user account was last updated
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create a new user with a fresh identifier and timestamps
    #[must_use]
    pub fn new(
        first_name: String,
        last_name: String,
        email: String,
        phone: String,
        password_hash: String,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            first_name,
            last_name,
            email,
            phone,
            password_hash,
            brand_id: None,
            status_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Strip the password hash and attach the resolved role set
    #[must_use]
    pub fn into_profile(self, roles: Vec<Role>) -> UserProfile {
        UserProfile {
            id: self.id,
            first_name: self.first_name,
            last_name: self.last_name,
            email: self.email,
            phone: self.phone,
            brand_id: self.brand_id,
            status_id: self.status_id,
            roles,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// User shape exposed outside the identity boundary (no password hash)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub brand_id: Option<Uuid>,
    pub status_id: Option<Uuid>,
    /// Roles resolved at the time the profile was built
    pub roles: Vec<Role>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Minimal user projection returned by login
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserInfo {
    pub id: Uuid,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
}

// ================================================================================================
// Role & Permission
// ================================================================================================

/// A named role owning a set of permissions
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Role {
    /// Unique role identifier
    pub id: Uuid,
    /// Role name, unique system-wide (e.g. "super_administrator")
    pub name: String,
    /// Optional description
    pub description: Option<String>,
    /// Whether this role is granted automatically to every new user.
    /// Several roles may carry the flag at once; new users receive the union.
    pub is_default: bool,
    /// When the role was created
    pub created_at: DateTime<Utc>,
    /// When the role was last updated
    pub updated_at: DateTime<Utc>,
}

impl Role {
    /// Create a new role with a fresh identifier and timestamps
    #[must_use]
    pub fn new(name: String, description: Option<String>, is_default: bool) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name,
            description,
            is_default,
            created_at: now,
            updated_at: now,
        }
    }
}

/// A role together with its resolved permission set
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoleDetail {
    #[serde(flatten)]
    pub role: Role,
    pub permissions: Vec<Permission>,
}

/// A named permission tagged with the resource and action it governs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Permission {
    /// Unique permission identifier
    pub id: Uuid,
    /// Permission name, unique system-wide, conventionally `action:resource`
    pub name: String,
    /// Optional description
    pub description: Option<String>,
    /// Resource this permission applies to (e.g. "brand", "document")
    pub resource: String,
    /// Action allowed on the resource (e.g. "create", "update", "delete")
    pub action: String,
    /// When the permission was created
    pub created_at: DateTime<Utc>,
    /// When the permission was last updated
    pub updated_at: DateTime<Utc>,
}

impl Permission {
    /// Create a new permission with a fresh identifier and timestamps
    #[must_use]
    pub fn new(name: String, description: Option<String>, resource: String, action: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name,
            description,
            resource,
            action,
            created_at: now,
            updated_at: now,
        }
    }
}

// ================================================================================================
// Refresh Tokens
// ================================================================================================

/// Persisted refresh-token record
///
/// State machine per record: `Active` → `Revoked` (terminal, explicit) or
/// `Active` → `Expired` (terminal, checked lazily on use). Once `is_revoked`
/// is set it never reverts. Records are looked up by `(user_id, token)`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshTokenRecord {
    /// Unique record identifier
    pub id: Uuid,
    /// The opaque signed token string
    pub token: String,
    /// Owning user; records are cascade-deleted with the user
    pub user_id: Uuid,
    /// When the token stops being exchangeable
    pub expires_at: DateTime<Utc>,
    /// Whether the token has been revoked (rotation or logout)
    pub is_revoked: bool,
    /// When the record was created
    pub created_at: DateTime<Utc>,
}

impl RefreshTokenRecord {
    /// Create a new active record for a freshly issued token
    #[must_use]
    pub fn new(user_id: Uuid, token: String, expires_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            token,
            user_id,
            expires_at,
            is_revoked: false,
            created_at: Utc::now(),
        }
    }

    /// Whether the record is past its expiry at the given instant
    #[must_use]
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }
}

/// Access + refresh token pair returned by auth flows
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

// ================================================================================================
// Brand (Enseigne) & Status (Statut)
// ================================================================================================

/// A brand (franchise operator) users may be affiliated with
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Brand {
    /// Unique brand identifier
    pub id: Uuid,
    /// Brand name, unique system-wide
    pub name: String,
    /// Billing contact email
    pub billing_email: Option<String>,
    /// First day of billing
    pub billing_start_date: Option<NaiveDate>,
    /// Free-form AI rule configuration for this brand
    pub ai_rules: Option<String>,
    /// Current status of the brand, if any
    pub status_id: Option<Uuid>,
    /// When the brand was created
    pub created_at: DateTime<Utc>,
}

impl Brand {
    /// Create a new brand with a fresh identifier
    #[must_use]
    pub fn new(name: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            billing_email: None,
            billing_start_date: None,
            ai_rules: None,
            status_id: None,
            created_at: Utc::now(),
        }
    }
}

/// Which entity type a status row may be attached to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusContext {
    /// Status usable by users only
    User,
    /// Status usable by brands only
    Brand,
}

impl Display for StatusContext {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::User => write!(f, "user"),
            Self::Brand => write!(f, "brand"),
        }
    }
}

impl FromStr for StatusContext {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Self::User),
            "brand" => Ok(Self::Brand),
            other => Err(format!("unknown status context: {other}")),
        }
    }
}

/// A status row in the shared user/brand status taxonomy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Status {
    /// Unique status identifier
    pub id: Uuid,
    /// Status name (e.g. "Active", "Suspended")
    pub name: String,
    /// Optional description
    pub description: Option<String>,
    /// Which entity type may use this status
    pub context: StatusContext,
}

impl Status {
    /// Create a new status with a fresh identifier
    #[must_use]
    pub fn new(name: String, description: Option<String>, context: StatusContext) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            description,
            context,
        }
    }
}

/// A paged catalog listing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_strips_password_hash() {
        let user = User::new(
            "Alice".into(),
            "Martin".into(),
            "alice@example.com".into(),
            "+33102030405".into(),
            "$2b$12$abcdefghijklmnopqrstuv".into(),
        );
        let profile = user.clone().into_profile(vec![]);

        let json = serde_json::to_string(&profile).unwrap();
        assert!(!json.contains("password"));
        assert!(!json.contains("$2b$12$"));
        assert_eq!(profile.id, user.id);
    }

    #[test]
    fn test_refresh_record_expiry_check() {
        let now = Utc::now();
        let record = RefreshTokenRecord::new(Uuid::new_v4(), "tok".into(), now + chrono::Duration::days(7));

        assert!(!record.is_expired_at(now));
        assert!(record.is_expired_at(now + chrono::Duration::days(8)));
        assert!(!record.is_revoked);
    }

    #[test]
    fn test_status_context_round_trip() {
        assert_eq!("user".parse::<StatusContext>().unwrap(), StatusContext::User);
        assert_eq!("brand".parse::<StatusContext>().unwrap(), StatusContext::Brand);
        assert!("tenant".parse::<StatusContext>().is_err());
        assert_eq!(StatusContext::Brand.to_string(), "brand");
    }
}
