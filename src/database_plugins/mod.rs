// ABOUTME: Database abstraction layer for the Banquise identity platform
// ABOUTME: Plugin architecture exposing a provider trait with a SQLite backend
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

use anyhow::Result;
use async_trait::async_trait;
use uuid::Uuid;

use crate::models::{
    Brand, Page, Permission, RefreshTokenRecord, Role, RoleDetail, Status, StatusContext, User,
};

pub mod factory;
pub mod sqlite;

/// Core database abstraction trait
///
/// All database implementations must implement this trait to provide
/// a consistent interface for the service layer.
#[async_trait]
pub trait DatabaseProvider: Send + Sync + Clone {
    /// Create a new database connection
    async fn new(database_url: &str) -> Result<Self>
    where
        Self: Sized;

    /// Run database migrations to set up schema
    async fn migrate(&self) -> Result<()>;

    // ================================
    // User Management
    // ================================

    /// Create a new user account
    async fn create_user(&self, user: &User) -> Result<Uuid>;

    /// Get user by ID
    async fn get_user(&self, user_id: Uuid) -> Result<Option<User>>;

    /// Get user by email address
    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>>;

    /// Get all users
    async fn get_users(&self) -> Result<Vec<User>>;

    /// Update a user's profile fields and associations
    async fn update_user(&self, user: &User) -> Result<()>;

    /// Delete a user, returning whether a row was removed
    async fn delete_user(&self, user_id: Uuid) -> Result<bool>;

    /// Get total number of users
    async fn get_user_count(&self) -> Result<i64>;

    // ================================
    // User ↔ Role Links
    // ================================

    /// Get the roles assigned to a user
    async fn get_user_roles(&self, user_id: Uuid) -> Result<Vec<Role>>;

    /// Get the roles assigned to a user with permission sets resolved
    async fn get_user_role_details(&self, user_id: Uuid) -> Result<Vec<RoleDetail>>;

    /// Replace a user's role set atomically
    async fn set_user_roles(&self, user_id: Uuid, role_ids: &[Uuid]) -> Result<()>;

    /// Get all roles granted by default to new users
    async fn get_default_roles(&self) -> Result<Vec<Role>>;

    // ================================
    // Role Management
    // ================================

    /// Create a new role
    async fn create_role(&self, role: &Role) -> Result<Uuid>;

    /// Get role by ID
    async fn get_role(&self, role_id: Uuid) -> Result<Option<Role>>;

    /// Get role by name
    async fn get_role_by_name(&self, name: &str) -> Result<Option<Role>>;

    /// List roles with pagination
    async fn list_roles(&self, limit: u32, offset: u32) -> Result<Page<Role>>;

    /// Update a role
    async fn update_role(&self, role: &Role) -> Result<()>;

    /// Delete a role, returning whether a row was removed
    async fn delete_role(&self, role_id: Uuid) -> Result<bool>;

    /// Get total number of roles
    async fn get_role_count(&self) -> Result<i64>;

    /// Get the permissions attached to a role
    async fn get_role_permissions(&self, role_id: Uuid) -> Result<Vec<Permission>>;

    /// Attach permissions to a role
    async fn add_role_permissions(&self, role_id: Uuid, permission_ids: &[Uuid]) -> Result<()>;

    /// Detach permissions from a role
    async fn remove_role_permissions(&self, role_id: Uuid, permission_ids: &[Uuid]) -> Result<()>;

    // ================================
    // Permission Management
    // ================================

    /// Create a new permission
    async fn create_permission(&self, permission: &Permission) -> Result<Uuid>;

    /// Get permission by ID
    async fn get_permission(&self, permission_id: Uuid) -> Result<Option<Permission>>;

    /// Get permission by name
    async fn get_permission_by_name(&self, name: &str) -> Result<Option<Permission>>;

    /// Get the permissions matching the given IDs
    async fn get_permissions_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Permission>>;

    /// List permissions with pagination
    async fn list_permissions(&self, limit: u32, offset: u32) -> Result<Page<Permission>>;

    /// Delete a permission, returning whether a row was removed
    async fn delete_permission(&self, permission_id: Uuid) -> Result<bool>;

    /// Get total number of permissions
    async fn get_permission_count(&self) -> Result<i64>;

    // ================================
    // Refresh Token Ledger
    // ================================

    /// Store a freshly issued refresh token
    async fn create_refresh_token(&self, record: &RefreshTokenRecord) -> Result<Uuid>;

    /// Look up a refresh-token record by owner and token string
    async fn get_refresh_token(
        &self,
        user_id: Uuid,
        token: &str,
    ) -> Result<Option<RefreshTokenRecord>>;

    /// Atomically revoke a refresh token, returning whether this call won
    async fn revoke_refresh_token_once(&self, record_id: Uuid) -> Result<bool>;

    /// Revoke every active refresh token for a user, returning how many
    async fn revoke_all_user_refresh_tokens(&self, user_id: Uuid) -> Result<u64>;

    // ================================
    // Brand Management
    // ================================

    /// Create a new brand
    async fn create_brand(&self, brand: &Brand) -> Result<Uuid>;

    /// Get brand by ID
    async fn get_brand(&self, brand_id: Uuid) -> Result<Option<Brand>>;

    /// Get brand by name
    async fn get_brand_by_name(&self, name: &str) -> Result<Option<Brand>>;

    /// Get all brands
    async fn get_brands(&self) -> Result<Vec<Brand>>;

    /// Update a brand
    async fn update_brand(&self, brand: &Brand) -> Result<()>;

    /// Delete a brand, returning whether a row was removed
    async fn delete_brand(&self, brand_id: Uuid) -> Result<bool>;

    /// Set or clear a user's brand affiliation
    async fn set_user_brand(&self, user_id: Uuid, brand_id: Option<Uuid>) -> Result<()>;

    /// Get all users affiliated with a brand
    async fn get_users_by_brand(&self, brand_id: Uuid) -> Result<Vec<User>>;

    // ================================
    // Status Taxonomy
    // ================================

    /// Create a new status
    async fn create_status(&self, status: &Status) -> Result<Uuid>;

    /// Get status by ID
    async fn get_status(&self, status_id: Uuid) -> Result<Option<Status>>;

    /// Get a status by name within a context
    async fn get_status_by_name(
        &self,
        name: &str,
        context: StatusContext,
    ) -> Result<Option<Status>>;

    /// List every status usable in the given context
    async fn get_statuses_by_context(&self, context: StatusContext) -> Result<Vec<Status>>;

    /// Get total number of statuses
    async fn get_status_count(&self) -> Result<i64>;
}
