// ABOUTME: Database factory and provider abstraction for runtime backend selection
// ABOUTME: Detects the backend from the connection string and delegates provider calls
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

//! Database factory for creating database providers
//!
//! This module provides automatic database type detection and creation
//! based on connection strings.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use tracing::{debug, info};
use uuid::Uuid;

use super::sqlite::SqliteDatabase;
use super::DatabaseProvider;
use crate::models::{
    Brand, Page, Permission, RefreshTokenRecord, Role, RoleDetail, Status, StatusContext, User,
};

/// Supported database types
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatabaseType {
    SQLite,
}

/// Database instance wrapper that delegates to the appropriate implementation
#[derive(Clone)]
pub enum Database {
    SQLite(SqliteDatabase),
}

impl Database {
    /// Get a descriptive string for the current database backend
    #[must_use]
    pub const fn backend_info(&self) -> &'static str {
        match self {
            Self::SQLite(_) => "SQLite (Embedded)",
        }
    }

    /// Get the database type enum
    #[must_use]
    pub const fn database_type(&self) -> DatabaseType {
        match self {
            Self::SQLite(_) => DatabaseType::SQLite,
        }
    }

    /// Create a new database instance based on the connection string
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Database URL format is unsupported or invalid
    /// - Database connection fails
    /// - Database initialization or migration fails
    pub async fn new(database_url: &str) -> Result<Self> {
        debug!("Detecting database type from URL: {}", database_url);
        let db_type = detect_database_type(database_url)?;
        info!("Detected database type: {:?}", db_type);

        match db_type {
            DatabaseType::SQLite => {
                info!("Initializing SQLite database");
                let db = <SqliteDatabase as DatabaseProvider>::new(database_url).await?;
                info!("SQLite database initialized successfully");
                Ok(Self::SQLite(db))
            }
        }
    }
}

/// Automatically detect database type from connection string
///
/// # Errors
///
/// Returns an error if the URL format is not recognized (must start with
/// `sqlite:`)
pub fn detect_database_type(database_url: &str) -> Result<DatabaseType> {
    if database_url.starts_with("sqlite:") {
        Ok(DatabaseType::SQLite)
    } else {
        Err(anyhow!(
            "Unsupported database URL format: {}. Supported formats: sqlite:path/to/db.sqlite, sqlite::memory:",
            database_url
        ))
    }
}

// Implement DatabaseProvider for the enum by delegating to the appropriate implementation
#[async_trait]
impl DatabaseProvider for Database {
    async fn new(database_url: &str) -> Result<Self> {
        Self::new(database_url).await
    }

    async fn migrate(&self) -> Result<()> {
        match self {
            Self::SQLite(db) => db.migrate().await,
        }
    }

    async fn create_user(&self, user: &User) -> Result<Uuid> {
        match self {
            Self::SQLite(db) => db.create_user(user).await,
        }
    }

    async fn get_user(&self, user_id: Uuid) -> Result<Option<User>> {
        match self {
            Self::SQLite(db) => db.get_user(user_id).await,
        }
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        match self {
            Self::SQLite(db) => db.get_user_by_email(email).await,
        }
    }

    async fn get_users(&self) -> Result<Vec<User>> {
        match self {
            Self::SQLite(db) => db.get_users().await,
        }
    }

    async fn update_user(&self, user: &User) -> Result<()> {
        match self {
            Self::SQLite(db) => db.update_user(user).await,
        }
    }

    async fn delete_user(&self, user_id: Uuid) -> Result<bool> {
        match self {
            Self::SQLite(db) => db.delete_user(user_id).await,
        }
    }

    async fn get_user_count(&self) -> Result<i64> {
        match self {
            Self::SQLite(db) => db.get_user_count().await,
        }
    }

    async fn get_user_roles(&self, user_id: Uuid) -> Result<Vec<Role>> {
        match self {
            Self::SQLite(db) => db.get_user_roles(user_id).await,
        }
    }

    async fn get_user_role_details(&self, user_id: Uuid) -> Result<Vec<RoleDetail>> {
        match self {
            Self::SQLite(db) => db.get_user_role_details(user_id).await,
        }
    }

    async fn set_user_roles(&self, user_id: Uuid, role_ids: &[Uuid]) -> Result<()> {
        match self {
            Self::SQLite(db) => db.set_user_roles(user_id, role_ids).await,
        }
    }

    async fn get_default_roles(&self) -> Result<Vec<Role>> {
        match self {
            Self::SQLite(db) => db.get_default_roles().await,
        }
    }

    async fn create_role(&self, role: &Role) -> Result<Uuid> {
        match self {
            Self::SQLite(db) => db.create_role(role).await,
        }
    }

    async fn get_role(&self, role_id: Uuid) -> Result<Option<Role>> {
        match self {
            Self::SQLite(db) => db.get_role(role_id).await,
        }
    }

    async fn get_role_by_name(&self, name: &str) -> Result<Option<Role>> {
        match self {
            Self::SQLite(db) => db.get_role_by_name(name).await,
        }
    }

    async fn list_roles(&self, limit: u32, offset: u32) -> Result<Page<Role>> {
        match self {
            Self::SQLite(db) => db.list_roles(limit, offset).await,
        }
    }

    async fn update_role(&self, role: &Role) -> Result<()> {
        match self {
            Self::SQLite(db) => db.update_role(role).await,
        }
    }

    async fn delete_role(&self, role_id: Uuid) -> Result<bool> {
        match self {
            Self::SQLite(db) => db.delete_role(role_id).await,
        }
    }

    async fn get_role_count(&self) -> Result<i64> {
        match self {
            Self::SQLite(db) => db.get_role_count().await,
        }
    }

    async fn get_role_permissions(&self, role_id: Uuid) -> Result<Vec<Permission>> {
        match self {
            Self::SQLite(db) => db.get_role_permissions(role_id).await,
        }
    }

    async fn add_role_permissions(&self, role_id: Uuid, permission_ids: &[Uuid]) -> Result<()> {
        match self {
            Self::SQLite(db) => db.add_role_permissions(role_id, permission_ids).await,
        }
    }

    async fn remove_role_permissions(&self, role_id: Uuid, permission_ids: &[Uuid]) -> Result<()> {
        match self {
            Self::SQLite(db) => db.remove_role_permissions(role_id, permission_ids).await,
        }
    }

    async fn create_permission(&self, permission: &Permission) -> Result<Uuid> {
        match self {
            Self::SQLite(db) => db.create_permission(permission).await,
        }
    }

    async fn get_permission(&self, permission_id: Uuid) -> Result<Option<Permission>> {
        match self {
            Self::SQLite(db) => db.get_permission(permission_id).await,
        }
    }

    async fn get_permission_by_name(&self, name: &str) -> Result<Option<Permission>> {
        match self {
            Self::SQLite(db) => db.get_permission_by_name(name).await,
        }
    }

    async fn get_permissions_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Permission>> {
        match self {
            Self::SQLite(db) => db.get_permissions_by_ids(ids).await,
        }
    }

    async fn list_permissions(&self, limit: u32, offset: u32) -> Result<Page<Permission>> {
        match self {
            Self::SQLite(db) => db.list_permissions(limit, offset).await,
        }
    }

    async fn delete_permission(&self, permission_id: Uuid) -> Result<bool> {
        match self {
            Self::SQLite(db) => db.delete_permission(permission_id).await,
        }
    }

    async fn get_permission_count(&self) -> Result<i64> {
        match self {
            Self::SQLite(db) => db.get_permission_count().await,
        }
    }

    async fn create_refresh_token(&self, record: &RefreshTokenRecord) -> Result<Uuid> {
        match self {
            Self::SQLite(db) => db.create_refresh_token(record).await,
        }
    }

    async fn get_refresh_token(
        &self,
        user_id: Uuid,
        token: &str,
    ) -> Result<Option<RefreshTokenRecord>> {
        match self {
            Self::SQLite(db) => db.get_refresh_token(user_id, token).await,
        }
    }

    async fn revoke_refresh_token_once(&self, record_id: Uuid) -> Result<bool> {
        match self {
            Self::SQLite(db) => db.revoke_refresh_token_once(record_id).await,
        }
    }

    async fn revoke_all_user_refresh_tokens(&self, user_id: Uuid) -> Result<u64> {
        match self {
            Self::SQLite(db) => db.revoke_all_user_refresh_tokens(user_id).await,
        }
    }

    async fn create_brand(&self, brand: &Brand) -> Result<Uuid> {
        match self {
            Self::SQLite(db) => db.create_brand(brand).await,
        }
    }

    async fn get_brand(&self, brand_id: Uuid) -> Result<Option<Brand>> {
        match self {
            Self::SQLite(db) => db.get_brand(brand_id).await,
        }
    }

    async fn get_brand_by_name(&self, name: &str) -> Result<Option<Brand>> {
        match self {
            Self::SQLite(db) => db.get_brand_by_name(name).await,
        }
    }

    async fn get_brands(&self) -> Result<Vec<Brand>> {
        match self {
            Self::SQLite(db) => db.get_brands().await,
        }
    }

    async fn update_brand(&self, brand: &Brand) -> Result<()> {
        match self {
            Self::SQLite(db) => db.update_brand(brand).await,
        }
    }

    async fn delete_brand(&self, brand_id: Uuid) -> Result<bool> {
        match self {
            Self::SQLite(db) => db.delete_brand(brand_id).await,
        }
    }

    async fn set_user_brand(&self, user_id: Uuid, brand_id: Option<Uuid>) -> Result<()> {
        match self {
            Self::SQLite(db) => db.set_user_brand(user_id, brand_id).await,
        }
    }

    async fn get_users_by_brand(&self, brand_id: Uuid) -> Result<Vec<User>> {
        match self {
            Self::SQLite(db) => db.get_users_by_brand(brand_id).await,
        }
    }

    async fn create_status(&self, status: &Status) -> Result<Uuid> {
        match self {
            Self::SQLite(db) => db.create_status(status).await,
        }
    }

    async fn get_status(&self, status_id: Uuid) -> Result<Option<Status>> {
        match self {
            Self::SQLite(db) => db.get_status(status_id).await,
        }
    }

    async fn get_status_by_name(
        &self,
        name: &str,
        context: StatusContext,
    ) -> Result<Option<Status>> {
        match self {
            Self::SQLite(db) => db.get_status_by_name(name, context).await,
        }
    }

    async fn get_statuses_by_context(&self, context: StatusContext) -> Result<Vec<Status>> {
        match self {
            Self::SQLite(db) => db.get_statuses_by_context(context).await,
        }
    }

    async fn get_status_count(&self) -> Result<i64> {
        match self {
            Self::SQLite(db) => db.get_status_count().await,
        }
    }
}
