// ABOUTME: SQLite persistence layer for users, roles, permissions, brands, statuses, and tokens
// ABOUTME: Owns the schema migrations and all concrete SQL for the identity platform
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

//! # Database Management
//!
//! Concrete SQLite implementation behind the [`crate::database_plugins`]
//! abstraction. UUIDs are stored as TEXT, timestamps as RFC 3339 TEXT.
//! Foreign keys are enforced on every pooled connection.

use std::str::FromStr;

use anyhow::Result;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqliteRow};
use sqlx::{Pool, Row, Sqlite, SqlitePool};
use uuid::Uuid;

use crate::models::{
    Brand, Page, Permission, RefreshTokenRecord, Role, RoleDetail, Status, StatusContext, User,
};

/// Database manager for identity storage
#[derive(Clone)]
pub struct Database {
    pool: Pool<Sqlite>,
}

impl Database {
    /// Create a new database connection
    ///
    /// Creates the database file if missing and runs migrations.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is malformed, the connection fails, or
    /// migrations fail
    pub async fn new(database_url: &str) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(database_url)?
            .create_if_missing(true)
            // Applied per pooled connection; cascade deletes depend on it
            .foreign_keys(true);

        let pool = SqlitePool::connect_with(options).await?;

        let db = Self { pool };
        db.migrate().await?;

        Ok(db)
    }

    /// Run database migrations
    ///
    /// # Errors
    ///
    /// Returns an error if any DDL statement fails
    pub async fn migrate(&self) -> Result<()> {
        // Statuses come first: users and brands reference them
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS statuses (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                description TEXT,
                context TEXT NOT NULL CHECK (context IN ('user', 'brand')),
                UNIQUE (name, context)
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS brands (
                id TEXT PRIMARY KEY,
                name TEXT UNIQUE NOT NULL,
                billing_email TEXT,
                billing_start_date TEXT,
                ai_rules TEXT,
                status_id TEXT REFERENCES statuses (id) ON DELETE SET NULL,
                created_at TEXT NOT NULL
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS users (
                id TEXT PRIMARY KEY,
                first_name TEXT NOT NULL,
                last_name TEXT NOT NULL,
                email TEXT UNIQUE NOT NULL,
                phone TEXT NOT NULL,
                password_hash TEXT NOT NULL,
                brand_id TEXT REFERENCES brands (id) ON DELETE SET NULL,
                status_id TEXT REFERENCES statuses (id) ON DELETE SET NULL,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_users_email ON users (email)")
            .execute(&self.pool)
            .await?;

        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS roles (
                id TEXT PRIMARY KEY,
                name TEXT UNIQUE NOT NULL,
                description TEXT,
                is_default BOOLEAN NOT NULL DEFAULT 0,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS permissions (
                id TEXT PRIMARY KEY,
                name TEXT UNIQUE NOT NULL,
                description TEXT,
                resource TEXT NOT NULL,
                action TEXT NOT NULL,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS users_roles (
                user_id TEXT NOT NULL REFERENCES users (id) ON DELETE CASCADE,
                role_id TEXT NOT NULL REFERENCES roles (id) ON DELETE CASCADE,
                PRIMARY KEY (user_id, role_id)
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS roles_permissions (
                role_id TEXT NOT NULL REFERENCES roles (id) ON DELETE CASCADE,
                permission_id TEXT NOT NULL REFERENCES permissions (id) ON DELETE CASCADE,
                PRIMARY KEY (role_id, permission_id)
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS refresh_tokens (
                id TEXT PRIMARY KEY,
                token TEXT NOT NULL,
                user_id TEXT NOT NULL REFERENCES users (id) ON DELETE CASCADE,
                expires_at TEXT NOT NULL,
                is_revoked BOOLEAN NOT NULL DEFAULT 0,
                created_at TEXT NOT NULL
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_refresh_tokens_user ON refresh_tokens (user_id, token)",
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    // ================================
    // User Management
    // ================================

    /// Create a new user
    pub async fn create_user(&self, user: &User) -> Result<Uuid> {
        sqlx::query(
            r"
            INSERT INTO users (id, first_name, last_name, email, phone, password_hash,
                               brand_id, status_id, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
            ",
        )
        .bind(user.id.to_string())
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&user.email)
        .bind(&user.phone)
        .bind(&user.password_hash)
        .bind(user.brand_id.map(|id| id.to_string()))
        .bind(user.status_id.map(|id| id.to_string()))
        .bind(user.created_at.to_rfc3339())
        .bind(user.updated_at.to_rfc3339())
        .execute(&self.pool)
        .await?;

        Ok(user.id)
    }

    /// Get user by ID
    pub async fn get_user(&self, user_id: Uuid) -> Result<Option<User>> {
        let row = sqlx::query("SELECT * FROM users WHERE id = ?1")
            .bind(user_id.to_string())
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => Ok(Some(row_to_user(&row)?)),
            None => Ok(None),
        }
    }

    /// Get user by email
    pub async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let row = sqlx::query("SELECT * FROM users WHERE email = ?1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => Ok(Some(row_to_user(&row)?)),
            None => Ok(None),
        }
    }

    /// Get all users ordered by creation time
    pub async fn get_users(&self) -> Result<Vec<User>> {
        let rows = sqlx::query("SELECT * FROM users ORDER BY created_at")
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(row_to_user).collect()
    }

    /// Update a user's profile fields and associations
    pub async fn update_user(&self, user: &User) -> Result<()> {
        sqlx::query(
            r"
            UPDATE users
            SET first_name = ?1, last_name = ?2, email = ?3, phone = ?4,
                password_hash = ?5, brand_id = ?6, status_id = ?7, updated_at = ?8
            WHERE id = ?9
            ",
        )
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&user.email)
        .bind(&user.phone)
        .bind(&user.password_hash)
        .bind(user.brand_id.map(|id| id.to_string()))
        .bind(user.status_id.map(|id| id.to_string()))
        .bind(Utc::now().to_rfc3339())
        .bind(user.id.to_string())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Delete a user; refresh tokens and role links cascade
    pub async fn delete_user(&self, user_id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM users WHERE id = ?1")
            .bind(user_id.to_string())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Get total number of users
    pub async fn get_user_count(&self) -> Result<i64> {
        let row = sqlx::query("SELECT COUNT(*) as count FROM users")
            .fetch_one(&self.pool)
            .await?;

        let count: i64 = row.try_get("count")?;
        Ok(count)
    }

    // ================================
    // User ↔ Role Links
    // ================================

    /// Get the roles assigned to a user
    pub async fn get_user_roles(&self, user_id: Uuid) -> Result<Vec<Role>> {
        let rows = sqlx::query(
            r"
            SELECT r.* FROM roles r
            JOIN users_roles ur ON ur.role_id = r.id
            WHERE ur.user_id = ?1
            ORDER BY r.name
            ",
        )
        .bind(user_id.to_string())
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(row_to_role).collect()
    }

    /// Get the roles assigned to a user with their permission sets resolved
    pub async fn get_user_role_details(&self, user_id: Uuid) -> Result<Vec<RoleDetail>> {
        let roles = self.get_user_roles(user_id).await?;

        let mut details = Vec::with_capacity(roles.len());
        for role in roles {
            let permissions = self.get_role_permissions(role.id).await?;
            details.push(RoleDetail { role, permissions });
        }
        Ok(details)
    }

    /// Replace a user's role set in one transaction
    ///
    /// Duplicate IDs in the input are collapsed by the join-table primary key
    /// guard below.
    pub async fn set_user_roles(&self, user_id: Uuid, role_ids: &[Uuid]) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM users_roles WHERE user_id = ?1")
            .bind(user_id.to_string())
            .execute(&mut *tx)
            .await?;

        for role_id in role_ids {
            sqlx::query(
                "INSERT OR IGNORE INTO users_roles (user_id, role_id) VALUES (?1, ?2)",
            )
            .bind(user_id.to_string())
            .bind(role_id.to_string())
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    /// Get all roles flagged as default grants for new users
    pub async fn get_default_roles(&self) -> Result<Vec<Role>> {
        let rows = sqlx::query("SELECT * FROM roles WHERE is_default = 1 ORDER BY name")
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(row_to_role).collect()
    }

    // ================================
    // Role Management
    // ================================

    /// Create a new role
    pub async fn create_role(&self, role: &Role) -> Result<Uuid> {
        sqlx::query(
            r"
            INSERT INTO roles (id, name, description, is_default, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            ",
        )
        .bind(role.id.to_string())
        .bind(&role.name)
        .bind(&role.description)
        .bind(role.is_default)
        .bind(role.created_at.to_rfc3339())
        .bind(role.updated_at.to_rfc3339())
        .execute(&self.pool)
        .await?;

        Ok(role.id)
    }

    /// Get role by ID
    pub async fn get_role(&self, role_id: Uuid) -> Result<Option<Role>> {
        let row = sqlx::query("SELECT * FROM roles WHERE id = ?1")
            .bind(role_id.to_string())
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => Ok(Some(row_to_role(&row)?)),
            None => Ok(None),
        }
    }

    /// Get role by name
    pub async fn get_role_by_name(&self, name: &str) -> Result<Option<Role>> {
        let row = sqlx::query("SELECT * FROM roles WHERE name = ?1")
            .bind(name)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => Ok(Some(row_to_role(&row)?)),
            None => Ok(None),
        }
    }

    /// List roles as a page with the total count
    pub async fn list_roles(&self, limit: u32, offset: u32) -> Result<Page<Role>> {
        let total: i64 = sqlx::query("SELECT COUNT(*) as count FROM roles")
            .fetch_one(&self.pool)
            .await?
            .try_get("count")?;

        let rows = sqlx::query("SELECT * FROM roles ORDER BY name LIMIT ?1 OFFSET ?2")
            .bind(i64::from(limit))
            .bind(i64::from(offset))
            .fetch_all(&self.pool)
            .await?;

        let items = rows.iter().map(row_to_role).collect::<Result<Vec<_>>>()?;
        Ok(Page { items, total })
    }

    /// Update a role's name, description, and default flag
    pub async fn update_role(&self, role: &Role) -> Result<()> {
        sqlx::query(
            r"
            UPDATE roles
            SET name = ?1, description = ?2, is_default = ?3, updated_at = ?4
            WHERE id = ?5
            ",
        )
        .bind(&role.name)
        .bind(&role.description)
        .bind(role.is_default)
        .bind(Utc::now().to_rfc3339())
        .bind(role.id.to_string())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Delete a role; user and permission links cascade
    pub async fn delete_role(&self, role_id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM roles WHERE id = ?1")
            .bind(role_id.to_string())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Get total number of roles
    pub async fn get_role_count(&self) -> Result<i64> {
        let row = sqlx::query("SELECT COUNT(*) as count FROM roles")
            .fetch_one(&self.pool)
            .await?;

        let count: i64 = row.try_get("count")?;
        Ok(count)
    }

    // ================================
    // Role ↔ Permission Links
    // ================================

    /// Get the permissions attached to a role
    pub async fn get_role_permissions(&self, role_id: Uuid) -> Result<Vec<Permission>> {
        let rows = sqlx::query(
            r"
            SELECT p.* FROM permissions p
            JOIN roles_permissions rp ON rp.permission_id = p.id
            WHERE rp.role_id = ?1
            ORDER BY p.name
            ",
        )
        .bind(role_id.to_string())
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(row_to_permission).collect()
    }

    /// Attach permissions to a role; already-attached pairs are skipped
    pub async fn add_role_permissions(&self, role_id: Uuid, permission_ids: &[Uuid]) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        for permission_id in permission_ids {
            sqlx::query(
                "INSERT OR IGNORE INTO roles_permissions (role_id, permission_id) VALUES (?1, ?2)",
            )
            .bind(role_id.to_string())
            .bind(permission_id.to_string())
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    /// Detach permissions from a role
    pub async fn remove_role_permissions(
        &self,
        role_id: Uuid,
        permission_ids: &[Uuid],
    ) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        for permission_id in permission_ids {
            sqlx::query(
                "DELETE FROM roles_permissions WHERE role_id = ?1 AND permission_id = ?2",
            )
            .bind(role_id.to_string())
            .bind(permission_id.to_string())
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    // ================================
    // Permission Management
    // ================================

    /// Create a new permission
    pub async fn create_permission(&self, permission: &Permission) -> Result<Uuid> {
        sqlx::query(
            r"
            INSERT INTO permissions (id, name, description, resource, action, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            ",
        )
        .bind(permission.id.to_string())
        .bind(&permission.name)
        .bind(&permission.description)
        .bind(&permission.resource)
        .bind(&permission.action)
        .bind(permission.created_at.to_rfc3339())
        .bind(permission.updated_at.to_rfc3339())
        .execute(&self.pool)
        .await?;

        Ok(permission.id)
    }

    /// Get permission by ID
    pub async fn get_permission(&self, permission_id: Uuid) -> Result<Option<Permission>> {
        let row = sqlx::query("SELECT * FROM permissions WHERE id = ?1")
            .bind(permission_id.to_string())
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => Ok(Some(row_to_permission(&row)?)),
            None => Ok(None),
        }
    }

    /// Get permission by name
    pub async fn get_permission_by_name(&self, name: &str) -> Result<Option<Permission>> {
        let row = sqlx::query("SELECT * FROM permissions WHERE name = ?1")
            .bind(name)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => Ok(Some(row_to_permission(&row)?)),
            None => Ok(None),
        }
    }

    /// Get the permissions matching the given IDs; unknown IDs are skipped
    pub async fn get_permissions_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Permission>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let placeholders = (1..=ids.len())
            .map(|i| format!("?{i}"))
            .collect::<Vec<_>>()
            .join(", ");
        let sql = format!("SELECT * FROM permissions WHERE id IN ({placeholders}) ORDER BY name");

        let mut query = sqlx::query(&sql);
        for id in ids {
            query = query.bind(id.to_string());
        }

        let rows = query.fetch_all(&self.pool).await?;
        rows.iter().map(row_to_permission).collect()
    }

    /// List permissions as a page with the total count
    pub async fn list_permissions(&self, limit: u32, offset: u32) -> Result<Page<Permission>> {
        let total: i64 = sqlx::query("SELECT COUNT(*) as count FROM permissions")
            .fetch_one(&self.pool)
            .await?
            .try_get("count")?;

        let rows = sqlx::query("SELECT * FROM permissions ORDER BY name LIMIT ?1 OFFSET ?2")
            .bind(i64::from(limit))
            .bind(i64::from(offset))
            .fetch_all(&self.pool)
            .await?;

        let items = rows
            .iter()
            .map(row_to_permission)
            .collect::<Result<Vec<_>>>()?;
        Ok(Page { items, total })
    }

    /// Delete a permission; role links cascade
    pub async fn delete_permission(&self, permission_id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM permissions WHERE id = ?1")
            .bind(permission_id.to_string())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Get total number of permissions
    pub async fn get_permission_count(&self) -> Result<i64> {
        let row = sqlx::query("SELECT COUNT(*) as count FROM permissions")
            .fetch_one(&self.pool)
            .await?;

        let count: i64 = row.try_get("count")?;
        Ok(count)
    }

    // ================================
    // Refresh Token Ledger
    // ================================

    /// Store a freshly issued refresh token
    pub async fn create_refresh_token(&self, record: &RefreshTokenRecord) -> Result<Uuid> {
        sqlx::query(
            r"
            INSERT INTO refresh_tokens (id, token, user_id, expires_at, is_revoked, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            ",
        )
        .bind(record.id.to_string())
        .bind(&record.token)
        .bind(record.user_id.to_string())
        .bind(record.expires_at.to_rfc3339())
        .bind(record.is_revoked)
        .bind(record.created_at.to_rfc3339())
        .execute(&self.pool)
        .await?;

        Ok(record.id)
    }

    /// Look up a refresh-token record by owner and token string
    pub async fn get_refresh_token(
        &self,
        user_id: Uuid,
        token: &str,
    ) -> Result<Option<RefreshTokenRecord>> {
        let row = sqlx::query("SELECT * FROM refresh_tokens WHERE user_id = ?1 AND token = ?2")
            .bind(user_id.to_string())
            .bind(token)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => Ok(Some(row_to_refresh_token(&row)?)),
            None => Ok(None),
        }
    }

    /// Atomically revoke a refresh token, returning whether this call won
    ///
    /// The `is_revoked = 0` guard makes concurrent rotation attempts race on
    /// the row update: exactly one caller sees `rows_affected == 1`.
    pub async fn revoke_refresh_token_once(&self, record_id: Uuid) -> Result<bool> {
        let result =
            sqlx::query("UPDATE refresh_tokens SET is_revoked = 1 WHERE id = ?1 AND is_revoked = 0")
                .bind(record_id.to_string())
                .execute(&self.pool)
                .await?;

        Ok(result.rows_affected() == 1)
    }

    /// Revoke every active refresh token for a user, returning how many
    pub async fn revoke_all_user_refresh_tokens(&self, user_id: Uuid) -> Result<u64> {
        let result = sqlx::query(
            "UPDATE refresh_tokens SET is_revoked = 1 WHERE user_id = ?1 AND is_revoked = 0",
        )
        .bind(user_id.to_string())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    // ================================
    // Brand Management
    // ================================

    /// Create a new brand
    pub async fn create_brand(&self, brand: &Brand) -> Result<Uuid> {
        sqlx::query(
            r"
            INSERT INTO brands (id, name, billing_email, billing_start_date, ai_rules,
                                status_id, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            ",
        )
        .bind(brand.id.to_string())
        .bind(&brand.name)
        .bind(&brand.billing_email)
        .bind(brand.billing_start_date.map(|d| d.to_string()))
        .bind(&brand.ai_rules)
        .bind(brand.status_id.map(|id| id.to_string()))
        .bind(brand.created_at.to_rfc3339())
        .execute(&self.pool)
        .await?;

        Ok(brand.id)
    }

    /// Get brand by ID
    pub async fn get_brand(&self, brand_id: Uuid) -> Result<Option<Brand>> {
        let row = sqlx::query("SELECT * FROM brands WHERE id = ?1")
            .bind(brand_id.to_string())
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => Ok(Some(row_to_brand(&row)?)),
            None => Ok(None),
        }
    }

    /// Get brand by name
    pub async fn get_brand_by_name(&self, name: &str) -> Result<Option<Brand>> {
        let row = sqlx::query("SELECT * FROM brands WHERE name = ?1")
            .bind(name)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => Ok(Some(row_to_brand(&row)?)),
            None => Ok(None),
        }
    }

    /// Get all brands ordered by name
    pub async fn get_brands(&self) -> Result<Vec<Brand>> {
        let rows = sqlx::query("SELECT * FROM brands ORDER BY name")
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(row_to_brand).collect()
    }

    /// Update a brand's attributes
    pub async fn update_brand(&self, brand: &Brand) -> Result<()> {
        sqlx::query(
            r"
            UPDATE brands
            SET name = ?1, billing_email = ?2, billing_start_date = ?3,
                ai_rules = ?4, status_id = ?5
            WHERE id = ?6
            ",
        )
        .bind(&brand.name)
        .bind(&brand.billing_email)
        .bind(brand.billing_start_date.map(|d| d.to_string()))
        .bind(&brand.ai_rules)
        .bind(brand.status_id.map(|id| id.to_string()))
        .bind(brand.id.to_string())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Delete a brand; member users keep their accounts with the link cleared
    pub async fn delete_brand(&self, brand_id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM brands WHERE id = ?1")
            .bind(brand_id.to_string())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Set or clear a user's brand affiliation
    pub async fn set_user_brand(&self, user_id: Uuid, brand_id: Option<Uuid>) -> Result<()> {
        sqlx::query("UPDATE users SET brand_id = ?1, updated_at = ?2 WHERE id = ?3")
            .bind(brand_id.map(|id| id.to_string()))
            .bind(Utc::now().to_rfc3339())
            .bind(user_id.to_string())
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Get all users affiliated with a brand
    pub async fn get_users_by_brand(&self, brand_id: Uuid) -> Result<Vec<User>> {
        let rows = sqlx::query("SELECT * FROM users WHERE brand_id = ?1 ORDER BY created_at")
            .bind(brand_id.to_string())
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(row_to_user).collect()
    }

    // ================================
    // Status Taxonomy
    // ================================

    /// Create a new status
    pub async fn create_status(&self, status: &Status) -> Result<Uuid> {
        sqlx::query(
            r"
            INSERT INTO statuses (id, name, description, context)
            VALUES (?1, ?2, ?3, ?4)
            ",
        )
        .bind(status.id.to_string())
        .bind(&status.name)
        .bind(&status.description)
        .bind(status.context.to_string())
        .execute(&self.pool)
        .await?;

        Ok(status.id)
    }

    /// Get status by ID
    pub async fn get_status(&self, status_id: Uuid) -> Result<Option<Status>> {
        let row = sqlx::query("SELECT * FROM statuses WHERE id = ?1")
            .bind(status_id.to_string())
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => Ok(Some(row_to_status(&row)?)),
            None => Ok(None),
        }
    }

    /// Get a status by name within a context
    pub async fn get_status_by_name(
        &self,
        name: &str,
        context: StatusContext,
    ) -> Result<Option<Status>> {
        let row = sqlx::query("SELECT * FROM statuses WHERE name = ?1 AND context = ?2")
            .bind(name)
            .bind(context.to_string())
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => Ok(Some(row_to_status(&row)?)),
            None => Ok(None),
        }
    }

    /// List every status usable in the given context
    pub async fn get_statuses_by_context(&self, context: StatusContext) -> Result<Vec<Status>> {
        let rows = sqlx::query("SELECT * FROM statuses WHERE context = ?1 ORDER BY name")
            .bind(context.to_string())
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(row_to_status).collect()
    }

    /// Get total number of statuses
    pub async fn get_status_count(&self) -> Result<i64> {
        let row = sqlx::query("SELECT COUNT(*) as count FROM statuses")
            .fetch_one(&self.pool)
            .await?;

        let count: i64 = row.try_get("count")?;
        Ok(count)
    }
}

// ================================
// Row Mapping
// ================================

fn parse_uuid(value: &str) -> Result<Uuid> {
    Ok(Uuid::parse_str(value)?)
}

fn parse_timestamp(value: &str) -> Result<DateTime<Utc>> {
    Ok(DateTime::parse_from_rfc3339(value)?.with_timezone(&Utc))
}

fn parse_optional_uuid(value: Option<String>) -> Result<Option<Uuid>> {
    value.as_deref().map(parse_uuid).transpose()
}

/// Convert database row to User model
fn row_to_user(row: &SqliteRow) -> Result<User> {
    let id_str: String = row.try_get("id")?;
    let brand_id: Option<String> = row.try_get("brand_id")?;
    let status_id: Option<String> = row.try_get("status_id")?;
    let created_at_str: String = row.try_get("created_at")?;
    let updated_at_str: String = row.try_get("updated_at")?;

    Ok(User {
        id: parse_uuid(&id_str)?,
        first_name: row.try_get("first_name")?,
        last_name: row.try_get("last_name")?,
        email: row.try_get("email")?,
        phone: row.try_get("phone")?,
        password_hash: row.try_get("password_hash")?,
        brand_id: parse_optional_uuid(brand_id)?,
        status_id: parse_optional_uuid(status_id)?,
        created_at: parse_timestamp(&created_at_str)?,
        updated_at: parse_timestamp(&updated_at_str)?,
    })
}

/// Convert database row to Role model
fn row_to_role(row: &SqliteRow) -> Result<Role> {
    let id_str: String = row.try_get("id")?;
    let created_at_str: String = row.try_get("created_at")?;
    let updated_at_str: String = row.try_get("updated_at")?;

    Ok(Role {
        id: parse_uuid(&id_str)?,
        name: row.try_get("name")?,
        description: row.try_get("description")?,
        is_default: row.try_get("is_default")?,
        created_at: parse_timestamp(&created_at_str)?,
        updated_at: parse_timestamp(&updated_at_str)?,
    })
}

/// Convert database row to Permission model
fn row_to_permission(row: &SqliteRow) -> Result<Permission> {
    let id_str: String = row.try_get("id")?;
    let created_at_str: String = row.try_get("created_at")?;
    let updated_at_str: String = row.try_get("updated_at")?;

    Ok(Permission {
        id: parse_uuid(&id_str)?,
        name: row.try_get("name")?,
        description: row.try_get("description")?,
        resource: row.try_get("resource")?,
        action: row.try_get("action")?,
        created_at: parse_timestamp(&created_at_str)?,
        updated_at: parse_timestamp(&updated_at_str)?,
    })
}

/// Convert database row to refresh-token record
fn row_to_refresh_token(row: &SqliteRow) -> Result<RefreshTokenRecord> {
    let id_str: String = row.try_get("id")?;
    let user_id_str: String = row.try_get("user_id")?;
    let expires_at_str: String = row.try_get("expires_at")?;
    let created_at_str: String = row.try_get("created_at")?;

    Ok(RefreshTokenRecord {
        id: parse_uuid(&id_str)?,
        token: row.try_get("token")?,
        user_id: parse_uuid(&user_id_str)?,
        expires_at: parse_timestamp(&expires_at_str)?,
        is_revoked: row.try_get("is_revoked")?,
        created_at: parse_timestamp(&created_at_str)?,
    })
}

/// Convert database row to Brand model
fn row_to_brand(row: &SqliteRow) -> Result<Brand> {
    let id_str: String = row.try_get("id")?;
    let billing_start_date: Option<String> = row.try_get("billing_start_date")?;
    let status_id: Option<String> = row.try_get("status_id")?;
    let created_at_str: String = row.try_get("created_at")?;

    Ok(Brand {
        id: parse_uuid(&id_str)?,
        name: row.try_get("name")?,
        billing_email: row.try_get("billing_email")?,
        billing_start_date: billing_start_date
            .as_deref()
            .map(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d"))
            .transpose()?,
        ai_rules: row.try_get("ai_rules")?,
        status_id: parse_optional_uuid(status_id)?,
        created_at: parse_timestamp(&created_at_str)?,
    })
}

/// Convert database row to Status model
fn row_to_status(row: &SqliteRow) -> Result<Status> {
    let id_str: String = row.try_get("id")?;
    let context_str: String = row.try_get("context")?;

    Ok(Status {
        id: parse_uuid(&id_str)?,
        name: row.try_get("name")?,
        description: row.try_get("description")?,
        context: StatusContext::from_str(&context_str).map_err(|e| anyhow::anyhow!(e))?,
    })
}
