// ABOUTME: SQLite backend for the database provider abstraction
// ABOUTME: Wraps the concrete SQLite database to implement the DatabaseProvider trait
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

//! SQLite database implementation
//!
//! This module wraps the concrete SQLite database functionality
//! to implement the `DatabaseProvider` trait.

use anyhow::Result;
use async_trait::async_trait;
use uuid::Uuid;

use super::DatabaseProvider;
use crate::models::{
    Brand, Page, Permission, RefreshTokenRecord, Role, RoleDetail, Status, StatusContext, User,
};

/// SQLite database implementation
#[derive(Clone)]
pub struct SqliteDatabase {
    /// The underlying database instance
    inner: crate::database::Database,
}

#[async_trait]
impl DatabaseProvider for SqliteDatabase {
    async fn new(database_url: &str) -> Result<Self> {
        let inner = crate::database::Database::new(database_url).await?;
        Ok(Self { inner })
    }

    async fn migrate(&self) -> Result<()> {
        self.inner.migrate().await
    }

    async fn create_user(&self, user: &User) -> Result<Uuid> {
        self.inner.create_user(user).await
    }

    async fn get_user(&self, user_id: Uuid) -> Result<Option<User>> {
        self.inner.get_user(user_id).await
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        self.inner.get_user_by_email(email).await
    }

    async fn get_users(&self) -> Result<Vec<User>> {
        self.inner.get_users().await
    }

    async fn update_user(&self, user: &User) -> Result<()> {
        self.inner.update_user(user).await
    }

    async fn delete_user(&self, user_id: Uuid) -> Result<bool> {
        self.inner.delete_user(user_id).await
    }

    async fn get_user_count(&self) -> Result<i64> {
        self.inner.get_user_count().await
    }

    async fn get_user_roles(&self, user_id: Uuid) -> Result<Vec<Role>> {
        self.inner.get_user_roles(user_id).await
    }

    async fn get_user_role_details(&self, user_id: Uuid) -> Result<Vec<RoleDetail>> {
        self.inner.get_user_role_details(user_id).await
    }

    async fn set_user_roles(&self, user_id: Uuid, role_ids: &[Uuid]) -> Result<()> {
        self.inner.set_user_roles(user_id, role_ids).await
    }

    async fn get_default_roles(&self) -> Result<Vec<Role>> {
        self.inner.get_default_roles().await
    }

    async fn create_role(&self, role: &Role) -> Result<Uuid> {
        self.inner.create_role(role).await
    }

    async fn get_role(&self, role_id: Uuid) -> Result<Option<Role>> {
        self.inner.get_role(role_id).await
    }

    async fn get_role_by_name(&self, name: &str) -> Result<Option<Role>> {
        self.inner.get_role_by_name(name).await
    }

    async fn list_roles(&self, limit: u32, offset: u32) -> Result<Page<Role>> {
        self.inner.list_roles(limit, offset).await
    }

    async fn update_role(&self, role: &Role) -> Result<()> {
        self.inner.update_role(role).await
    }

    async fn delete_role(&self, role_id: Uuid) -> Result<bool> {
        self.inner.delete_role(role_id).await
    }

    async fn get_role_count(&self) -> Result<i64> {
        self.inner.get_role_count().await
    }

    async fn get_role_permissions(&self, role_id: Uuid) -> Result<Vec<Permission>> {
        self.inner.get_role_permissions(role_id).await
    }

    async fn add_role_permissions(&self, role_id: Uuid, permission_ids: &[Uuid]) -> Result<()> {
        self.inner.add_role_permissions(role_id, permission_ids).await
    }

    async fn remove_role_permissions(&self, role_id: Uuid, permission_ids: &[Uuid]) -> Result<()> {
        self.inner
            .remove_role_permissions(role_id, permission_ids)
            .await
    }

    async fn create_permission(&self, permission: &Permission) -> Result<Uuid> {
        self.inner.create_permission(permission).await
    }

    async fn get_permission(&self, permission_id: Uuid) -> Result<Option<Permission>> {
        self.inner.get_permission(permission_id).await
    }

    async fn get_permission_by_name(&self, name: &str) -> Result<Option<Permission>> {
        self.inner.get_permission_by_name(name).await
    }

    async fn get_permissions_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Permission>> {
        self.inner.get_permissions_by_ids(ids).await
    }

    async fn list_permissions(&self, limit: u32, offset: u32) -> Result<Page<Permission>> {
        self.inner.list_permissions(limit, offset).await
    }

    async fn delete_permission(&self, permission_id: Uuid) -> Result<bool> {
        self.inner.delete_permission(permission_id).await
    }

    async fn get_permission_count(&self) -> Result<i64> {
        self.inner.get_permission_count().await
    }

    async fn create_refresh_token(&self, record: &RefreshTokenRecord) -> Result<Uuid> {
        self.inner.create_refresh_token(record).await
    }

    async fn get_refresh_token(
        &self,
        user_id: Uuid,
        token: &str,
    ) -> Result<Option<RefreshTokenRecord>> {
        self.inner.get_refresh_token(user_id, token).await
    }

    async fn revoke_refresh_token_once(&self, record_id: Uuid) -> Result<bool> {
        self.inner.revoke_refresh_token_once(record_id).await
    }

    async fn revoke_all_user_refresh_tokens(&self, user_id: Uuid) -> Result<u64> {
        self.inner.revoke_all_user_refresh_tokens(user_id).await
    }

    async fn create_brand(&self, brand: &Brand) -> Result<Uuid> {
        self.inner.create_brand(brand).await
    }

    async fn get_brand(&self, brand_id: Uuid) -> Result<Option<Brand>> {
        self.inner.get_brand(brand_id).await
    }

    async fn get_brand_by_name(&self, name: &str) -> Result<Option<Brand>> {
        self.inner.get_brand_by_name(name).await
    }

    async fn get_brands(&self) -> Result<Vec<Brand>> {
        self.inner.get_brands().await
    }

    async fn update_brand(&self, brand: &Brand) -> Result<()> {
        self.inner.update_brand(brand).await
    }

    async fn delete_brand(&self, brand_id: Uuid) -> Result<bool> {
        self.inner.delete_brand(brand_id).await
    }

    async fn set_user_brand(&self, user_id: Uuid, brand_id: Option<Uuid>) -> Result<()> {
        self.inner.set_user_brand(user_id, brand_id).await
    }

    async fn get_users_by_brand(&self, brand_id: Uuid) -> Result<Vec<User>> {
        self.inner.get_users_by_brand(brand_id).await
    }

    async fn create_status(&self, status: &Status) -> Result<Uuid> {
        self.inner.create_status(status).await
    }

    async fn get_status(&self, status_id: Uuid) -> Result<Option<Status>> {
        self.inner.get_status(status_id).await
    }

    async fn get_status_by_name(
        &self,
        name: &str,
        context: StatusContext,
    ) -> Result<Option<Status>> {
        self.inner.get_status_by_name(name, context).await
    }

    async fn get_statuses_by_context(&self, context: StatusContext) -> Result<Vec<Status>> {
        self.inner.get_statuses_by_context(context).await
    }

    async fn get_status_count(&self) -> Result<i64> {
        self.inner.get_status_count().await
    }
}
