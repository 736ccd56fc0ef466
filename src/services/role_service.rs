// ABOUTME: Role catalog service for role CRUD and role-permission composition
// ABOUTME: Enforces unique role names and validates permission references
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use super::is_unique_violation;
use super::permission_service::page_bounds;
use crate::database_plugins::DatabaseProvider;
use crate::errors::{AppError, AppResult};
use crate::models::{Page, Role, RoleDetail};

/// Role creation request
#[derive(Debug, Clone, Deserialize)]
pub struct CreateRoleRequest {
    pub name: String,
    pub description: Option<String>,
    #[serde(default)]
    pub is_default: bool,
    /// Permissions to attach at creation time
    #[serde(default)]
    pub permission_ids: Vec<Uuid>,
}

/// Role update request; absent fields are left unchanged
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateRoleRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub is_default: Option<bool>,
}

/// Role catalog management
#[derive(Clone)]
pub struct RoleService<D> {
    database: D,
}

impl<D: DatabaseProvider> RoleService<D> {
    #[must_use]
    pub const fn new(database: D) -> Self {
        Self { database }
    }

    /// Create a new role, optionally attaching permissions
    ///
    /// # Errors
    ///
    /// Returns a conflict error when the name is taken and a not-found error
    /// when a referenced permission does not exist
    pub async fn create(&self, request: CreateRoleRequest) -> AppResult<RoleDetail> {
        // Validate permission references before creating the role
        let permissions = self
            .database
            .get_permissions_by_ids(&request.permission_ids)
            .await?;
        if let Some(missing) = request
            .permission_ids
            .iter()
            .find(|id| !permissions.iter().any(|p| p.id == **id))
        {
            return Err(AppError::not_found("Permission").with_resource_id(missing.to_string()));
        }

        let role = Role::new(request.name, request.description, request.is_default);

        match self.database.create_role(&role).await {
            Ok(_) => {}
            Err(err) if is_unique_violation(&err) => {
                return Err(AppError::conflict(format!(
                    "Role '{}' already exists",
                    role.name
                )));
            }
            Err(err) => return Err(err.into()),
        }

        if !request.permission_ids.is_empty() {
            self.database
                .add_role_permissions(role.id, &request.permission_ids)
                .await?;
        }

        info!("Role created: {} ({})", role.name, role.id);
        Ok(RoleDetail { role, permissions })
    }

    /// Get a role with its permission set
    ///
    /// # Errors
    ///
    /// Returns a not-found error for an unknown ID
    pub async fn get(&self, role_id: Uuid) -> AppResult<RoleDetail> {
        let role = self
            .database
            .get_role(role_id)
            .await?
            .ok_or_else(|| AppError::not_found("Role").with_resource_id(role_id.to_string()))?;
        let permissions = self.database.get_role_permissions(role_id).await?;
        Ok(RoleDetail { role, permissions })
    }

    /// Get a role by name
    pub async fn get_by_name(&self, name: &str) -> AppResult<Role> {
        self.database
            .get_role_by_name(name)
            .await?
            .ok_or_else(|| AppError::not_found("Role").with_resource_id(name))
    }

    /// List roles as a page; page numbers start at 1
    pub async fn list(&self, page: u32, page_size: u32) -> AppResult<Page<Role>> {
        let (limit, offset) = page_bounds(page, page_size);
        Ok(self.database.list_roles(limit, offset).await?)
    }

    /// Update a role's name, description, or default flag
    ///
    /// # Errors
    ///
    /// Returns a not-found error for an unknown ID and a conflict error when
    /// renaming to a taken name
    pub async fn update(&self, role_id: Uuid, request: UpdateRoleRequest) -> AppResult<Role> {
        let mut role = self
            .database
            .get_role(role_id)
            .await?
            .ok_or_else(|| AppError::not_found("Role").with_resource_id(role_id.to_string()))?;

        if let Some(name) = request.name {
            role.name = name;
        }
        if let Some(description) = request.description {
            role.description = Some(description);
        }
        if let Some(is_default) = request.is_default {
            role.is_default = is_default;
        }

        match self.database.update_role(&role).await {
            Ok(()) => Ok(role),
            Err(err) if is_unique_violation(&err) => Err(AppError::conflict(format!(
                "Role '{}' already exists",
                role.name
            ))),
            Err(err) => Err(err.into()),
        }
    }

    /// Delete a role; user and permission links are detached automatically
    ///
    /// # Errors
    ///
    /// Returns a not-found error for an unknown ID
    pub async fn delete(&self, role_id: Uuid) -> AppResult<()> {
        if self.database.delete_role(role_id).await? {
            info!("Role deleted: {}", role_id);
            Ok(())
        } else {
            Err(AppError::not_found("Role").with_resource_id(role_id.to_string()))
        }
    }

    /// Attach permissions to a role; already-attached ones are skipped
    ///
    /// # Errors
    ///
    /// Returns a not-found error if the role or any permission is unknown
    pub async fn add_permissions(
        &self,
        role_id: Uuid,
        permission_ids: &[Uuid],
    ) -> AppResult<RoleDetail> {
        self.require_role(role_id).await?;

        let found = self.database.get_permissions_by_ids(permission_ids).await?;
        if let Some(missing) = permission_ids
            .iter()
            .find(|id| !found.iter().any(|p| p.id == **id))
        {
            return Err(AppError::not_found("Permission").with_resource_id(missing.to_string()));
        }

        self.database
            .add_role_permissions(role_id, permission_ids)
            .await?;
        info!(
            "Attached {} permission(s) to role {}",
            permission_ids.len(),
            role_id
        );
        self.get(role_id).await
    }

    /// Detach permissions from a role; absent links are ignored
    ///
    /// # Errors
    ///
    /// Returns a not-found error for an unknown role
    pub async fn remove_permissions(
        &self,
        role_id: Uuid,
        permission_ids: &[Uuid],
    ) -> AppResult<RoleDetail> {
        self.require_role(role_id).await?;

        self.database
            .remove_role_permissions(role_id, permission_ids)
            .await?;
        self.get(role_id).await
    }

    async fn require_role(&self, role_id: Uuid) -> AppResult<Role> {
        self.database
            .get_role(role_id)
            .await?
            .ok_or_else(|| AppError::not_found("Role").with_resource_id(role_id.to_string()))
    }
}
