// ABOUTME: Permission catalog service for creating, listing, and resolving permissions
// ABOUTME: Enforces unique permission names and reports missing IDs on bulk lookups
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use super::is_unique_violation;
use crate::constants::limits;
use crate::database_plugins::DatabaseProvider;
use crate::errors::{AppError, AppResult};
use crate::models::{Page, Permission};

/// Permission creation request
#[derive(Debug, Clone, Deserialize)]
pub struct CreatePermissionRequest {
    pub name: String,
    pub description: Option<String>,
    pub resource: String,
    pub action: String,
}

/// Permission catalog management
#[derive(Clone)]
pub struct PermissionService<D> {
    database: D,
}

impl<D: DatabaseProvider> PermissionService<D> {
    #[must_use]
    pub const fn new(database: D) -> Self {
        Self { database }
    }

    /// Create a new permission
    ///
    /// # Errors
    ///
    /// Returns a conflict error when the name is already taken
    pub async fn create(&self, request: CreatePermissionRequest) -> AppResult<Permission> {
        let permission = Permission::new(
            request.name,
            request.description,
            request.resource,
            request.action,
        );

        match self.database.create_permission(&permission).await {
            Ok(_) => {
                info!("Permission created: {} ({})", permission.name, permission.id);
                Ok(permission)
            }
            Err(err) if is_unique_violation(&err) => Err(AppError::conflict(format!(
                "Permission '{}' already exists",
                permission.name
            ))),
            Err(err) => Err(err.into()),
        }
    }

    /// Get a permission by ID
    ///
    /// # Errors
    ///
    /// Returns a not-found error for an unknown ID
    pub async fn get(&self, permission_id: Uuid) -> AppResult<Permission> {
        self.database
            .get_permission(permission_id)
            .await?
            .ok_or_else(|| {
                AppError::not_found("Permission").with_resource_id(permission_id.to_string())
            })
    }

    /// Get a permission by name
    pub async fn get_by_name(&self, name: &str) -> AppResult<Permission> {
        self.database
            .get_permission_by_name(name)
            .await?
            .ok_or_else(|| AppError::not_found("Permission").with_resource_id(name))
    }

    /// Resolve a set of permission IDs, failing if any is unknown
    ///
    /// # Errors
    ///
    /// Returns a not-found error naming the first missing ID
    pub async fn resolve_ids(&self, ids: &[Uuid]) -> AppResult<Vec<Permission>> {
        let found = self.database.get_permissions_by_ids(ids).await?;

        if found.len() != dedup_count(ids) {
            let missing = ids
                .iter()
                .find(|id| !found.iter().any(|p| p.id == **id))
                .copied();
            return Err(match missing {
                Some(id) => {
                    AppError::not_found("Permission").with_resource_id(id.to_string())
                }
                None => AppError::not_found("Permission"),
            });
        }
        Ok(found)
    }

    /// List permissions as a page; page numbers start at 1
    pub async fn list(&self, page: u32, page_size: u32) -> AppResult<Page<Permission>> {
        let (limit, offset) = page_bounds(page, page_size);
        Ok(self.database.list_permissions(limit, offset).await?)
    }

    /// Delete a permission; role links are detached automatically
    ///
    /// # Errors
    ///
    /// Returns a not-found error for an unknown ID
    pub async fn delete(&self, permission_id: Uuid) -> AppResult<()> {
        if self.database.delete_permission(permission_id).await? {
            info!("Permission deleted: {}", permission_id);
            Ok(())
        } else {
            Err(AppError::not_found("Permission").with_resource_id(permission_id.to_string()))
        }
    }
}

/// Clamp paging parameters and convert to limit/offset
///
/// Page numbers start at 1; zero is treated as the first page. Page sizes are
/// clamped to [`limits::MAX_PAGE_SIZE`], and zero falls back to
/// [`limits::DEFAULT_PAGE_SIZE`].
pub(crate) fn page_bounds(page: u32, page_size: u32) -> (u32, u32) {
    let size = if page_size == 0 {
        limits::DEFAULT_PAGE_SIZE
    } else {
        page_size.min(limits::MAX_PAGE_SIZE)
    };
    let page = page.max(1);
    (size, (page - 1).saturating_mul(size))
}

fn dedup_count(ids: &[Uuid]) -> usize {
    let mut seen: Vec<Uuid> = Vec::with_capacity(ids.len());
    for id in ids {
        if !seen.contains(id) {
            seen.push(*id);
        }
    }
    seen.len()
}
