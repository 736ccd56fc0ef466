// ABOUTME: Status taxonomy service for the shared user/brand status catalog
// ABOUTME: Scopes lookups by context so user and brand statuses stay separate
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use super::is_unique_violation;
use crate::database_plugins::DatabaseProvider;
use crate::errors::{AppError, AppResult};
use crate::models::{Status, StatusContext};

/// Status creation request
#[derive(Debug, Clone, Deserialize)]
pub struct CreateStatusRequest {
    pub name: String,
    pub description: Option<String>,
    pub context: StatusContext,
}

/// Status taxonomy management
#[derive(Clone)]
pub struct StatusService<D> {
    database: D,
}

impl<D: DatabaseProvider> StatusService<D> {
    #[must_use]
    pub const fn new(database: D) -> Self {
        Self { database }
    }

    /// Create a new status
    ///
    /// Names are unique per context: "Active" may exist once for users and
    /// once for brands.
    ///
    /// # Errors
    ///
    /// Returns a conflict error when the name is taken within the context
    pub async fn create(&self, request: CreateStatusRequest) -> AppResult<Status> {
        let status = Status::new(request.name, request.description, request.context);

        match self.database.create_status(&status).await {
            Ok(_) => {
                info!(
                    "Status created: {} [{}] ({})",
                    status.name, status.context, status.id
                );
                Ok(status)
            }
            Err(err) if is_unique_violation(&err) => Err(AppError::conflict(format!(
                "Status '{}' already exists in the {} context",
                status.name, status.context
            ))),
            Err(err) => Err(err.into()),
        }
    }

    /// Get a status by ID
    ///
    /// # Errors
    ///
    /// Returns a not-found error for an unknown ID
    pub async fn get(&self, status_id: Uuid) -> AppResult<Status> {
        self.database
            .get_status(status_id)
            .await?
            .ok_or_else(|| AppError::not_found("Status").with_resource_id(status_id.to_string()))
    }

    /// Get a status by name within a context
    pub async fn get_by_name(&self, name: &str, context: StatusContext) -> AppResult<Status> {
        self.database
            .get_status_by_name(name, context)
            .await?
            .ok_or_else(|| AppError::not_found("Status").with_resource_id(name))
    }

    /// List every status usable in the given context
    pub async fn list_by_context(&self, context: StatusContext) -> AppResult<Vec<Status>> {
        Ok(self.database.get_statuses_by_context(context).await?)
    }
}
