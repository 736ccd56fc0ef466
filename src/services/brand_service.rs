// ABOUTME: Brand management service for franchise operators and their memberships
// ABOUTME: Handles brand CRUD, status assignment, and user-brand affiliation
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

use chrono::NaiveDate;
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use super::is_unique_violation;
use crate::database_plugins::DatabaseProvider;
use crate::errors::{AppError, AppResult};
use crate::models::{Brand, StatusContext, User};

/// Brand creation request
#[derive(Debug, Clone, Deserialize)]
pub struct CreateBrandRequest {
    pub name: String,
    pub billing_email: Option<String>,
    pub billing_start_date: Option<NaiveDate>,
    pub ai_rules: Option<String>,
    pub status_id: Option<Uuid>,
}

/// Brand update request; absent fields are left unchanged
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateBrandRequest {
    pub name: Option<String>,
    pub billing_email: Option<String>,
    pub billing_start_date: Option<NaiveDate>,
    pub ai_rules: Option<String>,
    pub status_id: Option<Uuid>,
}

/// Brand and membership management
#[derive(Clone)]
pub struct BrandService<D> {
    database: D,
}

impl<D: DatabaseProvider> BrandService<D> {
    #[must_use]
    pub const fn new(database: D) -> Self {
        Self { database }
    }

    /// Create a new brand
    ///
    /// # Errors
    ///
    /// Returns a conflict error when the name is taken and a not-found error
    /// when the status reference is unknown or not a brand status
    pub async fn create(&self, request: CreateBrandRequest) -> AppResult<Brand> {
        if let Some(status_id) = request.status_id {
            self.require_brand_status(status_id).await?;
        }

        let mut brand = Brand::new(request.name);
        brand.billing_email = request.billing_email;
        brand.billing_start_date = request.billing_start_date;
        brand.ai_rules = request.ai_rules;
        brand.status_id = request.status_id;

        match self.database.create_brand(&brand).await {
            Ok(_) => {
                info!("Brand created: {} ({})", brand.name, brand.id);
                Ok(brand)
            }
            Err(err) if is_unique_violation(&err) => Err(AppError::conflict(format!(
                "Brand '{}' already exists",
                brand.name
            ))),
            Err(err) => Err(err.into()),
        }
    }

    /// Get a brand by ID
    ///
    /// # Errors
    ///
    /// Returns a not-found error for an unknown ID
    pub async fn get(&self, brand_id: Uuid) -> AppResult<Brand> {
        self.require_brand(brand_id).await
    }

    /// Get a brand by name
    pub async fn get_by_name(&self, name: &str) -> AppResult<Brand> {
        self.database
            .get_brand_by_name(name)
            .await?
            .ok_or_else(|| AppError::not_found("Brand").with_resource_id(name))
    }

    /// List all brands
    pub async fn list(&self) -> AppResult<Vec<Brand>> {
        Ok(self.database.get_brands().await?)
    }

    /// Update a brand's attributes
    ///
    /// # Errors
    ///
    /// Returns a not-found error for an unknown brand or status and a
    /// conflict error when renaming to a taken name
    pub async fn update(&self, brand_id: Uuid, request: UpdateBrandRequest) -> AppResult<Brand> {
        let mut brand = self.require_brand(brand_id).await?;

        if let Some(name) = request.name {
            brand.name = name;
        }
        if let Some(billing_email) = request.billing_email {
            brand.billing_email = Some(billing_email);
        }
        if let Some(billing_start_date) = request.billing_start_date {
            brand.billing_start_date = Some(billing_start_date);
        }
        if let Some(ai_rules) = request.ai_rules {
            brand.ai_rules = Some(ai_rules);
        }
        if let Some(status_id) = request.status_id {
            self.require_brand_status(status_id).await?;
            brand.status_id = Some(status_id);
        }

        match self.database.update_brand(&brand).await {
            Ok(()) => Ok(brand),
            Err(err) if is_unique_violation(&err) => Err(AppError::conflict(format!(
                "Brand '{}' already exists",
                brand.name
            ))),
            Err(err) => Err(err.into()),
        }
    }

    /// Delete a brand; member users keep their accounts
    ///
    /// # Errors
    ///
    /// Returns a not-found error for an unknown ID
    pub async fn delete(&self, brand_id: Uuid) -> AppResult<()> {
        if self.database.delete_brand(brand_id).await? {
            info!("Brand deleted: {}", brand_id);
            Ok(())
        } else {
            Err(AppError::not_found("Brand").with_resource_id(brand_id.to_string()))
        }
    }

    /// Affiliate a user with a brand, replacing any previous affiliation
    ///
    /// # Errors
    ///
    /// Returns a not-found error if the user or brand is unknown
    pub async fn add_user(&self, brand_id: Uuid, user_id: Uuid) -> AppResult<()> {
        self.require_brand(brand_id).await?;
        self.require_user(user_id).await?;

        self.database.set_user_brand(user_id, Some(brand_id)).await?;
        info!("User {} affiliated with brand {}", user_id, brand_id);
        Ok(())
    }

    /// Clear a user's brand affiliation
    ///
    /// # Errors
    ///
    /// Returns a not-found error for an unknown user
    pub async fn remove_user(&self, user_id: Uuid) -> AppResult<()> {
        self.require_user(user_id).await?;
        self.database.set_user_brand(user_id, None).await?;
        info!("User {} detached from their brand", user_id);
        Ok(())
    }

    /// Get all users affiliated with a brand
    ///
    /// # Errors
    ///
    /// Returns a not-found error for an unknown brand
    pub async fn members(&self, brand_id: Uuid) -> AppResult<Vec<User>> {
        self.require_brand(brand_id).await?;
        Ok(self.database.get_users_by_brand(brand_id).await?)
    }

    async fn require_brand(&self, brand_id: Uuid) -> AppResult<Brand> {
        self.database
            .get_brand(brand_id)
            .await?
            .ok_or_else(|| AppError::not_found("Brand").with_resource_id(brand_id.to_string()))
    }

    async fn require_user(&self, user_id: Uuid) -> AppResult<User> {
        self.database
            .get_user(user_id)
            .await?
            .ok_or_else(|| AppError::not_found("User").with_resource_id(user_id.to_string()))
    }

    async fn require_brand_status(&self, status_id: Uuid) -> AppResult<()> {
        let status = self
            .database
            .get_status(status_id)
            .await?
            .ok_or_else(|| AppError::not_found("Status").with_resource_id(status_id.to_string()))?;

        if status.context == StatusContext::Brand {
            Ok(())
        } else {
            Err(AppError::invalid_input(format!(
                "Status '{}' belongs to the {} context, not brand",
                status.name, status.context
            )))
        }
    }
}
