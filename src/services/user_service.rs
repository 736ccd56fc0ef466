// ABOUTME: User lifecycle service covering creation, profile management, and role grants
// ABOUTME: Hashes passwords with bcrypt and resolves role sets for authorization checks
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use super::is_unique_violation;
use crate::authorization::{has_all_permissions, has_any_role};
use crate::constants::error_messages;
use crate::database_plugins::DatabaseProvider;
use crate::errors::{AppError, AppResult};
use crate::models::{RoleDetail, User, UserProfile};

/// User creation request
#[derive(Debug, Clone, Deserialize)]
pub struct CreateUserRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub password: String,
    /// Roles to grant at creation, merged with the default role set
    #[serde(default)]
    pub role_ids: Vec<Uuid>,
}

/// User update request; absent fields are left unchanged
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateUserRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub status_id: Option<Uuid>,
}

/// User lifecycle management
#[derive(Clone)]
pub struct UserService<D> {
    database: D,
}

impl<D: DatabaseProvider> UserService<D> {
    #[must_use]
    pub const fn new(database: D) -> Self {
        Self { database }
    }

    /// Access the underlying database provider
    pub const fn database(&self) -> &D {
        &self.database
    }

    /// Create a new user
    ///
    /// The password is hashed with bcrypt before storage. The granted role set
    /// is the union of the requested roles and every role flagged as default,
    /// deduplicated.
    ///
    /// # Errors
    ///
    /// Returns a conflict error when the email is taken and a not-found error
    /// when a requested role does not exist
    pub async fn create(&self, request: CreateUserRequest) -> AppResult<UserProfile> {
        info!("User creation attempt for email: {}", request.email);

        // Validate role references before touching the users table
        for role_id in &request.role_ids {
            if self.database.get_role(*role_id).await?.is_none() {
                return Err(AppError::not_found("Role").with_resource_id(role_id.to_string()));
            }
        }

        let password_hash = bcrypt::hash(&request.password, bcrypt::DEFAULT_COST)
            .map_err(|e| AppError::internal(format!("Password hashing failed: {e}")))?;

        let user = User::new(
            request.first_name,
            request.last_name,
            request.email,
            request.phone,
            password_hash,
        );

        match self.database.create_user(&user).await {
            Ok(_) => {}
            Err(err) if is_unique_violation(&err) => {
                return Err(AppError::conflict(error_messages::EMAIL_ALREADY_REGISTERED)
                    .with_resource_id(user.email));
            }
            Err(err) => return Err(err.into()),
        }

        // Union of requested roles and default grants; duplicates within the
        // request collapse on the join-table primary key
        let mut role_ids = request.role_ids;
        for role in self.database.get_default_roles().await? {
            if !role_ids.contains(&role.id) {
                role_ids.push(role.id);
            }
        }
        if !role_ids.is_empty() {
            self.database.set_user_roles(user.id, &role_ids).await?;
        }

        info!("User created: {} ({})", user.email, user.id);
        self.profile(user.id).await
    }

    /// Get a user's profile with roles resolved
    ///
    /// # Errors
    ///
    /// Returns a not-found error for an unknown ID
    pub async fn profile(&self, user_id: Uuid) -> AppResult<UserProfile> {
        let user = self.require_user(user_id).await?;
        let roles = self.database.get_user_roles(user_id).await?;
        Ok(user.into_profile(roles))
    }

    /// List every user with roles resolved
    pub async fn list(&self) -> AppResult<Vec<UserProfile>> {
        let users = self.database.get_users().await?;

        let mut profiles = Vec::with_capacity(users.len());
        for user in users {
            let roles = self.database.get_user_roles(user.id).await?;
            profiles.push(user.into_profile(roles));
        }
        Ok(profiles)
    }

    /// Update a user's profile fields
    ///
    /// # Errors
    ///
    /// Returns a not-found error for an unknown user or status
    pub async fn update(&self, user_id: Uuid, request: UpdateUserRequest) -> AppResult<UserProfile> {
        let mut user = self.require_user(user_id).await?;

        if let Some(first_name) = request.first_name {
            user.first_name = first_name;
        }
        if let Some(last_name) = request.last_name {
            user.last_name = last_name;
        }
        if let Some(phone) = request.phone {
            user.phone = phone;
        }
        if let Some(status_id) = request.status_id {
            if self.database.get_status(status_id).await?.is_none() {
                return Err(AppError::not_found("Status").with_resource_id(status_id.to_string()));
            }
            user.status_id = Some(status_id);
        }

        self.database.update_user(&user).await?;
        self.profile(user_id).await
    }

    /// Delete a user; refresh tokens and role links are removed with it
    ///
    /// # Errors
    ///
    /// Returns a not-found error for an unknown ID
    pub async fn delete(&self, user_id: Uuid) -> AppResult<()> {
        if self.database.delete_user(user_id).await? {
            info!("User deleted: {}", user_id);
            Ok(())
        } else {
            Err(AppError::not_found("User").with_resource_id(user_id.to_string()))
        }
    }

    /// Grant additional roles to a user
    ///
    /// The result is the union of the existing grants and the new roles,
    /// deduplicated; existing grants are never dropped by this call.
    ///
    /// # Errors
    ///
    /// Returns a not-found error if the user or any role is unknown
    pub async fn assign_roles(&self, user_id: Uuid, role_ids: &[Uuid]) -> AppResult<UserProfile> {
        self.require_user(user_id).await?;

        for role_id in role_ids {
            if self.database.get_role(*role_id).await?.is_none() {
                return Err(AppError::not_found("Role").with_resource_id(role_id.to_string()));
            }
        }

        let mut merged: Vec<Uuid> = self
            .database
            .get_user_roles(user_id)
            .await?
            .into_iter()
            .map(|r| r.id)
            .collect();
        for role_id in role_ids {
            if !merged.contains(role_id) {
                merged.push(*role_id);
            }
        }

        self.database.set_user_roles(user_id, &merged).await?;
        info!("Roles updated for user {}: {} grant(s)", user_id, merged.len());
        self.profile(user_id).await
    }

    /// Replace a user's role set entirely
    ///
    /// # Errors
    ///
    /// Returns a not-found error if the user or any role is unknown
    pub async fn replace_roles(&self, user_id: Uuid, role_ids: &[Uuid]) -> AppResult<UserProfile> {
        self.require_user(user_id).await?;

        for role_id in role_ids {
            if self.database.get_role(*role_id).await?.is_none() {
                return Err(AppError::not_found("Role").with_resource_id(role_id.to_string()));
            }
        }

        self.database.set_user_roles(user_id, role_ids).await?;
        self.profile(user_id).await
    }

    /// Get a user's roles with permission sets resolved
    pub async fn role_details(&self, user_id: Uuid) -> AppResult<Vec<RoleDetail>> {
        self.require_user(user_id).await?;
        Ok(self.database.get_user_role_details(user_id).await?)
    }

    /// Whether the user holds the named role
    ///
    /// # Errors
    ///
    /// Returns a not-found error for an unknown user
    pub async fn has_role(&self, user_id: Uuid, role_name: &str) -> AppResult<bool> {
        self.require_user(user_id).await?;
        let roles = self.database.get_user_roles(user_id).await?;
        Ok(roles.iter().any(|r| r.name == role_name))
    }

    /// Whether the user holds the named permission through any of their roles
    ///
    /// # Errors
    ///
    /// Returns a not-found error for an unknown user
    pub async fn has_permission(&self, user_id: Uuid, permission_name: &str) -> AppResult<bool> {
        let details = self.role_details(user_id).await?;
        Ok(has_all_permissions(&details, &[permission_name.to_string()]))
    }

    /// Whether the user holds any of the named roles
    pub async fn has_any_role(&self, user_id: Uuid, role_names: &[String]) -> AppResult<bool> {
        let details = self.role_details(user_id).await?;
        Ok(has_any_role(&details, role_names))
    }

    /// Verify an email/password pair, returning the user on success
    ///
    /// The bcrypt check runs on a blocking thread. Unknown emails and wrong
    /// passwords both yield the same generic error so callers cannot probe
    /// which field was wrong.
    ///
    /// # Errors
    ///
    /// Returns an invalid-credentials error on any mismatch
    pub async fn verify_credentials(&self, email: &str, password: &str) -> AppResult<User> {
        let Some(user) = self.database.get_user_by_email(email).await? else {
            return Err(AppError::auth_invalid(error_messages::INVALID_CREDENTIALS));
        };

        // Verify password using spawn_blocking to avoid blocking the async executor
        let password = password.to_string();
        let password_hash = user.password_hash.clone();
        let is_valid =
            tokio::task::spawn_blocking(move || bcrypt::verify(&password, &password_hash))
                .await
                .map_err(|e| AppError::internal(format!("Password verification task failed: {e}")))?
                .map_err(|e| AppError::internal(format!("Password verification error: {e}")))?;

        if is_valid {
            Ok(user)
        } else {
            Err(AppError::auth_invalid(error_messages::INVALID_CREDENTIALS))
        }
    }

    async fn require_user(&self, user_id: Uuid) -> AppResult<User> {
        self.database
            .get_user(user_id)
            .await?
            .ok_or_else(|| AppError::not_found("User").with_resource_id(user_id.to_string()))
    }
}
