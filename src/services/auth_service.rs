// ABOUTME: Authentication service covering registration, login, refresh rotation, and logout
// ABOUTME: Pairs JWT issuance with the persisted refresh-token ledger
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

//! # Authentication Service
//!
//! The refresh flow is a one-time rotation: each stored refresh token may be
//! exchanged exactly once. The exchange revokes the presented token with an
//! atomic conditional update, so two concurrent submissions of the same token
//! produce exactly one success without any application-level locking.

use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::auth::{JwtValidationError, TokenManager};
use crate::authorization::Identity;
use crate::constants::error_messages;
use crate::database_plugins::DatabaseProvider;
use crate::errors::{AppError, AppResult};
use crate::models::{RefreshTokenRecord, TokenPair, User, UserInfo, UserProfile};
use crate::services::user_service::{CreateUserRequest, UserService};

/// Registration request; role grants default to the system's default roles
pub type RegisterRequest = CreateUserRequest;

/// Registration response
#[derive(Debug, Clone, Serialize)]
pub struct RegisterResponse {
    pub user: UserProfile,
    pub tokens: TokenPair,
}

/// Login request
#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Login response
#[derive(Debug, Clone, Serialize)]
pub struct LoginResponse {
    pub tokens: TokenPair,
    pub user: UserInfo,
}

/// Identity lifecycle orchestration
#[derive(Clone)]
pub struct AuthService<D> {
    users: UserService<D>,
    database: D,
    token_manager: Arc<TokenManager>,
}

impl<D: DatabaseProvider> AuthService<D> {
    #[must_use]
    pub fn new(database: D, token_manager: Arc<TokenManager>) -> Self {
        Self {
            users: UserService::new(database.clone()),
            database,
            token_manager,
        }
    }

    /// Access the wrapped user service
    pub const fn users(&self) -> &UserService<D> {
        &self.users
    }

    /// Register a new user and issue an initial token pair
    ///
    /// # Errors
    ///
    /// Returns a conflict error for a duplicate email
    pub async fn register(&self, request: RegisterRequest) -> AppResult<RegisterResponse> {
        let profile = self.users.create(request).await?;

        let user = self
            .database
            .get_user(profile.id)
            .await?
            .ok_or_else(|| AppError::not_found("User").with_resource_id(profile.id.to_string()))?;
        let tokens = self.issue_tokens(&user).await?;

        info!("User registered and signed in: {} ({})", user.email, user.id);
        Ok(RegisterResponse {
            user: profile,
            tokens,
        })
    }

    /// Authenticate with email and password, issuing a fresh token pair
    ///
    /// # Errors
    ///
    /// Returns the same invalid-credentials error for unknown emails and
    /// wrong passwords
    pub async fn login(&self, request: LoginRequest) -> AppResult<LoginResponse> {
        info!("Login attempt for email: {}", request.email);

        let user = self
            .users
            .verify_credentials(&request.email, &request.password)
            .await?;
        let tokens = self.issue_tokens(&user).await?;

        info!("User logged in: {} ({})", user.email, user.id);
        Ok(LoginResponse {
            tokens,
            user: UserInfo {
                id: user.id,
                email: user.email,
                first_name: user.first_name,
                last_name: user.last_name,
            },
        })
    }

    /// Exchange a refresh token for a new token pair, revoking the old one
    ///
    /// Failure causes are distinguishable by error code: a malformed or
    /// unknown token, a revoked token, and an expired token each carry their
    /// own code. A token that loses the rotation race is reported as revoked.
    ///
    /// # Errors
    ///
    /// See above; a missing user account is reported as not-found
    pub async fn refresh_tokens(&self, refresh_token: &str) -> AppResult<TokenPair> {
        // Cryptographic envelope first: signature and embedded expiry
        let claims = self
            .token_manager
            .validate_refresh_token(refresh_token)
            .map_err(refresh_validation_error)?;
        let user_id = Uuid::parse_str(&claims.sub)
            .map_err(|_| AppError::auth_invalid(error_messages::REFRESH_TOKEN_INVALID))?;

        // The subject must still exist; checked before the ledger so the
        // cause is reported as a missing account rather than a bad token
        let user = self
            .database
            .get_user(user_id)
            .await?
            .ok_or_else(|| AppError::not_found("User").with_resource_id(user_id.to_string()))?;

        // Then the ledger: the token must be stored, unrevoked, and unexpired
        let record = self
            .database
            .get_refresh_token(user_id, refresh_token)
            .await?
            .ok_or_else(|| AppError::auth_invalid(error_messages::REFRESH_TOKEN_INVALID))?;

        if record.is_revoked {
            return Err(
                AppError::auth_revoked(error_messages::REFRESH_TOKEN_REVOKED).with_user_id(user_id)
            );
        }
        if record.is_expired_at(Utc::now()) {
            return Err(
                AppError::auth_expired(error_messages::REFRESH_TOKEN_EXPIRED).with_user_id(user_id)
            );
        }

        // One-time rotation: the conditional update arbitrates concurrent
        // submissions, exactly one caller wins
        if !self.database.revoke_refresh_token_once(record.id).await? {
            return Err(
                AppError::auth_revoked(error_messages::REFRESH_TOKEN_REVOKED).with_user_id(user_id)
            );
        }

        let tokens = self.issue_tokens(&user).await?;
        info!("Refresh token rotated for user {}", user_id);
        Ok(tokens)
    }

    /// Revoke every active refresh token for a user
    ///
    /// Idempotent: logging out with no active tokens, or with a user ID that
    /// matches no account, succeeds with a count of zero.
    ///
    /// # Errors
    ///
    /// Returns an error only if the persistence layer fails
    pub async fn logout(&self, user_id: Uuid) -> AppResult<u64> {
        let revoked = self.database.revoke_all_user_refresh_tokens(user_id).await?;
        info!("Logout for user {}: revoked {} token(s)", user_id, revoked);
        Ok(revoked)
    }

    /// Resolve an access token to a request identity
    ///
    /// # Errors
    ///
    /// Expired tokens, invalid tokens, and tokens whose subject no longer
    /// exists each carry their own error code
    pub async fn resolve_identity(&self, access_token: &str) -> AppResult<Identity> {
        let claims = self
            .token_manager
            .validate_access_token(access_token)
            .map_err(access_validation_error)?;
        let user_id = TokenManager::user_id_from_claims(&claims)
            .map_err(|_| AppError::auth_invalid("Malformed token subject"))?;

        if self.database.get_user(user_id).await?.is_none() {
            return Err(AppError::not_found("User").with_resource_id(user_id.to_string()));
        }

        Ok(Identity::Authenticated { user_id })
    }

    /// Issue an access/refresh pair and record the refresh token in the ledger
    async fn issue_tokens(&self, user: &User) -> AppResult<TokenPair> {
        let access_token = self
            .token_manager
            .generate_access_token(user)
            .map_err(|e| AppError::internal(format!("Access token generation failed: {e}")))?;
        let refresh_token = self
            .token_manager
            .generate_refresh_token(user.id)
            .map_err(|e| AppError::internal(format!("Refresh token generation failed: {e}")))?;

        let expires_at = Utc::now() + self.token_manager.refresh_lifetime();
        let record = RefreshTokenRecord::new(user.id, refresh_token.clone(), expires_at);
        self.database.create_refresh_token(&record).await?;

        Ok(TokenPair {
            access_token,
            refresh_token,
        })
    }
}

fn refresh_validation_error(err: JwtValidationError) -> AppError {
    match err {
        JwtValidationError::TokenExpired { .. } => {
            AppError::auth_expired(error_messages::REFRESH_TOKEN_EXPIRED)
        }
        JwtValidationError::TokenInvalid { .. } | JwtValidationError::SubjectMalformed { .. } => {
            AppError::auth_invalid(error_messages::REFRESH_TOKEN_INVALID)
        }
    }
}

fn access_validation_error(err: JwtValidationError) -> AppError {
    match err {
        JwtValidationError::TokenExpired { .. } => {
            AppError::auth_expired("Access token has expired")
        }
        JwtValidationError::TokenInvalid { .. } | JwtValidationError::SubjectMalformed { .. } => {
            AppError::auth_invalid("Invalid access token")
        }
    }
}
