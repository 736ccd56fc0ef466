// ABOUTME: Service layer orchestrating identity lifecycle and catalog management
// ABOUTME: Each service wraps the database provider and enforces domain rules
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

//! # Services
//!
//! Business logic on top of the [`crate::database_plugins::DatabaseProvider`]
//! abstraction. Services are generic over the provider so tests can run them
//! against any backend; errors are raised as [`crate::errors::AppError`] at
//! the point of detection.

pub mod auth_service;
pub mod brand_service;
pub mod permission_service;
pub mod role_service;
pub mod status_service;
pub mod user_service;

pub use auth_service::AuthService;
pub use brand_service::BrandService;
pub use permission_service::PermissionService;
pub use role_service::RoleService;
pub use status_service::StatusService;
pub use user_service::UserService;

/// Whether a persistence error was caused by a unique-constraint violation
///
/// Used to turn duplicate-key inserts (email, role name, brand name) into
/// conflict errors instead of opaque database errors.
pub(crate) fn is_unique_violation(err: &anyhow::Error) -> bool {
    err.downcast_ref::<sqlx::Error>()
        .and_then(sqlx::Error::as_database_error)
        .is_some_and(sqlx::error::DatabaseError::is_unique_violation)
}
