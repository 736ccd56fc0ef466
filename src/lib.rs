// ABOUTME: Main library entry point for the Banquise identity platform
// ABOUTME: Provides user identity, JWT authentication, and role-based authorization services
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

#![deny(unsafe_code)]

//! # Banquise Identity
//!
//! A multi-tenant identity and access-control backend. The crate exposes
//! service-level contracts for the identity lifecycle (registration, login,
//! refresh-token rotation, logout) and per-request authorization decisions
//! (role and permission checks), backed by a pluggable persistence layer.
//!
//! ## Architecture
//!
//! - **Models**: domain entities (users, roles, permissions, brands, statuses)
//! - **Auth**: JWT signing and verification with independent access/refresh contexts
//! - **Authorization**: explicit-identity role/permission evaluation
//! - **Services**: orchestration of identity lifecycle and catalog management
//! - **Database plugins**: repository abstraction with a SQLite backend
//!
//! ## Example
//!
//! ```rust,no_run
//! use banquise_identity::config::environment::ServerConfig;
//! use banquise_identity::database_plugins::{factory::Database, DatabaseProvider};
//! use banquise_identity::errors::AppResult;
//!
//! #[tokio::main]
//! async fn main() -> AppResult<()> {
//!     let config = ServerConfig::from_env()?;
//!     let database = Database::new(&config.database.url.to_connection_string()).await?;
//!     banquise_identity::seed::seed_database(&database).await?;
//!     Ok(())
//! }
//! ```

/// JWT token signing and verification for access and refresh contexts
pub mod auth;

/// Role and permission evaluation against an explicit request identity
pub mod authorization;

/// Configuration management loaded from the environment
pub mod config;

/// Application constants and shared message strings
pub mod constants;

/// SQLite persistence layer
pub mod database;

/// Database abstraction layer with plugin support
pub mod database_plugins;

/// Unified error handling system with standard error codes
pub mod errors;

/// Logging configuration with structured output
pub mod logging;

/// Core data models for identity and access control
pub mod models;

/// Idempotent bootstrap seeding of roles, permissions, and statuses
pub mod seed;

/// Identity lifecycle and catalog services
pub mod services;
