// ABOUTME: Application constants and configuration defaults
// ABOUTME: Centralizes token lifetimes, pagination limits, and user-facing message strings
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

//! Shared constants used across the identity platform

/// Configuration defaults applied when environment variables are unset
pub mod defaults {
    /// Default access-token lifetime
    pub const JWT_EXPIRATION: &str = "15m";

    /// Default refresh-token lifetime
    pub const JWT_REFRESH_EXPIRATION: &str = "7d";

    /// Development-only signing secret for access tokens
    pub const DEV_JWT_SECRET: &str = "dev-access-secret-change-me";

    /// Development-only signing secret for refresh tokens
    pub const DEV_JWT_REFRESH_SECRET: &str = "dev-refresh-secret-change-me";

    /// Default database location
    pub const DATABASE_URL: &str = "sqlite:./data/banquise.db";

    /// Default log level
    pub const LOG_LEVEL: &str = "info";
}

/// Pagination and size limits
pub mod limits {
    /// Default page size for catalog listings
    pub const DEFAULT_PAGE_SIZE: u32 = 10;

    /// Largest page size a caller may request
    pub const MAX_PAGE_SIZE: u32 = 100;
}

/// User-facing error messages
///
/// Login and registration messages are deliberately generic so that callers
/// cannot probe which field was wrong (account enumeration).
pub mod error_messages {
    pub const INVALID_CREDENTIALS: &str = "Invalid credentials";
    pub const EMAIL_ALREADY_REGISTERED: &str = "An account with this email already exists";
    pub const REFRESH_TOKEN_INVALID: &str = "Invalid refresh token";
    pub const REFRESH_TOKEN_REVOKED: &str = "Refresh token has been revoked";
    pub const REFRESH_TOKEN_EXPIRED: &str = "Refresh token has expired";
    pub const LOGOUT_SUCCESSFUL: &str = "Logout successful";
}

/// Service identity for structured logging
pub mod service_names {
    pub const IDENTITY_SERVICE: &str = "banquise-identity";
}
