// ABOUTME: JWT token generation and validation for access and refresh contexts
// ABOUTME: Provides TokenManager with two independent HS256 signing domains and duration parsing
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

//! # Token Management
//!
//! Two independent JWT signing contexts share no key material: access tokens
//! carry `{sub, email}` and default to a 15 minute lifetime, refresh tokens
//! carry `{sub}` only and default to 7 days. A token signed in one context
//! never verifies in the other, even if it has not expired.
//!
//! Lifetimes are configured as duration strings (`"15m"`, `"7d"`, `"12h"`,
//! `"30s"`); an unparseable value falls back to the context default rather
//! than failing startup.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::constants::defaults;
use crate::models::User;

/// Claims embedded in an access token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessClaims {
    /// User ID (subject)
    pub sub: String,
    /// User email, carried so boundary layers can log/display without a lookup
    pub email: String,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expires at (Unix timestamp)
    pub exp: i64,
}

/// Claims embedded in a refresh token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshClaims {
    /// User ID (subject)
    pub sub: String,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expires at (Unix timestamp)
    pub exp: i64,
}

/// Detailed JWT validation error types for better error handling
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JwtValidationError {
    /// Token signature is valid but the token has expired
    TokenExpired { expired_at: DateTime<Utc> },
    /// Token signature is invalid, wrong key, or token is malformed
    TokenInvalid { reason: String },
    /// Token subject is not a valid user identifier
    SubjectMalformed { reason: String },
}

impl std::fmt::Display for JwtValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TokenExpired { expired_at } => {
                write!(f, "Token expired at {expired_at}")
            }
            Self::TokenInvalid { reason } => write!(f, "Token invalid: {reason}"),
            Self::SubjectMalformed { reason } => write!(f, "Token subject malformed: {reason}"),
        }
    }
}

impl std::error::Error for JwtValidationError {}

/// Parse a duration string of the form `"30s"`, `"15m"`, `"12h"`, or `"7d"`
///
/// Returns `None` for anything else, including bare numbers; callers fall back
/// to their context default.
#[must_use]
pub fn parse_duration(value: &str) -> Option<Duration> {
    let value = value.trim();
    if value.len() < 2 {
        return None;
    }
    let (amount, unit) = value.split_at(value.len() - 1);
    let amount: i64 = amount.parse().ok()?;
    if amount < 0 {
        return None;
    }
    match unit {
        "s" => Some(Duration::seconds(amount)),
        "m" => Some(Duration::minutes(amount)),
        "h" => Some(Duration::hours(amount)),
        "d" => Some(Duration::days(amount)),
        _ => None,
    }
}

/// Signs and verifies JWTs for the access and refresh contexts
///
/// The two contexts use separate secrets; cross-context verification always
/// fails on signature.
pub struct TokenManager {
    access_encoding: EncodingKey,
    access_decoding: DecodingKey,
    refresh_encoding: EncodingKey,
    refresh_decoding: DecodingKey,
    access_lifetime: Duration,
    refresh_lifetime: Duration,
}

impl std::fmt::Debug for TokenManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenManager")
            .field("access_lifetime", &self.access_lifetime)
            .field("refresh_lifetime", &self.refresh_lifetime)
            .finish_non_exhaustive()
    }
}

impl TokenManager {
    /// Create a manager from raw secrets and duration strings
    ///
    /// Unparseable duration strings fall back to [`defaults::JWT_EXPIRATION`]
    /// and [`defaults::JWT_REFRESH_EXPIRATION`].
    #[must_use]
    pub fn new(
        access_secret: &str,
        refresh_secret: &str,
        access_expiration: &str,
        refresh_expiration: &str,
    ) -> Self {
        let access_lifetime = parse_duration(access_expiration)
            .or_else(|| parse_duration(defaults::JWT_EXPIRATION))
            .unwrap_or_else(|| Duration::minutes(15));
        let refresh_lifetime = parse_duration(refresh_expiration)
            .or_else(|| parse_duration(defaults::JWT_REFRESH_EXPIRATION))
            .unwrap_or_else(|| Duration::days(7));

        Self {
            access_encoding: EncodingKey::from_secret(access_secret.as_bytes()),
            access_decoding: DecodingKey::from_secret(access_secret.as_bytes()),
            refresh_encoding: EncodingKey::from_secret(refresh_secret.as_bytes()),
            refresh_decoding: DecodingKey::from_secret(refresh_secret.as_bytes()),
            access_lifetime,
            refresh_lifetime,
        }
    }

    /// Configured refresh-token lifetime, used to stamp ledger records
    #[must_use]
    pub const fn refresh_lifetime(&self) -> Duration {
        self.refresh_lifetime
    }

    /// Generate an access token for a user
    ///
    /// # Errors
    ///
    /// Returns an error if JWT encoding fails
    pub fn generate_access_token(&self, user: &User) -> Result<String, jsonwebtoken::errors::Error> {
        let now = Utc::now();
        let claims = AccessClaims {
            sub: user.id.to_string(),
            email: user.email.clone(),
            iat: now.timestamp(),
            exp: (now + self.access_lifetime).timestamp(),
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.access_encoding)
    }

    /// Generate a refresh token for a user
    ///
    /// # Errors
    ///
    /// Returns an error if JWT encoding fails
    pub fn generate_refresh_token(
        &self,
        user_id: Uuid,
    ) -> Result<String, jsonwebtoken::errors::Error> {
        let now = Utc::now();
        let claims = RefreshClaims {
            sub: user_id.to_string(),
            iat: now.timestamp(),
            exp: (now + self.refresh_lifetime).timestamp(),
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.refresh_encoding)
    }

    /// Validate an access token and return its claims
    ///
    /// # Errors
    ///
    /// Returns [`JwtValidationError::TokenExpired`] for expired tokens and
    /// [`JwtValidationError::TokenInvalid`] for signature or format failures
    pub fn validate_access_token(&self, token: &str) -> Result<AccessClaims, JwtValidationError> {
        let validation = Validation::new(Algorithm::HS256);
        decode::<AccessClaims>(token, &self.access_decoding, &validation)
            .map(|data| data.claims)
            .map_err(classify_jwt_error)
    }

    /// Validate a refresh token signature and return its claims
    ///
    /// This checks only the cryptographic envelope; ledger state (revocation,
    /// stored expiry) is a separate persistence-layer concern.
    ///
    /// # Errors
    ///
    /// Returns [`JwtValidationError`] describing the failure
    pub fn validate_refresh_token(&self, token: &str) -> Result<RefreshClaims, JwtValidationError> {
        let validation = Validation::new(Algorithm::HS256);
        decode::<RefreshClaims>(token, &self.refresh_decoding, &validation)
            .map(|data| data.claims)
            .map_err(classify_jwt_error)
    }

    /// Extract the subject user ID from validated access-token claims
    ///
    /// # Errors
    ///
    /// Returns [`JwtValidationError::SubjectMalformed`] if `sub` is not a UUID
    pub fn user_id_from_claims(claims: &AccessClaims) -> Result<Uuid, JwtValidationError> {
        Uuid::parse_str(&claims.sub).map_err(|e| JwtValidationError::SubjectMalformed {
            reason: e.to_string(),
        })
    }
}

fn classify_jwt_error(error: jsonwebtoken::errors::Error) -> JwtValidationError {
    match error.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => JwtValidationError::TokenExpired {
            expired_at: Utc::now(),
        },
        _ => JwtValidationError::TokenInvalid {
            reason: error.to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_user() -> User {
        User::new(
            "Nora".into(),
            "Lindqvist".into(),
            "nora@example.com".into(),
            "+33600000000".into(),
            "hash".into(),
        )
    }

    fn manager() -> TokenManager {
        TokenManager::new("access-secret", "refresh-secret", "15m", "7d")
    }

    #[test]
    fn test_parse_duration_units() {
        assert_eq!(parse_duration("30s"), Some(Duration::seconds(30)));
        assert_eq!(parse_duration("15m"), Some(Duration::minutes(15)));
        assert_eq!(parse_duration("12h"), Some(Duration::hours(12)));
        assert_eq!(parse_duration("7d"), Some(Duration::days(7)));
    }

    #[test]
    fn test_parse_duration_rejects_garbage() {
        assert_eq!(parse_duration(""), None);
        assert_eq!(parse_duration("7"), None);
        assert_eq!(parse_duration("d7"), None);
        assert_eq!(parse_duration("7w"), None);
        assert_eq!(parse_duration("-5m"), None);
        assert_eq!(parse_duration("soon"), None);
    }

    #[test]
    fn test_unparseable_lifetime_falls_back_to_defaults() {
        let mgr = TokenManager::new("a", "r", "banana", "never");
        assert_eq!(mgr.access_lifetime, Duration::minutes(15));
        assert_eq!(mgr.refresh_lifetime(), Duration::days(7));
    }

    #[test]
    fn test_access_token_round_trip() {
        let mgr = manager();
        let user = test_user();

        let token = mgr.generate_access_token(&user).unwrap();
        let claims = mgr.validate_access_token(&token).unwrap();

        assert_eq!(claims.sub, user.id.to_string());
        assert_eq!(claims.email, user.email);
        assert_eq!(TokenManager::user_id_from_claims(&claims).unwrap(), user.id);
    }

    #[test]
    fn test_refresh_token_round_trip() {
        let mgr = manager();
        let user_id = Uuid::new_v4();

        let token = mgr.generate_refresh_token(user_id).unwrap();
        let claims = mgr.validate_refresh_token(&token).unwrap();

        assert_eq!(claims.sub, user_id.to_string());
    }

    #[test]
    fn test_contexts_are_independent() {
        let mgr = manager();
        let user = test_user();

        // An access token must not verify in the refresh context and vice versa
        let access = mgr.generate_access_token(&user).unwrap();
        assert!(mgr.validate_refresh_token(&access).is_err());

        let refresh = mgr.generate_refresh_token(user.id).unwrap();
        assert!(mgr.validate_access_token(&refresh).is_err());
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let mgr = manager();
        let other = TokenManager::new("other-access", "other-refresh", "15m", "7d");
        let user = test_user();

        let token = mgr.generate_access_token(&user).unwrap();
        let err = other.validate_access_token(&token).unwrap_err();
        assert!(matches!(err, JwtValidationError::TokenInvalid { .. }));
    }

    #[test]
    fn test_expired_token_classified() {
        // Zero-second lifetime: the token is already expired when validated
        let mgr = TokenManager::new("s", "r", "0s", "0s");
        let user = test_user();

        let token = mgr.generate_access_token(&user).unwrap();
        // jsonwebtoken applies default leeway; strip it for the test
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        let result = decode::<AccessClaims>(&token, &mgr.access_decoding, &validation)
            .map_err(classify_jwt_error);
        assert!(matches!(
            result,
            Err(JwtValidationError::TokenExpired { .. })
        ));
    }

    #[test]
    fn test_malformed_subject_rejected() {
        let claims = AccessClaims {
            sub: "not-a-uuid".into(),
            email: "x@example.com".into(),
            iat: 0,
            exp: 0,
        };
        assert!(matches!(
            TokenManager::user_id_from_claims(&claims),
            Err(JwtValidationError::SubjectMalformed { .. })
        ));
    }
}
