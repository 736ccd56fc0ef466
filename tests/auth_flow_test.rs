// ABOUTME: Integration tests for registration, login, and identity resolution
// ABOUTME: Validates credential handling, duplicate emails, and token issuance
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use banquise_identity::authorization::Identity;
use banquise_identity::errors::ErrorCode;
use banquise_identity::services::auth_service::LoginRequest;

#[tokio::test]
async fn test_register_issues_tokens_and_profile() {
    let (auth, _guard) = common::create_auth_service().await;

    let response = auth
        .register(common::register_request("nora@example.com"))
        .await
        .unwrap();

    assert_eq!(response.user.email, "nora@example.com");
    assert!(!response.tokens.access_token.is_empty());
    assert!(!response.tokens.refresh_token.is_empty());
    assert_ne!(response.tokens.access_token, response.tokens.refresh_token);

    // The profile must never expose the password hash
    let json = serde_json::to_string(&response.user).unwrap();
    assert!(!json.contains("password"));
}

#[tokio::test]
async fn test_register_duplicate_email_conflicts() {
    let (auth, _guard) = common::create_auth_service().await;

    auth.register(common::register_request("dup@example.com"))
        .await
        .unwrap();

    let err = auth
        .register(common::register_request("dup@example.com"))
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::ResourceAlreadyExists);
    assert_eq!(err.http_status(), 409);
}

#[tokio::test]
async fn test_login_with_valid_credentials() {
    let (auth, _guard) = common::create_auth_service().await;

    let registered = auth
        .register(common::register_request("login@example.com"))
        .await
        .unwrap();

    let response = auth
        .login(LoginRequest {
            email: "login@example.com".into(),
            password: "correct horse battery staple".into(),
        })
        .await
        .unwrap();

    assert_eq!(response.user.id, registered.user.id);
    assert_eq!(response.user.email, "login@example.com");
    assert!(!response.tokens.access_token.is_empty());
}

#[tokio::test]
async fn test_login_failures_are_indistinguishable() {
    let (auth, _guard) = common::create_auth_service().await;

    auth.register(common::register_request("known@example.com"))
        .await
        .unwrap();

    // Wrong password for a known account
    let wrong_password = auth
        .login(LoginRequest {
            email: "known@example.com".into(),
            password: "not the password".into(),
        })
        .await
        .unwrap_err();

    // Unknown account entirely
    let unknown_email = auth
        .login(LoginRequest {
            email: "nobody@example.com".into(),
            password: "whatever".into(),
        })
        .await
        .unwrap_err();

    // Both failures carry the same code and message
    assert_eq!(wrong_password.code, ErrorCode::AuthInvalid);
    assert_eq!(unknown_email.code, ErrorCode::AuthInvalid);
    assert_eq!(wrong_password.message, unknown_email.message);
}

#[tokio::test]
async fn test_resolve_identity_from_access_token() {
    let (auth, _guard) = common::create_auth_service().await;

    let registered = auth
        .register(common::register_request("ident@example.com"))
        .await
        .unwrap();

    let identity = auth
        .resolve_identity(&registered.tokens.access_token)
        .await
        .unwrap();
    assert_eq!(
        identity,
        Identity::Authenticated {
            user_id: registered.user.id
        }
    );
}

#[tokio::test]
async fn test_resolve_identity_rejects_garbage_and_refresh_tokens() {
    let (auth, _guard) = common::create_auth_service().await;

    let registered = auth
        .register(common::register_request("strict@example.com"))
        .await
        .unwrap();

    let err = auth.resolve_identity("not-a-jwt").await.unwrap_err();
    assert_eq!(err.code, ErrorCode::AuthInvalid);

    // A refresh token must not pass as an access token
    let err = auth
        .resolve_identity(&registered.tokens.refresh_token)
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::AuthInvalid);
}

#[tokio::test]
async fn test_resolve_identity_for_deleted_user() {
    let (auth, _guard) = common::create_auth_service().await;

    let registered = auth
        .register(common::register_request("gone@example.com"))
        .await
        .unwrap();

    auth.users().delete(registered.user.id).await.unwrap();

    let err = auth
        .resolve_identity(&registered.tokens.access_token)
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::ResourceNotFound);
}
