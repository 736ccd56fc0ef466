// ABOUTME: Shared helpers for integration tests
// ABOUTME: Provides temp-file SQLite databases and preconfigured services
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

#![allow(dead_code)]

use std::sync::Arc;

use tempfile::TempDir;

use banquise_identity::auth::TokenManager;
use banquise_identity::database_plugins::factory::Database;
use banquise_identity::services::user_service::CreateUserRequest;
use banquise_identity::services::AuthService;

/// Create a fresh migrated database backed by a temp file
///
/// The `TempDir` must be kept alive for the duration of the test; dropping it
/// deletes the database file.
pub async fn create_test_database() -> (Database, TempDir) {
    let temp_dir = TempDir::new().expect("failed to create temp dir");
    let db_path = temp_dir.path().join("identity.db");
    let url = format!("sqlite:{}", db_path.display());

    let database = Database::new(&url)
        .await
        .expect("failed to create test database");
    (database, temp_dir)
}

/// Token manager with standard test lifetimes
pub fn test_token_manager() -> Arc<TokenManager> {
    Arc::new(TokenManager::new(
        "test-access-secret",
        "test-refresh-secret",
        "15m",
        "7d",
    ))
}

/// Auth service over a fresh database
pub async fn create_auth_service() -> (AuthService<Database>, TempDir) {
    let (database, temp_dir) = create_test_database().await;
    (AuthService::new(database, test_token_manager()), temp_dir)
}

/// A registration request with the given email
pub fn register_request(email: &str) -> CreateUserRequest {
    CreateUserRequest {
        first_name: "Nora".into(),
        last_name: "Lindqvist".into(),
        email: email.into(),
        phone: "+33600000000".into(),
        password: "correct horse battery staple".into(),
        role_ids: Vec::new(),
    }
}
