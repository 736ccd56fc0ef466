// ABOUTME: Integration tests for role and permission checks over persisted grants
// ABOUTME: Validates the any-role / all-permissions rules end to end
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use banquise_identity::authorization::{AccessPolicy, Identity};
use banquise_identity::database_plugins::factory::Database;
use banquise_identity::errors::ErrorCode;
use banquise_identity::services::permission_service::CreatePermissionRequest;
use banquise_identity::services::role_service::CreateRoleRequest;
use banquise_identity::services::{PermissionService, RoleService, UserService};
use tempfile::TempDir;
use uuid::Uuid;

struct Fixture {
    users: UserService<Database>,
    roles: RoleService<Database>,
    permissions: PermissionService<Database>,
    _guard: TempDir,
}

async fn fixture() -> Fixture {
    let (database, guard) = common::create_test_database().await;
    Fixture {
        users: UserService::new(database.clone()),
        roles: RoleService::new(database.clone()),
        permissions: PermissionService::new(database),
        _guard: guard,
    }
}

async fn make_permission(f: &Fixture, name: &str) -> Uuid {
    let (action, resource) = name.split_once(':').unwrap();
    f.permissions
        .create(CreatePermissionRequest {
            name: name.into(),
            description: None,
            resource: resource.into(),
            action: action.into(),
        })
        .await
        .unwrap()
        .id
}

async fn make_role(f: &Fixture, name: &str, permission_ids: Vec<Uuid>) -> Uuid {
    f.roles
        .create(CreateRoleRequest {
            name: name.into(),
            description: None,
            is_default: false,
            permission_ids,
        })
        .await
        .unwrap()
        .role
        .id
}

#[tokio::test]
async fn test_has_role_and_has_permission() {
    let f = fixture().await;

    let read = make_permission(&f, "read:document").await;
    let editor = make_role(&f, "editor", vec![read]).await;

    let mut request = common::register_request("editor@example.com");
    request.role_ids = vec![editor];
    let profile = f.users.create(request).await.unwrap();

    assert!(f.users.has_role(profile.id, "editor").await.unwrap());
    assert!(!f.users.has_role(profile.id, "admin").await.unwrap());
    assert!(f
        .users
        .has_permission(profile.id, "read:document")
        .await
        .unwrap());
    assert!(!f
        .users
        .has_permission(profile.id, "delete:document")
        .await
        .unwrap());
}

#[tokio::test]
async fn test_policy_role_check_is_any_of() {
    let f = fixture().await;

    let viewer = make_role(&f, "viewer", vec![]).await;
    let mut request = common::register_request("viewer@example.com");
    request.role_ids = vec![viewer];
    let profile = f.users.create(request).await.unwrap();

    let identity = Identity::Authenticated {
        user_id: profile.id,
    };
    let granted = f.users.role_details(profile.id).await.unwrap();

    // Holding one of the required roles suffices
    AccessPolicy::any_role(["admin", "viewer"])
        .authorize(identity, &granted)
        .unwrap();

    let err = AccessPolicy::any_role(["admin"])
        .authorize(identity, &granted)
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::PermissionDenied);
    assert_eq!(err.http_status(), 403);
}

#[tokio::test]
async fn test_policy_permission_check_is_all_of_across_roles() {
    let f = fixture().await;

    let read = make_permission(&f, "read:brand").await;
    let update = make_permission(&f, "update:brand").await;
    let reader = make_role(&f, "brand_reader", vec![read]).await;
    let writer = make_role(&f, "brand_writer", vec![update]).await;

    let mut request = common::register_request("multi@example.com");
    request.role_ids = vec![reader, writer];
    let profile = f.users.create(request).await.unwrap();

    let identity = Identity::Authenticated {
        user_id: profile.id,
    };
    let granted = f.users.role_details(profile.id).await.unwrap();

    // Permissions may be drawn from different roles
    AccessPolicy::all_permissions(["read:brand", "update:brand"])
        .authorize(identity, &granted)
        .unwrap();

    // One missing permission fails the whole requirement
    let err = AccessPolicy::all_permissions(["read:brand", "delete:brand"])
        .authorize(identity, &granted)
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::PermissionDenied);
}

#[tokio::test]
async fn test_anonymous_denied_unless_policy_open() {
    let f = fixture().await;
    let _ = &f;

    // Open policies admit everyone, including anonymous callers
    AccessPolicy::allow_all()
        .authorize(Identity::Anonymous, &[])
        .unwrap();

    let err = AccessPolicy::any_role(["viewer"])
        .authorize(Identity::Anonymous, &[])
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::AuthRequired);
    assert_eq!(err.http_status(), 401);
}

#[tokio::test]
async fn test_role_grant_union_preserves_existing_roles() {
    let f = fixture().await;

    let viewer = make_role(&f, "viewer", vec![]).await;
    let editor = make_role(&f, "editor", vec![]).await;

    let mut request = common::register_request("union@example.com");
    request.role_ids = vec![viewer];
    let profile = f.users.create(request).await.unwrap();

    // Granting the same role again plus a new one keeps a deduplicated union
    let updated = f
        .users
        .assign_roles(profile.id, &[viewer, editor])
        .await
        .unwrap();
    let mut names: Vec<&str> = updated.roles.iter().map(|r| r.name.as_str()).collect();
    names.sort_unstable();
    assert_eq!(names, ["editor", "viewer"]);
}

#[tokio::test]
async fn test_duplicate_role_ids_collapse_to_single_grant() {
    let f = fixture().await;

    let viewer = make_role(&f, "viewer", vec![]).await;

    let mut request = common::register_request("twice@example.com");
    request.role_ids = vec![viewer, viewer];
    let profile = f.users.create(request).await.unwrap();

    assert_eq!(profile.roles.len(), 1);
    assert_eq!(profile.roles[0].name, "viewer");
}

#[tokio::test]
async fn test_default_roles_granted_on_creation() {
    let f = fixture().await;

    f.roles
        .create(CreateRoleRequest {
            name: "member".into(),
            description: None,
            is_default: true,
            permission_ids: vec![],
        })
        .await
        .unwrap();

    let profile = f
        .users
        .create(common::register_request("fresh@example.com"))
        .await
        .unwrap();
    assert_eq!(profile.roles.len(), 1);
    assert_eq!(profile.roles[0].name, "member");
}
