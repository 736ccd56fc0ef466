// ABOUTME: Integration tests for the role and permission catalogs
// ABOUTME: Covers CRUD, name conflicts, permission attachment, and pagination
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use banquise_identity::database_plugins::factory::Database;
use banquise_identity::errors::ErrorCode;
use banquise_identity::services::permission_service::CreatePermissionRequest;
use banquise_identity::services::role_service::{CreateRoleRequest, UpdateRoleRequest};
use banquise_identity::services::{PermissionService, RoleService, UserService};
use tempfile::TempDir;
use uuid::Uuid;

async fn catalog() -> (RoleService<Database>, PermissionService<Database>, TempDir) {
    let (database, guard) = common::create_test_database().await;
    (
        RoleService::new(database.clone()),
        PermissionService::new(database),
        guard,
    )
}

fn permission_request(name: &str) -> CreatePermissionRequest {
    let (action, resource) = name.split_once(':').unwrap();
    CreatePermissionRequest {
        name: name.into(),
        description: Some(format!("{action} access on {resource}")),
        resource: resource.into(),
        action: action.into(),
    }
}

#[tokio::test]
async fn test_role_crud_round_trip() {
    let (roles, _permissions, _guard) = catalog().await;

    let created = roles
        .create(CreateRoleRequest {
            name: "moderator".into(),
            description: Some("Moderates content".into()),
            is_default: false,
            permission_ids: vec![],
        })
        .await
        .unwrap();

    let fetched = roles.get(created.role.id).await.unwrap();
    assert_eq!(fetched.role.name, "moderator");
    assert!(fetched.permissions.is_empty());

    let updated = roles
        .update(
            created.role.id,
            UpdateRoleRequest {
                name: Some("senior_moderator".into()),
                description: None,
                is_default: Some(true),
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.name, "senior_moderator");
    assert!(updated.is_default);

    roles.delete(created.role.id).await.unwrap();
    let err = roles.get(created.role.id).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::ResourceNotFound);
    assert_eq!(err.http_status(), 404);
}

#[tokio::test]
async fn test_duplicate_role_name_conflicts() {
    let (roles, _permissions, _guard) = catalog().await;

    let request = CreateRoleRequest {
        name: "auditor".into(),
        description: None,
        is_default: false,
        permission_ids: vec![],
    };
    roles.create(request.clone()).await.unwrap();

    let err = roles.create(request).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::ResourceAlreadyExists);
    assert_eq!(err.http_status(), 409);
}

#[tokio::test]
async fn test_create_role_with_unknown_permission_fails() {
    let (roles, _permissions, _guard) = catalog().await;

    let missing = Uuid::new_v4();
    let err = roles
        .create(CreateRoleRequest {
            name: "broken".into(),
            description: None,
            is_default: false,
            permission_ids: vec![missing],
        })
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::ResourceNotFound);
    assert_eq!(err.context.resource_id, Some(missing.to_string()));

    // The failed creation must not leave a role behind
    let err = roles.get_by_name("broken").await.unwrap_err();
    assert_eq!(err.code, ErrorCode::ResourceNotFound);
}

#[tokio::test]
async fn test_attach_and_detach_permissions() {
    let (roles, permissions, _guard) = catalog().await;

    let read = permissions
        .create(permission_request("read:document"))
        .await
        .unwrap();
    let write = permissions
        .create(permission_request("update:document"))
        .await
        .unwrap();

    let role = roles
        .create(CreateRoleRequest {
            name: "librarian".into(),
            description: None,
            is_default: false,
            permission_ids: vec![read.id],
        })
        .await
        .unwrap();
    assert_eq!(role.permissions.len(), 1);

    // Attaching again alongside a new permission never duplicates links
    let detail = roles
        .add_permissions(role.role.id, &[read.id, write.id])
        .await
        .unwrap();
    assert_eq!(detail.permissions.len(), 2);

    let detail = roles
        .remove_permissions(role.role.id, &[read.id])
        .await
        .unwrap();
    assert_eq!(detail.permissions.len(), 1);
    assert_eq!(detail.permissions[0].name, "update:document");

    // Detaching an absent link is a no-op
    let detail = roles
        .remove_permissions(role.role.id, &[read.id])
        .await
        .unwrap();
    assert_eq!(detail.permissions.len(), 1);
}

#[tokio::test]
async fn test_deleting_role_keeps_users_holding_it() {
    let (database, _guard) = common::create_test_database().await;
    let roles = RoleService::new(database.clone());
    let users = UserService::new(database);

    let role = roles
        .create(CreateRoleRequest {
            name: "seasonal".into(),
            description: None,
            is_default: false,
            permission_ids: vec![],
        })
        .await
        .unwrap();

    let mut request = common::register_request("holder@example.com");
    request.role_ids = vec![role.role.id];
    let created = users.create(request).await.unwrap();
    assert_eq!(created.roles.len(), 1);

    roles.delete(role.role.id).await.unwrap();

    // The account survives; the grant is simply gone
    let profile = users.profile(created.id).await.unwrap();
    assert_eq!(profile.email, "holder@example.com");
    assert!(profile.roles.is_empty());
}

#[tokio::test]
async fn test_deleting_permission_detaches_it_from_roles() {
    let (roles, permissions, _guard) = catalog().await;

    let perm = permissions
        .create(permission_request("delete:franchise"))
        .await
        .unwrap();
    let role = roles
        .create(CreateRoleRequest {
            name: "franchise_manager".into(),
            description: None,
            is_default: false,
            permission_ids: vec![perm.id],
        })
        .await
        .unwrap();

    permissions.delete(perm.id).await.unwrap();

    let detail = roles.get(role.role.id).await.unwrap();
    assert!(detail.permissions.is_empty());
}

#[tokio::test]
async fn test_permission_listing_is_paginated() {
    let (_roles, permissions, _guard) = catalog().await;

    for i in 0..7 {
        permissions
            .create(permission_request(&format!("read:resource_{i}")))
            .await
            .unwrap();
    }

    let first = permissions.list(1, 5).await.unwrap();
    assert_eq!(first.total, 7);
    assert_eq!(first.items.len(), 5);

    let second = permissions.list(2, 5).await.unwrap();
    assert_eq!(second.total, 7);
    assert_eq!(second.items.len(), 2);

    // Pages never overlap
    for item in &second.items {
        assert!(!first.items.iter().any(|p| p.id == item.id));
    }
}

#[tokio::test]
async fn test_role_listing_is_paginated() {
    let (roles, _permissions, _guard) = catalog().await;

    for i in 0..3 {
        roles
            .create(CreateRoleRequest {
                name: format!("role_{i}"),
                description: None,
                is_default: false,
                permission_ids: vec![],
            })
            .await
            .unwrap();
    }

    let page = roles.list(1, 2).await.unwrap();
    assert_eq!(page.total, 3);
    assert_eq!(page.items.len(), 2);

    let rest = roles.list(2, 2).await.unwrap();
    assert_eq!(rest.items.len(), 1);
}

#[tokio::test]
async fn test_duplicate_permission_name_conflicts() {
    let (_roles, permissions, _guard) = catalog().await;

    permissions
        .create(permission_request("access:animation"))
        .await
        .unwrap();

    let err = permissions
        .create(permission_request("access:animation"))
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::ResourceAlreadyExists);
}
