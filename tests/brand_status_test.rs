// ABOUTME: Integration tests for brand management and the status taxonomy
// ABOUTME: Covers brand CRUD, membership affiliation, and context-scoped statuses
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use banquise_identity::database_plugins::factory::Database;
use banquise_identity::errors::ErrorCode;
use banquise_identity::models::StatusContext;
use banquise_identity::services::brand_service::{CreateBrandRequest, UpdateBrandRequest};
use banquise_identity::services::status_service::CreateStatusRequest;
use banquise_identity::services::{BrandService, StatusService, UserService};
use chrono::NaiveDate;
use tempfile::TempDir;
use uuid::Uuid;

struct Fixture {
    brands: BrandService<Database>,
    statuses: StatusService<Database>,
    users: UserService<Database>,
    _guard: TempDir,
}

async fn fixture() -> Fixture {
    let (database, guard) = common::create_test_database().await;
    Fixture {
        brands: BrandService::new(database.clone()),
        statuses: StatusService::new(database.clone()),
        users: UserService::new(database),
        _guard: guard,
    }
}

fn brand_request(name: &str) -> CreateBrandRequest {
    CreateBrandRequest {
        name: name.into(),
        billing_email: Some("billing@example.com".into()),
        billing_start_date: NaiveDate::from_ymd_opt(2025, 1, 1),
        ai_rules: None,
        status_id: None,
    }
}

#[tokio::test]
async fn test_brand_crud_round_trip() {
    let f = fixture().await;

    let brand = f.brands.create(brand_request("Igloo Group")).await.unwrap();
    assert_eq!(brand.name, "Igloo Group");

    let fetched = f.brands.get(brand.id).await.unwrap();
    assert_eq!(fetched.billing_email.as_deref(), Some("billing@example.com"));
    assert_eq!(
        fetched.billing_start_date,
        NaiveDate::from_ymd_opt(2025, 1, 1)
    );

    let updated = f
        .brands
        .update(
            brand.id,
            UpdateBrandRequest {
                ai_rules: Some("Answer in a formal tone".into()),
                ..UpdateBrandRequest::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.ai_rules.as_deref(), Some("Answer in a formal tone"));

    f.brands.delete(brand.id).await.unwrap();
    let err = f.brands.get(brand.id).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::ResourceNotFound);
}

#[tokio::test]
async fn test_duplicate_brand_name_conflicts() {
    let f = fixture().await;

    f.brands.create(brand_request("Polar Foods")).await.unwrap();
    let err = f
        .brands
        .create(brand_request("Polar Foods"))
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::ResourceAlreadyExists);
}

#[tokio::test]
async fn test_brand_membership_lifecycle() {
    let f = fixture().await;

    let brand = f.brands.create(brand_request("Floe & Co")).await.unwrap();
    let member = f
        .users
        .create(common::register_request("member@example.com"))
        .await
        .unwrap();

    f.brands.add_user(brand.id, member.id).await.unwrap();
    let members = f.brands.members(brand.id).await.unwrap();
    assert_eq!(members.len(), 1);
    assert_eq!(members[0].id, member.id);

    // Affiliation replaces any previous brand
    let other = f.brands.create(brand_request("Drift Retail")).await.unwrap();
    f.brands.add_user(other.id, member.id).await.unwrap();
    assert!(f.brands.members(brand.id).await.unwrap().is_empty());
    assert_eq!(f.brands.members(other.id).await.unwrap().len(), 1);

    f.brands.remove_user(member.id).await.unwrap();
    assert!(f.brands.members(other.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_deleting_brand_keeps_member_accounts() {
    let f = fixture().await;

    let brand = f.brands.create(brand_request("Glacier SA")).await.unwrap();
    let member = f
        .users
        .create(common::register_request("survivor@example.com"))
        .await
        .unwrap();
    f.brands.add_user(brand.id, member.id).await.unwrap();

    f.brands.delete(brand.id).await.unwrap();

    // The account survives, merely detached from the deleted brand
    let profile = f.users.profile(member.id).await.unwrap();
    assert_eq!(profile.email, "survivor@example.com");
    assert!(profile.brand_id.is_none());
}

#[tokio::test]
async fn test_membership_requires_existing_brand_and_user() {
    let f = fixture().await;

    let brand = f.brands.create(brand_request("Tundra Ltd")).await.unwrap();

    let err = f
        .brands
        .add_user(brand.id, Uuid::new_v4())
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::ResourceNotFound);

    let member = f
        .users
        .create(common::register_request("floating@example.com"))
        .await
        .unwrap();
    let err = f
        .brands
        .add_user(Uuid::new_v4(), member.id)
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::ResourceNotFound);
}

#[tokio::test]
async fn test_status_names_unique_per_context() {
    let f = fixture().await;

    // "Active" may exist once per context
    f.statuses
        .create(CreateStatusRequest {
            name: "Active".into(),
            description: None,
            context: StatusContext::User,
        })
        .await
        .unwrap();
    f.statuses
        .create(CreateStatusRequest {
            name: "Active".into(),
            description: None,
            context: StatusContext::Brand,
        })
        .await
        .unwrap();

    let err = f
        .statuses
        .create(CreateStatusRequest {
            name: "Active".into(),
            description: None,
            context: StatusContext::User,
        })
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::ResourceAlreadyExists);

    let user_active = f
        .statuses
        .get_by_name("Active", StatusContext::User)
        .await
        .unwrap();
    let brand_active = f
        .statuses
        .get_by_name("Active", StatusContext::Brand)
        .await
        .unwrap();
    assert_ne!(user_active.id, brand_active.id);
}

#[tokio::test]
async fn test_status_listing_scoped_by_context() {
    let f = fixture().await;

    for name in ["Active", "Suspended"] {
        f.statuses
            .create(CreateStatusRequest {
                name: name.into(),
                description: None,
                context: StatusContext::User,
            })
            .await
            .unwrap();
    }
    f.statuses
        .create(CreateStatusRequest {
            name: "Trial".into(),
            description: None,
            context: StatusContext::Brand,
        })
        .await
        .unwrap();

    let user_statuses = f.statuses.list_by_context(StatusContext::User).await.unwrap();
    assert_eq!(user_statuses.len(), 2);
    assert!(user_statuses.iter().all(|s| s.context == StatusContext::User));

    let brand_statuses = f
        .statuses
        .list_by_context(StatusContext::Brand)
        .await
        .unwrap();
    assert_eq!(brand_statuses.len(), 1);
    assert_eq!(brand_statuses[0].name, "Trial");
}

#[tokio::test]
async fn test_brand_rejects_user_context_status() {
    let f = fixture().await;

    let user_status = f
        .statuses
        .create(CreateStatusRequest {
            name: "Pending validation".into(),
            description: None,
            context: StatusContext::User,
        })
        .await
        .unwrap();

    let mut request = brand_request("Mismatched");
    request.status_id = Some(user_status.id);
    let err = f.brands.create(request).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidInput);
    assert_eq!(err.http_status(), 400);
}

#[tokio::test]
async fn test_brand_accepts_brand_context_status() {
    let f = fixture().await;

    let brand_status = f
        .statuses
        .create(CreateStatusRequest {
            name: "Premium".into(),
            description: None,
            context: StatusContext::Brand,
        })
        .await
        .unwrap();

    let mut request = brand_request("Well Typed");
    request.status_id = Some(brand_status.id);
    let brand = f.brands.create(request).await.unwrap();
    assert_eq!(brand.status_id, Some(brand_status.id));
}
