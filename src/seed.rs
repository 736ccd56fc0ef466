// ABOUTME: Idempotent bootstrap seeding of permissions, roles, and statuses
// ABOUTME: Each catalog is populated only when its table is empty
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

//! # Bootstrap Seeding
//!
//! Explicit, idempotent seeding of the permission, role, and status catalogs.
//! Each seeding step is guarded by a table-empty check, so running
//! [`seed_database`] against an already-populated database is a no-op and
//! never duplicates rows. Seeding is invoked explicitly at startup rather
//! than as a side effect of construction.

use anyhow::Result;
use tracing::info;

use crate::database_plugins::DatabaseProvider;
use crate::models::{Permission, Role, Status, StatusContext};

/// Seed permission definition
struct PermissionSeed {
    name: &'static str,
    resource: &'static str,
    action: &'static str,
    description: &'static str,
}

/// Seed role definition with the names of its permissions
struct RoleSeed {
    name: &'static str,
    description: &'static str,
    is_default: bool,
    permissions: &'static [&'static str],
}

/// Seed status definition
struct StatusSeed {
    name: &'static str,
    description: &'static str,
    context: StatusContext,
}

const INITIAL_PERMISSIONS: &[PermissionSeed] = &[
    // Brand administration
    PermissionSeed {
        name: "create:brand",
        resource: "brand",
        action: "create",
        description: "Create a new brand",
    },
    PermissionSeed {
        name: "update:brand",
        resource: "brand",
        action: "update",
        description: "Modify an existing brand",
    },
    PermissionSeed {
        name: "delete:brand",
        resource: "brand",
        action: "delete",
        description: "Delete a brand",
    },
    // Brand administrator accounts
    PermissionSeed {
        name: "create:brand_admin",
        resource: "brand_admin",
        action: "create",
        description: "Create a new brand administrator",
    },
    PermissionSeed {
        name: "update:brand_admin",
        resource: "brand_admin",
        action: "update",
        description: "Modify a brand administrator",
    },
    PermissionSeed {
        name: "delete:brand_admin",
        resource: "brand_admin",
        action: "delete",
        description: "Delete a brand administrator",
    },
    // Document base
    PermissionSeed {
        name: "create:document",
        resource: "document",
        action: "create",
        description: "Add new documents",
    },
    PermissionSeed {
        name: "update:document",
        resource: "document",
        action: "update",
        description: "Modify existing documents",
    },
    PermissionSeed {
        name: "delete:document",
        resource: "document",
        action: "delete",
        description: "Delete documents",
    },
    // Animation workspace
    PermissionSeed {
        name: "access:animation",
        resource: "animation",
        action: "access",
        description: "Access the animation workspace to ask questions",
    },
    // Conversational assistants
    PermissionSeed {
        name: "create:assistant",
        resource: "assistant",
        action: "create",
        description: "Create new conversational assistants",
    },
    PermissionSeed {
        name: "update:assistant",
        resource: "assistant",
        action: "update",
        description: "Modify existing assistants",
    },
    PermissionSeed {
        name: "delete:assistant",
        resource: "assistant",
        action: "delete",
        description: "Delete assistants",
    },
    // Franchises
    PermissionSeed {
        name: "create:franchise",
        resource: "franchise",
        action: "create",
        description: "Create new franchises",
    },
    PermissionSeed {
        name: "update:franchise",
        resource: "franchise",
        action: "update",
        description: "Modify existing franchises",
    },
    PermissionSeed {
        name: "delete:franchise",
        resource: "franchise",
        action: "delete",
        description: "Delete franchises",
    },
];

const INITIAL_ROLES: &[RoleSeed] = &[
    RoleSeed {
        name: "super_administrator",
        description: "Platform staff with full administration rights across every brand",
        is_default: false,
        permissions: &[
            "create:brand",
            "update:brand",
            "delete:brand",
            "create:brand_admin",
            "update:brand_admin",
            "delete:brand_admin",
            "create:document",
            "update:document",
            "delete:document",
            "access:animation",
            "create:assistant",
            "update:assistant",
            "delete:assistant",
            "create:franchise",
            "update:franchise",
            "delete:franchise",
        ],
    },
    RoleSeed {
        name: "brand_administrator",
        description: "Franchisor-side manager with extended rights scoped to their own brand",
        is_default: false,
        permissions: &[
            "access:animation",
            "create:assistant",
            "update:assistant",
            "delete:assistant",
            "create:franchise",
            "update:franchise",
            "delete:franchise",
        ],
    },
];

const INITIAL_STATUSES: &[StatusSeed] = &[
    // User statuses
    StatusSeed {
        name: "Active",
        description: "Active user with full system access",
        context: StatusContext::User,
    },
    StatusSeed {
        name: "Inactive",
        description: "Temporarily deactivated user",
        context: StatusContext::User,
    },
    StatusSeed {
        name: "Suspended",
        description: "User suspended for breaking the rules",
        context: StatusContext::User,
    },
    StatusSeed {
        name: "Pending validation",
        description: "New user awaiting validation by an administrator",
        context: StatusContext::User,
    },
    StatusSeed {
        name: "Archived",
        description: "Former user whose account has been archived",
        context: StatusContext::User,
    },
    // Brand statuses
    StatusSeed {
        name: "Active",
        description: "Active company with every service available",
        context: StatusContext::Brand,
    },
    StatusSeed {
        name: "Trial",
        description: "Company in a trial period with limited access",
        context: StatusContext::Brand,
    },
    StatusSeed {
        name: "Suspended",
        description: "Company temporarily suspended over payment issues",
        context: StatusContext::Brand,
    },
    StatusSeed {
        name: "Terminated",
        description: "Company that cancelled its subscription",
        context: StatusContext::Brand,
    },
    StatusSeed {
        name: "Premium",
        description: "Company on a premium subscription with advanced features",
        context: StatusContext::Brand,
    },
    StatusSeed {
        name: "Standard",
        description: "Company on a standard subscription",
        context: StatusContext::Brand,
    },
];

/// Seed permissions, roles, and statuses in dependency order
///
/// # Errors
///
/// Returns an error if any persistence operation fails
pub async fn seed_database<D: DatabaseProvider>(database: &D) -> Result<()> {
    seed_permissions(database).await?;
    seed_roles(database).await?;
    seed_statuses(database).await?;
    info!("Database seeded with initial roles, permissions, and statuses");
    Ok(())
}

/// Seed the permission catalog if it is empty
async fn seed_permissions<D: DatabaseProvider>(database: &D) -> Result<()> {
    if database.get_permission_count().await? > 0 {
        return Ok(());
    }

    info!("Seeding permissions...");
    for seed in INITIAL_PERMISSIONS {
        let permission = Permission::new(
            seed.name.to_string(),
            Some(seed.description.to_string()),
            seed.resource.to_string(),
            seed.action.to_string(),
        );
        database.create_permission(&permission).await?;
    }
    info!("Created {} permissions", INITIAL_PERMISSIONS.len());
    Ok(())
}

/// Seed the role catalog (with permission links) if it is empty
async fn seed_roles<D: DatabaseProvider>(database: &D) -> Result<()> {
    if database.get_role_count().await? > 0 {
        return Ok(());
    }

    info!("Seeding roles...");
    for seed in INITIAL_ROLES {
        let role = Role::new(
            seed.name.to_string(),
            Some(seed.description.to_string()),
            seed.is_default,
        );
        database.create_role(&role).await?;

        let mut permission_ids = Vec::with_capacity(seed.permissions.len());
        for name in seed.permissions {
            if let Some(permission) = database.get_permission_by_name(name).await? {
                permission_ids.push(permission.id);
            }
        }
        database.add_role_permissions(role.id, &permission_ids).await?;
    }
    info!("Created {} roles", INITIAL_ROLES.len());
    Ok(())
}

/// Seed the status taxonomy if it is empty
async fn seed_statuses<D: DatabaseProvider>(database: &D) -> Result<()> {
    if database.get_status_count().await? > 0 {
        return Ok(());
    }

    info!("Seeding statuses...");
    for seed in INITIAL_STATUSES {
        let status = Status::new(
            seed.name.to_string(),
            Some(seed.description.to_string()),
            seed.context,
        );
        database.create_status(&status).await?;
    }
    info!("Created {} statuses", INITIAL_STATUSES.len());
    Ok(())
}
