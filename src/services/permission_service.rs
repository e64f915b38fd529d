use crate::api::middleware::error::{ApiError, ApiResult};
use crate::database::Database;
use crate::models::{
    access_label, canonical_access, CreatePermissionRequest, Module, ModuleResponse, Paginated,
    Permission, PermissionResponse, UpdatePermissionRequest,
};
use std::collections::HashMap;

/// Joins permissions with their modules in one batched lookup.
pub async fn build_permission_responses(
    db: &Database,
    permissions: Vec<Permission>,
) -> ApiResult<Vec<PermissionResponse>> {
    let mut module_ids: Vec<String> = permissions.iter().map(|p| p.module_id.clone()).collect();
    module_ids.sort();
    module_ids.dedup();

    let modules: HashMap<String, Module> = db
        .get_modules_by_ids(&module_ids)
        .await?
        .into_iter()
        .map(|m| (m.id.clone(), m))
        .collect();

    Ok(permissions
        .into_iter()
        .map(|p| {
            let module = modules.get(&p.module_id).cloned().map(ModuleResponse::from);
            PermissionResponse {
                id: p.id,
                name: p.name,
                module,
                access: p.access,
                created_at: p.created_at,
                updated_at: p.updated_at,
            }
        })
        .collect())
}

pub async fn build_permission_response(
    db: &Database,
    permission: Permission,
) -> ApiResult<PermissionResponse> {
    let mut responses = build_permission_responses(db, vec![permission]).await?;
    responses
        .pop()
        .ok_or_else(|| ApiError::Internal("Permission response assembly failed".to_string()))
}

pub async fn list_permissions(
    db: &Database,
    page: i64,
    limit: i64,
    search: Option<&str>,
) -> ApiResult<Paginated<PermissionResponse>> {
    let (permissions, total) = db.list_permissions(page, limit, search).await?;
    let items = build_permission_responses(db, permissions).await?;

    Ok(Paginated {
        items,
        total,
        page,
        limit,
    })
}

pub async fn get_permission(db: &Database, id: &str) -> ApiResult<PermissionResponse> {
    let permission = db
        .get_permission_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Permission not found".to_string()))?;

    build_permission_response(db, permission).await
}

/// Direct permission creation goes through the same (module, action-set)
/// reuse rule as role reconciliation: an existing match is returned
/// instead of inserting a duplicate.
pub async fn create_permission(
    db: &Database,
    request: CreatePermissionRequest,
) -> ApiResult<PermissionResponse> {
    let module = db
        .get_module_by_id(&request.module_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Module not found".to_string()))?;

    let access = canonical_access(&request.access);
    if access.is_empty() {
        return Err(ApiError::BadRequest(
            "access must contain at least one of create/read/update/delete".to_string(),
        ));
    }

    let access_json = crate::models::access_to_json(&access);
    if let Some(existing) = db
        .find_permission_by_module_and_access(&module.id, &access_json)
        .await?
    {
        return build_permission_response(db, existing).await;
    }

    let name = match request.name {
        Some(name) if !name.trim().is_empty() => name,
        _ => format!("{} - {}", module.name, access_label(&access)),
    };

    let permission = Permission::new(name, module.id.clone(), access);
    db.create_permission(&permission).await?;

    build_permission_response(db, permission).await
}

pub async fn update_permission(
    db: &Database,
    id: &str,
    request: UpdatePermissionRequest,
) -> ApiResult<PermissionResponse> {
    let mut permission = db
        .get_permission_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Permission not found".to_string()))?;

    if let Some(module_id) = request.module_id {
        db.get_module_by_id(&module_id)
            .await?
            .ok_or_else(|| ApiError::NotFound("Module not found".to_string()))?;
        permission.module_id = module_id;
    }

    if let Some(access) = request.access {
        let access = canonical_access(&access);
        if access.is_empty() {
            return Err(ApiError::BadRequest(
                "access must contain at least one of create/read/update/delete".to_string(),
            ));
        }
        permission.access = access;
    }

    if let Some(name) = request.name {
        if name.trim().is_empty() {
            return Err(ApiError::BadRequest("name must not be empty".to_string()));
        }
        permission.name = name;
    }

    permission.updated_at = time::OffsetDateTime::now_utc()
        .format(&time::format_description::well_known::Rfc3339)
        .unwrap();

    db.update_permission(&permission).await?;

    build_permission_response(db, permission).await
}

/// Deletion is blocked while any role still references the permission;
/// orphaned references are never left behind.
pub async fn delete_permission(db: &Database, id: &str) -> ApiResult<()> {
    let referencing = db.count_roles_referencing_permission(id).await?;
    if referencing > 0 {
        return Err(ApiError::Conflict(format!(
            "Permission is referenced by {} role(s)",
            referencing
        )));
    }

    let deleted = db.delete_permission(id).await?;
    if deleted == 0 {
        return Err(ApiError::NotFound("Permission not found".to_string()));
    }

    Ok(())
}
