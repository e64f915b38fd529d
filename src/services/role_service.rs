use crate::api::middleware::error::{ApiError, ApiResult};
use crate::database::Database;
use crate::models::{
    BatchFailure, BatchResult, CreateRoleRequest, Paginated, Role, RoleResponse, RoleStatus,
};
use crate::services::{permission_service, reconcile};

/// Assembles the full role view: permissions with their modules, plus the
/// append-only status history. Current status is the last appended entry
/// and is never stored or computed any other way.
pub async fn build_role_response(db: &Database, role: Role) -> ApiResult<RoleResponse> {
    let history = db.get_status_history(&role.id).await?;
    let status = history
        .last()
        .map(|entry| entry.status)
        .ok_or_else(|| ApiError::Internal("Role has no status history".to_string()))?;

    let permission_ids = db.get_role_permission_ids(&role.id).await?;
    let mut permissions = Vec::with_capacity(permission_ids.len());
    for permission_id in &permission_ids {
        if let Some(permission) = db.get_permission_by_id(permission_id).await? {
            permissions.push(permission);
        }
    }
    let permissions = permission_service::build_permission_responses(db, permissions).await?;

    Ok(RoleResponse {
        id: role.id,
        name: role.name,
        icon: role.icon,
        company: role.company,
        created_by: role.created_by,
        status,
        status_history: history,
        permissions,
        created_at: role.created_at,
        updated_at: role.updated_at,
    })
}

pub async fn list_roles(
    db: &Database,
    page: i64,
    limit: i64,
    search: Option<&str>,
    status: Option<RoleStatus>,
    company: Option<&str>,
) -> ApiResult<Paginated<RoleResponse>> {
    let (roles, total) = db.list_roles(page, limit, search, status, company).await?;

    let mut items = Vec::with_capacity(roles.len());
    for role in roles {
        items.push(build_role_response(db, role).await?);
    }

    Ok(Paginated {
        items,
        total,
        page,
        limit,
    })
}

pub async fn get_role(db: &Database, id: &str) -> ApiResult<RoleResponse> {
    let role = db
        .get_role_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Role not found".to_string()))?;

    build_role_response(db, role).await
}

/// Creates a role: requested permission items go through reconciliation,
/// and an automatic first "active" history entry is appended, authored by
/// the creator.
pub async fn create_role(
    db: &Database,
    created_by: &str,
    request: CreateRoleRequest,
) -> ApiResult<RoleResponse> {
    if request.name.trim().is_empty() {
        return Err(ApiError::BadRequest("name must not be empty".to_string()));
    }
    if request.icon.trim().is_empty() {
        return Err(ApiError::BadRequest("icon is required".to_string()));
    }

    let permission_ids = reconcile::reconcile_permissions(db, &request.permissions).await?;

    let role = Role::new(
        request.name.trim().to_string(),
        request.icon,
        request.company,
        created_by.to_string(),
    );
    db.create_role(&role).await?;
    db.set_role_permissions(&role.id, &permission_ids).await?;
    db.append_status_entry(&role.id, RoleStatus::Active, None, created_by)
        .await?;

    build_role_response(db, role).await
}

/// Replaces the role's permission set through reconciliation.
pub async fn replace_permissions(
    db: &Database,
    id: &str,
    items: &[crate::models::PermissionItem],
) -> ApiResult<RoleResponse> {
    let role = db
        .get_role_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Role not found".to_string()))?;

    let permission_ids = reconcile::reconcile_permissions(db, items).await?;
    db.set_role_permissions(&role.id, &permission_ids).await?;

    build_role_response(db, role).await
}

/// Appends one status transition. Any state may move to any other state;
/// the transition graph is fully connected.
pub async fn update_status(
    db: &Database,
    id: &str,
    actor_id: &str,
    status: RoleStatus,
    remarks: Option<&str>,
) -> ApiResult<RoleResponse> {
    let role = db
        .get_role_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Role not found".to_string()))?;

    db.append_status_entry(&role.id, status, remarks, actor_id)
        .await?;

    build_role_response(db, role).await
}

/// Batch status transition. Each role's append is an independent write, so
/// the outcome is reported per id: unresolved ids land in `failed` rather
/// than disappearing into an aggregate count.
pub async fn batch_update_status(
    db: &Database,
    ids: &[String],
    actor_id: &str,
    status: RoleStatus,
    remarks: Option<&str>,
) -> ApiResult<BatchResult> {
    let mut updated = Vec::new();
    let mut failed = Vec::new();

    for id in ids {
        match db.get_role_by_id(id).await? {
            Some(role) => {
                db.append_status_entry(&role.id, status, remarks, actor_id)
                    .await?;
                updated.push(role.id);
            }
            None => failed.push(BatchFailure {
                id: id.clone(),
                reason: "Role not found".to_string(),
            }),
        }
    }

    Ok(BatchResult { updated, failed })
}

pub async fn delete_role(db: &Database, id: &str) -> ApiResult<()> {
    let deleted = db.delete_role(id).await?;
    if deleted == 0 {
        return Err(ApiError::NotFound("Role not found".to_string()));
    }

    Ok(())
}

pub async fn batch_delete(db: &Database, ids: &[String]) -> ApiResult<BatchResult> {
    let mut updated = Vec::new();
    let mut failed = Vec::new();

    for id in ids {
        match db.delete_role(id).await? {
            0 => failed.push(BatchFailure {
                id: id.clone(),
                reason: "Role not found".to_string(),
            }),
            _ => updated.push(id.clone()),
        }
    }

    Ok(BatchResult { updated, failed })
}
