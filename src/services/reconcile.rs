//! Permission reconciliation: turns (module, requested actions) pairs into
//! permission ids, reusing existing records keyed by (module, canonical
//! action set) and creating new ones only when no match exists.

use crate::api::middleware::error::{ApiError, ApiResult};
use crate::database::Database;
use crate::models::{access_label, access_to_json, canonical_access, Module, Permission};
use crate::models::{Action, PermissionItem};

/// Resolves each item to a permission id. All items are validated before
/// anything is persisted, so a bad item aborts the whole call with nothing
/// written; the failing item is identified by index in the error.
pub async fn reconcile_permissions(
    db: &Database,
    items: &[PermissionItem],
) -> ApiResult<Vec<String>> {
    let mut resolved: Vec<(Module, Vec<Action>)> = Vec::with_capacity(items.len());

    for (index, item) in items.iter().enumerate() {
        if item.module_id.trim().is_empty() {
            return Err(ApiError::BadRequest(format!(
                "permission item {}: module_id is required",
                index
            )));
        }

        let module = db
            .get_module_by_id(&item.module_id)
            .await?
            .ok_or_else(|| {
                ApiError::NotFound(format!(
                    "permission item {}: module '{}' not found",
                    index, item.module_id
                ))
            })?;

        let access = canonical_access(&item.access);
        if access.is_empty() {
            return Err(ApiError::BadRequest(format!(
                "permission item {}: access must contain at least one of create/read/update/delete",
                index
            )));
        }

        resolved.push((module, access));
    }

    let mut ids = Vec::with_capacity(resolved.len());
    for (module, access) in resolved {
        ids.push(resolve_one(db, &module, &access).await?);
    }

    Ok(ids)
}

async fn resolve_one(db: &Database, module: &Module, access: &[Action]) -> ApiResult<String> {
    let access_json = access_to_json(access);

    if let Some(existing) = db
        .find_permission_by_module_and_access(&module.id, &access_json)
        .await?
    {
        return Ok(existing.id);
    }

    let name = format!("{} - {}", module.name, access_label(access));
    let permission = Permission::new(name, module.id.clone(), access.to_vec());

    match db.create_permission(&permission).await {
        Ok(()) => Ok(permission.id),
        // Lost the create race to a concurrent request; the store's
        // UNIQUE(module_id, access) fired, so re-read the winner.
        Err(ApiError::Conflict(_)) => {
            let existing = db
                .find_permission_by_module_and_access(&module.id, &access_json)
                .await?
                .ok_or_else(|| {
                    ApiError::Conflict(format!(
                        "permission for module '{}' raced and could not be re-read",
                        module.name
                    ))
                })?;
            Ok(existing.id)
        }
        Err(e) => Err(e),
    }
}
