use crate::api::middleware::error::{ApiError, ApiResult};
use crate::database::Database;
use crate::models::{
    CreateModuleRequest, Module, ModuleResponse, Paginated, UpdateModuleRequest,
};

pub async fn list_modules(
    db: &Database,
    page: i64,
    limit: i64,
    search: Option<&str>,
) -> ApiResult<Paginated<ModuleResponse>> {
    let (modules, total) = db.list_modules(page, limit, search).await?;

    Ok(Paginated {
        items: modules.into_iter().map(ModuleResponse::from).collect(),
        total,
        page,
        limit,
    })
}

pub async fn get_module(db: &Database, id: &str) -> ApiResult<ModuleResponse> {
    let module = db
        .get_module_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Module not found".to_string()))?;

    Ok(module.into())
}

pub async fn create_module(db: &Database, request: CreateModuleRequest) -> ApiResult<ModuleResponse> {
    if request.name.trim().is_empty() {
        return Err(ApiError::BadRequest("name must not be empty".to_string()));
    }

    let module = Module::new(
        request.name.trim().to_string(),
        request.description,
        request.module_type,
    );
    db.create_module(&module).await?;

    Ok(module.into())
}

pub async fn update_module(
    db: &Database,
    id: &str,
    request: UpdateModuleRequest,
) -> ApiResult<ModuleResponse> {
    let mut module = db
        .get_module_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Module not found".to_string()))?;

    if let Some(name) = request.name {
        if name.trim().is_empty() {
            return Err(ApiError::BadRequest("name must not be empty".to_string()));
        }
        // Permissions reference the module by id, so renaming never
        // invalidates existing grants.
        module.name = name.trim().to_string();
    }

    if let Some(description) = request.description {
        module.description = Some(description);
    }

    if let Some(module_type) = request.module_type {
        module.module_type = Some(module_type);
    }

    module.updated_at = time::OffsetDateTime::now_utc()
        .format(&time::format_description::well_known::Rfc3339)
        .unwrap();

    db.update_module(&module).await?;

    Ok(module.into())
}

/// Deletion is blocked while any permission still references the module.
pub async fn delete_module(db: &Database, id: &str) -> ApiResult<()> {
    let referencing = db.count_permissions_referencing_module(id).await?;
    if referencing > 0 {
        return Err(ApiError::Conflict(format!(
            "Module is referenced by {} permission(s)",
            referencing
        )));
    }

    let deleted = db.delete_module(id).await?;
    if deleted == 0 {
        return Err(ApiError::NotFound("Module not found".to_string()));
    }

    Ok(())
}
