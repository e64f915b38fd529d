use crate::{
    api::middleware::{ApiResult, AppState, AuthenticatedCustomer},
    models::*,
    services::module_service,
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct ListModulesQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub search: Option<String>,
}

pub async fn list_modules(
    State(state): State<AppState>,
    axum::Extension(_auth): axum::Extension<AuthenticatedCustomer>,
    Query(query): Query<ListModulesQuery>,
) -> ApiResult<Json<Paginated<ModuleResponse>>> {
    let page = query.page.unwrap_or(1).max(1);
    let limit = query.limit.unwrap_or(10).clamp(1, 100);

    let response =
        module_service::list_modules(&state.db, page, limit, query.search.as_deref()).await?;

    Ok(Json(response))
}

pub async fn get_module(
    State(state): State<AppState>,
    axum::Extension(_auth): axum::Extension<AuthenticatedCustomer>,
    Path(id): Path<String>,
) -> ApiResult<Json<ModuleResponse>> {
    let response = module_service::get_module(&state.db, &id).await?;
    Ok(Json(response))
}

pub async fn create_module(
    State(state): State<AppState>,
    axum::Extension(_auth): axum::Extension<AuthenticatedCustomer>,
    Json(request): Json<CreateModuleRequest>,
) -> ApiResult<(StatusCode, Json<ModuleResponse>)> {
    let response = module_service::create_module(&state.db, request).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

pub async fn update_module(
    State(state): State<AppState>,
    axum::Extension(_auth): axum::Extension<AuthenticatedCustomer>,
    Path(id): Path<String>,
    Json(request): Json<UpdateModuleRequest>,
) -> ApiResult<Json<ModuleResponse>> {
    let response = module_service::update_module(&state.db, &id, request).await?;
    Ok(Json(response))
}

pub async fn delete_module(
    State(state): State<AppState>,
    axum::Extension(_auth): axum::Extension<AuthenticatedCustomer>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    module_service::delete_module(&state.db, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}
