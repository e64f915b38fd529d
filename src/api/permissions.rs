use crate::{
    api::middleware::{ApiResult, AppState, AuthenticatedCustomer},
    models::*,
    services::permission_service,
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct ListPermissionsQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub search: Option<String>,
}

pub async fn list_permissions(
    State(state): State<AppState>,
    axum::Extension(_auth): axum::Extension<AuthenticatedCustomer>,
    Query(query): Query<ListPermissionsQuery>,
) -> ApiResult<Json<Paginated<PermissionResponse>>> {
    let page = query.page.unwrap_or(1).max(1);
    let limit = query.limit.unwrap_or(10).clamp(1, 100);

    let response =
        permission_service::list_permissions(&state.db, page, limit, query.search.as_deref())
            .await?;

    Ok(Json(response))
}

pub async fn get_permission(
    State(state): State<AppState>,
    axum::Extension(_auth): axum::Extension<AuthenticatedCustomer>,
    Path(id): Path<String>,
) -> ApiResult<Json<PermissionResponse>> {
    let response = permission_service::get_permission(&state.db, &id).await?;
    Ok(Json(response))
}

pub async fn create_permission(
    State(state): State<AppState>,
    axum::Extension(_auth): axum::Extension<AuthenticatedCustomer>,
    Json(request): Json<CreatePermissionRequest>,
) -> ApiResult<(StatusCode, Json<PermissionResponse>)> {
    let response = permission_service::create_permission(&state.db, request).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

pub async fn update_permission(
    State(state): State<AppState>,
    axum::Extension(_auth): axum::Extension<AuthenticatedCustomer>,
    Path(id): Path<String>,
    Json(request): Json<UpdatePermissionRequest>,
) -> ApiResult<Json<PermissionResponse>> {
    let response = permission_service::update_permission(&state.db, &id, request).await?;
    Ok(Json(response))
}

pub async fn delete_permission(
    State(state): State<AppState>,
    axum::Extension(_auth): axum::Extension<AuthenticatedCustomer>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    permission_service::delete_permission(&state.db, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}
