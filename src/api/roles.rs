use crate::{
    api::middleware::{ApiError, ApiResult, AppState, AuthenticatedCustomer},
    models::*,
    services::role_service,
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct ListRolesQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub search: Option<String>,
    pub status: Option<String>,
    pub company: Option<String>,
}

pub async fn list_roles(
    State(state): State<AppState>,
    axum::Extension(_auth): axum::Extension<AuthenticatedCustomer>,
    Query(query): Query<ListRolesQuery>,
) -> ApiResult<Json<Paginated<RoleResponse>>> {
    let page = query.page.unwrap_or(1).max(1);
    let limit = query.limit.unwrap_or(10).clamp(1, 100);

    let status = match query.status.as_deref() {
        Some(raw) => Some(
            RoleStatus::parse(raw)
                .ok_or_else(|| ApiError::BadRequest(format!("Unknown status '{}'", raw)))?,
        ),
        None => None,
    };

    let response = role_service::list_roles(
        &state.db,
        page,
        limit,
        query.search.as_deref(),
        status,
        query.company.as_deref(),
    )
    .await?;

    Ok(Json(response))
}

pub async fn get_role(
    State(state): State<AppState>,
    axum::Extension(_auth): axum::Extension<AuthenticatedCustomer>,
    Path(id): Path<String>,
) -> ApiResult<Json<RoleResponse>> {
    let response = role_service::get_role(&state.db, &id).await?;
    Ok(Json(response))
}

pub async fn create_role(
    State(state): State<AppState>,
    axum::Extension(auth): axum::Extension<AuthenticatedCustomer>,
    Json(request): Json<CreateRoleRequest>,
) -> ApiResult<(StatusCode, Json<RoleResponse>)> {
    let response = role_service::create_role(&state.db, &auth.customer.id, request).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

pub async fn replace_permissions(
    State(state): State<AppState>,
    axum::Extension(_auth): axum::Extension<AuthenticatedCustomer>,
    Path(id): Path<String>,
    Json(request): Json<ReplacePermissionsRequest>,
) -> ApiResult<Json<RoleResponse>> {
    let response =
        role_service::replace_permissions(&state.db, &id, &request.permissions).await?;
    Ok(Json(response))
}

pub async fn update_status(
    State(state): State<AppState>,
    axum::Extension(auth): axum::Extension<AuthenticatedCustomer>,
    Path(id): Path<String>,
    Json(request): Json<UpdateStatusRequest>,
) -> ApiResult<Json<RoleResponse>> {
    let response = role_service::update_status(
        &state.db,
        &id,
        &auth.customer.id,
        request.status,
        request.remarks.as_deref(),
    )
    .await?;
    Ok(Json(response))
}

pub async fn batch_update_status(
    State(state): State<AppState>,
    axum::Extension(auth): axum::Extension<AuthenticatedCustomer>,
    Json(request): Json<BatchStatusRequest>,
) -> ApiResult<Json<BatchResult>> {
    let response = role_service::batch_update_status(
        &state.db,
        &request.ids,
        &auth.customer.id,
        request.status,
        request.remarks.as_deref(),
    )
    .await?;
    Ok(Json(response))
}

pub async fn delete_role(
    State(state): State<AppState>,
    axum::Extension(_auth): axum::Extension<AuthenticatedCustomer>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    role_service::delete_role(&state.db, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn batch_delete_roles(
    State(state): State<AppState>,
    axum::Extension(_auth): axum::Extension<AuthenticatedCustomer>,
    Json(request): Json<BatchDeleteRequest>,
) -> ApiResult<Json<BatchResult>> {
    let response = role_service::batch_delete(&state.db, &request.ids).await?;
    Ok(Json(response))
}
