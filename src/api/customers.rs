use crate::{
    api::middleware::{ApiResult, AppState, AuthenticatedCustomer},
    models::*,
    services::customer_service,
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct ListCustomersQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub search: Option<String>,
    pub company: Option<String>,
}

pub async fn list_customers(
    State(state): State<AppState>,
    axum::Extension(_auth): axum::Extension<AuthenticatedCustomer>,
    Query(query): Query<ListCustomersQuery>,
) -> ApiResult<Json<Paginated<CustomerResponse>>> {
    let page = query.page.unwrap_or(1).max(1);
    let limit = query.limit.unwrap_or(10).clamp(1, 100);

    let response = customer_service::list_customers(
        &state.db,
        page,
        limit,
        query.search.as_deref(),
        query.company.as_deref(),
    )
    .await?;

    Ok(Json(response))
}

pub async fn get_customer(
    State(state): State<AppState>,
    axum::Extension(_auth): axum::Extension<AuthenticatedCustomer>,
    Path(id): Path<String>,
) -> ApiResult<Json<CustomerResponse>> {
    let response = customer_service::get_customer(&state.db, &id).await?;
    Ok(Json(response))
}

pub async fn create_customer(
    State(state): State<AppState>,
    axum::Extension(_auth): axum::Extension<AuthenticatedCustomer>,
    Json(request): Json<CreateCustomerRequest>,
) -> ApiResult<(StatusCode, Json<CustomerResponse>)> {
    let response = customer_service::create_customer(&state.db, request).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

pub async fn update_customer(
    State(state): State<AppState>,
    axum::Extension(_auth): axum::Extension<AuthenticatedCustomer>,
    Path(id): Path<String>,
    Json(request): Json<UpdateCustomerRequest>,
) -> ApiResult<Json<CustomerResponse>> {
    let response = customer_service::update_customer(&state.db, &id, request).await?;
    Ok(Json(response))
}

pub async fn delete_customer(
    State(state): State<AppState>,
    axum::Extension(_auth): axum::Extension<AuthenticatedCustomer>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    customer_service::delete_customer(&state.db, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn batch_delete_customers(
    State(state): State<AppState>,
    axum::Extension(_auth): axum::Extension<AuthenticatedCustomer>,
    Json(request): Json<BatchDeleteRequest>,
) -> ApiResult<Json<BatchResult>> {
    let response = customer_service::batch_delete(&state.db, &request.ids).await?;
    Ok(Json(response))
}
