use crate::{
    api::middleware::{ApiResult, AppState, AuthenticatedCustomer},
    models::*,
    services,
};
use axum::{extract::State, http::StatusCode, Json};

pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    let result = services::auth::authenticate(
        &state.db,
        &request.name,
        &request.password,
        state.session_duration_hours,
    )
    .await?;

    let customer =
        services::customer_service::build_customer_response(&state.db, result.customer).await?;

    Ok(Json(LoginResponse {
        token: result.session.token,
        expires_at: result.session.expires_at,
        customer,
    }))
}

pub async fn logout(
    State(state): State<AppState>,
    axum::Extension(auth): axum::Extension<AuthenticatedCustomer>,
) -> ApiResult<StatusCode> {
    state.db.delete_session(&auth.token).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn get_session(
    axum::Extension(auth): axum::Extension<AuthenticatedCustomer>,
) -> ApiResult<Json<SessionResponse>> {
    Ok(Json(SessionResponse {
        id: auth.session.id,
        customer_id: auth.session.customer_id,
        expires_at: auth.session.expires_at,
        created_at: auth.session.created_at,
    }))
}
