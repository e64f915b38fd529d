use crate::{api::middleware::error::ApiError, database::Database, models::*};
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub session_duration_hours: i64,
}

/// Extract and validate the session token from the Authorization header.
/// On success the resolved customer is stored in request extensions; the
/// access gate re-resolves the role/permission graph itself on every call.
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let auth_header = request
        .headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok());

    let token = if let Some(auth_value) = auth_header {
        if let Some(token) = auth_value.strip_prefix("Bearer ") {
            token
        } else {
            return Err(ApiError::Unauthorized);
        }
    } else {
        return Err(ApiError::Unauthorized);
    };

    // Validate session
    let session = state
        .db
        .get_session_by_token(token)
        .await?
        .ok_or(ApiError::Unauthorized)?;

    if session.is_expired() {
        // Delete expired session
        state.db.delete_session(token).await.ok();
        return Err(ApiError::Unauthorized);
    }

    // Resolve the caller
    let customer = state
        .db
        .get_customer_by_id(&session.customer_id)
        .await?
        .ok_or(ApiError::Unauthorized)?;

    let token_owned = token.to_string();

    request.extensions_mut().insert(AuthenticatedCustomer {
        customer,
        session,
        token: token_owned,
    });

    Ok(next.run(request).await)
}

#[derive(Clone)]
pub struct AuthenticatedCustomer {
    pub customer: Customer,
    pub session: Session,
    pub token: String,
}
