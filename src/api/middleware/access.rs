use crate::api::middleware::auth::{AppState, AuthenticatedCustomer};
use crate::api::middleware::error::ApiError;
use crate::services::access;
use axum::{extract::Request, middleware::Next, response::Response};

/// Authorization gate for a single route: given the requested action and
/// resource matchers, evaluates the authenticated caller's grant graph and
/// either continues the pipeline or short-circuits with 403. A missing
/// identity short-circuits with 401 before any evaluation happens.
pub fn require_access(
    state: AppState,
    action: &'static str,
    resources: &'static [&'static str],
) -> impl Fn(
    Request,
    Next,
) -> std::pin::Pin<
    Box<dyn std::future::Future<Output = Result<Response, ApiError>> + Send>,
> + Clone {
    move |request: Request, next: Next| {
        let state = state.clone();
        Box::pin(async move {
            let auth = request
                .extensions()
                .get::<AuthenticatedCustomer>()
                .cloned()
                .ok_or(ApiError::Unauthorized)?;

            let resources: Vec<String> = resources.iter().map(|r| r.to_string()).collect();
            let allowed =
                access::evaluate(&state.db, &auth.customer.id, action, &resources).await?;

            if !allowed {
                tracing::warn!(
                    "Access denied: customer {} lacks '{}' on {:?}",
                    auth.customer.email,
                    action,
                    resources
                );
                return Err(ApiError::Forbidden("Access denied".to_string()));
            }

            Ok(next.run(request).await)
        })
    }
}
