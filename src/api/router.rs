use crate::api;
use crate::api::middleware::{require_access, require_auth, AppState};
use axum::{
    middleware::{from_fn, from_fn_with_state},
    routing::{delete, get, patch, post, put},
    Router,
};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    limit::RequestBodyLimitLayer,
    trace::TraceLayer,
};

const MAX_BODY_BYTES: usize = 1024 * 1024;

/// Assemble the full application router. Every route under /rbac except
/// login goes through `require_auth`; resource routes are additionally
/// gated on the caller's grants for the matching module.
pub fn build_router(state: AppState, allowed_origins: &[String]) -> Router {
    // Customer routes, grouped by the action each method requires
    let customers_read = Router::new()
        .route("/rbac/customers", get(api::customers::list_customers))
        .route("/rbac/customers/:id", get(api::customers::get_customer))
        .route_layer(from_fn(require_access(
            state.clone(),
            "read",
            &["customers"],
        )));

    let customers_create = Router::new()
        .route("/rbac/customers", post(api::customers::create_customer))
        .route_layer(from_fn(require_access(
            state.clone(),
            "create",
            &["customers"],
        )));

    let customers_update = Router::new()
        .route("/rbac/customers/:id", put(api::customers::update_customer))
        .route_layer(from_fn(require_access(
            state.clone(),
            "update",
            &["customers"],
        )));

    let customers_delete = Router::new()
        .route(
            "/rbac/customers/:id",
            delete(api::customers::delete_customer),
        )
        .route(
            "/rbac/customers",
            delete(api::customers::batch_delete_customers),
        )
        .route_layer(from_fn(require_access(
            state.clone(),
            "delete",
            &["customers"],
        )));

    // Role routes
    let roles_read = Router::new()
        .route("/rbac/roles", get(api::roles::list_roles))
        .route("/rbac/roles/:id", get(api::roles::get_role))
        .route_layer(from_fn(require_access(state.clone(), "read", &["roles"])));

    let roles_create = Router::new()
        .route("/rbac/roles", post(api::roles::create_role))
        .route_layer(from_fn(require_access(
            state.clone(),
            "create",
            &["roles"],
        )));

    let roles_update = Router::new()
        .route(
            "/rbac/roles/:id/permissions",
            put(api::roles::replace_permissions),
        )
        .route("/rbac/roles/:id/status", patch(api::roles::update_status))
        .route("/rbac/roles/status", patch(api::roles::batch_update_status))
        .route_layer(from_fn(require_access(
            state.clone(),
            "update",
            &["roles"],
        )));

    let roles_delete = Router::new()
        .route("/rbac/roles/:id", delete(api::roles::delete_role))
        .route("/rbac/roles", delete(api::roles::batch_delete_roles))
        .route_layer(from_fn(require_access(
            state.clone(),
            "delete",
            &["roles"],
        )));

    // Permission routes
    let permissions_read = Router::new()
        .route("/rbac/permissions", get(api::permissions::list_permissions))
        .route(
            "/rbac/permissions/:id",
            get(api::permissions::get_permission),
        )
        .route_layer(from_fn(require_access(
            state.clone(),
            "read",
            &["permissions"],
        )));

    let permissions_create = Router::new()
        .route(
            "/rbac/permissions",
            post(api::permissions::create_permission),
        )
        .route_layer(from_fn(require_access(
            state.clone(),
            "create",
            &["permissions"],
        )));

    let permissions_update = Router::new()
        .route(
            "/rbac/permissions/:id",
            put(api::permissions::update_permission),
        )
        .route_layer(from_fn(require_access(
            state.clone(),
            "update",
            &["permissions"],
        )));

    let permissions_delete = Router::new()
        .route(
            "/rbac/permissions/:id",
            delete(api::permissions::delete_permission),
        )
        .route_layer(from_fn(require_access(
            state.clone(),
            "delete",
            &["permissions"],
        )));

    // Module routes
    let modules_read = Router::new()
        .route("/rbac/modules", get(api::modules::list_modules))
        .route("/rbac/modules/:id", get(api::modules::get_module))
        .route_layer(from_fn(require_access(
            state.clone(),
            "read",
            &["modules"],
        )));

    let modules_create = Router::new()
        .route("/rbac/modules", post(api::modules::create_module))
        .route_layer(from_fn(require_access(
            state.clone(),
            "create",
            &["modules"],
        )));

    let modules_update = Router::new()
        .route("/rbac/modules/:id", put(api::modules::update_module))
        .route_layer(from_fn(require_access(
            state.clone(),
            "update",
            &["modules"],
        )));

    let modules_delete = Router::new()
        .route("/rbac/modules/:id", delete(api::modules::delete_module))
        .route_layer(from_fn(require_access(
            state.clone(),
            "delete",
            &["modules"],
        )));

    // Session routes carry no access gate beyond authentication
    let session = Router::new()
        .route("/rbac/customers/logout", post(api::auth::logout))
        .route("/rbac/session", get(api::auth::get_session));

    let protected = Router::new()
        .merge(customers_read)
        .merge(customers_create)
        .merge(customers_update)
        .merge(customers_delete)
        .merge(roles_read)
        .merge(roles_create)
        .merge(roles_update)
        .merge(roles_delete)
        .merge(permissions_read)
        .merge(permissions_create)
        .merge(permissions_update)
        .merge(permissions_delete)
        .merge(modules_read)
        .merge(modules_create)
        .merge(modules_update)
        .merge(modules_delete)
        .merge(session)
        .layer(from_fn_with_state(state.clone(), require_auth));

    let cors = if allowed_origins.is_empty() {
        CorsLayer::permissive()
    } else {
        let origins: Vec<_> = allowed_origins
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(tower_http::cors::Any)
            .allow_headers(tower_http::cors::Any)
    };

    Router::new()
        .route("/health", get(health_handler))
        .route("/rbac/customers/login", post(api::auth::login))
        .merge(protected)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .with_state(state)
}

async fn health_handler() -> &'static str {
    "OK"
}
