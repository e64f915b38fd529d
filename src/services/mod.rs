pub mod access;
pub mod auth;
pub mod customer_service;
pub mod module_service;
pub mod permission_service;
pub mod reconcile;
pub mod role_service;
