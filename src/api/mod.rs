pub mod middleware;

pub mod auth;
pub mod customers;
pub mod modules;
pub mod permissions;
pub mod roles;
pub mod router;

pub use middleware::*;
