pub mod customer;
pub mod module;
pub mod permission;
pub mod role;
pub mod session;

pub use customer::*;
pub use module::*;
pub use permission::*;
pub use role::*;
pub use session::*;

use serde::Serialize;

/// Standard envelope for paginated list endpoints.
#[derive(Debug, Serialize)]
pub struct Paginated<T> {
    pub items: Vec<T>,
    pub total: i64,
    pub page: i64,
    pub limit: i64,
}
