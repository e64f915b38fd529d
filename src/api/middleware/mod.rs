pub mod access;
pub mod auth;
pub mod error;

pub use access::*;
pub use auth::*;
pub use error::*;
