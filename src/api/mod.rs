// src/api/mod.rs

pub mod error;
pub mod extract;
pub mod http;

pub use error::{ApiError, ApiResult};
pub use extract::AuthUser;
