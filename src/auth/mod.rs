// src/auth/mod.rs

pub mod jwt;
pub mod models;
pub mod password;
pub mod service;

pub use jwt::{create_token, verify_token, Claims};
pub use models::{AuthResponse, LoginRequest, RegisterRequest};
pub use service::AuthService;
