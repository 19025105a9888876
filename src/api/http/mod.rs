// src/api/http/mod.rs

pub mod auth;
pub mod chat;
pub mod dashboard;
pub mod health;
pub mod insights;
pub mod projects;
pub mod standups;
pub mod tasks;
pub mod teams;
pub mod users;

use axum::routing::get;
use axum::Router;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

use crate::state::AppState;

/// All `/api` routes, one sub-router per domain.
pub fn api_router() -> Router<Arc<AppState>> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/users", users::router())
        .nest("/teams", teams::router())
        .nest("/projects", projects::router())
        .nest("/tasks", tasks::router())
        .nest("/chat", chat::router())
        .nest("/standups", standups::router())
        .nest("/insights", insights::router())
        .nest("/dashboard", dashboard::router())
}

/// The full application: health probe + API + CORS.
pub fn app_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health::health_check))
        .nest("/api", api_router())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
