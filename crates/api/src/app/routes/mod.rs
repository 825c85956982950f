use axum::{
    Router,
    routing::{get, post},
};

pub mod auth;
pub mod pages;
pub mod system;

/// Router for every endpoint that looks at the session.
pub fn router() -> Router {
    Router::new()
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/logout", post(auth::logout))
        .route("/api/auth/me", get(auth::me))
        .route("/api/auth/permissions", get(auth::permissions))
        .route("/api/auth/brands", get(auth::brands))
        .route("/ip-kits/new", get(pages::new_ip_kit))
}
