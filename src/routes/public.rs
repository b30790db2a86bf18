use crate::{AppState, handlers};
use axum::{
    Router,
    routing::{get, post},
};

/// Public Router Module
///
/// Defines endpoints that are accessible without credentials: the health
/// probe used by monitoring, and the login endpoint that bootstraps every
/// authenticated session.
pub fn public_routes() -> Router<AppState> {
    Router::new()
        // GET /health
        // A simple, unauthenticated endpoint used for monitoring and load
        // balancer checks. Returns "ok" immediately.
        .route("/health", get(|| async { "ok" }))
        // POST /users/login
        // Credential verification and token issuance. The only user-facing
        // endpoint that accepts a plain-text password.
        .route("/users/login", post(handlers::login))
}
