use crate::{AppState, handlers};
use axum::{
    Router,
    routing::{delete, post, put},
};

/// Admin Router Module
///
/// Every mutating route in the system: place creation, editing, and deletion,
/// plus user management. The handlers resolve `AuthUser` directly and reject
/// non-ADMIN callers with 403 before touching the workflow layer, so this
/// router needs no middleware of its own.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        // POST /places
        // Registers a new place; the uniqueness invariant is enforced inside
        // the transactional create.
        .route("/places", post(handlers::create_place))
        // PUT/PATCH/DELETE /places/{id}
        // Full-payload edit (slug recompute included) and hard delete.
        .route(
            "/places/{id}",
            put(handlers::edit_place)
                .patch(handlers::edit_place)
                .delete(handlers::delete_place),
        )
        // POST /users
        // User registration with an explicit role. Admin-only; there is no
        // self-service signup.
        .route("/users", post(handlers::create_user))
        // PUT/DELETE /users/{id}
        // Password rotation and account removal.
        .route(
            "/users/{id}",
            put(handlers::update_user).delete(handlers::delete_user),
        )
}
