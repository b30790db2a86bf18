use crate::{AppState, handlers};
use axum::{Router, routing::get};

/// Authenticated Router Module
///
/// The read-only place surface, available to any user who passes the
/// authentication layer. Every route here is wrapped by the auth middleware
/// in `create_router`, so the handlers themselves never re-check identity.
pub fn authenticated_routes() -> Router<AppState> {
    Router::<AppState>::new()
        // GET /places
        // Lists every place in creation order.
        .route("/places", get(handlers::get_all_places))
        // GET /places/name?name=...
        // Case-insensitive exact-name lookup. Registered before the generic
        // {id} capture; the static segment takes priority in matching.
        .route("/places/name", get(handlers::get_place_by_name))
        // GET /places/{id}
        // Single-place retrieval by identifier.
        .route("/places/{id}", get(handlers::get_place_by_id))
        // GET /places/{page}/{size}
        // Paged listing. The workflow service clamps out-of-range parameters
        // instead of rejecting them.
        .route("/places/{page}/{size}", get(handlers::get_places_by_page))
}
