use crate::{
    AppState,
    auth::AuthUser,
    error::{ApiError, ErrorResponse, StandardError},
    models::{
        LoginRequest, MessageResponse, PasswordUpdateRequest, PlaceRequest, PlaceResponse,
        RegisterRequest, TokenResponse,
    },
};
use axum::{
    Json,
    extract::{OriginalUri, Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;
use uuid::Uuid;

// --- Filter Structs ---

/// NameFilter
///
/// Query parameters for the name lookup endpoint (GET /places/name).
#[derive(Deserialize, utoipa::IntoParams)]
pub struct NameFilter {
    /// Display name to match, case-insensitively.
    pub name: String,
}

// --- Place Handlers ---

/// create_place
///
/// [Admin Route] Registers a new place. The slug and timestamps are derived
/// server-side; a duplicate (name, city, state) triple is rejected.
#[utoipa::path(
    post,
    path = "/places",
    request_body = PlaceRequest,
    responses(
        (status = 201, description = "Created", body = PlaceResponse),
        (status = 400, description = "Duplicate place", body = StandardError),
        (status = 403, description = "Not an admin", body = StandardError)
    )
)]
pub async fn create_place(
    AuthUser { role, .. }: AuthUser,
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    Json(payload): Json<PlaceRequest>,
) -> Result<(StatusCode, Json<PlaceResponse>), ErrorResponse> {
    if !role.is_admin() {
        return Err(ApiError::Forbidden.at(uri.path()));
    }
    let place = state
        .places
        .create(payload)
        .await
        .map_err(|e| e.at(uri.path()))?;
    Ok((StatusCode::CREATED, Json(place.into())))
}

/// edit_place
///
/// [Admin Route] Overwrites a place's name, city, and state. The slug is
/// recomputed from the new name and `updated_at` refreshed. Exposed under both
/// PUT and PATCH; the payload is total either way.
#[utoipa::path(
    put,
    path = "/places/{id}",
    params(("id" = Uuid, Path, description = "Place ID")),
    request_body = PlaceRequest,
    responses(
        (status = 200, description = "Updated", body = PlaceResponse),
        (status = 400, description = "Duplicate place", body = StandardError),
        (status = 404, description = "Not Found", body = StandardError)
    )
)]
pub async fn edit_place(
    AuthUser { role, .. }: AuthUser,
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    Path(id): Path<Uuid>,
    Json(payload): Json<PlaceRequest>,
) -> Result<Json<PlaceResponse>, ErrorResponse> {
    if !role.is_admin() {
        return Err(ApiError::Forbidden.at(uri.path()));
    }
    let place = state
        .places
        .edit(id, payload)
        .await
        .map_err(|e| e.at(uri.path()))?;
    Ok(Json(place.into()))
}

/// get_place_by_id
///
/// [Authenticated Route] Retrieves a single place.
#[utoipa::path(
    get,
    path = "/places/{id}",
    params(("id" = Uuid, Path, description = "Place ID")),
    responses(
        (status = 200, description = "Found", body = PlaceResponse),
        (status = 404, description = "Not Found", body = StandardError)
    )
)]
pub async fn get_place_by_id(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    Path(id): Path<Uuid>,
) -> Result<Json<PlaceResponse>, ErrorResponse> {
    let place = state
        .places
        .get_by_id(id)
        .await
        .map_err(|e| e.at(uri.path()))?;
    Ok(Json(place.into()))
}

/// get_all_places
///
/// [Authenticated Route] Lists every place in creation order.
#[utoipa::path(
    get,
    path = "/places",
    responses((status = 200, description = "All places", body = [PlaceResponse]))
)]
pub async fn get_all_places(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
) -> Result<Json<Vec<PlaceResponse>>, ErrorResponse> {
    let places = state.places.get_all().await.map_err(|e| e.at(uri.path()))?;
    Ok(Json(places.into_iter().map(Into::into).collect()))
}

/// get_places_by_page
///
/// [Authenticated Route] Lists one page of places. Out-of-range parameters are
/// clamped by the workflow service rather than rejected; pages past the end
/// come back empty.
#[utoipa::path(
    get,
    path = "/places/{page}/{size}",
    params(
        ("page" = i64, Path, description = "Zero-based page index"),
        ("size" = i64, Path, description = "Requested page size")
    ),
    responses((status = 200, description = "One page of places", body = [PlaceResponse]))
)]
pub async fn get_places_by_page(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    Path((page, size)): Path<(i64, i64)>,
) -> Result<Json<Vec<PlaceResponse>>, ErrorResponse> {
    let places = state
        .places
        .get_page(page, size)
        .await
        .map_err(|e| e.at(uri.path()))?;
    Ok(Json(places.into_iter().map(Into::into).collect()))
}

/// get_place_by_name
///
/// [Authenticated Route] Case-insensitive exact-name lookup. No match is a
/// 404, not an empty list.
#[utoipa::path(
    get,
    path = "/places/name",
    params(NameFilter),
    responses(
        (status = 200, description = "Matching places", body = [PlaceResponse]),
        (status = 404, description = "No match", body = StandardError)
    )
)]
pub async fn get_place_by_name(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    Query(filter): Query<NameFilter>,
) -> Result<Json<Vec<PlaceResponse>>, ErrorResponse> {
    let places = state
        .places
        .get_by_name(&filter.name)
        .await
        .map_err(|e| e.at(uri.path()))?;
    Ok(Json(places.into_iter().map(Into::into).collect()))
}

/// delete_place
///
/// [Admin Route] Hard-deletes a place.
#[utoipa::path(
    delete,
    path = "/places/{id}",
    params(("id" = Uuid, Path, description = "Place ID")),
    responses(
        (status = 200, description = "Deleted", body = MessageResponse),
        (status = 404, description = "Not Found", body = StandardError)
    )
)]
pub async fn delete_place(
    AuthUser { role, .. }: AuthUser,
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageResponse>, ErrorResponse> {
    if !role.is_admin() {
        return Err(ApiError::Forbidden.at(uri.path()));
    }
    state
        .places
        .delete(id)
        .await
        .map_err(|e| e.at(uri.path()))?;
    Ok(Json(MessageResponse::new("Place deleted successfully")))
}

// --- User Handlers ---

/// login
///
/// [Public Route] Verifies credentials and returns a signed bearer token.
/// Unknown usernames and wrong passwords are indistinguishable to the caller.
#[utoipa::path(
    post,
    path = "/users/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Token issued", body = TokenResponse),
        (status = 401, description = "Bad credentials", body = StandardError)
    )
)]
pub async fn login(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<TokenResponse>, ErrorResponse> {
    let token = state
        .users
        .login(payload)
        .await
        .map_err(|e| e.at(uri.path()))?;
    Ok(Json(TokenResponse { token }))
}

/// create_user
///
/// [Admin Route] Registers a new user with the requested role. The password
/// is hashed before it reaches the store.
#[utoipa::path(
    post,
    path = "/users",
    request_body = RegisterRequest,
    responses(
        (status = 200, description = "Created", body = MessageResponse),
        (status = 400, description = "Username taken", body = StandardError)
    )
)]
pub async fn create_user(
    AuthUser { role, .. }: AuthUser,
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    Json(payload): Json<RegisterRequest>,
) -> Result<Json<MessageResponse>, ErrorResponse> {
    if !role.is_admin() {
        return Err(ApiError::Forbidden.at(uri.path()));
    }
    state
        .users
        .register(payload)
        .await
        .map_err(|e| e.at(uri.path()))?;
    Ok(Json(MessageResponse::new("User created with success!")))
}

/// update_user
///
/// [Admin Route] Rotates a user's password.
#[utoipa::path(
    put,
    path = "/users/{id}",
    params(("id" = Uuid, Path, description = "User ID")),
    request_body = PasswordUpdateRequest,
    responses(
        (status = 200, description = "Updated", body = MessageResponse),
        (status = 404, description = "Not Found", body = StandardError)
    )
)]
pub async fn update_user(
    AuthUser { role, .. }: AuthUser,
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    Path(id): Path<Uuid>,
    Json(payload): Json<PasswordUpdateRequest>,
) -> Result<Json<MessageResponse>, ErrorResponse> {
    if !role.is_admin() {
        return Err(ApiError::Forbidden.at(uri.path()));
    }
    state
        .users
        .update_password(id, &payload.password)
        .await
        .map_err(|e| e.at(uri.path()))?;
    Ok(Json(MessageResponse::new("User updated with success!")))
}

/// delete_user
///
/// [Admin Route] Hard-deletes a user. Outstanding tokens for the subject stop
/// resolving immediately because the extractor re-checks the store.
#[utoipa::path(
    delete,
    path = "/users/{id}",
    params(("id" = Uuid, Path, description = "User ID")),
    responses(
        (status = 200, description = "Deleted", body = MessageResponse),
        (status = 404, description = "Not Found", body = StandardError)
    )
)]
pub async fn delete_user(
    AuthUser { role, .. }: AuthUser,
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageResponse>, ErrorResponse> {
    if !role.is_admin() {
        return Err(ApiError::Forbidden.at(uri.path()));
    }
    state
        .users
        .delete(id)
        .await
        .map_err(|e| e.at(uri.path()))?;
    Ok(Json(MessageResponse::new("User deleted with success!")))
}
