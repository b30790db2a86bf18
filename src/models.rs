use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

// --- Core Application Schemas (Mapped to Database) ---

/// Place
///
/// A place record from the `places` table. The slug is derived from the name
/// at creation and on every rename; it is never accepted from callers.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, FromRow, Default)]
pub struct Place {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub city: String,
    pub state: String,
    // Set once at creation, immutable afterwards.
    pub created_at: DateTime<Utc>,
    // Refreshed on every successful mutation.
    pub updated_at: DateTime<Utc>,
}

/// User
///
/// A user record from the `users` table. The password column holds an
/// Argon2id hash, never the plain text.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, FromRow, Default)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub password: String,
    pub role: Role,
}

/// Role
///
/// The capability tag used for authorization. ADMIN implies everything USER
/// can do plus the mutating operations; the check is a plain enum comparison
/// at the handler boundary, not a hierarchy.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema, sqlx::Type, Default,
)]
#[serde(rename_all = "UPPERCASE")]
#[sqlx(type_name = "user_role", rename_all = "UPPERCASE")]
pub enum Role {
    Admin,
    #[default]
    User,
}

impl Role {
    pub fn is_admin(self) -> bool {
        self == Self::Admin
    }
}

// --- Request Payloads (Input Schemas) ---

/// PlaceRequest
///
/// Input payload for creating or editing a place (POST /places,
/// PUT/PATCH /places/{id}). All three fields are required and non-blank.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Default)]
pub struct PlaceRequest {
    #[schema(example = "Central Park")]
    pub name: String,
    #[schema(example = "New York")]
    pub city: String,
    #[schema(example = "NY")]
    pub state: String,
}

/// LoginRequest
///
/// Input payload for POST /users/login.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Default)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// RegisterRequest
///
/// Input payload for the admin-only user creation endpoint (POST /users).
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
    pub role: Role,
}

/// PasswordUpdateRequest
///
/// Input payload for rotating a user's password (PUT /users/{id}).
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Default)]
pub struct PasswordUpdateRequest {
    pub password: String,
}

// --- Response Payloads (Output Schemas) ---

/// PlaceResponse
///
/// Output shape for every place-returning endpoint. The identifier is
/// deliberately omitted from the wire format.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Default)]
pub struct PlaceResponse {
    pub name: String,
    pub slug: String,
    pub city: String,
    pub state: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Place> for PlaceResponse {
    fn from(place: Place) -> Self {
        Self {
            name: place.name,
            slug: place.slug,
            city: place.city,
            state: place.state,
            created_at: place.created_at,
            updated_at: place.updated_at,
        }
    }
}

/// TokenResponse
///
/// Output of a successful login.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Default)]
pub struct TokenResponse {
    pub token: String,
}

/// MessageResponse
///
/// Plain confirmation body for operations that return a message rather than
/// an entity (deletes, user management).
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Default)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

// --- Internal write payloads ---

/// PlaceUpdate
///
/// The field set applied by an edit. Built by the workflow service (which owns
/// slug recomputation and the `updated_at` refresh) and applied atomically by
/// the repository.
#[derive(Debug, Clone)]
pub struct PlaceUpdate {
    pub name: String,
    pub slug: String,
    pub city: String,
    pub state: String,
    pub updated_at: DateTime<Utc>,
}
