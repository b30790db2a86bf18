use axum::{
    Router,
    extract::{FromRef, Request},
    http::HeaderName,
    middleware::{self, Next},
    response::Response,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::{DefaultOnResponse, TraceLayer},
};
use tracing::{Level, Span};

// --- Module Structure ---

// Core application services and components.
pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod password;
pub mod repository;
pub mod service;
pub mod slug;

// Module for routing segregation (Public, Authenticated, Admin).
pub mod routes;
use auth::AuthUser;
use routes::{admin, authenticated, public};

// --- Public Re-exports ---

// Makes core state types easily accessible to the application entry point
// and the integration tests.
pub use config::AppConfig;
pub use password::{Argon2PasswordService, MockPasswordService, PasswordState};
pub use repository::{InMemoryRepository, PostgresRepository, RepositoryState};
pub use service::{PlaceService, UserService};

/// ApiDoc
///
/// Auto-generates the OpenAPI documentation (Swagger JSON) for the service,
/// aggregating every handler decorated with `#[utoipa::path]` and the schemas
/// they reference. Served at `/api-docs/openapi.json`.
#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::create_place, handlers::edit_place, handlers::get_place_by_id,
        handlers::get_all_places, handlers::get_places_by_page, handlers::get_place_by_name,
        handlers::delete_place, handlers::login, handlers::create_user,
        handlers::update_user, handlers::delete_user
    ),
    components(
        schemas(
            models::PlaceRequest, models::PlaceResponse, models::LoginRequest,
            models::TokenResponse, models::RegisterRequest, models::PasswordUpdateRequest,
            models::MessageResponse, models::Role, error::StandardError,
        )
    ),
    tags(
        (name = "places-api", description = "Places registry API")
    )
)]
struct ApiDoc;

/// AppState
///
/// The single, thread-safe, immutable container holding all application
/// services and configuration, shared across every incoming request.
#[derive(Clone)]
pub struct AppState {
    /// Repository layer, shared with the auth extractor for user lookups.
    pub repo: RepositoryState,
    /// Place workflow service.
    pub places: PlaceService,
    /// User workflow service (credentials, tokens, account management).
    pub users: UserService,
    /// The loaded, immutable environment configuration.
    pub config: AppConfig,
}

impl AppState {
    /// Wires the state from its three injected capabilities. The workflow
    /// services share the repository handle with the auth extractor.
    pub fn new(repo: RepositoryState, hasher: PasswordState, config: AppConfig) -> Self {
        Self {
            places: PlaceService::new(repo.clone()),
            users: UserService::new(repo.clone(), hasher, config.clone()),
            repo,
            config,
        }
    }
}

// --- Axum FromRef Extractor Implementations ---

// These allow the AuthUser extractor to pull exactly the components it needs
// from the shared AppState.

impl FromRef<AppState> for RepositoryState {
    fn from_ref(app_state: &AppState) -> RepositoryState {
        app_state.repo.clone()
    }
}

impl FromRef<AppState> for AppConfig {
    fn from_ref(app_state: &AppState) -> AppConfig {
        app_state.config.clone()
    }
}

/// auth_middleware
///
/// Enforces authentication for the authenticated route group. `AuthUser`
/// implements `FromRequestParts`, so a failed extraction (missing, invalid,
/// or expired token, unknown subject) rejects the request with 401 before the
/// handler runs.
async fn auth_middleware(_auth_user: AuthUser, request: Request, next: Next) -> Response {
    next.run(request).await
}

/// create_router
///
/// Assembles the application's entire routing structure, applies global and
/// scoped middleware, and registers the application state.
pub fn create_router(state: AppState) -> Router {
    // 1. CORS Configuration
    let cors = CorsLayer::new()
        .allow_methods(Any)
        .allow_origin(Any)
        .allow_headers(Any);

    // Header name constant for request correlation.
    let x_request_id = HeaderName::from_static("x-request-id");

    // 2. Base Router Assembly
    let base_router = Router::new()
        // Documentation: serve the auto-generated Swagger UI.
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        // Public routes: no middleware applied.
        .merge(public::public_routes())
        // Authenticated read routes: protected by the auth middleware.
        .merge(
            authenticated::authenticated_routes()
                .route_layer(middleware::from_fn_with_state(state.clone(), auth_middleware)),
        )
        // Admin routes: the handlers resolve AuthUser themselves and check
        // the ADMIN role, so no separate layer is required here.
        .merge(admin::admin_routes())
        // Apply the unified state to all routes.
        .with_state(state);

    // 3. Observability and Correlation Layers (applied outermost)
    base_router
        .layer(
            ServiceBuilder::new()
                // 3a. Request ID generation: a unique UUID per request.
                .layer(SetRequestIdLayer::new(x_request_id.clone(), MakeRequestUuid))
                // 3b. Request tracing: wraps the request/response lifecycle in
                // a span correlated by the generated request id.
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(trace_span_logger)
                        .on_response(
                            DefaultOnResponse::new()
                                .level(Level::INFO)
                                .latency_unit(tower_http::LatencyUnit::Millis),
                        ),
                )
                // 3c. Request ID propagation back to the client.
                .layer(PropagateRequestIdLayer::new(x_request_id)),
        )
        // 4. CORS layer, applied last.
        .layer(cors)
}

/// trace_span_logger
///
/// Customizes the `TraceLayer` span: the `x-request-id` header (when present)
/// is recorded next to the HTTP method and URI so every log line of a request
/// correlates on one id.
fn trace_span_logger(request: &axum::http::Request<axum::body::Body>) -> Span {
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|value| value.to_str().ok())
        .unwrap_or("unknown");

    tracing::info_span!(
        "http_request",
        method = ?request.method(),
        uri = ?request.uri(),
        req_id = %request_id,
    )
}
