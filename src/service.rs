use chrono::Utc;
use uuid::Uuid;

use crate::{
    auth,
    config::AppConfig,
    error::{ApiError, PLACE_NOT_FOUND, USER_NOT_FOUND},
    models::{LoginRequest, Place, PlaceRequest, PlaceUpdate, RegisterRequest, User},
    password::PasswordState,
    repository::RepositoryState,
    slug::slugify,
};

/// Default and maximum page size for the paged place listing. Any requested
/// size outside the open interval (0, DEFAULT_PAGE_SIZE) collapses back to it.
pub const DEFAULT_PAGE_SIZE: i64 = 5;

/// PlaceService
///
/// The workflow layer for place records. Owns everything that is not plain
/// storage: slug derivation, identifier and timestamp generation, the
/// page-window clamping rules, and the mapping of empty lookups to NotFound.
/// The uniqueness invariant itself is enforced inside the repository's
/// transactional create/update so the check and the write stay atomic.
#[derive(Clone)]
pub struct PlaceService {
    repo: RepositoryState,
}

impl PlaceService {
    pub fn new(repo: RepositoryState) -> Self {
        Self { repo }
    }

    /// create
    ///
    /// Builds a fully-formed record (fresh id, derived slug, identical
    /// created/updated timestamps) and hands it to the transactional insert.
    /// A duplicate (name, city, state) triple surfaces as `Conflict`.
    pub async fn create(&self, request: PlaceRequest) -> Result<Place, ApiError> {
        let now = Utc::now();
        let place = Place {
            id: Uuid::new_v4(),
            slug: slugify(&request.name),
            name: request.name,
            city: request.city,
            state: request.state,
            created_at: now,
            updated_at: now,
        };
        self.repo.insert_place(place).await
    }

    /// edit
    ///
    /// Recomputes the slug from the incoming name and refreshes `updated_at`.
    /// The uniqueness check runs against the new values before the record is
    /// loaded, and treats the record being edited like any other row;
    /// re-submitting a place's current values therefore conflicts.
    pub async fn edit(&self, id: Uuid, request: PlaceRequest) -> Result<Place, ApiError> {
        let update = PlaceUpdate {
            slug: slugify(&request.name),
            name: request.name,
            city: request.city,
            state: request.state,
            updated_at: Utc::now(),
        };
        self.repo.update_place(id, update).await
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<Place, ApiError> {
        self.repo
            .find_place(id)
            .await?
            .ok_or_else(|| ApiError::NotFound(PLACE_NOT_FOUND.to_string()))
    }

    pub async fn get_all(&self) -> Result<Vec<Place>, ApiError> {
        self.repo.all_places().await
    }

    /// get_page
    ///
    /// Clamps the inputs before delegating: a negative page becomes 0, and any
    /// size that is not strictly inside (0, 5) collapses to the default of 5.
    /// The upper bound folding back to the default rather than capping is
    /// intentional, asymmetric as it is.
    pub async fn get_page(&self, page: i64, size: i64) -> Result<Vec<Place>, ApiError> {
        let size = if size >= DEFAULT_PAGE_SIZE || size <= 0 {
            DEFAULT_PAGE_SIZE
        } else {
            size
        };
        let page = page.max(0);
        self.repo.places_page(page * size, size).await
    }

    /// get_by_name
    ///
    /// Case-insensitive exact match. Zero matches fail with `NotFound` rather
    /// than returning an empty list.
    pub async fn get_by_name(&self, name: &str) -> Result<Vec<Place>, ApiError> {
        let places = self.repo.places_by_name(name).await?;
        if places.is_empty() {
            return Err(ApiError::NotFound(PLACE_NOT_FOUND.to_string()));
        }
        Ok(places)
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), ApiError> {
        if !self.repo.delete_place(id).await? {
            return Err(ApiError::NotFound(PLACE_NOT_FOUND.to_string()));
        }
        Ok(())
    }
}

/// UserService
///
/// The workflow layer for identity: credential verification and token
/// issuance, registration, password rotation, and removal. Password hashing
/// goes through the injected `PasswordService` capability; this service never
/// sees or stores plain text beyond the scope of a single call.
#[derive(Clone)]
pub struct UserService {
    repo: RepositoryState,
    hasher: PasswordState,
    config: AppConfig,
}

impl UserService {
    pub fn new(repo: RepositoryState, hasher: PasswordState, config: AppConfig) -> Self {
        Self {
            repo,
            hasher,
            config,
        }
    }

    /// login
    ///
    /// Verifies the credentials and issues a signed token. Unknown usernames
    /// and wrong passwords produce the same `Unauthorized` failure.
    pub async fn login(&self, request: LoginRequest) -> Result<String, ApiError> {
        let user = self
            .repo
            .find_user_by_username(&request.username)
            .await?
            .ok_or(ApiError::Unauthorized)?;

        if !self.hasher.verify(&request.password, &user.password) {
            return Err(ApiError::Unauthorized);
        }

        auth::generate_token(user.id, &self.config)
    }

    /// register
    ///
    /// A taken username fails with `Conflict`; otherwise the password is
    /// hashed and the record persisted with the requested role.
    pub async fn register(&self, request: RegisterRequest) -> Result<User, ApiError> {
        let user = User {
            id: Uuid::new_v4(),
            username: request.username,
            password: self.hasher.hash(&request.password)?,
            role: request.role,
        };
        self.repo.insert_user(user).await
    }

    pub async fn update_password(&self, id: Uuid, password: &str) -> Result<(), ApiError> {
        let hash = self.hasher.hash(password)?;
        if !self.repo.update_user_password(id, &hash).await? {
            return Err(ApiError::NotFound(USER_NOT_FOUND.to_string()));
        }
        Ok(())
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), ApiError> {
        if !self.repo.delete_user(id).await? {
            return Err(ApiError::NotFound(USER_NOT_FOUND.to_string()));
        }
        Ok(())
    }
}
