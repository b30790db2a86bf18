use crate::{
    error::{ApiError, DUPLICATE_PLACE, DUPLICATE_USERNAME, PLACE_NOT_FOUND},
    models::{Place, PlaceUpdate, User},
};
use async_trait::async_trait;
use sqlx::PgPool;
use std::sync::{Arc, Mutex};
use uuid::Uuid;

/// Repository Trait
///
/// Defines the abstract contract for all persistence operations, allowing the
/// workflow services to interact with the data layer without knowing the
/// concrete implementation (Postgres in production, the in-memory store in
/// tests).
///
/// **Send + Sync + async_trait** are required to make the trait object
/// (`Arc<dyn Repository>`) safely shareable across Axum's asynchronous task
/// boundaries.
///
/// The mutating place operations run their uniqueness check and the write in
/// one transaction, so the check-then-write sequence is atomic with respect to
/// concurrent writers.
#[async_trait]
pub trait Repository: Send + Sync {
    // --- Place Retrieval ---
    async fn find_place(&self, id: Uuid) -> Result<Option<Place>, ApiError>;
    // Every record, in creation order.
    async fn all_places(&self) -> Result<Vec<Place>, ApiError>;
    // One page in creation order; out-of-range pages yield an empty list.
    async fn places_page(&self, offset: i64, limit: i64) -> Result<Vec<Place>, ApiError>;
    // Case-insensitive exact name match.
    async fn places_by_name(&self, name: &str) -> Result<Vec<Place>, ApiError>;

    // --- Place Mutation ---
    /// Inserts a fully-formed place. Fails with `Conflict` when another record
    /// already carries the same (name, city, state) triple, compared
    /// case-insensitively.
    async fn insert_place(&self, place: Place) -> Result<Place, ApiError>;
    /// Applies an edit. The uniqueness check against the incoming values runs
    /// first and treats the record being edited like any other row; a missing
    /// id fails with `NotFound` before any write.
    async fn update_place(&self, id: Uuid, update: PlaceUpdate) -> Result<Place, ApiError>;
    /// Hard delete. Returns true when a row was removed.
    async fn delete_place(&self, id: Uuid) -> Result<bool, ApiError>;

    // --- Users ---
    async fn find_user(&self, id: Uuid) -> Result<Option<User>, ApiError>;
    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, ApiError>;
    /// Inserts a user. Fails with `Conflict` when the username is taken.
    async fn insert_user(&self, user: User) -> Result<User, ApiError>;
    /// Stores a new password hash. Returns true when the user existed.
    async fn update_user_password(&self, id: Uuid, password: &str) -> Result<bool, ApiError>;
    /// Hard delete. Returns true when a row was removed.
    async fn delete_user(&self, id: Uuid) -> Result<bool, ApiError>;
}

/// RepositoryState
///
/// The concrete type used to share the persistence layer across the
/// application state.
pub type RepositoryState = Arc<dyn Repository>;

const PLACE_COLUMNS: &str = "id, name, slug, city, state, created_at, updated_at";

/// PostgresRepository
///
/// The concrete implementation of the `Repository` trait, backed by the
/// PostgreSQL connection pool.
pub struct PostgresRepository {
    pool: PgPool,
}

impl PostgresRepository {
    /// Creates a new repository instance using the initialized connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Repository for PostgresRepository {
    async fn find_place(&self, id: Uuid) -> Result<Option<Place>, ApiError> {
        let place = sqlx::query_as::<_, Place>(&format!(
            "SELECT {PLACE_COLUMNS} FROM places WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(place)
    }

    async fn all_places(&self) -> Result<Vec<Place>, ApiError> {
        let places = sqlx::query_as::<_, Place>(&format!(
            "SELECT {PLACE_COLUMNS} FROM places ORDER BY created_at ASC"
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(places)
    }

    async fn places_page(&self, offset: i64, limit: i64) -> Result<Vec<Place>, ApiError> {
        let places = sqlx::query_as::<_, Place>(&format!(
            "SELECT {PLACE_COLUMNS} FROM places ORDER BY created_at ASC LIMIT $1 OFFSET $2"
        ))
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;
        Ok(places)
    }

    async fn places_by_name(&self, name: &str) -> Result<Vec<Place>, ApiError> {
        let places = sqlx::query_as::<_, Place>(&format!(
            "SELECT {PLACE_COLUMNS} FROM places WHERE LOWER(name) = LOWER($1) \
             ORDER BY created_at ASC"
        ))
        .bind(name)
        .fetch_all(&self.pool)
        .await?;
        Ok(places)
    }

    /// insert_place
    ///
    /// Check and insert share one transaction; an early return rolls back.
    async fn insert_place(&self, place: Place) -> Result<Place, ApiError> {
        let mut tx = self.pool.begin().await?;

        let duplicates = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM places \
             WHERE LOWER(name) = LOWER($1) AND LOWER(city) = LOWER($2) \
               AND LOWER(state) = LOWER($3)",
        )
        .bind(&place.name)
        .bind(&place.city)
        .bind(&place.state)
        .fetch_one(&mut *tx)
        .await?;

        if duplicates > 0 {
            return Err(ApiError::Conflict(DUPLICATE_PLACE.to_string()));
        }

        sqlx::query(
            "INSERT INTO places (id, name, slug, city, state, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7)",
        )
        .bind(place.id)
        .bind(&place.name)
        .bind(&place.slug)
        .bind(&place.city)
        .bind(&place.state)
        .bind(place.created_at)
        .bind(place.updated_at)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(place)
    }

    /// update_place
    ///
    /// The uniqueness check runs against the incoming values before the record
    /// is even loaded, mirroring the create path.
    async fn update_place(&self, id: Uuid, update: PlaceUpdate) -> Result<Place, ApiError> {
        let mut tx = self.pool.begin().await?;

        let duplicates = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM places \
             WHERE LOWER(name) = LOWER($1) AND LOWER(city) = LOWER($2) \
               AND LOWER(state) = LOWER($3)",
        )
        .bind(&update.name)
        .bind(&update.city)
        .bind(&update.state)
        .fetch_one(&mut *tx)
        .await?;

        if duplicates > 0 {
            return Err(ApiError::Conflict(DUPLICATE_PLACE.to_string()));
        }

        let existing = sqlx::query_as::<_, Place>(&format!(
            "SELECT {PLACE_COLUMNS} FROM places WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| ApiError::NotFound(PLACE_NOT_FOUND.to_string()))?;

        sqlx::query(
            "UPDATE places SET name = $2, slug = $3, city = $4, state = $5, updated_at = $6 \
             WHERE id = $1",
        )
        .bind(id)
        .bind(&update.name)
        .bind(&update.slug)
        .bind(&update.city)
        .bind(&update.state)
        .bind(update.updated_at)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(Place {
            id,
            name: update.name,
            slug: update.slug,
            city: update.city,
            state: update.state,
            created_at: existing.created_at,
            updated_at: update.updated_at,
        })
    }

    async fn delete_place(&self, id: Uuid) -> Result<bool, ApiError> {
        let result = sqlx::query("DELETE FROM places WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn find_user(&self, id: Uuid) -> Result<Option<User>, ApiError> {
        let user =
            sqlx::query_as::<_, User>("SELECT id, username, password, role FROM users WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(user)
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, ApiError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, username, password, role FROM users WHERE username = $1",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn insert_user(&self, user: User) -> Result<User, ApiError> {
        let mut tx = self.pool.begin().await?;

        let taken = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM users WHERE username = $1",
        )
        .bind(&user.username)
        .fetch_one(&mut *tx)
        .await?;

        if taken > 0 {
            return Err(ApiError::Conflict(DUPLICATE_USERNAME.to_string()));
        }

        sqlx::query("INSERT INTO users (id, username, password, role) VALUES ($1, $2, $3, $4)")
            .bind(user.id)
            .bind(&user.username)
            .bind(&user.password)
            .bind(user.role)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(user)
    }

    async fn update_user_password(&self, id: Uuid, password: &str) -> Result<bool, ApiError> {
        let result = sqlx::query("UPDATE users SET password = $2 WHERE id = $1")
            .bind(id)
            .bind(password)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_user(&self, id: Uuid) -> Result<bool, ApiError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

/// InMemoryRepository
///
/// A `Vec`-backed implementation of `Repository` used by the test suite, in
/// the same spirit as the mock half of a real/mock service pair. Insertion
/// order stands in for creation order, which keeps the pagination contract
/// identical to the Postgres implementation.
#[derive(Default)]
pub struct InMemoryRepository {
    places: Mutex<Vec<Place>>,
    users: Mutex<Vec<User>>,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

fn same_triple(place: &Place, name: &str, city: &str, state: &str) -> bool {
    place.name.eq_ignore_ascii_case(name)
        && place.city.eq_ignore_ascii_case(city)
        && place.state.eq_ignore_ascii_case(state)
}

#[async_trait]
impl Repository for InMemoryRepository {
    async fn find_place(&self, id: Uuid) -> Result<Option<Place>, ApiError> {
        let places = self.places.lock().expect("places lock poisoned");
        Ok(places.iter().find(|p| p.id == id).cloned())
    }

    async fn all_places(&self) -> Result<Vec<Place>, ApiError> {
        let places = self.places.lock().expect("places lock poisoned");
        Ok(places.clone())
    }

    async fn places_page(&self, offset: i64, limit: i64) -> Result<Vec<Place>, ApiError> {
        let places = self.places.lock().expect("places lock poisoned");
        Ok(places
            .iter()
            .skip(offset.max(0) as usize)
            .take(limit.max(0) as usize)
            .cloned()
            .collect())
    }

    async fn places_by_name(&self, name: &str) -> Result<Vec<Place>, ApiError> {
        let places = self.places.lock().expect("places lock poisoned");
        Ok(places
            .iter()
            .filter(|p| p.name.eq_ignore_ascii_case(name))
            .cloned()
            .collect())
    }

    async fn insert_place(&self, place: Place) -> Result<Place, ApiError> {
        let mut places = self.places.lock().expect("places lock poisoned");
        if places
            .iter()
            .any(|p| same_triple(p, &place.name, &place.city, &place.state))
        {
            return Err(ApiError::Conflict(DUPLICATE_PLACE.to_string()));
        }
        places.push(place.clone());
        Ok(place)
    }

    async fn update_place(&self, id: Uuid, update: PlaceUpdate) -> Result<Place, ApiError> {
        let mut places = self.places.lock().expect("places lock poisoned");
        if places
            .iter()
            .any(|p| same_triple(p, &update.name, &update.city, &update.state))
        {
            return Err(ApiError::Conflict(DUPLICATE_PLACE.to_string()));
        }
        let place = places
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| ApiError::NotFound(PLACE_NOT_FOUND.to_string()))?;
        place.name = update.name;
        place.slug = update.slug;
        place.city = update.city;
        place.state = update.state;
        place.updated_at = update.updated_at;
        Ok(place.clone())
    }

    async fn delete_place(&self, id: Uuid) -> Result<bool, ApiError> {
        let mut places = self.places.lock().expect("places lock poisoned");
        let before = places.len();
        places.retain(|p| p.id != id);
        Ok(places.len() < before)
    }

    async fn find_user(&self, id: Uuid) -> Result<Option<User>, ApiError> {
        let users = self.users.lock().expect("users lock poisoned");
        Ok(users.iter().find(|u| u.id == id).cloned())
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, ApiError> {
        let users = self.users.lock().expect("users lock poisoned");
        Ok(users.iter().find(|u| u.username == username).cloned())
    }

    async fn insert_user(&self, user: User) -> Result<User, ApiError> {
        let mut users = self.users.lock().expect("users lock poisoned");
        if users.iter().any(|u| u.username == user.username) {
            return Err(ApiError::Conflict(DUPLICATE_USERNAME.to_string()));
        }
        users.push(user.clone());
        Ok(user)
    }

    async fn update_user_password(&self, id: Uuid, password: &str) -> Result<bool, ApiError> {
        let mut users = self.users.lock().expect("users lock poisoned");
        match users.iter_mut().find(|u| u.id == id) {
            Some(user) => {
                user.password = password.to_string();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_user(&self, id: Uuid) -> Result<bool, ApiError> {
        let mut users = self.users.lock().expect("users lock poisoned");
        let before = users.len();
        users.retain(|u| u.id != id);
        Ok(users.len() < before)
    }
}
