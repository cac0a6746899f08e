//! Database repositories
//!
//! Each resource has an `async_trait` repository with a Postgres
//! implementation. [`InMemoryStore`] implements all of them for tests and
//! database-less runs. Handlers reach the active backend through
//! [`Repositories`] on the application state.

pub mod beer;
pub mod brewery;
pub mod memory;
pub mod review;
pub mod user;

use async_trait::async_trait;
use beer_review_shared::{Beer, Brewery, Page, Review, Role, User};
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::sync::Arc;
use thiserror::Error;
use tracing::warn;
use uuid::Uuid;

pub use beer::PgBeerRepository;
pub use brewery::PgBreweryRepository;
pub use memory::InMemoryStore;
pub use review::PgReviewRepository;
pub use user::PgUserRepository;

/// Storage failures the HTTP layer knows how to report
#[derive(Error, Debug)]
pub enum RepositoryError {
    /// A uniqueness constraint was violated
    #[error("{0}")]
    Conflict(String),

    /// A referenced row does not exist
    #[error("{0}")]
    ForeignKey(String),

    #[error("Database error: {0}")]
    Database(sqlx::Error),
}

pub type RepoResult<T> = Result<T, RepositoryError>;

/// Human-readable message for a named constraint
fn constraint_message(constraint: Option<&str>) -> String {
    match constraint {
        Some("idx_user_email_unique") => "There is already a user with this email address",
        Some("idx_beer_name_unique") => "A beer with this name already exists",
        Some("idx_brewery_name_unique") => "A brewery with this name already exists",
        Some("fk_beer_brewery") => "This brewery does not exist",
        Some("fk_review_beer") => "This beer does not exist",
        Some("fk_review_user") => "This user does not exist",
        _ => "The request conflicts with existing data",
    }
    .to_string()
}

impl From<sqlx::Error> for RepositoryError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            if db_err.is_unique_violation() {
                return RepositoryError::Conflict(constraint_message(db_err.constraint()));
            }
            if db_err.is_foreign_key_violation() {
                return RepositoryError::ForeignKey(constraint_message(db_err.constraint()));
            }
        }
        RepositoryError::Database(err)
    }
}

/// User row including credentials; never leaves the service layer
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UserRecord {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub roles: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UserRecord {
    pub fn roles(&self) -> Vec<Role> {
        self.roles
            .iter()
            .filter_map(|role| match role.parse() {
                Ok(role) => Some(role),
                Err(e) => {
                    warn!(user_id = %self.id, "Ignoring stored role: {}", e);
                    None
                }
            })
            .collect()
    }

    /// Public profile without the password hash
    pub fn to_user(&self) -> User {
        User {
            id: self.id,
            name: self.name.clone(),
            email: self.email.clone(),
            roles: self.roles(),
        }
    }
}

/// Input for creating a beer
#[derive(Debug, Clone)]
pub struct NewBeer {
    pub name: String,
    pub percentage: f64,
    pub brewery_id: Option<Uuid>,
}

/// Partial beer update; `None` keeps the stored value
#[derive(Debug, Clone, Default)]
pub struct BeerChanges {
    pub name: Option<String>,
    pub percentage: Option<f64>,
    pub brewery_id: Option<Uuid>,
}

#[derive(Debug, Clone)]
pub struct NewBrewery {
    pub name: String,
    pub country: String,
}

#[derive(Debug, Clone, Default)]
pub struct BreweryChanges {
    pub name: Option<String>,
    pub country: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewReview {
    pub rating: i32,
    pub description: String,
    pub date: DateTime<Utc>,
    pub beer_id: Uuid,
    pub user_id: Uuid,
}

#[derive(Debug, Clone, Default)]
pub struct ReviewChanges {
    pub rating: Option<i32>,
    pub description: Option<String>,
    pub date: Option<DateTime<Utc>>,
    pub beer_id: Option<Uuid>,
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub roles: Vec<Role>,
}

#[derive(Debug, Clone, Default)]
pub struct UserChanges {
    pub name: Option<String>,
    pub email: Option<String>,
    pub roles: Option<Vec<Role>>,
}

#[async_trait]
pub trait BeerRepository: Send + Sync {
    /// One page, ordered by case-folded name then id
    async fn find_all(&self, page: Page) -> RepoResult<Vec<Beer>>;
    async fn count(&self) -> RepoResult<i64>;
    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<Beer>>;
    async fn create(&self, input: NewBeer) -> RepoResult<Beer>;
    /// `None` when no beer has this id
    async fn update(&self, id: Uuid, changes: BeerChanges) -> RepoResult<Option<Beer>>;
    /// Rows removed
    async fn delete(&self, id: Uuid) -> RepoResult<u64>;
}

#[async_trait]
pub trait BreweryRepository: Send + Sync {
    async fn find_all(&self, page: Page) -> RepoResult<Vec<Brewery>>;
    async fn count(&self) -> RepoResult<i64>;
    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<Brewery>>;
    async fn create(&self, input: NewBrewery) -> RepoResult<Brewery>;
    async fn update(&self, id: Uuid, changes: BreweryChanges) -> RepoResult<Option<Brewery>>;
    async fn delete(&self, id: Uuid) -> RepoResult<u64>;
}

#[async_trait]
pub trait ReviewRepository: Send + Sync {
    /// One page, ordered by date then id
    async fn find_all(&self, page: Page) -> RepoResult<Vec<Review>>;
    async fn count(&self) -> RepoResult<i64>;
    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<Review>>;
    async fn create(&self, input: NewReview) -> RepoResult<Review>;
    async fn update(&self, id: Uuid, changes: ReviewChanges) -> RepoResult<Option<Review>>;
    async fn delete(&self, id: Uuid) -> RepoResult<u64>;
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_all(&self, page: Page) -> RepoResult<Vec<UserRecord>>;
    async fn count(&self) -> RepoResult<i64>;
    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<UserRecord>>;
    /// Lookup on the normalized email
    async fn find_by_email(&self, email: &str) -> RepoResult<Option<UserRecord>>;
    async fn create(&self, input: NewUser) -> RepoResult<UserRecord>;
    async fn update(&self, id: Uuid, changes: UserChanges) -> RepoResult<Option<UserRecord>>;
    async fn delete(&self, id: Uuid) -> RepoResult<u64>;
}

/// The storage backend handlers talk to
#[derive(Clone)]
pub struct Repositories {
    pub beers: Arc<dyn BeerRepository>,
    pub breweries: Arc<dyn BreweryRepository>,
    pub reviews: Arc<dyn ReviewRepository>,
    pub users: Arc<dyn UserRepository>,
    pool: Option<PgPool>,
}

impl Repositories {
    /// Postgres-backed repositories sharing one pool
    pub fn postgres(pool: PgPool) -> Self {
        Self {
            beers: Arc::new(PgBeerRepository::new(pool.clone())),
            breweries: Arc::new(PgBreweryRepository::new(pool.clone())),
            reviews: Arc::new(PgReviewRepository::new(pool.clone())),
            users: Arc::new(PgUserRepository::new(pool.clone())),
            pool: Some(pool),
        }
    }

    /// Process-local repositories with the same constraint semantics
    pub fn in_memory() -> Self {
        let store = Arc::new(InMemoryStore::default());
        Self {
            beers: store.clone(),
            breweries: store.clone(),
            reviews: store.clone(),
            users: store,
            pool: None,
        }
    }

    pub fn pool(&self) -> Option<&PgPool> {
        self.pool.as_ref()
    }

    /// Whether the store answers queries
    pub async fn health_check(&self) -> anyhow::Result<()> {
        match &self.pool {
            Some(pool) => crate::db::health_check(pool).await,
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constraint_messages() {
        assert_eq!(
            constraint_message(Some("idx_user_email_unique")),
            "There is already a user with this email address"
        );
        assert_eq!(
            constraint_message(Some("fk_review_beer")),
            "This beer does not exist"
        );
        assert_eq!(
            constraint_message(None),
            "The request conflicts with existing data"
        );
    }

    #[test]
    fn test_non_database_error_stays_internal() {
        let err: RepositoryError = sqlx::Error::RowNotFound.into();
        assert!(matches!(err, RepositoryError::Database(_)));
    }

    #[test]
    fn test_unknown_stored_roles_are_skipped() {
        let record = UserRecord {
            id: Uuid::new_v4(),
            name: "Pieter Van Der Helst".to_string(),
            email: "pieter@example.com".to_string(),
            password_hash: String::new(),
            roles: vec!["admin".to_string(), "brewer".to_string(), "user".to_string()],
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let user = record.to_user();
        assert_eq!(user.roles, vec![Role::Admin, Role::User]);
    }

    #[tokio::test]
    async fn test_in_memory_health_check() {
        assert!(Repositories::in_memory().health_check().await.is_ok());
    }
}
