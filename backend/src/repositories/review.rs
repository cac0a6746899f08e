//! Review repository for database operations
//!
//! Reviews are stored with foreign keys and read back joined with the beer
//! and author names.

use super::{NewReview, RepoResult, ReviewChanges, ReviewRepository};
use async_trait::async_trait;
use beer_review_shared::{Page, Review, ReviewBeer, ReviewUser};
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

/// Flat join row
#[derive(Debug, Clone, sqlx::FromRow)]
struct ReviewRow {
    id: Uuid,
    rating: i32,
    description: String,
    date: DateTime<Utc>,
    beer_id: Uuid,
    beer_name: String,
    user_id: Uuid,
    user_name: String,
}

impl From<ReviewRow> for Review {
    fn from(row: ReviewRow) -> Self {
        Review {
            id: row.id,
            rating: row.rating,
            description: row.description,
            date: row.date,
            beer: ReviewBeer {
                id: row.beer_id,
                name: row.beer_name,
            },
            user: ReviewUser {
                id: row.user_id,
                name: row.user_name,
            },
        }
    }
}

const SELECT_REVIEW: &str = r#"
    SELECT r.id, r.rating, r.description, r.date,
           b.id AS beer_id, b.name AS beer_name,
           u.id AS user_id, u.name AS user_name
    FROM reviews r
    JOIN beers b ON b.id = r.beer_id
    JOIN users u ON u.id = r.user_id
"#;

pub struct PgReviewRepository {
    pool: PgPool,
}

impl PgReviewRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ReviewRepository for PgReviewRepository {
    async fn find_all(&self, page: Page) -> RepoResult<Vec<Review>> {
        let sql = format!("{SELECT_REVIEW} ORDER BY r.date ASC, r.id ASC LIMIT $1 OFFSET $2");
        let rows = sqlx::query_as::<_, ReviewRow>(&sql)
            .bind(page.limit)
            .bind(page.offset)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(Review::from).collect())
    }

    async fn count(&self) -> RepoResult<i64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM reviews")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<Review>> {
        let sql = format!("{SELECT_REVIEW} WHERE r.id = $1");
        let row = sqlx::query_as::<_, ReviewRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(Review::from))
    }

    async fn create(&self, input: NewReview) -> RepoResult<Review> {
        let id = sqlx::query_scalar::<_, Uuid>(
            r#"
            INSERT INTO reviews (id, rating, description, date, beer_id, user_id)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(input.rating)
        .bind(&input.description)
        .bind(input.date)
        .bind(input.beer_id)
        .bind(input.user_id)
        .fetch_one(&self.pool)
        .await?;

        // Not in a transaction: a concurrent delete between insert and read
        // surfaces as RowNotFound
        self.find_by_id(id)
            .await?
            .ok_or_else(|| sqlx::Error::RowNotFound.into())
    }

    async fn update(&self, id: Uuid, changes: ReviewChanges) -> RepoResult<Option<Review>> {
        let updated = sqlx::query_scalar::<_, Uuid>(
            r#"
            UPDATE reviews SET
                rating = COALESCE($2, rating),
                description = COALESCE($3, description),
                date = COALESCE($4, date),
                beer_id = COALESCE($5, beer_id)
            WHERE id = $1
            RETURNING id
            "#,
        )
        .bind(id)
        .bind(changes.rating)
        .bind(changes.description)
        .bind(changes.date)
        .bind(changes.beer_id)
        .fetch_optional(&self.pool)
        .await?;

        match updated {
            Some(id) => self.find_by_id(id).await,
            None => Ok(None),
        }
    }

    async fn delete(&self, id: Uuid) -> RepoResult<u64> {
        let result = sqlx::query("DELETE FROM reviews WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}
