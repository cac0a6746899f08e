//! Brewery repository for database operations

use super::{BreweryChanges, BreweryRepository, NewBrewery, RepoResult};
use async_trait::async_trait;
use beer_review_shared::{Brewery, Page};
use sqlx::PgPool;
use uuid::Uuid;

#[derive(Debug, Clone, sqlx::FromRow)]
struct BreweryRow {
    id: Uuid,
    name: String,
    country: String,
}

impl From<BreweryRow> for Brewery {
    fn from(row: BreweryRow) -> Self {
        Brewery {
            id: row.id,
            name: row.name,
            country: row.country,
        }
    }
}

pub struct PgBreweryRepository {
    pool: PgPool,
}

impl PgBreweryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BreweryRepository for PgBreweryRepository {
    async fn find_all(&self, page: Page) -> RepoResult<Vec<Brewery>> {
        let rows = sqlx::query_as::<_, BreweryRow>(
            r#"
            SELECT id, name, country
            FROM breweries
            ORDER BY LOWER(name COLLATE "C") ASC, id ASC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(page.limit)
        .bind(page.offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Brewery::from).collect())
    }

    async fn count(&self) -> RepoResult<i64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM breweries")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<Brewery>> {
        let row = sqlx::query_as::<_, BreweryRow>(
            "SELECT id, name, country FROM breweries WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Brewery::from))
    }

    async fn create(&self, input: NewBrewery) -> RepoResult<Brewery> {
        let row = sqlx::query_as::<_, BreweryRow>(
            r#"
            INSERT INTO breweries (id, name, country)
            VALUES ($1, $2, $3)
            RETURNING id, name, country
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&input.name)
        .bind(&input.country)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into())
    }

    async fn update(&self, id: Uuid, changes: BreweryChanges) -> RepoResult<Option<Brewery>> {
        let row = sqlx::query_as::<_, BreweryRow>(
            r#"
            UPDATE breweries SET
                name = COALESCE($2, name),
                country = COALESCE($3, country)
            WHERE id = $1
            RETURNING id, name, country
            "#,
        )
        .bind(id)
        .bind(changes.name)
        .bind(changes.country)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Brewery::from))
    }

    async fn delete(&self, id: Uuid) -> RepoResult<u64> {
        let result = sqlx::query("DELETE FROM breweries WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}
