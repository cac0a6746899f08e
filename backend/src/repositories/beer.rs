//! Beer repository for database operations

use super::{BeerChanges, BeerRepository, NewBeer, RepoResult};
use async_trait::async_trait;
use beer_review_shared::{Beer, Page};
use sqlx::PgPool;
use uuid::Uuid;

/// Beer row from database
#[derive(Debug, Clone, sqlx::FromRow)]
struct BeerRow {
    id: Uuid,
    name: String,
    percentage: f64,
    brewery_id: Option<Uuid>,
}

impl From<BeerRow> for Beer {
    fn from(row: BeerRow) -> Self {
        Beer {
            id: row.id,
            name: row.name,
            percentage: row.percentage,
            brewery_id: row.brewery_id,
        }
    }
}

pub struct PgBeerRepository {
    pool: PgPool,
}

impl PgBeerRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BeerRepository for PgBeerRepository {
    async fn find_all(&self, page: Page) -> RepoResult<Vec<Beer>> {
        let rows = sqlx::query_as::<_, BeerRow>(
            r#"
            SELECT id, name, percentage, brewery_id
            FROM beers
            ORDER BY LOWER(name COLLATE "C") ASC, id ASC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(page.limit)
        .bind(page.offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Beer::from).collect())
    }

    async fn count(&self) -> RepoResult<i64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM beers")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<Beer>> {
        let row = sqlx::query_as::<_, BeerRow>(
            r#"
            SELECT id, name, percentage, brewery_id
            FROM beers
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Beer::from))
    }

    async fn create(&self, input: NewBeer) -> RepoResult<Beer> {
        let row = sqlx::query_as::<_, BeerRow>(
            r#"
            INSERT INTO beers (id, name, percentage, brewery_id)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, percentage, brewery_id
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&input.name)
        .bind(input.percentage)
        .bind(input.brewery_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into())
    }

    async fn update(&self, id: Uuid, changes: BeerChanges) -> RepoResult<Option<Beer>> {
        let row = sqlx::query_as::<_, BeerRow>(
            r#"
            UPDATE beers SET
                name = COALESCE($2, name),
                percentage = COALESCE($3, percentage),
                brewery_id = COALESCE($4, brewery_id)
            WHERE id = $1
            RETURNING id, name, percentage, brewery_id
            "#,
        )
        .bind(id)
        .bind(changes.name)
        .bind(changes.percentage)
        .bind(changes.brewery_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Beer::from))
    }

    async fn delete(&self, id: Uuid) -> RepoResult<u64> {
        let result = sqlx::query("DELETE FROM beers WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}
