//! Database connection and pool management
//!
//! Connection pooling with timeouts suited to a long-running API process,
//! migrations, and the development seed.

use anyhow::Result;
use sqlx::postgres::{PgConnectOptions, PgPool, PgPoolOptions};
use std::str::FromStr;
use std::time::Duration;
use tracing::{info, warn};
use uuid::Uuid;

/// Database configuration for pool creation
pub struct DbConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout_secs: u64,
    pub idle_timeout_secs: u64,
    pub max_lifetime_secs: u64,
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            max_connections: 10,
            min_connections: 2,
            acquire_timeout_secs: 30,
            idle_timeout_secs: 600,  // 10 minutes
            max_lifetime_secs: 1800, // 30 minutes
        }
    }
}

/// Create a PostgreSQL connection pool
pub async fn create_pool(database_url: &str, max_connections: u32) -> Result<PgPool> {
    let config = DbConfig {
        url: database_url.to_string(),
        max_connections,
        ..Default::default()
    };
    create_pool_with_config(&config).await
}

/// Create a PostgreSQL connection pool with custom configuration
pub async fn create_pool_with_config(config: &DbConfig) -> Result<PgPool> {
    let connect_options =
        PgConnectOptions::from_str(&config.url)?.application_name("beer-review");

    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
        .idle_timeout(Duration::from_secs(config.idle_timeout_secs))
        .max_lifetime(Duration::from_secs(config.max_lifetime_secs))
        .test_before_acquire(true)
        .connect_with(connect_options)
        .await?;

    info!(
        max = config.max_connections,
        min = config.min_connections,
        "Database pool created"
    );

    Ok(pool)
}

/// Run database migrations
pub async fn run_migrations(pool: &PgPool) -> Result<()> {
    info!("Running database migrations...");
    sqlx::migrate!("./migrations").run(pool).await?;
    info!("Database migrations completed successfully");
    Ok(())
}

/// Check database health
pub async fn health_check(pool: &PgPool) -> Result<()> {
    sqlx::query("SELECT 1")
        .execute(pool)
        .await
        .map(|_| ())
        .map_err(|e| {
            warn!("Database health check failed: {}", e);
            e.into()
        })
}

/// Reference breweries: (id, name, country)
const SEED_BREWERIES: [(&str, &str, &str); 3] = [
    ("7f28c5f9-d711-4cd6-ac15-d13d71ab0b01", "Carlsberg Group", "Denmark"),
    ("7f28c5f9-d711-4cd6-ac15-d13d71ab0b02", "Brouwerij Bosteels", "Belgium"),
    ("7f28c5f9-d711-4cd6-ac15-d13d71ab0b03", "Abdij van Westmalle", "Belgium"),
];

/// Reference beers: (id, name, percentage, brewery id)
const SEED_BEERS: [(&str, &str, f64, &str); 3] = [
    (
        "7f28c5f9-d711-4cd6-ac15-d13d71ab0e01",
        "Carlsberg",
        5.5,
        "7f28c5f9-d711-4cd6-ac15-d13d71ab0b01",
    ),
    (
        "7f28c5f9-d711-4cd6-ac15-d13d71ab0e02",
        "Tripel Karmeliet",
        8.4,
        "7f28c5f9-d711-4cd6-ac15-d13d71ab0b02",
    ),
    (
        "7f28c5f9-d711-4cd6-ac15-d13d71ab0e03",
        "Westmalle Dubbel",
        7.0,
        "7f28c5f9-d711-4cd6-ac15-d13d71ab0b03",
    ),
];

/// Insert the reference breweries and beers; existing rows are left alone
pub async fn seed_reference_data(pool: &PgPool) -> Result<()> {
    let mut tx = pool.begin().await?;

    for (id, name, country) in SEED_BREWERIES {
        sqlx::query(
            r#"
            INSERT INTO breweries (id, name, country)
            VALUES ($1, $2, $3)
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(Uuid::parse_str(id)?)
        .bind(name)
        .bind(country)
        .execute(&mut *tx)
        .await?;
    }

    for (id, name, percentage, brewery_id) in SEED_BEERS {
        sqlx::query(
            r#"
            INSERT INTO beers (id, name, percentage, brewery_id)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(Uuid::parse_str(id)?)
        .bind(name)
        .bind(percentage)
        .bind(Uuid::parse_str(brewery_id)?)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;
    info!(
        breweries = SEED_BREWERIES.len(),
        beers = SEED_BEERS.len(),
        "Reference data seeded"
    );
    Ok(())
}
