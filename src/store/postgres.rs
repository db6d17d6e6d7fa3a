use anyhow::{anyhow, Context, Result};
use itertools::Itertools;
use sqlx::{postgres::PgPoolOptions, PgPool, Row};

use crate::model::{Entity, Id};
use crate::store::traits::{Repository, Store};

/// PostgreSQL store. Rows of every kind live in one `entity_rows` table as
/// JSONB bodies keyed by `(kind, key)`; surrogate ids come from a per-kind
/// counter in `entity_sequences`.
#[derive(Debug, Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    /// Create a new PostgreSQL store with the given database URL
    pub async fn new(database_url: &str, max_connections: u32) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await
            .context("Failed to create PostgreSQL connection pool")?;

        Ok(Self { pool })
    }

    /// Create the backing tables if they are missing
    pub async fn migrate(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS entity_rows (
                kind TEXT NOT NULL,
                key TEXT NOT NULL,
                body JSONB NOT NULL,
                created_at TIMESTAMPTZ,
                updated_at TIMESTAMPTZ,
                PRIMARY KEY (kind, key)
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .context("Failed to create entity_rows table")?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS entity_sequences (
                kind TEXT PRIMARY KEY,
                last_id BIGINT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .context("Failed to create entity_sequences table")?;

        log::info!("Storage tables ready");
        Ok(())
    }

    /// Get a reference to the connection pool
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    async fn next_id(&self, kind: &str) -> Result<Id> {
        let row = sqlx::query(
            r#"
            INSERT INTO entity_sequences (kind, last_id)
            VALUES ($1, 1)
            ON CONFLICT (kind) DO UPDATE SET last_id = entity_sequences.last_id + 1
            RETURNING last_id
            "#,
        )
        .bind(kind)
        .fetch_one(&self.pool)
        .await
        .context("Failed to allocate id")?;

        Ok(row.get("last_id"))
    }
}

fn decode_body<E: Entity>(body: serde_json::Value) -> Result<E> {
    serde_json::from_value(body).with_context(|| format!("Corrupt {} row", E::KIND))
}

#[async_trait::async_trait]
impl<E: Entity> Repository<E> for PostgresStore {
    async fn find_by_id(&self, key: &E::Key) -> Result<Option<E>> {
        let row = sqlx::query("SELECT body FROM entity_rows WHERE kind = $1 AND key = $2")
            .bind(E::KIND.route())
            .bind(key.to_string())
            .fetch_optional(&self.pool)
            .await
            .with_context(|| format!("Failed to fetch {}", E::KIND))?;

        let Some(row) = row else {
            return Ok(None);
        };

        decode_body(row.get("body")).map(Some)
    }

    async fn find_all(&self) -> Result<Vec<E>> {
        let rows = sqlx::query("SELECT body FROM entity_rows WHERE kind = $1")
            .bind(E::KIND.route())
            .fetch_all(&self.pool)
            .await
            .with_context(|| format!("Failed to list {}", E::KIND))?;

        // Text keys sort lexically; order by the typed key instead.
        let entities: Vec<E> = rows
            .into_iter()
            .map(|row| decode_body(row.get("body")))
            .collect::<Result<_>>()?;

        Ok(entities.into_iter().sorted_by_key(|e| e.key()).collect())
    }

    async fn save(&self, mut entity: E) -> Result<E> {
        if entity.key().is_none() {
            let id = self.next_id(E::KIND.route()).await?;
            entity.assign_id(id);
        }
        let key = entity
            .key()
            .ok_or_else(|| anyhow!("Cannot save {} without a key", E::KIND))?;
        let body = serde_json::to_value(&entity)
            .with_context(|| format!("Failed to encode {}", E::KIND))?;
        let timestamps = *entity.timestamps();

        sqlx::query(
            r#"
            INSERT INTO entity_rows (kind, key, body, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (kind, key) DO UPDATE SET
                body = EXCLUDED.body,
                updated_at = EXCLUDED.updated_at
            "#,
        )
        .bind(E::KIND.route())
        .bind(key.to_string())
        .bind(body)
        .bind(timestamps.created_at)
        .bind(timestamps.updated_at)
        .execute(&self.pool)
        .await
        .with_context(|| format!("Failed to save {} {}", E::KIND, key))?;

        Ok(entity)
    }

    async fn delete_by_id(&self, key: &E::Key) -> Result<bool> {
        let result = sqlx::query("DELETE FROM entity_rows WHERE kind = $1 AND key = $2")
            .bind(E::KIND.route())
            .bind(key.to_string())
            .execute(&self.pool)
            .await
            .with_context(|| format!("Failed to delete {} {}", E::KIND, key))?;

        Ok(result.rows_affected() > 0)
    }
}

impl Store for PostgresStore {}
