use crate::models::DbKvEntry;
use chrono::Utc;
use eyre::Result;
use sqlx::{Pool, Postgres};

pub async fn get_entry(pool: &Pool<Postgres>, key: &str) -> Result<Option<DbKvEntry>> {
    tracing::debug!("Reading stored record: key={}", key);

    let entry = sqlx::query_as::<_, DbKvEntry>(
        r#"
        SELECT key, value, updated_at
        FROM kv_store
        WHERE key = $1
        "#,
    )
    .bind(key)
    .fetch_optional(pool)
    .await?;

    Ok(entry)
}

pub async fn put_entry(pool: &Pool<Postgres>, key: &str, value: &str) -> Result<DbKvEntry> {
    let now = Utc::now();

    let entry = sqlx::query_as::<_, DbKvEntry>(
        r#"
        INSERT INTO kv_store (key, value, updated_at)
        VALUES ($1, $2, $3)
        ON CONFLICT (key) DO UPDATE
        SET value = EXCLUDED.value, updated_at = EXCLUDED.updated_at
        RETURNING key, value, updated_at
        "#,
    )
    .bind(key)
    .bind(value)
    .bind(now)
    .fetch_one(pool)
    .await?;

    tracing::debug!("Stored record: key={}, bytes={}", key, value.len());
    Ok(entry)
}
