use chrono::Utc;
use sqlx::SqlitePool;

use crate::{auth::new_id, models::ManicuristRow, validate::ManicuristInput};

const COLUMNS: &str = "id, spa_id, name, phone, email, active, created_at";

pub async fn list(pool: &SqlitePool, spa_id: &str) -> Result<Vec<ManicuristRow>, sqlx::Error> {
    sqlx::query_as::<_, ManicuristRow>(&format!(
        "SELECT {COLUMNS} FROM manicurists WHERE spa_id = ? ORDER BY name"
    ))
    .bind(spa_id)
    .fetch_all(pool)
    .await
}

pub async fn get(
    pool: &SqlitePool,
    spa_id: &str,
    id: &str,
) -> Result<Option<ManicuristRow>, sqlx::Error> {
    sqlx::query_as::<_, ManicuristRow>(&format!(
        "SELECT {COLUMNS} FROM manicurists WHERE id = ? AND spa_id = ? LIMIT 1"
    ))
    .bind(id)
    .bind(spa_id)
    .fetch_optional(pool)
    .await
}

pub async fn create(
    pool: &SqlitePool,
    spa_id: &str,
    input: &ManicuristInput,
) -> Result<ManicuristRow, sqlx::Error> {
    let id = new_id();
    sqlx::query(
        r#"INSERT INTO manicurists (id, spa_id, name, phone, email, active, created_at)
           VALUES (?, ?, ?, ?, ?, ?, ?)"#,
    )
    .bind(&id)
    .bind(spa_id)
    .bind(input.name.trim())
    .bind(&input.phone)
    .bind(&input.email)
    .bind(input.active as i64)
    .bind(Utc::now().to_rfc3339())
    .execute(pool)
    .await?;

    get(pool, spa_id, &id)
        .await?
        .ok_or_else(|| sqlx::Error::RowNotFound)
}

pub async fn update(
    pool: &SqlitePool,
    spa_id: &str,
    id: &str,
    input: &ManicuristInput,
) -> Result<Option<ManicuristRow>, sqlx::Error> {
    let result = sqlx::query(
        "UPDATE manicurists SET name = ?, phone = ?, email = ?, active = ? WHERE id = ? AND spa_id = ?",
    )
    .bind(input.name.trim())
    .bind(&input.phone)
    .bind(&input.email)
    .bind(input.active as i64)
    .bind(id)
    .bind(spa_id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Ok(None);
    }
    get(pool, spa_id, id).await
}

pub async fn delete(pool: &SqlitePool, spa_id: &str, id: &str) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM manicurists WHERE id = ? AND spa_id = ?")
        .bind(id)
        .bind(spa_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
