//! Service catalog and payment methods.

use chrono::Utc;
use sqlx::SqlitePool;

use crate::{
    auth::new_id,
    models::{PaymentMethodRow, ServiceRow},
    validate::{PaymentMethodInput, ServiceInput},
};

const SERVICE_COLUMNS: &str =
    "id, spa_id, name, description, price, duration_minutes, active, created_at";

pub async fn list_services(
    pool: &SqlitePool,
    spa_id: &str,
) -> Result<Vec<ServiceRow>, sqlx::Error> {
    sqlx::query_as::<_, ServiceRow>(&format!(
        "SELECT {SERVICE_COLUMNS} FROM services WHERE spa_id = ? ORDER BY name"
    ))
    .bind(spa_id)
    .fetch_all(pool)
    .await
}

pub async fn get_service(
    pool: &SqlitePool,
    spa_id: &str,
    id: &str,
) -> Result<Option<ServiceRow>, sqlx::Error> {
    sqlx::query_as::<_, ServiceRow>(&format!(
        "SELECT {SERVICE_COLUMNS} FROM services WHERE id = ? AND spa_id = ? LIMIT 1"
    ))
    .bind(id)
    .bind(spa_id)
    .fetch_optional(pool)
    .await
}

pub async fn create_service(
    pool: &SqlitePool,
    spa_id: &str,
    input: &ServiceInput,
) -> Result<ServiceRow, sqlx::Error> {
    let id = new_id();
    sqlx::query(
        r#"INSERT INTO services (id, spa_id, name, description, price, duration_minutes, active, created_at)
           VALUES (?, ?, ?, ?, ?, ?, ?, ?)"#,
    )
    .bind(&id)
    .bind(spa_id)
    .bind(input.name.trim())
    .bind(&input.description)
    .bind(input.price)
    .bind(input.duration_minutes)
    .bind(input.active as i64)
    .bind(Utc::now().to_rfc3339())
    .execute(pool)
    .await?;

    get_service(pool, spa_id, &id)
        .await?
        .ok_or_else(|| sqlx::Error::RowNotFound)
}

pub async fn update_service(
    pool: &SqlitePool,
    spa_id: &str,
    id: &str,
    input: &ServiceInput,
) -> Result<Option<ServiceRow>, sqlx::Error> {
    let result = sqlx::query(
        r#"UPDATE services
           SET name = ?, description = ?, price = ?, duration_minutes = ?, active = ?
           WHERE id = ? AND spa_id = ?"#,
    )
    .bind(input.name.trim())
    .bind(&input.description)
    .bind(input.price)
    .bind(input.duration_minutes)
    .bind(input.active as i64)
    .bind(id)
    .bind(spa_id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Ok(None);
    }
    get_service(pool, spa_id, id).await
}

pub async fn delete_service(
    pool: &SqlitePool,
    spa_id: &str,
    id: &str,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM services WHERE id = ? AND spa_id = ?")
        .bind(id)
        .bind(spa_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

pub async fn list_payment_methods(
    pool: &SqlitePool,
    spa_id: &str,
) -> Result<Vec<PaymentMethodRow>, sqlx::Error> {
    sqlx::query_as::<_, PaymentMethodRow>(
        "SELECT id, spa_id, name, active, created_at FROM payment_methods WHERE spa_id = ? ORDER BY name",
    )
    .bind(spa_id)
    .fetch_all(pool)
    .await
}

pub async fn get_payment_method(
    pool: &SqlitePool,
    spa_id: &str,
    id: &str,
) -> Result<Option<PaymentMethodRow>, sqlx::Error> {
    sqlx::query_as::<_, PaymentMethodRow>(
        "SELECT id, spa_id, name, active, created_at FROM payment_methods WHERE id = ? AND spa_id = ? LIMIT 1",
    )
    .bind(id)
    .bind(spa_id)
    .fetch_optional(pool)
    .await
}

pub async fn create_payment_method(
    pool: &SqlitePool,
    spa_id: &str,
    input: &PaymentMethodInput,
) -> Result<PaymentMethodRow, sqlx::Error> {
    let id = new_id();
    sqlx::query(
        "INSERT INTO payment_methods (id, spa_id, name, active, created_at) VALUES (?, ?, ?, ?, ?)",
    )
    .bind(&id)
    .bind(spa_id)
    .bind(input.name.trim())
    .bind(input.active as i64)
    .bind(Utc::now().to_rfc3339())
    .execute(pool)
    .await?;

    get_payment_method(pool, spa_id, &id)
        .await?
        .ok_or_else(|| sqlx::Error::RowNotFound)
}

pub async fn update_payment_method(
    pool: &SqlitePool,
    spa_id: &str,
    id: &str,
    input: &PaymentMethodInput,
) -> Result<Option<PaymentMethodRow>, sqlx::Error> {
    let result =
        sqlx::query("UPDATE payment_methods SET name = ?, active = ? WHERE id = ? AND spa_id = ?")
            .bind(input.name.trim())
            .bind(input.active as i64)
            .bind(id)
            .bind(spa_id)
            .execute(pool)
            .await?;

    if result.rows_affected() == 0 {
        return Ok(None);
    }
    get_payment_method(pool, spa_id, id).await
}

pub async fn delete_payment_method(
    pool: &SqlitePool,
    spa_id: &str,
    id: &str,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM payment_methods WHERE id = ? AND spa_id = ?")
        .bind(id)
        .bind(spa_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
