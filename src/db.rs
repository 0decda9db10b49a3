use std::{env, fs, path::Path};

use chrono::Utc;
use sqlx::SqlitePool;

use crate::{
    auth::{hash_password, new_id},
    models::ROLE_ADMIN,
};

pub async fn run_migrations(pool: &SqlitePool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}

pub fn ensure_sqlite_dir(db_url: &str) -> std::io::Result<()> {
    let path = if let Some(path) = db_url.strip_prefix("sqlite://") {
        Some(path)
    } else if let Some(path) = db_url.strip_prefix("sqlite:") {
        Some(path)
    } else {
        None
    };

    let Some(path) = path else {
        return Ok(());
    };

    let path = path.split('?').next().unwrap_or(path);
    if path == ":memory:" || path.is_empty() {
        return Ok(());
    }

    let path = path.strip_prefix("file:").unwrap_or(path);
    let db_path = Path::new(path);
    if let Some(parent) = db_path.parent() {
        fs::create_dir_all(parent)?;
    }
    Ok(())
}

pub async fn seed_defaults(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    let spa_id = seed_spa(pool).await?;
    seed_admin(pool, &spa_id).await?;
    seed_catalog(pool, &spa_id).await?;
    Ok(())
}

/// Fire-and-forget audit entry for the dashboard feed.
pub async fn log_activity(
    pool: &SqlitePool,
    spa_id: &str,
    kind: &str,
    message: &str,
    user_id: Option<&str>,
    appointment_id: Option<&str>,
) {
    let _ = sqlx::query(
        r#"INSERT INTO activities (id, spa_id, kind, message, created_at, user_id, appointment_id)
           VALUES (?, ?, ?, ?, ?, ?, ?)"#,
    )
    .bind(new_id())
    .bind(spa_id)
    .bind(kind)
    .bind(message)
    .bind(Utc::now().to_rfc3339())
    .bind(user_id)
    .bind(appointment_id)
    .execute(pool)
    .await;
}

async fn seed_spa(pool: &SqlitePool) -> Result<String, sqlx::Error> {
    let existing = sqlx::query_as::<_, (String,)>("SELECT id FROM spas LIMIT 1")
        .fetch_optional(pool)
        .await?;

    if let Some((id,)) = existing {
        return Ok(id);
    }

    let name = env::var("SPA_NAME").unwrap_or_else(|_| "Mi Spa".to_string());
    let id = new_id();
    sqlx::query("INSERT INTO spas (id, name, created_at) VALUES (?, ?, ?)")
        .bind(&id)
        .bind(name)
        .bind(Utc::now().to_rfc3339())
        .execute(pool)
        .await?;

    Ok(id)
}

async fn seed_admin(pool: &SqlitePool, spa_id: &str) -> Result<(), sqlx::Error> {
    let existing = sqlx::query_as::<_, (String,)>(
        "SELECT id FROM users WHERE spa_id = ? AND role = ? LIMIT 1",
    )
    .bind(spa_id)
    .bind(ROLE_ADMIN)
    .fetch_optional(pool)
    .await?;

    if existing.is_some() {
        return Ok(());
    }

    let username = env::var("ADMIN_USER").unwrap_or_else(|_| "admin".to_string());
    let password = env::var("ADMIN_PASSWORD").unwrap_or_else(|_| "admin".to_string());
    let display_name =
        env::var("ADMIN_DISPLAY_NAME").unwrap_or_else(|_| "Administrador".to_string());

    if password == "admin" {
        log::warn!("ADMIN_PASSWORD not set. Using default password 'admin'. Set ADMIN_PASSWORD in production.");
    }

    let password_hash = hash_password(&password)
        .map_err(|_| sqlx::Error::Protocol("password hash failed".into()))?;
    let now = Utc::now().to_rfc3339();

    sqlx::query(
        r#"INSERT INTO users (id, spa_id, username, display_name, role, password_hash, active, created_at)
           VALUES (?, ?, ?, ?, ?, ?, 1, ?)"#,
    )
    .bind(new_id())
    .bind(spa_id)
    .bind(username)
    .bind(display_name)
    .bind(ROLE_ADMIN)
    .bind(password_hash)
    .bind(now)
    .execute(pool)
    .await?;

    Ok(())
}

async fn seed_catalog(pool: &SqlitePool, spa_id: &str) -> Result<(), sqlx::Error> {
    let services: [(&str, &str, i64, i64); 4] = [
        (
            "Manicure tradicional",
            "Limado, cutícula y esmaltado clásico.",
            25_000,
            45,
        ),
        (
            "Manicure semipermanente",
            "Esmaltado en gel de larga duración.",
            45_000,
            60,
        ),
        (
            "Pedicure spa",
            "Exfoliación, hidratación y esmaltado.",
            50_000,
            60,
        ),
        (
            "Retiro de esmalte",
            "Retiro seguro de semipermanente o acrílico.",
            15_000,
            30,
        ),
    ];

    for (name, description, price, duration) in services {
        let exists = sqlx::query_as::<_, (String,)>(
            "SELECT id FROM services WHERE spa_id = ? AND name = ? LIMIT 1",
        )
        .bind(spa_id)
        .bind(name)
        .fetch_optional(pool)
        .await?;
        if exists.is_some() {
            continue;
        }
        sqlx::query(
            r#"INSERT INTO services (id, spa_id, name, description, price, duration_minutes, active, created_at)
               VALUES (?, ?, ?, ?, ?, ?, 1, ?)"#,
        )
        .bind(new_id())
        .bind(spa_id)
        .bind(name)
        .bind(description)
        .bind(price)
        .bind(duration)
        .bind(Utc::now().to_rfc3339())
        .execute(pool)
        .await?;
    }

    for name in ["Efectivo", "Tarjeta", "Transferencia"] {
        let exists = sqlx::query_as::<_, (String,)>(
            "SELECT id FROM payment_methods WHERE spa_id = ? AND name = ? LIMIT 1",
        )
        .bind(spa_id)
        .bind(name)
        .fetch_optional(pool)
        .await?;
        if exists.is_some() {
            continue;
        }
        sqlx::query(
            r#"INSERT INTO payment_methods (id, spa_id, name, active, created_at)
               VALUES (?, ?, ?, 1, ?)"#,
        )
        .bind(new_id())
        .bind(spa_id)
        .bind(name)
        .bind(Utc::now().to_rfc3339())
        .execute(pool)
        .await?;
    }

    Ok(())
}
