use chrono::Utc;
use sqlx::{Sqlite, SqlitePool, Transaction};

use crate::{
    auth::new_id,
    models::{AppointmentRow, AppointmentServiceRow},
    status::AppointmentStatus,
    validate::AppointmentInput,
};

const SELECT: &str = r#"SELECT a.id, a.spa_id, a.client_id, c.name AS client_name,
       a.manicurist_id, m.name AS manicurist_name,
       a.scheduled_at, a.status, a.payment_method_id, a.notes, a.created_at
  FROM appointments a
  JOIN clients c ON c.id = a.client_id
  LEFT JOIN manicurists m ON m.id = a.manicurist_id"#;

#[derive(Debug)]
pub enum StatusOutcome {
    NotFound,
    /// The transition table rejected the move; nothing was written.
    Illegal {
        from: AppointmentStatus,
    },
    Updated(AppointmentRow),
}

pub async fn list(
    pool: &SqlitePool,
    spa_id: &str,
    status: Option<AppointmentStatus>,
) -> Result<Vec<AppointmentRow>, sqlx::Error> {
    match status {
        Some(status) => {
            sqlx::query_as::<_, AppointmentRow>(&format!(
                "{SELECT} WHERE a.spa_id = ? AND a.status = ? ORDER BY a.scheduled_at DESC"
            ))
            .bind(spa_id)
            .bind(status.as_str())
            .fetch_all(pool)
            .await
        }
        None => {
            sqlx::query_as::<_, AppointmentRow>(&format!(
                "{SELECT} WHERE a.spa_id = ? ORDER BY a.scheduled_at DESC"
            ))
            .bind(spa_id)
            .fetch_all(pool)
            .await
        }
    }
}

/// Appointments with `from <= scheduled_at < to` (ISO strings compare
/// lexicographically).
pub async fn list_between(
    pool: &SqlitePool,
    spa_id: &str,
    from: &str,
    to: &str,
) -> Result<Vec<AppointmentRow>, sqlx::Error> {
    sqlx::query_as::<_, AppointmentRow>(&format!(
        "{SELECT} WHERE a.spa_id = ? AND a.scheduled_at >= ? AND a.scheduled_at < ? ORDER BY a.scheduled_at"
    ))
    .bind(spa_id)
    .bind(from)
    .bind(to)
    .fetch_all(pool)
    .await
}

pub async fn get(
    pool: &SqlitePool,
    spa_id: &str,
    id: &str,
) -> Result<Option<AppointmentRow>, sqlx::Error> {
    sqlx::query_as::<_, AppointmentRow>(&format!(
        "{SELECT} WHERE a.id = ? AND a.spa_id = ? LIMIT 1"
    ))
    .bind(id)
    .bind(spa_id)
    .fetch_optional(pool)
    .await
}

pub async fn services_of(
    pool: &SqlitePool,
    appointment_id: &str,
) -> Result<Vec<AppointmentServiceRow>, sqlx::Error> {
    sqlx::query_as::<_, AppointmentServiceRow>(
        r#"SELECT s.id, s.appointment_id, s.service_id, v.name AS service_name,
                  s.manicurist_id, s.price
           FROM appointment_services s
           JOIN services v ON v.id = s.service_id
           WHERE s.appointment_id = ?
           ORDER BY v.name"#,
    )
    .bind(appointment_id)
    .fetch_all(pool)
    .await
}

async fn owned(
    tx: &mut Transaction<'_, Sqlite>,
    table: &str,
    spa_id: &str,
    id: &str,
) -> Result<bool, sqlx::Error> {
    let row = sqlx::query_as::<_, (String,)>(&format!(
        "SELECT id FROM {table} WHERE id = ? AND spa_id = ? LIMIT 1"
    ))
    .bind(id)
    .bind(spa_id)
    .fetch_optional(&mut **tx)
    .await?;
    Ok(row.is_some())
}

/// Every row the appointment references must belong to the caller's
/// tenant; a miss turns the whole write into a not-found.
async fn references_owned(
    tx: &mut Transaction<'_, Sqlite>,
    spa_id: &str,
    input: &AppointmentInput,
) -> Result<bool, sqlx::Error> {
    if !owned(tx, "clients", spa_id, &input.client_id).await? {
        return Ok(false);
    }
    if let Some(manicurist_id) = &input.manicurist_id {
        if !owned(tx, "manicurists", spa_id, manicurist_id).await? {
            return Ok(false);
        }
    }
    if let Some(payment_method_id) = &input.payment_method_id {
        if !owned(tx, "payment_methods", spa_id, payment_method_id).await? {
            return Ok(false);
        }
    }
    for service in &input.services {
        if !owned(tx, "services", spa_id, &service.service_id).await? {
            return Ok(false);
        }
        if !owned(tx, "manicurists", spa_id, &service.manicurist_id).await? {
            return Ok(false);
        }
    }
    Ok(true)
}

async fn insert_services(
    tx: &mut Transaction<'_, Sqlite>,
    appointment_id: &str,
    input: &AppointmentInput,
) -> Result<(), sqlx::Error> {
    for service in &input.services {
        sqlx::query(
            r#"INSERT INTO appointment_services (id, appointment_id, service_id, manicurist_id, price)
               VALUES (?, ?, ?, ?, ?)"#,
        )
        .bind(new_id())
        .bind(appointment_id)
        .bind(&service.service_id)
        .bind(&service.manicurist_id)
        .bind(service.price)
        .execute(&mut **tx)
        .await?;
    }
    Ok(())
}

pub async fn create(
    pool: &SqlitePool,
    spa_id: &str,
    input: &AppointmentInput,
) -> Result<Option<AppointmentRow>, sqlx::Error> {
    let mut tx = pool.begin().await?;

    if !references_owned(&mut tx, spa_id, input).await? {
        return Ok(None);
    }

    let id = new_id();
    sqlx::query(
        r#"INSERT INTO appointments
           (id, spa_id, client_id, manicurist_id, scheduled_at, status, payment_method_id, notes, created_at)
           VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)"#,
    )
    .bind(&id)
    .bind(spa_id)
    .bind(&input.client_id)
    .bind(&input.manicurist_id)
    .bind(&input.scheduled_at)
    .bind(AppointmentStatus::Scheduled.as_str())
    .bind(&input.payment_method_id)
    .bind(&input.notes)
    .bind(Utc::now().to_rfc3339())
    .execute(&mut *tx)
    .await?;

    insert_services(&mut tx, &id, input).await?;
    tx.commit().await?;

    get(pool, spa_id, &id).await
}

/// Rewrites the head row and its line items in one transaction. The
/// status is not touched here; it only moves through [`set_status`].
pub async fn update(
    pool: &SqlitePool,
    spa_id: &str,
    id: &str,
    input: &AppointmentInput,
) -> Result<Option<AppointmentRow>, sqlx::Error> {
    let mut tx = pool.begin().await?;

    if !references_owned(&mut tx, spa_id, input).await? {
        return Ok(None);
    }

    let result = sqlx::query(
        r#"UPDATE appointments
           SET client_id = ?, manicurist_id = ?, scheduled_at = ?, payment_method_id = ?, notes = ?
           WHERE id = ? AND spa_id = ?"#,
    )
    .bind(&input.client_id)
    .bind(&input.manicurist_id)
    .bind(&input.scheduled_at)
    .bind(&input.payment_method_id)
    .bind(&input.notes)
    .bind(id)
    .bind(spa_id)
    .execute(&mut *tx)
    .await?;

    if result.rows_affected() == 0 {
        return Ok(None);
    }

    sqlx::query("DELETE FROM appointment_services WHERE appointment_id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?;
    insert_services(&mut tx, id, input).await?;
    tx.commit().await?;

    get(pool, spa_id, id).await
}

pub async fn delete(pool: &SqlitePool, spa_id: &str, id: &str) -> Result<bool, sqlx::Error> {
    let mut tx = pool.begin().await?;

    let result = sqlx::query("DELETE FROM appointments WHERE id = ? AND spa_id = ?")
        .bind(id)
        .bind(spa_id)
        .execute(&mut *tx)
        .await?;

    if result.rows_affected() == 0 {
        return Ok(false);
    }

    // Line items go with the head row even when the SQLite connection
    // has foreign_keys off.
    sqlx::query("DELETE FROM appointment_services WHERE appointment_id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?;
    tx.commit().await?;
    Ok(true)
}

pub async fn set_status(
    pool: &SqlitePool,
    spa_id: &str,
    id: &str,
    next: AppointmentStatus,
) -> Result<StatusOutcome, sqlx::Error> {
    let current = sqlx::query_as::<_, (String,)>(
        "SELECT status FROM appointments WHERE id = ? AND spa_id = ? LIMIT 1",
    )
    .bind(id)
    .bind(spa_id)
    .fetch_optional(pool)
    .await?;

    let Some((current,)) = current else {
        return Ok(StatusOutcome::NotFound);
    };

    // Unknown strings can only come from rows written before the status
    // machine existed; treat them as scheduled.
    let from = AppointmentStatus::parse(&current).unwrap_or(AppointmentStatus::Scheduled);
    if !from.can_transition_to(next) {
        return Ok(StatusOutcome::Illegal { from });
    }

    // Guard against a concurrent transition between the read and the
    // write: only move the row if it still holds the status we saw.
    let result = sqlx::query(
        "UPDATE appointments SET status = ? WHERE id = ? AND spa_id = ? AND status = ?",
    )
    .bind(next.as_str())
    .bind(id)
    .bind(spa_id)
    .bind(&current)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Ok(StatusOutcome::Illegal { from });
    }

    match get(pool, spa_id, id).await? {
        Some(row) => Ok(StatusOutcome::Updated(row)),
        None => Ok(StatusOutcome::NotFound),
    }
}

pub async fn count_by_status(
    pool: &SqlitePool,
    spa_id: &str,
    status: AppointmentStatus,
) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM appointments WHERE spa_id = ? AND status = ?",
    )
    .bind(spa_id)
    .bind(status.as_str())
    .fetch_one(pool)
    .await
}

pub async fn count_on_day(
    pool: &SqlitePool,
    spa_id: &str,
    date: &str,
) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM appointments WHERE spa_id = ? AND scheduled_at LIKE ? || 'T%'",
    )
    .bind(spa_id)
    .bind(date)
    .fetch_one(pool)
    .await
}
