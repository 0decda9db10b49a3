//! Weekly schedules, date-specific availability overrides and the
//! tenant-level operating hours.
//!
//! Replacing a nested collection is a diff, not a wipe: rows are keyed
//! (schedules by weekday, availability by date, spa hours by weekday plus
//! specific date), unchanged rows keep their ids, and the whole diff runs
//! inside one transaction so a failure cannot leave the collection empty.

use std::collections::HashMap;

use sqlx::SqlitePool;

use crate::{
    auth::new_id,
    models::{AvailabilityRow, ScheduleRow, SpaScheduleRow},
    validate::{AvailabilityEntry, ScheduleEntry, SpaScheduleEntry},
};

async fn manicurist_owned(
    pool: &SqlitePool,
    spa_id: &str,
    manicurist_id: &str,
) -> Result<bool, sqlx::Error> {
    let row = sqlx::query_as::<_, (String,)>(
        "SELECT id FROM manicurists WHERE id = ? AND spa_id = ? LIMIT 1",
    )
    .bind(manicurist_id)
    .bind(spa_id)
    .fetch_optional(pool)
    .await?;
    Ok(row.is_some())
}

pub async fn schedules_for(
    pool: &SqlitePool,
    spa_id: &str,
    manicurist_id: &str,
) -> Result<Option<Vec<ScheduleRow>>, sqlx::Error> {
    if !manicurist_owned(pool, spa_id, manicurist_id).await? {
        return Ok(None);
    }
    let rows = sqlx::query_as::<_, ScheduleRow>(
        r#"SELECT id, manicurist_id, day_of_week, start_time, end_time, is_active
           FROM manicurist_schedules
           WHERE manicurist_id = ?
           ORDER BY day_of_week"#,
    )
    .bind(manicurist_id)
    .fetch_all(pool)
    .await?;
    Ok(Some(rows))
}

pub async fn replace_schedules(
    pool: &SqlitePool,
    spa_id: &str,
    manicurist_id: &str,
    entries: &[ScheduleEntry],
) -> Result<Option<Vec<ScheduleRow>>, sqlx::Error> {
    if !manicurist_owned(pool, spa_id, manicurist_id).await? {
        return Ok(None);
    }

    let mut tx = pool.begin().await?;

    let existing = sqlx::query_as::<_, ScheduleRow>(
        r#"SELECT id, manicurist_id, day_of_week, start_time, end_time, is_active
           FROM manicurist_schedules
           WHERE manicurist_id = ?"#,
    )
    .bind(manicurist_id)
    .fetch_all(&mut *tx)
    .await?;

    let mut by_day: HashMap<i64, ScheduleRow> =
        existing.into_iter().map(|row| (row.day_of_week, row)).collect();

    for entry in entries {
        match by_day.remove(&entry.day_of_week) {
            Some(row) => {
                let changed = row.start_time != entry.start_time
                    || row.end_time != entry.end_time
                    || (row.is_active != 0) != entry.is_active;
                if changed {
                    sqlx::query(
                        r#"UPDATE manicurist_schedules
                           SET start_time = ?, end_time = ?, is_active = ?
                           WHERE id = ?"#,
                    )
                    .bind(&entry.start_time)
                    .bind(&entry.end_time)
                    .bind(entry.is_active as i64)
                    .bind(&row.id)
                    .execute(&mut *tx)
                    .await?;
                }
            }
            None => {
                sqlx::query(
                    r#"INSERT INTO manicurist_schedules
                       (id, manicurist_id, day_of_week, start_time, end_time, is_active)
                       VALUES (?, ?, ?, ?, ?, ?)"#,
                )
                .bind(new_id())
                .bind(manicurist_id)
                .bind(entry.day_of_week)
                .bind(&entry.start_time)
                .bind(&entry.end_time)
                .bind(entry.is_active as i64)
                .execute(&mut *tx)
                .await?;
            }
        }
    }

    // Whatever is left was removed by the operator.
    for row in by_day.values() {
        sqlx::query("DELETE FROM manicurist_schedules WHERE id = ?")
            .bind(&row.id)
            .execute(&mut *tx)
            .await?;
    }

    tx.commit().await?;
    schedules_for(pool, spa_id, manicurist_id).await
}

pub async fn availability_for(
    pool: &SqlitePool,
    spa_id: &str,
    manicurist_id: &str,
) -> Result<Option<Vec<AvailabilityRow>>, sqlx::Error> {
    if !manicurist_owned(pool, spa_id, manicurist_id).await? {
        return Ok(None);
    }
    let rows = sqlx::query_as::<_, AvailabilityRow>(
        r#"SELECT id, manicurist_id, date, is_available, start_time, end_time, reason
           FROM manicurist_availability
           WHERE manicurist_id = ?
           ORDER BY date"#,
    )
    .bind(manicurist_id)
    .fetch_all(pool)
    .await?;
    Ok(Some(rows))
}

pub async fn replace_availability(
    pool: &SqlitePool,
    spa_id: &str,
    manicurist_id: &str,
    entries: &[AvailabilityEntry],
) -> Result<Option<Vec<AvailabilityRow>>, sqlx::Error> {
    if !manicurist_owned(pool, spa_id, manicurist_id).await? {
        return Ok(None);
    }

    let mut tx = pool.begin().await?;

    let existing = sqlx::query_as::<_, AvailabilityRow>(
        r#"SELECT id, manicurist_id, date, is_available, start_time, end_time, reason
           FROM manicurist_availability
           WHERE manicurist_id = ?"#,
    )
    .bind(manicurist_id)
    .fetch_all(&mut *tx)
    .await?;

    let mut by_date: HashMap<String, AvailabilityRow> =
        existing.into_iter().map(|row| (row.date.clone(), row)).collect();

    for entry in entries {
        // A full-day absence never stores times, whatever the form sent.
        let start_time = entry.is_available.then(|| entry.start_time.clone()).flatten();
        let end_time = entry.is_available.then(|| entry.end_time.clone()).flatten();

        match by_date.remove(&entry.date) {
            Some(row) => {
                let changed = (row.is_available != 0) != entry.is_available
                    || row.start_time != start_time
                    || row.end_time != end_time
                    || row.reason != entry.reason;
                if changed {
                    sqlx::query(
                        r#"UPDATE manicurist_availability
                           SET is_available = ?, start_time = ?, end_time = ?, reason = ?
                           WHERE id = ?"#,
                    )
                    .bind(entry.is_available as i64)
                    .bind(&start_time)
                    .bind(&end_time)
                    .bind(&entry.reason)
                    .bind(&row.id)
                    .execute(&mut *tx)
                    .await?;
                }
            }
            None => {
                sqlx::query(
                    r#"INSERT INTO manicurist_availability
                       (id, manicurist_id, date, is_available, start_time, end_time, reason)
                       VALUES (?, ?, ?, ?, ?, ?, ?)"#,
                )
                .bind(new_id())
                .bind(manicurist_id)
                .bind(&entry.date)
                .bind(entry.is_available as i64)
                .bind(&start_time)
                .bind(&end_time)
                .bind(&entry.reason)
                .execute(&mut *tx)
                .await?;
            }
        }
    }

    for row in by_date.values() {
        sqlx::query("DELETE FROM manicurist_availability WHERE id = ?")
            .bind(&row.id)
            .execute(&mut *tx)
            .await?;
    }

    tx.commit().await?;
    availability_for(pool, spa_id, manicurist_id).await
}

pub async fn spa_schedules(
    pool: &SqlitePool,
    spa_id: &str,
) -> Result<Vec<SpaScheduleRow>, sqlx::Error> {
    sqlx::query_as::<_, SpaScheduleRow>(
        r#"SELECT id, spa_id, day_of_week, start_time, end_time, is_active, is_holiday, specific_date
           FROM spa_schedules
           WHERE spa_id = ?
           ORDER BY day_of_week, specific_date"#,
    )
    .bind(spa_id)
    .fetch_all(pool)
    .await
}

pub async fn replace_spa_schedules(
    pool: &SqlitePool,
    spa_id: &str,
    entries: &[SpaScheduleEntry],
) -> Result<Vec<SpaScheduleRow>, sqlx::Error> {
    let mut tx = pool.begin().await?;

    let existing = sqlx::query_as::<_, SpaScheduleRow>(
        r#"SELECT id, spa_id, day_of_week, start_time, end_time, is_active, is_holiday, specific_date
           FROM spa_schedules
           WHERE spa_id = ?"#,
    )
    .bind(spa_id)
    .fetch_all(&mut *tx)
    .await?;

    let mut by_key: HashMap<(i64, Option<String>), SpaScheduleRow> = existing
        .into_iter()
        .map(|row| ((row.day_of_week, row.specific_date.clone()), row))
        .collect();

    for entry in entries {
        let key = (entry.day_of_week, entry.specific_date.clone());
        match by_key.remove(&key) {
            Some(row) => {
                let changed = row.start_time != entry.start_time
                    || row.end_time != entry.end_time
                    || (row.is_active != 0) != entry.is_active
                    || (row.is_holiday != 0) != entry.is_holiday;
                if changed {
                    sqlx::query(
                        r#"UPDATE spa_schedules
                           SET start_time = ?, end_time = ?, is_active = ?, is_holiday = ?
                           WHERE id = ?"#,
                    )
                    .bind(&entry.start_time)
                    .bind(&entry.end_time)
                    .bind(entry.is_active as i64)
                    .bind(entry.is_holiday as i64)
                    .bind(&row.id)
                    .execute(&mut *tx)
                    .await?;
                }
            }
            None => {
                sqlx::query(
                    r#"INSERT INTO spa_schedules
                       (id, spa_id, day_of_week, start_time, end_time, is_active, is_holiday, specific_date)
                       VALUES (?, ?, ?, ?, ?, ?, ?, ?)"#,
                )
                .bind(new_id())
                .bind(spa_id)
                .bind(entry.day_of_week)
                .bind(&entry.start_time)
                .bind(&entry.end_time)
                .bind(entry.is_active as i64)
                .bind(entry.is_holiday as i64)
                .bind(&entry.specific_date)
                .execute(&mut *tx)
                .await?;
            }
        }
    }

    for row in by_key.values() {
        sqlx::query("DELETE FROM spa_schedules WHERE id = ?")
            .bind(&row.id)
            .execute(&mut *tx)
            .await?;
    }

    tx.commit().await?;
    spa_schedules(pool, spa_id).await
}
