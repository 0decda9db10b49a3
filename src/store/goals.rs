//! Monthly sales goals. Progress is measured against the completed
//! appointments of the goal's month.

use serde::Serialize;
use sqlx::SqlitePool;

use crate::{auth::new_id, models::SalesGoalRow, validate::SalesGoalInput};

#[derive(Debug, Clone, Serialize)]
pub struct GoalProgress {
    #[serde(flatten)]
    pub goal: SalesGoalRow,
    pub achieved_amount: i64,
    pub percent: i64,
}

pub async fn list(pool: &SqlitePool, spa_id: &str) -> Result<Vec<SalesGoalRow>, sqlx::Error> {
    sqlx::query_as::<_, SalesGoalRow>(
        r#"SELECT id, spa_id, year, month, target_amount
           FROM sales_goals
           WHERE spa_id = ?
           ORDER BY year DESC, month DESC"#,
    )
    .bind(spa_id)
    .fetch_all(pool)
    .await
}

pub async fn get(
    pool: &SqlitePool,
    spa_id: &str,
    id: &str,
) -> Result<Option<SalesGoalRow>, sqlx::Error> {
    sqlx::query_as::<_, SalesGoalRow>(
        "SELECT id, spa_id, year, month, target_amount FROM sales_goals WHERE id = ? AND spa_id = ? LIMIT 1",
    )
    .bind(id)
    .bind(spa_id)
    .fetch_optional(pool)
    .await
}

pub async fn find_for_month(
    pool: &SqlitePool,
    spa_id: &str,
    year: i64,
    month: i64,
) -> Result<Option<SalesGoalRow>, sqlx::Error> {
    sqlx::query_as::<_, SalesGoalRow>(
        r#"SELECT id, spa_id, year, month, target_amount
           FROM sales_goals
           WHERE spa_id = ? AND year = ? AND month = ?
           LIMIT 1"#,
    )
    .bind(spa_id)
    .bind(year)
    .bind(month)
    .fetch_optional(pool)
    .await
}

/// One goal per (spa, year, month); saving again overwrites the target.
pub async fn upsert(
    pool: &SqlitePool,
    spa_id: &str,
    input: &SalesGoalInput,
) -> Result<SalesGoalRow, sqlx::Error> {
    sqlx::query(
        r#"INSERT INTO sales_goals (id, spa_id, year, month, target_amount)
           VALUES (?, ?, ?, ?, ?)
           ON CONFLICT(spa_id, year, month) DO UPDATE SET target_amount = excluded.target_amount"#,
    )
    .bind(new_id())
    .bind(spa_id)
    .bind(input.year)
    .bind(input.month)
    .bind(input.target_amount)
    .execute(pool)
    .await?;

    find_for_month(pool, spa_id, input.year, input.month)
        .await?
        .ok_or_else(|| sqlx::Error::RowNotFound)
}

pub async fn delete(pool: &SqlitePool, spa_id: &str, id: &str) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM sales_goals WHERE id = ? AND spa_id = ?")
        .bind(id)
        .bind(spa_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// Revenue from completed appointments whose timestamp falls in the
/// goal's month. Timestamps are stored as ISO strings so the month is a
/// plain prefix match.
pub async fn achieved_amount(
    pool: &SqlitePool,
    spa_id: &str,
    year: i64,
    month: i64,
) -> Result<i64, sqlx::Error> {
    let prefix = format!("{year:04}-{month:02}-");
    let total: Option<i64> = sqlx::query_scalar(
        r#"SELECT SUM(s.price)
           FROM appointment_services s
           JOIN appointments a ON a.id = s.appointment_id
           WHERE a.spa_id = ? AND a.status = 'COMPLETED' AND a.scheduled_at LIKE ? || '%'"#,
    )
    .bind(spa_id)
    .bind(prefix)
    .fetch_one(pool)
    .await?;
    Ok(total.unwrap_or(0))
}

pub async fn progress(
    pool: &SqlitePool,
    spa_id: &str,
    goal: SalesGoalRow,
) -> Result<GoalProgress, sqlx::Error> {
    let achieved = achieved_amount(pool, spa_id, goal.year, goal.month).await?;
    let percent = if goal.target_amount > 0 {
        achieved * 100 / goal.target_amount
    } else {
        0
    };
    Ok(GoalProgress {
        goal,
        achieved_amount: achieved,
        percent,
    })
}
