//! Dashboard stats and the week-view calendar. The client polls these on
//! a fixed interval; there is no push channel.

use actix_web::{web, HttpResponse, Result};
use actix_web_httpauth::middleware::HttpAuthentication;
use chrono::{Datelike, Days, Local, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::{
    auth::{basic_validator, AuthUser},
    calendar, filters,
    routes::{db_error, validation_failed},
    state::AppState,
    status::AppointmentStatus,
    store,
    validate::FieldError,
};

#[derive(Debug, Clone, Serialize)]
struct StatCard {
    label: String,
    value: i64,
}

#[derive(Debug, Deserialize)]
struct CalendarQuery {
    week: Option<String>,
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .wrap(HttpAuthentication::basic(basic_validator))
            .service(web::resource("/dashboard").route(web::get().to(dashboard)))
            .service(web::resource("/calendar").route(web::get().to(week_calendar))),
    );
}

async fn dashboard(state: web::Data<AppState>, auth: web::ReqData<AuthUser>) -> Result<HttpResponse> {
    let spa_id = &auth.spa_id;
    let mut stats = Vec::new();
    for status in AppointmentStatus::all() {
        let value = store::appointments::count_by_status(&state.db, spa_id, status)
            .await
            .map_err(db_error)?;
        stats.push(StatCard {
            label: status.as_str().to_string(),
            value,
        });
    }

    let today = Local::now().date_naive();
    let today_count =
        store::appointments::count_on_day(&state.db, spa_id, &today.format("%Y-%m-%d").to_string())
            .await
            .map_err(db_error)?;

    let year = today.year() as i64;
    let month = today.month() as i64;
    let month_revenue = store::goals::achieved_amount(&state.db, spa_id, year, month)
        .await
        .map_err(db_error)?;

    let goal = store::goals::find_for_month(&state.db, spa_id, year, month)
        .await
        .map_err(db_error)?;
    let goal_progress = match goal {
        Some(goal) => Some(
            store::goals::progress(&state.db, spa_id, goal)
                .await
                .map_err(db_error)?,
        ),
        None => None,
    };

    let activities = sqlx::query_as::<_, crate::models::ActivityRow>(
        "SELECT message, created_at FROM activities WHERE spa_id = ? ORDER BY created_at DESC LIMIT 10",
    )
    .bind(spa_id)
    .fetch_all(&state.db)
    .await
    .map_err(db_error)?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "date": today.format("%Y-%m-%d").to_string(),
        "date_label": filters::format_date_es(today),
        "stats": stats,
        "today_count": today_count,
        "month": filters::month_name_es(today.month()),
        "month_revenue": month_revenue,
        "month_revenue_formatted": filters::format_cop(month_revenue),
        "goal": goal_progress,
        "activities": activities,
    })))
}

async fn week_calendar(
    state: web::Data<AppState>,
    auth: web::ReqData<AuthUser>,
    query: web::Query<CalendarQuery>,
) -> Result<HttpResponse> {
    let reference = match query.week.as_deref().filter(|value| !value.is_empty()) {
        Some(value) => match NaiveDate::parse_from_str(value, "%Y-%m-%d") {
            Ok(date) => date,
            Err(_) => {
                return Ok(validation_failed(vec![FieldError {
                    field: "week".to_string(),
                    message: "La fecha debe tener el formato AAAA-MM-DD".to_string(),
                }]))
            }
        },
        None => Local::now().date_naive(),
    };

    let monday = calendar::week_monday(reference);
    let next_monday = monday + Days::new(7);
    let rows = store::appointments::list_between(
        &state.db,
        &auth.spa_id,
        &format!("{}T00:00", monday.format("%Y-%m-%d")),
        &format!("{}T00:00", next_monday.format("%Y-%m-%d")),
    )
    .await
    .map_err(db_error)?;

    let grid = calendar::bucket_week(&rows, monday);
    Ok(HttpResponse::Ok().json(grid))
}
