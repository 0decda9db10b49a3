//! Tenant-level operating hours, including holiday rows pinned to a
//! specific date.

use actix_web::{web, HttpResponse, Result};
use actix_web_httpauth::middleware::HttpAuthentication;
use serde::Deserialize;

use crate::{
    auth::{admin_validator, AuthUser},
    db::log_activity,
    routes::{db_error, validation_failed},
    state::AppState,
    store,
    validate::{validate_spa_schedules, SpaScheduleEntry},
};

#[derive(Debug, Deserialize)]
struct SpaScheduleReplacePayload {
    schedules: Vec<SpaScheduleEntry>,
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/spa")
            .wrap(HttpAuthentication::basic(admin_validator))
            .service(
                web::resource("/schedule")
                    .route(web::get().to(schedule))
                    .route(web::put().to(replace_schedule)),
            ),
    );
}

async fn schedule(
    state: web::Data<AppState>,
    auth: web::ReqData<AuthUser>,
) -> Result<HttpResponse> {
    let rows = store::scheduling::spa_schedules(&state.db, &auth.spa_id)
        .await
        .map_err(db_error)?;
    Ok(HttpResponse::Ok().json(rows))
}

async fn replace_schedule(
    state: web::Data<AppState>,
    auth: web::ReqData<AuthUser>,
    payload: web::Json<SpaScheduleReplacePayload>,
) -> Result<HttpResponse> {
    let payload = payload.into_inner();
    let errors = validate_spa_schedules(&payload.schedules);
    if !errors.is_empty() {
        return Ok(validation_failed(errors));
    }

    let rows = store::scheduling::replace_spa_schedules(&state.db, &auth.spa_id, &payload.schedules)
        .await
        .map_err(db_error)?;

    log_activity(
        &state.db,
        &auth.spa_id,
        "spa_schedule_replaced",
        &format!("{} actualizó el horario del spa.", auth.display_name),
        Some(&auth.id),
        None,
    )
    .await;

    Ok(HttpResponse::Ok().json(rows))
}
