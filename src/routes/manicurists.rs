use actix_web::{web, HttpResponse, Result};
use actix_web_httpauth::middleware::HttpAuthentication;
use serde::Deserialize;

use crate::{
    auth::{basic_validator, AuthUser},
    db::log_activity,
    routes::{db_error, not_found, validation_failed},
    state::AppState,
    store,
    validate::{
        validate_availability, validate_manicurist, validate_schedules, AvailabilityEntry,
        ManicuristInput, ScheduleEntry,
    },
};

#[derive(Debug, Deserialize)]
struct ScheduleReplacePayload {
    schedules: Vec<ScheduleEntry>,
}

#[derive(Debug, Deserialize)]
struct AvailabilityReplacePayload {
    availability: Vec<AvailabilityEntry>,
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/manicurists")
            .wrap(HttpAuthentication::basic(basic_validator))
            .service(
                web::resource("")
                    .route(web::get().to(list))
                    .route(web::post().to(create)),
            )
            .service(
                web::resource("/{id}")
                    .route(web::get().to(get))
                    .route(web::put().to(update))
                    .route(web::delete().to(delete)),
            )
            .service(
                web::resource("/{id}/schedules")
                    .route(web::get().to(schedules))
                    .route(web::put().to(replace_schedules)),
            )
            .service(
                web::resource("/{id}/availability")
                    .route(web::get().to(availability))
                    .route(web::put().to(replace_availability)),
            ),
    );
}

async fn list(state: web::Data<AppState>, auth: web::ReqData<AuthUser>) -> Result<HttpResponse> {
    let manicurists = store::manicurists::list(&state.db, &auth.spa_id)
        .await
        .map_err(db_error)?;
    Ok(HttpResponse::Ok().json(manicurists))
}

async fn get(
    state: web::Data<AppState>,
    auth: web::ReqData<AuthUser>,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    match store::manicurists::get(&state.db, &auth.spa_id, &path)
        .await
        .map_err(db_error)?
    {
        Some(manicurist) => Ok(HttpResponse::Ok().json(manicurist)),
        None => Ok(not_found()),
    }
}

async fn create(
    state: web::Data<AppState>,
    auth: web::ReqData<AuthUser>,
    payload: web::Json<ManicuristInput>,
) -> Result<HttpResponse> {
    let input = payload.into_inner();
    let errors = validate_manicurist(&input);
    if !errors.is_empty() {
        return Ok(validation_failed(errors));
    }

    let manicurist = store::manicurists::create(&state.db, &auth.spa_id, &input)
        .await
        .map_err(db_error)?;

    log_activity(
        &state.db,
        &auth.spa_id,
        "manicurist_created",
        &format!(
            "{} registró a la manicurista {}.",
            auth.display_name, manicurist.name
        ),
        Some(&auth.id),
        None,
    )
    .await;

    Ok(HttpResponse::Created().json(manicurist))
}

async fn update(
    state: web::Data<AppState>,
    auth: web::ReqData<AuthUser>,
    path: web::Path<String>,
    payload: web::Json<ManicuristInput>,
) -> Result<HttpResponse> {
    let input = payload.into_inner();
    let errors = validate_manicurist(&input);
    if !errors.is_empty() {
        return Ok(validation_failed(errors));
    }

    match store::manicurists::update(&state.db, &auth.spa_id, &path, &input)
        .await
        .map_err(db_error)?
    {
        Some(manicurist) => Ok(HttpResponse::Ok().json(manicurist)),
        None => Ok(not_found()),
    }
}

async fn delete(
    state: web::Data<AppState>,
    auth: web::ReqData<AuthUser>,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    if !store::manicurists::delete(&state.db, &auth.spa_id, &path)
        .await
        .map_err(db_error)?
    {
        return Ok(not_found());
    }

    log_activity(
        &state.db,
        &auth.spa_id,
        "manicurist_deleted",
        &format!("{} eliminó una manicurista.", auth.display_name),
        Some(&auth.id),
        None,
    )
    .await;

    Ok(HttpResponse::NoContent().finish())
}

async fn schedules(
    state: web::Data<AppState>,
    auth: web::ReqData<AuthUser>,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    match store::scheduling::schedules_for(&state.db, &auth.spa_id, &path)
        .await
        .map_err(db_error)?
    {
        Some(rows) => Ok(HttpResponse::Ok().json(rows)),
        None => Ok(not_found()),
    }
}

async fn replace_schedules(
    state: web::Data<AppState>,
    auth: web::ReqData<AuthUser>,
    path: web::Path<String>,
    payload: web::Json<ScheduleReplacePayload>,
) -> Result<HttpResponse> {
    let payload = payload.into_inner();
    let errors = validate_schedules(&payload.schedules);
    if !errors.is_empty() {
        return Ok(validation_failed(errors));
    }

    match store::scheduling::replace_schedules(&state.db, &auth.spa_id, &path, &payload.schedules)
        .await
        .map_err(db_error)?
    {
        Some(rows) => {
            log_activity(
                &state.db,
                &auth.spa_id,
                "schedules_replaced",
                &format!(
                    "{} actualizó el horario semanal de una manicurista.",
                    auth.display_name
                ),
                Some(&auth.id),
                None,
            )
            .await;
            Ok(HttpResponse::Ok().json(rows))
        }
        None => Ok(not_found()),
    }
}

async fn availability(
    state: web::Data<AppState>,
    auth: web::ReqData<AuthUser>,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    match store::scheduling::availability_for(&state.db, &auth.spa_id, &path)
        .await
        .map_err(db_error)?
    {
        Some(rows) => Ok(HttpResponse::Ok().json(rows)),
        None => Ok(not_found()),
    }
}

async fn replace_availability(
    state: web::Data<AppState>,
    auth: web::ReqData<AuthUser>,
    path: web::Path<String>,
    payload: web::Json<AvailabilityReplacePayload>,
) -> Result<HttpResponse> {
    let payload = payload.into_inner();
    let errors = validate_availability(&payload.availability);
    if !errors.is_empty() {
        return Ok(validation_failed(errors));
    }

    match store::scheduling::replace_availability(
        &state.db,
        &auth.spa_id,
        &path,
        &payload.availability,
    )
    .await
    .map_err(db_error)?
    {
        Some(rows) => {
            log_activity(
                &state.db,
                &auth.spa_id,
                "availability_replaced",
                &format!(
                    "{} actualizó las excepciones de disponibilidad de una manicurista.",
                    auth.display_name
                ),
                Some(&auth.id),
                None,
            )
            .await;
            Ok(HttpResponse::Ok().json(rows))
        }
        None => Ok(not_found()),
    }
}
