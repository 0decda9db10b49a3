use actix_web::{web, HttpResponse, Result};
use actix_web_httpauth::middleware::HttpAuthentication;
use serde::Deserialize;

use crate::{
    auth::{basic_validator, AuthUser},
    calendar,
    db::log_activity,
    filters,
    routes::{db_error, not_found, validation_failed},
    state::AppState,
    status::AppointmentStatus,
    store::{self, appointments::StatusOutcome},
    validate::{validate_appointment, AppointmentInput, FieldError},
};

#[derive(Debug, Deserialize)]
struct ListFilter {
    status: Option<String>,
}

#[derive(Debug, Deserialize)]
struct StatusPayload {
    status: String,
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/appointments")
            .wrap(HttpAuthentication::basic(basic_validator))
            .service(
                web::resource("")
                    .route(web::get().to(list))
                    .route(web::post().to(create)),
            )
            .service(
                web::resource("/{id}")
                    .route(web::get().to(detail))
                    .route(web::put().to(update))
                    .route(web::delete().to(delete)),
            )
            .service(web::resource("/{id}/status").route(web::post().to(set_status))),
    );
}

async fn list(
    state: web::Data<AppState>,
    auth: web::ReqData<AuthUser>,
    query: web::Query<ListFilter>,
) -> Result<HttpResponse> {
    let status = match query.status.as_deref().filter(|value| !value.is_empty()) {
        Some(value) => match AppointmentStatus::parse(value) {
            Some(status) => Some(status),
            None => {
                return Ok(validation_failed(vec![FieldError {
                    field: "status".to_string(),
                    message: "Estado desconocido".to_string(),
                }]))
            }
        },
        None => None,
    };

    let rows = store::appointments::list(&state.db, &auth.spa_id, status)
        .await
        .map_err(db_error)?;
    Ok(HttpResponse::Ok().json(rows))
}

async fn detail(
    state: web::Data<AppState>,
    auth: web::ReqData<AuthUser>,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    let Some(appointment) = store::appointments::get(&state.db, &auth.spa_id, &path)
        .await
        .map_err(db_error)?
    else {
        return Ok(not_found());
    };

    let services = store::appointments::services_of(&state.db, &appointment.id)
        .await
        .map_err(db_error)?;
    let total = calendar::appointment_total(&services);

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "appointment": appointment,
        "services": services,
        "total": total,
        "total_formatted": filters::format_cop(total),
    })))
}

async fn create(
    state: web::Data<AppState>,
    auth: web::ReqData<AuthUser>,
    payload: web::Json<AppointmentInput>,
) -> Result<HttpResponse> {
    let input = payload.into_inner();
    let errors = validate_appointment(&input);
    if !errors.is_empty() {
        return Ok(validation_failed(errors));
    }

    let Some(appointment) = store::appointments::create(&state.db, &auth.spa_id, &input)
        .await
        .map_err(db_error)?
    else {
        // A referenced client, manicurist, service or payment method is
        // missing or belongs to another spa.
        return Ok(not_found());
    };

    log_activity(
        &state.db,
        &auth.spa_id,
        "appointment_created",
        &format!("{} agendó una cita.", auth.display_name),
        Some(&auth.id),
        Some(&appointment.id),
    )
    .await;

    Ok(HttpResponse::Created().json(appointment))
}

async fn update(
    state: web::Data<AppState>,
    auth: web::ReqData<AuthUser>,
    path: web::Path<String>,
    payload: web::Json<AppointmentInput>,
) -> Result<HttpResponse> {
    let input = payload.into_inner();
    let errors = validate_appointment(&input);
    if !errors.is_empty() {
        return Ok(validation_failed(errors));
    }

    match store::appointments::update(&state.db, &auth.spa_id, &path, &input)
        .await
        .map_err(db_error)?
    {
        Some(appointment) => {
            log_activity(
                &state.db,
                &auth.spa_id,
                "appointment_updated",
                &format!("{} actualizó la cita {}.", auth.display_name, appointment.id),
                Some(&auth.id),
                Some(&appointment.id),
            )
            .await;
            Ok(HttpResponse::Ok().json(appointment))
        }
        None => Ok(not_found()),
    }
}

async fn delete(
    state: web::Data<AppState>,
    auth: web::ReqData<AuthUser>,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    if !store::appointments::delete(&state.db, &auth.spa_id, &path)
        .await
        .map_err(db_error)?
    {
        return Ok(not_found());
    }

    log_activity(
        &state.db,
        &auth.spa_id,
        "appointment_deleted",
        &format!("{} eliminó una cita.", auth.display_name),
        Some(&auth.id),
        None,
    )
    .await;

    Ok(HttpResponse::NoContent().finish())
}

async fn set_status(
    state: web::Data<AppState>,
    auth: web::ReqData<AuthUser>,
    path: web::Path<String>,
    payload: web::Json<StatusPayload>,
) -> Result<HttpResponse> {
    let Some(next) = AppointmentStatus::parse(&payload.status) else {
        return Ok(validation_failed(vec![FieldError {
            field: "status".to_string(),
            message: "Estado desconocido".to_string(),
        }]));
    };

    match store::appointments::set_status(&state.db, &auth.spa_id, &path, next)
        .await
        .map_err(db_error)?
    {
        StatusOutcome::NotFound => Ok(not_found()),
        StatusOutcome::Illegal { from } => Ok(validation_failed(vec![FieldError {
            field: "status".to_string(),
            message: format!("No se puede pasar de {from} a {next}"),
        }])),
        StatusOutcome::Updated(appointment) => {
            log_activity(
                &state.db,
                &auth.spa_id,
                "appointment_status_changed",
                &format!(
                    "{} cambió la cita {} a {}.",
                    auth.display_name, appointment.id, next
                ),
                Some(&auth.id),
                Some(&appointment.id),
            )
            .await;
            Ok(HttpResponse::Ok().json(appointment))
        }
    }
}
