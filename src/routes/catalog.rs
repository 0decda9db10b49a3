//! Service catalog and payment-method endpoints.

use actix_web::{web, HttpResponse, Result};
use actix_web_httpauth::middleware::HttpAuthentication;

use crate::{
    auth::{basic_validator, AuthUser},
    db::log_activity,
    routes::{db_error, not_found, validation_failed},
    state::AppState,
    store,
    validate::{
        validate_payment_method, validate_service, PaymentMethodInput, ServiceInput,
    },
};

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/services")
            .wrap(HttpAuthentication::basic(basic_validator))
            .service(
                web::resource("")
                    .route(web::get().to(list_services))
                    .route(web::post().to(create_service)),
            )
            .service(
                web::resource("/{id}")
                    .route(web::get().to(get_service))
                    .route(web::put().to(update_service))
                    .route(web::delete().to(delete_service)),
            ),
    )
    .service(
        web::scope("/api/payment-methods")
            .wrap(HttpAuthentication::basic(basic_validator))
            .service(
                web::resource("")
                    .route(web::get().to(list_payment_methods))
                    .route(web::post().to(create_payment_method)),
            )
            .service(
                web::resource("/{id}")
                    .route(web::get().to(get_payment_method))
                    .route(web::put().to(update_payment_method))
                    .route(web::delete().to(delete_payment_method)),
            ),
    );
}

async fn list_services(
    state: web::Data<AppState>,
    auth: web::ReqData<AuthUser>,
) -> Result<HttpResponse> {
    let services = store::catalog::list_services(&state.db, &auth.spa_id)
        .await
        .map_err(db_error)?;
    Ok(HttpResponse::Ok().json(services))
}

async fn get_service(
    state: web::Data<AppState>,
    auth: web::ReqData<AuthUser>,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    match store::catalog::get_service(&state.db, &auth.spa_id, &path)
        .await
        .map_err(db_error)?
    {
        Some(service) => Ok(HttpResponse::Ok().json(service)),
        None => Ok(not_found()),
    }
}

async fn create_service(
    state: web::Data<AppState>,
    auth: web::ReqData<AuthUser>,
    payload: web::Json<ServiceInput>,
) -> Result<HttpResponse> {
    let input = payload.into_inner();
    let errors = validate_service(&input);
    if !errors.is_empty() {
        return Ok(validation_failed(errors));
    }

    let service = store::catalog::create_service(&state.db, &auth.spa_id, &input)
        .await
        .map_err(db_error)?;

    log_activity(
        &state.db,
        &auth.spa_id,
        "service_created",
        &format!("{} creó el servicio {}.", auth.display_name, service.name),
        Some(&auth.id),
        None,
    )
    .await;

    Ok(HttpResponse::Created().json(service))
}

async fn update_service(
    state: web::Data<AppState>,
    auth: web::ReqData<AuthUser>,
    path: web::Path<String>,
    payload: web::Json<ServiceInput>,
) -> Result<HttpResponse> {
    let input = payload.into_inner();
    let errors = validate_service(&input);
    if !errors.is_empty() {
        return Ok(validation_failed(errors));
    }

    match store::catalog::update_service(&state.db, &auth.spa_id, &path, &input)
        .await
        .map_err(db_error)?
    {
        Some(service) => Ok(HttpResponse::Ok().json(service)),
        None => Ok(not_found()),
    }
}

async fn delete_service(
    state: web::Data<AppState>,
    auth: web::ReqData<AuthUser>,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    if !store::catalog::delete_service(&state.db, &auth.spa_id, &path)
        .await
        .map_err(db_error)?
    {
        return Ok(not_found());
    }
    Ok(HttpResponse::NoContent().finish())
}

async fn list_payment_methods(
    state: web::Data<AppState>,
    auth: web::ReqData<AuthUser>,
) -> Result<HttpResponse> {
    let methods = store::catalog::list_payment_methods(&state.db, &auth.spa_id)
        .await
        .map_err(db_error)?;
    Ok(HttpResponse::Ok().json(methods))
}

async fn get_payment_method(
    state: web::Data<AppState>,
    auth: web::ReqData<AuthUser>,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    match store::catalog::get_payment_method(&state.db, &auth.spa_id, &path)
        .await
        .map_err(db_error)?
    {
        Some(method) => Ok(HttpResponse::Ok().json(method)),
        None => Ok(not_found()),
    }
}

async fn create_payment_method(
    state: web::Data<AppState>,
    auth: web::ReqData<AuthUser>,
    payload: web::Json<PaymentMethodInput>,
) -> Result<HttpResponse> {
    let input = payload.into_inner();
    let errors = validate_payment_method(&input);
    if !errors.is_empty() {
        return Ok(validation_failed(errors));
    }

    let method = store::catalog::create_payment_method(&state.db, &auth.spa_id, &input)
        .await
        .map_err(db_error)?;
    Ok(HttpResponse::Created().json(method))
}

async fn update_payment_method(
    state: web::Data<AppState>,
    auth: web::ReqData<AuthUser>,
    path: web::Path<String>,
    payload: web::Json<PaymentMethodInput>,
) -> Result<HttpResponse> {
    let input = payload.into_inner();
    let errors = validate_payment_method(&input);
    if !errors.is_empty() {
        return Ok(validation_failed(errors));
    }

    match store::catalog::update_payment_method(&state.db, &auth.spa_id, &path, &input)
        .await
        .map_err(db_error)?
    {
        Some(method) => Ok(HttpResponse::Ok().json(method)),
        None => Ok(not_found()),
    }
}

async fn delete_payment_method(
    state: web::Data<AppState>,
    auth: web::ReqData<AuthUser>,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    if !store::catalog::delete_payment_method(&state.db, &auth.spa_id, &path)
        .await
        .map_err(db_error)?
    {
        return Ok(not_found());
    }
    Ok(HttpResponse::NoContent().finish())
}
