use actix_web::{web, HttpResponse, Result};
use actix_web_httpauth::middleware::HttpAuthentication;

use crate::{
    auth::{basic_validator, AuthUser},
    db::log_activity,
    routes::{db_error, not_found, validation_failed},
    state::AppState,
    store,
    validate::{validate_client, ClientInput},
};

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/clients")
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
            ),
    );
}

async fn list(state: web::Data<AppState>, auth: web::ReqData<AuthUser>) -> Result<HttpResponse> {
    let clients = store::clients::list(&state.db, &auth.spa_id)
        .await
        .map_err(db_error)?;
    Ok(HttpResponse::Ok().json(clients))
}

async fn get(
    state: web::Data<AppState>,
    auth: web::ReqData<AuthUser>,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    match store::clients::get(&state.db, &auth.spa_id, &path)
        .await
        .map_err(db_error)?
    {
        Some(client) => Ok(HttpResponse::Ok().json(client)),
        None => Ok(not_found()),
    }
}

async fn create(
    state: web::Data<AppState>,
    auth: web::ReqData<AuthUser>,
    payload: web::Json<ClientInput>,
) -> Result<HttpResponse> {
    let input = payload.into_inner();
    let errors = validate_client(&input);
    if !errors.is_empty() {
        return Ok(validation_failed(errors));
    }

    let client = store::clients::create(&state.db, &auth.spa_id, &input)
        .await
        .map_err(db_error)?;

    log_activity(
        &state.db,
        &auth.spa_id,
        "client_created",
        &format!("{} registró al cliente {}.", auth.display_name, client.name),
        Some(&auth.id),
        None,
    )
    .await;

    Ok(HttpResponse::Created().json(client))
}

async fn update(
    state: web::Data<AppState>,
    auth: web::ReqData<AuthUser>,
    path: web::Path<String>,
    payload: web::Json<ClientInput>,
) -> Result<HttpResponse> {
    let input = payload.into_inner();
    let errors = validate_client(&input);
    if !errors.is_empty() {
        return Ok(validation_failed(errors));
    }

    match store::clients::update(&state.db, &auth.spa_id, &path, &input)
        .await
        .map_err(db_error)?
    {
        Some(client) => Ok(HttpResponse::Ok().json(client)),
        None => Ok(not_found()),
    }
}

async fn delete(
    state: web::Data<AppState>,
    auth: web::ReqData<AuthUser>,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    if !store::clients::delete(&state.db, &auth.spa_id, &path)
        .await
        .map_err(db_error)?
    {
        return Ok(not_found());
    }

    log_activity(
        &state.db,
        &auth.spa_id,
        "client_deleted",
        &format!("{} eliminó un cliente.", auth.display_name),
        Some(&auth.id),
        None,
    )
    .await;

    Ok(HttpResponse::NoContent().finish())
}
