//! Monthly sales goals. Admin-only: targets are owner-facing numbers.

use actix_web::{web, HttpResponse, Result};
use actix_web_httpauth::middleware::HttpAuthentication;

use crate::{
    auth::{admin_validator, AuthUser},
    routes::{db_error, not_found, validation_failed},
    state::AppState,
    store,
    validate::{validate_sales_goal, SalesGoalInput},
};

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/goals")
            .wrap(HttpAuthentication::basic(admin_validator))
            .service(
                web::resource("")
                    .route(web::get().to(list))
                    .route(web::post().to(upsert)),
            )
            .service(
                web::resource("/{id}")
                    .route(web::get().to(progress))
                    .route(web::delete().to(delete)),
            ),
    );
}

async fn list(state: web::Data<AppState>, auth: web::ReqData<AuthUser>) -> Result<HttpResponse> {
    let goals = store::goals::list(&state.db, &auth.spa_id)
        .await
        .map_err(db_error)?;
    Ok(HttpResponse::Ok().json(goals))
}

async fn upsert(
    state: web::Data<AppState>,
    auth: web::ReqData<AuthUser>,
    payload: web::Json<SalesGoalInput>,
) -> Result<HttpResponse> {
    let input = payload.into_inner();
    let errors = validate_sales_goal(&input);
    if !errors.is_empty() {
        return Ok(validation_failed(errors));
    }

    let goal = store::goals::upsert(&state.db, &auth.spa_id, &input)
        .await
        .map_err(db_error)?;
    Ok(HttpResponse::Ok().json(goal))
}

async fn progress(
    state: web::Data<AppState>,
    auth: web::ReqData<AuthUser>,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    let Some(goal) = store::goals::get(&state.db, &auth.spa_id, &path)
        .await
        .map_err(db_error)?
    else {
        return Ok(not_found());
    };

    let progress = store::goals::progress(&state.db, &auth.spa_id, goal)
        .await
        .map_err(db_error)?;
    Ok(HttpResponse::Ok().json(progress))
}

async fn delete(
    state: web::Data<AppState>,
    auth: web::ReqData<AuthUser>,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    if !store::goals::delete(&state.db, &auth.spa_id, &path)
        .await
        .map_err(db_error)?
    {
        return Ok(not_found());
    }
    Ok(HttpResponse::NoContent().finish())
}
