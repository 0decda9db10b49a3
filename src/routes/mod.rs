pub mod appointments;
pub mod catalog;
pub mod clients;
pub mod dashboard;
pub mod goals;
pub mod manicurists;
pub mod spa;

use actix_web::HttpResponse;

use crate::validate::FieldError;

/// 422 with the field-level messages the form renders inline.
pub(crate) fn validation_failed(errors: Vec<FieldError>) -> HttpResponse {
    HttpResponse::UnprocessableEntity().json(serde_json::json!({ "errors": errors }))
}

/// Covers both a missing row and a row owned by another spa.
pub(crate) fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(serde_json::json!({ "message": "Registro no encontrado" }))
}

pub(crate) fn db_error(err: sqlx::Error) -> actix_web::Error {
    log::error!("Database error: {err}");
    actix_web::error::ErrorInternalServerError("No se pudo completar la operación")
}
