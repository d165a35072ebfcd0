use actix_web::{get, web, HttpResponse, Responder};
use chrono::Utc;
use serde_json::json;

use crate::repository::StorageKind;

/// Health check endpoint
///
/// Returns the status, the storage backend in use and the current timestamp.
#[get("/health")]
pub async fn health(storage: web::Data<StorageKind>) -> impl Responder {
    HttpResponse::Ok().json(json!({
        "status": "ok",
        "storage": storage.to_string(),
        "timestamp": Utc::now()
    }))
}
