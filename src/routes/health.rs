use actix_web::{get, web, HttpResponse, Responder};
use serde_json::json;

use crate::db::Database;

#[get("/")]
pub async fn index() -> impl Responder {
    HttpResponse::Ok().json(json!({
        "message": "Hello World"
    }))
}

/// Database health check
///
/// Returns the pool snapshot with 200 when the database answers, 503 otherwise.
#[get("/health")]
pub async fn health(db: web::Data<Database>) -> impl Responder {
    let snapshot = db.health().await;
    if snapshot.is_up() {
        HttpResponse::Ok().json(snapshot)
    } else {
        HttpResponse::ServiceUnavailable().json(snapshot)
    }
}
