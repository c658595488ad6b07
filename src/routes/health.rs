use actix_web::{HttpResponse, get, web};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::services::data_service::DataService;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub mode: String,
    pub time: DateTime<Utc>,
}

#[get("/health")]
pub async fn health_check(data: web::Data<DataService>) -> HttpResponse {
    HttpResponse::Ok().json(HealthResponse {
        status: "ok",
        mode: format!("{:?}", data.mode()).to_lowercase(),
        time: Utc::now(),
    })
}
