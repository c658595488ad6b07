use actix_web::{HttpResponse, post, web};
use serde::Deserialize;
use serde_json::json;

use crate::error::AppError;
use crate::services::data_service::DataService;

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// POST /api/auth/login - Ouvre une session CMS (mode CMS uniquement)
#[post("/login")]
pub async fn login(data: web::Data<DataService>, body: web::Json<LoginRequest>) -> Result<HttpResponse, AppError> {
    let user = data.login(&body.email, &body.password).await?;
    Ok(HttpResponse::Ok().json(json!({ "user": user })))
}

/// POST /api/auth/logout - Oublie le jeton courant
#[post("/logout")]
pub async fn logout(data: web::Data<DataService>) -> Result<HttpResponse, AppError> {
    data.cms_client()?.logout().await?;
    Ok(HttpResponse::NoContent().finish())
}
