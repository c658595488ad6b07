use actix_web::{HttpResponse, patch, web};
use serde_json::json;

use super::error_with_toasts;
use crate::error::AppError;
use crate::services::data_service::DataService;
use crate::services::notifier::{ToastMessages, ToastRecorder, with_toast};

/// PATCH /api/users/{id}/toggle-status - Activer / désactiver un compte
#[patch("/{id}/toggle-status")]
pub async fn toggle_status(data: web::Data<DataService>, path: web::Path<String>) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();

    let recorder = ToastRecorder::new();
    let messages = ToastMessages::new("Mise à jour du statut...", "Statut mis à jour")
        .with_error("Impossible de changer le statut");
    let user = match with_toast(&recorder, &messages, data.toggle_user_status(&id)).await {
        Ok(user) => user,
        Err(e) => return Ok(error_with_toasts(&e, &recorder)),
    };

    Ok(HttpResponse::Ok().json(json!({ "doc": user, "toasts": recorder.settled() })))
}
