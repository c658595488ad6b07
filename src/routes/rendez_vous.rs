use actix_web::{HttpResponse, post, web};
use serde_json::json;

use super::error_with_toasts;
use crate::error::AppError;
use crate::services::data_service::DataService;
use crate::services::notifier::ToastRecorder;
use crate::services::rendez_vous_workflow::{RendezVousSubmission, submit_rendez_vous};

/// POST /api/rendez-vous/submit - Formulaire de prise de rendez-vous
///
/// Réponse 201 dès que le rendez-vous est créé, même si le dossier apprenant
/// a échoué (`warning` renseigné).
#[post("/submit")]
pub async fn submit(
    data: web::Data<DataService>,
    body: web::Json<RendezVousSubmission>,
) -> Result<HttpResponse, AppError> {
    let recorder = ToastRecorder::new();
    let outcome = match submit_rendez_vous(&data, &recorder, body.into_inner()).await {
        Ok(outcome) => outcome,
        Err(e) => return Ok(error_with_toasts(&e, &recorder)),
    };

    Ok(HttpResponse::Created().json(json!({
        "doc": outcome.rendez_vous,
        "apprenant": outcome.apprenant,
        "warning": outcome.warning,
        "toasts": recorder.settled(),
    })))
}
