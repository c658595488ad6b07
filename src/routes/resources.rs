//! Routes CRUD génériques, une instance par collection.
//!
//! GET ""        liste filtrée par la query string
//! POST ""       création (formulaire validé avant tout appel au magasin)
//! GET /{id}     lecture
//! PATCH /{id}   mise à jour partielle
//! DELETE /{id}  suppression

use actix_web::{HttpResponse, Scope, web};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::json;
use tracing::debug;
use validator::Validate;

use super::error_with_toasts;
use crate::error::AppError;
use crate::services::data_service::{DataService, Stored};
use crate::services::notifier::{ToastMessages, ToastRecorder, with_toast};

/// Ajoute les routes CRUD de `E` à la fin de `scope`.
///
/// Les routes spécifiques d'une collection doivent être enregistrées avant
/// celles-ci, sinon `/{id}` les intercepte.
pub fn crud<E>(scope: Scope) -> Scope
where
    E: Stored + Serialize,
    E::Filter: DeserializeOwned + 'static,
    E::Draft: DeserializeOwned + Validate + 'static,
    E::Patch: DeserializeOwned + Validate + 'static,
{
    scope
        .route("", web::get().to(list::<E>))
        .route("", web::post().to(create::<E>))
        .route("/{id}", web::get().to(get_one::<E>))
        .route("/{id}", web::patch().to(update::<E>))
        .route("/{id}", web::delete().to(delete::<E>))
}

async fn list<E>(data: web::Data<DataService>, filter: web::Query<E::Filter>) -> Result<HttpResponse, AppError>
where
    E: Stored + Serialize,
    E::Filter: DeserializeOwned,
{
    let docs = E::store(&data).list(&filter).await?;
    debug!(collection = E::COLLECTION, count = docs.len(), "list");
    let total = docs.len();
    Ok(HttpResponse::Ok().json(json!({ "docs": docs, "totalDocs": total })))
}

async fn get_one<E>(data: web::Data<DataService>, path: web::Path<String>) -> Result<HttpResponse, AppError>
where
    E: Stored + Serialize,
{
    let id = path.into_inner();
    let doc = E::store(&data)
        .get(&id)
        .await?
        .ok_or_else(|| AppError::not_found(E::COLLECTION, id))?;
    Ok(HttpResponse::Ok().json(json!({ "doc": doc })))
}

async fn create<E>(data: web::Data<DataService>, body: web::Json<E::Draft>) -> Result<HttpResponse, AppError>
where
    E: Stored + Serialize,
    E::Draft: DeserializeOwned + Validate,
{
    let draft = body.into_inner();
    draft.validate()?;

    let recorder = ToastRecorder::new();
    let messages = ToastMessages::new("Enregistrement...", "Enregistrement réussi")
        .with_error("Échec de l'enregistrement");
    let doc = match with_toast(&recorder, &messages, E::store(&data).create(draft)).await {
        Ok(doc) => doc,
        Err(e) => return Ok(error_with_toasts(&e, &recorder)),
    };

    Ok(HttpResponse::Created().json(json!({ "doc": doc, "toasts": recorder.settled() })))
}

async fn update<E>(
    data: web::Data<DataService>,
    path: web::Path<String>,
    body: web::Json<E::Patch>,
) -> Result<HttpResponse, AppError>
where
    E: Stored + Serialize,
    E::Patch: DeserializeOwned + Validate,
{
    let id = path.into_inner();
    let patch = body.into_inner();
    patch.validate()?;

    let recorder = ToastRecorder::new();
    let messages = ToastMessages::new("Mise à jour...", "Modifications enregistrées")
        .with_error("Échec de la mise à jour");
    let doc = match with_toast(&recorder, &messages, E::store(&data).update(&id, patch)).await {
        Ok(doc) => doc,
        Err(e) => return Ok(error_with_toasts(&e, &recorder)),
    };

    Ok(HttpResponse::Ok().json(json!({ "doc": doc, "toasts": recorder.settled() })))
}

async fn delete<E>(data: web::Data<DataService>, path: web::Path<String>) -> Result<HttpResponse, AppError>
where
    E: Stored,
{
    let id = path.into_inner();

    let recorder = ToastRecorder::new();
    let messages = ToastMessages::new("Suppression...", "Suppression effectuée")
        .with_error("Échec de la suppression");
    if let Err(e) = with_toast(&recorder, &messages, E::store(&data).delete(&id)).await {
        return Ok(error_with_toasts(&e, &recorder));
    }

    Ok(HttpResponse::Ok().json(json!({ "id": id, "toasts": recorder.settled() })))
}
