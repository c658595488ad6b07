use actix_web::{HttpMessage, HttpRequest, HttpResponse, delete, get, post, web};
use serde::Deserialize;
use serde_json::json;

use super::error_with_toasts;
use crate::error::AppError;
use crate::services::cms::UploadFile;
use crate::services::data_service::DataService;
use crate::services::notifier::ToastRecorder;

/// Taille maximale d'un fichier téléversé (10 Mo)
pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

#[derive(Deserialize)]
pub struct UploadQuery {
    pub filename: String,
    pub alt: Option<String>,
}

/// POST /api/media?filename=...&alt=... - Corps brut du fichier
#[post("")]
pub async fn upload(
    data: web::Data<DataService>,
    req: HttpRequest,
    query: web::Query<UploadQuery>,
    body: web::Bytes,
) -> Result<HttpResponse, AppError> {
    let library = data.media()?;
    let mime_type = match req.content_type() {
        "" => "application/octet-stream".to_string(),
        other => other.to_string(),
    };
    let file = UploadFile {
        file_name: query.filename.clone(),
        mime_type,
        bytes: body.to_vec(),
    };

    let recorder = ToastRecorder::new();
    let media = match library.upload(file, query.alt.as_deref(), &recorder).await {
        Ok(media) => media,
        Err(e) => return Ok(error_with_toasts(&e, &recorder)),
    };

    Ok(HttpResponse::Created().json(json!({ "doc": media, "toasts": recorder.settled() })))
}

#[get("/{id}")]
pub async fn get_media(data: web::Data<DataService>, path: web::Path<String>) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let media = data
        .media()?
        .get(&id)
        .await?
        .ok_or_else(|| AppError::not_found("media", id))?;
    Ok(HttpResponse::Ok().json(json!({ "doc": media })))
}

#[delete("/{id}")]
pub async fn delete_media(data: web::Data<DataService>, path: web::Path<String>) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let recorder = ToastRecorder::new();
    if let Err(e) = data.media()?.delete(&id, &recorder).await {
        return Ok(error_with_toasts(&e, &recorder));
    }
    Ok(HttpResponse::Ok().json(json!({ "id": id, "toasts": recorder.settled() })))
}
