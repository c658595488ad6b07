use actix_web::{HttpResponse, get, post, web};
use serde_json::json;

use crate::domain::{Article, Resource};
use crate::error::AppError;
use crate::services::data_service::DataService;

/// GET /api/articles/slug/{slug} - Article public par son slug
#[get("/slug/{slug}")]
pub async fn by_slug(data: web::Data<DataService>, path: web::Path<String>) -> Result<HttpResponse, AppError> {
    let slug = path.into_inner();
    let article = data
        .article_by_slug(&slug)
        .await?
        .ok_or_else(|| AppError::not_found(Article::COLLECTION, slug))?;
    Ok(HttpResponse::Ok().json(json!({ "doc": article })))
}

/// POST /api/articles/{id}/view - Compte une lecture
#[post("/{id}/view")]
pub async fn record_view(data: web::Data<DataService>, path: web::Path<String>) -> Result<HttpResponse, AppError> {
    let article = data.record_article_view(&path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(json!({ "id": article.id, "vues": article.vues })))
}
