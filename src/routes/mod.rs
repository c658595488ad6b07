// ============================================================================
// ROUTES - MODULE PRINCIPAL
// ============================================================================
//
// Description:
//   Surface REST du back-office, montée sous `/api`. Chaque réponse
//   d'écriture renvoie les notifications (toasts) de l'opération.
//
// Liste des modules:
//   - health : État du service et mode de données actif
//   - resources : CRUD générique des six collections
//   - users : Bascule active / inactive
//   - articles : Lecture par slug et compteur de vues
//   - rendez_vous : Soumission rendez-vous + dossier apprenant
//   - auth : Session CMS
//   - media : Médiathèque (mode CMS)
//
// ============================================================================

pub mod articles;
pub mod auth;
pub mod health;
pub mod media;
pub mod rendez_vous;
pub mod resources;
pub mod users;

use actix_web::{HttpResponse, ResponseError, web};
use serde_json::Value;

use crate::domain::{Apprenant, Article, FormationPersonnalisee, Programme, RendezVous, User};
use crate::error::AppError;
use crate::services::notifier::ToastRecorder;
use resources::crud;

/// Réponse d'erreur d'une écriture: corps d'erreur habituel + toasts émis
pub(crate) fn error_with_toasts(err: &AppError, recorder: &ToastRecorder) -> HttpResponse {
    let mut body = err.body();
    if let Value::Object(map) = &mut body {
        map.insert("toasts".to_string(), serde_json::json!(recorder.settled()));
    }
    HttpResponse::build(err.status_code()).json(body)
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .service(health::health_check)
            .service(web::scope("/auth").service(auth::login).service(auth::logout))
            .service(
                web::scope("/media")
                    .app_data(web::PayloadConfig::new(media::MAX_UPLOAD_BYTES))
                    .service(media::upload)
                    .service(media::get_media)
                    .service(media::delete_media),
            )
            .service(crud::<User>(web::scope("/users").service(users::toggle_status)))
            .service(crud::<Programme>(web::scope("/programmes")))
            .service(crud::<Apprenant>(web::scope("/apprenants")))
            .service(crud::<RendezVous>(web::scope("/rendez-vous").service(rendez_vous::submit)))
            .service(crud::<Article>(
                web::scope("/articles")
                    .service(articles::by_slug)
                    .service(articles::record_view),
            ))
            .service(crud::<FormationPersonnalisee>(web::scope("/formations-personnalisees"))),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::cms::{CmsClient, MemoryTokenStore};
    use crate::services::data_service::DataService;
    use actix_web::http::StatusCode;
    use actix_web::{App, test};
    use httpmock::prelude::*;
    use serde_json::{Value, json};
    use std::sync::Arc;

    macro_rules! app {
        () => {
            app!(DataService::mock())
        };
        ($data:expr) => {
            test::init_service(
                App::new()
                    .app_data(web::Data::new($data))
                    .configure(configure_routes),
            )
            .await
        };
    }

    #[actix_web::test]
    async fn test_health() {
        let app = app!();
        let req = test::TestRequest::get().uri("/api/health").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["status"], "ok");
        assert_eq!(body["mode"], "mock");
    }

    #[actix_web::test]
    async fn test_list_with_query_filter() {
        let app = app!();
        let req = test::TestRequest::get().uri("/api/programmes?statut=published").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["totalDocs"], 2);
        assert_eq!(body["docs"][0]["id"], "prog-1");
    }

    #[actix_web::test]
    async fn test_create_returns_doc_and_toasts() {
        let app = app!();
        let req = test::TestRequest::post()
            .uri("/api/articles")
            .set_json(json!({
                "titre": "Éviter les TMS au bureau",
                "contenu": "Quelques gestes simples pour le poste de travail.",
                "statut": "draft"
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["doc"]["slug"], "eviter-les-tms-au-bureau");
        assert_eq!(body["doc"]["temps_lecture"], 1);
        assert_eq!(body["toasts"][0]["level"], "success");
    }

    #[actix_web::test]
    async fn test_invalid_draft_is_unprocessable() {
        let app = app!();
        let req = test::TestRequest::post()
            .uri("/api/users")
            .set_json(json!({ "email": "pas-un-email", "prenom": "", "nom": "Martin", "role": "ADMIN" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let body: Value = test::read_body_json(resp).await;
        let fields: Vec<&str> = body["fieldErrors"]
            .as_array()
            .unwrap()
            .iter()
            .filter_map(|f| f["field"].as_str())
            .collect();
        assert_eq!(fields, vec!["email", "prenom"]);
    }

    #[actix_web::test]
    async fn test_missing_document_is_not_found() {
        let app = app!();
        let req = test::TestRequest::get().uri("/api/apprenants/absent").to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);

        let req = test::TestRequest::delete().uri("/api/apprenants/absent").to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn test_toggle_status_then_list() {
        let app = app!();
        let req = test::TestRequest::patch().uri("/api/users/user-3/toggle-status").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["doc"]["statut"], "inactive");

        let req = test::TestRequest::get().uri("/api/users?statut=inactive").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["docs"][0]["id"], "user-3");
    }

    #[actix_web::test]
    async fn test_article_slug_and_views() {
        let app = app!();
        let req = test::TestRequest::get().uri("/api/articles/slug/nouveautes-qualiopi").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["doc"]["id"], "art-2");

        let req = test::TestRequest::post().uri("/api/articles/art-2/view").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["vues"], 1);
    }

    #[actix_web::test]
    async fn test_submit_positionnement() {
        let app = app!();
        let req = test::TestRequest::post()
            .uri("/api/rendez-vous/submit")
            .set_json(json!({
                "rendez_vous": {
                    "client": { "prenom": "Nadia", "nom": "Lefèvre", "email": "rh@durand.fr" },
                    "programme_id": "prog-2",
                    "type_rdv": "positionnement",
                    "date": "2025-11-20",
                    "heure": "14:00",
                    "duree_minutes": 45,
                    "lieu": { "mode": "telephone" }
                },
                "apprenant": {
                    "prenom": "Yanis",
                    "nom": "Caron",
                    "email": "y.caron@durand.fr",
                    "entreprise": "Transports Durand"
                }
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["doc"]["heure"], "14:00");
        assert_eq!(body["apprenant"]["programmes"], json!(["prog-2"]));
        assert_eq!(body["warning"], Value::Null);
    }

    #[actix_web::test]
    async fn test_cms_only_routes_in_mock_mode() {
        let app = app!();
        let req = test::TestRequest::post()
            .uri("/api/auth/login")
            .set_json(json!({ "email": "a@b.fr", "password": "motdepasse" }))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_IMPLEMENTED);

        let req = test::TestRequest::post()
            .uri("/api/media?filename=logo.png")
            .insert_header(("content-type", "image/png"))
            .set_payload(vec![0u8, 1, 2])
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_IMPLEMENTED);
    }

    #[actix_web::test]
    async fn test_cms_rejection_returns_error_toast() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/api/programmes");
            then.status(400).json_body(json!({
                "errors": [{ "message": "Invalid", "data": { "errors": [{ "field": "code", "message": "Déjà pris" }] } }]
            }));
        });
        let client = CmsClient::new(server.base_url(), Arc::new(MemoryTokenStore::new())).unwrap();
        let app = app!(DataService::cms(client));

        let req = test::TestRequest::post()
            .uri("/api/programmes")
            .set_json(json!({ "code": "SST-INI", "titre": "Sauveteur Secouriste du Travail", "duree_heures": 14 }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["fieldErrors"][0]["field"], "code");
        assert_eq!(body["toasts"][0]["level"], "error");
        assert_eq!(body["toasts"][0]["message"], "Échec de l'enregistrement : Invalid - Déjà pris (code)");
    }

    #[actix_web::test]
    async fn test_failed_toggle_returns_error_toast() {
        let app = app!();
        let req = test::TestRequest::patch().uri("/api/users/absent/toggle-status").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["toasts"].as_array().map(Vec::len), Some(1));
        assert_eq!(body["toasts"][0]["level"], "error");
    }
}
