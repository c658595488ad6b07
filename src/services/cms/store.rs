use std::marker::PhantomData;

use async_trait::async_trait;
use chrono::Utc;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tracing::{debug, error};

use super::client::CmsClient;
use crate::domain::Resource;
use crate::error::AppError;
use crate::services::store::Store;

/// Champs gérés par le CMS, jamais envoyés
const SERVER_FIELDS: [&str; 3] = ["id", "createdAt", "updatedAt"];

/// Conversion entre une entité du domaine et sa forme JSON côté CMS.
///
/// `from_wire` doit accepter un document partiel: tout champ absent prend
/// sa valeur par défaut.
pub trait CmsResource: Resource {
    type Wire: Serialize + DeserializeOwned + Send;

    fn from_wire(wire: Self::Wire) -> Self;

    fn to_wire(&self) -> Self::Wire;

    /// Paramètres `where[...]` envoyés avec la liste. Les résultats sont de
    /// toute façon refiltrés localement, ces paramètres réduisent seulement
    /// le volume transféré.
    fn where_params(_filter: &Self::Filter) -> Vec<(String, String)> {
        Vec::new()
    }

    /// Champs à ajouter au document de création (mot de passe...)
    fn create_extras(_draft: &Self::Draft) -> Option<Map<String, Value>> {
        None
    }
}

pub struct CmsStore<E: CmsResource> {
    client: CmsClient,
    _entity: PhantomData<fn() -> E>,
}

impl<E: CmsResource> CmsStore<E> {
    pub fn new(client: CmsClient) -> Self {
        Self {
            client,
            _entity: PhantomData,
        }
    }

    fn item_path(id: &str) -> String {
        format!("{}/{}", E::COLLECTION, id)
    }

    fn decode(doc: Value) -> Result<E, AppError> {
        let wire: E::Wire = serde_json::from_value(doc)?;
        Ok(E::from_wire(wire))
    }

    /// Document prêt à envoyer, sans les champs serveur
    fn payload(entity: &E, extras: Option<Map<String, Value>>) -> Result<Value, AppError> {
        let mut payload = serde_json::to_value(entity.to_wire())?;
        if let Value::Object(map) = &mut payload {
            for key in SERVER_FIELDS {
                map.remove(key);
            }
            if let Some(extras) = extras {
                map.extend(extras);
            }
        }
        Ok(payload)
    }

    /// Champs dont la valeur CMS change entre `before` et `after`.
    ///
    /// Seul ce diff part dans le PATCH: un champ que le domaine ne sait pas
    /// représenter fidèlement (texte riche, rôle inconnu) n'est jamais
    /// réécrit tant que le patch n'y touche pas.
    fn changes(before: &E, after: &E) -> Result<Map<String, Value>, AppError> {
        let Value::Object(before) = Self::payload(before, None)? else {
            return Ok(Map::new());
        };
        let Value::Object(after) = Self::payload(after, None)? else {
            return Ok(Map::new());
        };
        Ok(after
            .into_iter()
            .filter(|(key, value)| before.get(key) != Some(value))
            .collect())
    }

    fn log_failure(operation: &str, err: &AppError) {
        error!(collection = E::COLLECTION, "Error during {}: {}", operation, err);
    }
}

/// `{"docs": [...]}` ou un tableau nu
fn docs_of(body: Value) -> Vec<Value> {
    match body {
        Value::Array(items) => items,
        Value::Object(mut map) => match map.remove("docs") {
            Some(Value::Array(items)) => items,
            _ => Vec::new(),
        },
        _ => Vec::new(),
    }
}

/// `{"doc": {...}}` ou le document lui-même
fn unwrap_doc(body: Value) -> Value {
    match body {
        Value::Object(mut map) => match map.remove("doc") {
            Some(doc) => doc,
            None => Value::Object(map),
        },
        other => other,
    }
}

#[async_trait]
impl<E: CmsResource> Store<E> for CmsStore<E> {
    async fn list(&self, filter: &E::Filter) -> Result<Vec<E>, AppError> {
        let mut query = vec![
            ("pagination".to_string(), "false".to_string()),
            ("depth".to_string(), "0".to_string()),
        ];
        query.extend(E::where_params(filter));

        let body = self
            .client
            .get_with_query(E::COLLECTION, &query)
            .await
            .inspect_err(|e| Self::log_failure("list", e))?;

        let items = docs_of(body)
            .into_iter()
            .map(Self::decode)
            .collect::<Result<Vec<E>, AppError>>()
            .inspect_err(|e| Self::log_failure("list", e))?;

        let found: Vec<E> = items.into_iter().filter(|item| item.matches(filter)).collect();
        debug!(collection = E::COLLECTION, count = found.len(), "cms list");
        Ok(found)
    }

    async fn get(&self, id: &str) -> Result<Option<E>, AppError> {
        let query = [("depth".to_string(), "0".to_string())];
        match self.client.get_with_query(&Self::item_path(id), &query).await {
            Ok(Value::Null) => Ok(None),
            Ok(body) => Self::decode(unwrap_doc(body)).map(Some),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => {
                Self::log_failure("get", &e);
                Err(e)
            }
        }
    }

    async fn create(&self, draft: E::Draft) -> Result<E, AppError> {
        let extras = E::create_extras(&draft);
        // Dérivés (slug, permissions...) calculés avant l'envoi
        let entity = E::from_draft(String::new(), draft, Utc::now());
        let payload = Self::payload(&entity, extras)?;

        let body = self
            .client
            .post(E::COLLECTION, &payload)
            .await
            .inspect_err(|e| Self::log_failure("create", e))?;
        let created = Self::decode(unwrap_doc(body))?;
        debug!(collection = E::COLLECTION, id = created.id(), "cms create");
        Ok(created)
    }

    async fn update(&self, id: &str, patch: E::Patch) -> Result<E, AppError> {
        let current = self
            .get(id)
            .await?
            .ok_or_else(|| AppError::not_found(E::COLLECTION, id))?;
        let mut patched = current.clone();
        patched.apply_patch(patch, Utc::now());

        let changes = Self::changes(&current, &patched)?;
        if changes.is_empty() {
            debug!(collection = E::COLLECTION, id, "cms update without changes");
            return Ok(current);
        }
        debug!(collection = E::COLLECTION, id, fields = ?changes.keys().collect::<Vec<_>>(), "cms update");

        let body = self
            .client
            .patch(&Self::item_path(id), &Value::Object(changes))
            .await
            .inspect_err(|e| Self::log_failure("update", e))?;
        Self::decode(unwrap_doc(body))
    }

    async fn delete(&self, id: &str) -> Result<(), AppError> {
        match self.client.delete(&Self::item_path(id)).await {
            Ok(_) => Ok(()),
            Err(e) if e.is_not_found() => Err(AppError::not_found(E::COLLECTION, id)),
            Err(e) => {
                Self::log_failure("delete", &e);
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        Apprenant, Article, FormationPersonnalisee, Programme, ProgrammeDraft, ProgrammeFilter, ProgrammePatch,
        ProgrammeStatus, RendezVous, Role, User, UserStatus,
    };
    use crate::services::cms::token::MemoryTokenStore;
    use crate::services::data_service::DataService;
    use crate::services::mock::fixtures::drafts;
    use crate::services::mock::{MockStore, fixtures};
    use httpmock::prelude::*;
    use rust_decimal::Decimal;
    use serde_json::json;
    use std::fmt::Debug;
    use std::sync::Arc;

    fn client(server: &MockServer) -> CmsClient {
        CmsClient::new(server.base_url(), Arc::new(MemoryTokenStore::new())).unwrap()
    }

    fn store(server: &MockServer) -> CmsStore<Programme> {
        CmsStore::new(client(server))
    }

    /// create → get renvoie le document créé, delete → get renvoie None
    async fn assert_round_trip<E>(draft: E::Draft)
    where
        E: CmsResource + PartialEq + Debug,
        E::Draft: Clone,
    {
        let server = MockServer::start();
        let doc = serde_json::to_value(E::from_draft("cms-1".to_string(), draft.clone(), Utc::now()).to_wire()).unwrap();
        let item = format!("/api/{}/cms-1", E::COLLECTION);

        server.mock(|when, then| {
            when.method(POST).path(format!("/api/{}", E::COLLECTION));
            then.status(201).json_body(json!({ "doc": doc.clone() }));
        });
        let mut found = server.mock(|when, then| {
            when.method(GET).path(item.clone());
            then.status(200).json_body(doc.clone());
        });
        server.mock(|when, then| {
            when.method(DELETE).path(item.clone());
            then.status(200).json_body(json!({ "id": "cms-1" }));
        });

        let store = CmsStore::<E>::new(client(&server));
        let created = store.create(draft).await.unwrap();
        assert_eq!(created.id(), "cms-1");
        assert_eq!(store.get("cms-1").await.unwrap(), Some(created));

        store.delete("cms-1").await.unwrap();
        found.delete();
        server.mock(|when, then| {
            when.method(GET).path(item.clone());
            then.status(404);
        });
        assert_eq!(store.get("cms-1").await.unwrap(), None, "{}", E::COLLECTION);
    }

    #[tokio::test]
    async fn test_round_trip_every_collection() {
        assert_round_trip::<User>(drafts::user()).await;
        assert_round_trip::<Programme>(drafts::programme()).await;
        assert_round_trip::<Apprenant>(drafts::apprenant()).await;
        assert_round_trip::<RendezVous>(drafts::rendez_vous()).await;
        assert_round_trip::<Article>(drafts::article()).await;
        assert_round_trip::<FormationPersonnalisee>(drafts::formation()).await;
    }

    fn fixtures_as_docs() -> Value {
        let docs: Vec<Value> = fixtures::programmes()
            .iter()
            .map(|p| serde_json::to_value(p.to_wire()).unwrap())
            .collect();
        json!({ "docs": docs, "totalDocs": docs.len() })
    }

    #[tokio::test]
    async fn test_list_matches_mock_mode_for_same_fixtures() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET)
                .path("/api/programmes")
                .query_param("pagination", "false")
                .query_param("depth", "0");
            then.status(200).json_body(fixtures_as_docs());
        });

        let cms = store(&server).list(&ProgrammeFilter::default()).await.unwrap();
        let mock = MockStore::new(fixtures::programmes())
            .list(&ProgrammeFilter::default())
            .await
            .unwrap();

        assert_eq!(cms, mock);
    }

    #[tokio::test]
    async fn test_list_sends_where_params_and_refilters() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/api/programmes")
                .query_param("where[status][equals]", "published");
            // Le CMS renvoie tout: le filtre local doit s'appliquer quand même
            then.status(200).json_body(fixtures_as_docs());
        });

        let filter = ProgrammeFilter { statut: Some(ProgrammeStatus::Published), ..Default::default() };
        let found = store(&server).list(&filter).await.unwrap();

        mock.assert();
        assert_eq!(found.len(), 2);
        assert!(found.iter().all(|p| p.statut == ProgrammeStatus::Published));
    }

    #[tokio::test]
    async fn test_get_404_is_none() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/api/programmes/absent");
            then.status(404).json_body(json!({ "errors": [{ "message": "Not Found" }] }));
        });

        assert_eq!(store(&server).get("absent").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_create_then_get_round_trip() {
        let server = MockServer::start();
        let create = server.mock(|when, then| {
            when.method(POST)
                .path("/api/programmes")
                .body_includes(r#""code":"SST-INI""#)
                .body_includes(r#""title":"Sauveteur Secouriste du Travail""#);
            then.status(201).json_body(json!({
                "message": "Programme successfully created.",
                "doc": {
                    "id": "65f1", "code": "SST-INI", "title": "Sauveteur Secouriste du Travail",
                    "duration": 14, "level": "debutant", "modality": "presentiel", "price": 390,
                    "status": "draft", "competencies": ["secourisme"], "trainers": [{ "id": "user-2" }],
                    "createdAt": "2026-01-05T10:00:00.000Z", "updatedAt": "2026-01-05T10:00:00.000Z"
                }
            }));
        });
        server.mock(|when, then| {
            when.method(GET).path("/api/programmes/65f1");
            then.status(200).json_body(json!({
                "id": "65f1", "code": "SST-INI", "title": "Sauveteur Secouriste du Travail",
                "duration": 14, "level": "debutant", "modality": "presentiel", "price": 390,
                "status": "draft", "competencies": ["secourisme"], "trainers": ["user-2"],
                "createdAt": "2026-01-05T10:00:00.000Z", "updatedAt": "2026-01-05T10:00:00.000Z"
            }));
        });

        let store = store(&server);
        let created = store
            .create(ProgrammeDraft {
                code: "SST-INI".to_string(),
                titre: "Sauveteur Secouriste du Travail".to_string(),
                description: String::new(),
                duree_heures: 14,
                niveau: Default::default(),
                modalite: Default::default(),
                prix: Decimal::new(39000, 2),
                statut: ProgrammeStatus::Draft,
                competences: vec!["secourisme".to_string()],
                formateurs: vec!["user-2".to_string()],
            })
            .await
            .unwrap();

        create.assert();
        assert_eq!(created.id, "65f1");
        assert_eq!(created.prix, Decimal::new(390, 0));
        assert_eq!(store.get("65f1").await.unwrap(), Some(created));
    }

    #[tokio::test]
    async fn test_update_missing_is_not_found() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/api/programmes/absent");
            then.status(404);
        });

        let err = store(&server).update("absent", ProgrammePatch::default()).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound { collection: "programmes", .. }));
    }

    #[tokio::test]
    async fn test_view_count_leaves_rich_text_untouched() {
        let server = MockServer::start();
        let article = json!({
            "id": "a1",
            "title": "Premiers secours",
            "slug": "premiers-secours",
            "content": {
                "root": {
                    "type": "root",
                    "children": [{ "type": "paragraph", "children": [{ "type": "text", "text": "Premier bloc." }] }]
                }
            },
            "status": "published",
            "views": 3,
            "readingTime": 1,
            "publishedAt": "2026-01-05T10:00:00.000Z"
        });
        server.mock(|when, then| {
            when.method(GET).path("/api/articles/a1");
            then.status(200).json_body(article.clone());
        });
        let mut updated = article.clone();
        updated["views"] = json!(4);
        let patch = server.mock(|when, then| {
            when.method(PATCH).path("/api/articles/a1").json_body(json!({ "views": 4 }));
            then.status(200).json_body(json!({ "doc": updated }));
        });

        let viewed = DataService::cms(client(&server)).record_article_view("a1").await.unwrap();

        patch.assert();
        assert_eq!(viewed.vues, 4);
        assert_eq!(viewed.contenu, "Premier bloc.");
    }

    #[tokio::test]
    async fn test_status_toggle_keeps_unknown_role() {
        let server = MockServer::start();
        let user = json!({
            "id": "u9",
            "email": "stagiaire@formapro.fr",
            "firstName": "Hugo",
            "lastName": "Perrin",
            "role": "STAGIAIRE",
            "status": "active"
        });
        server.mock(|when, then| {
            when.method(GET).path("/api/users/u9");
            then.status(200).json_body(user.clone());
        });
        let mut updated = user.clone();
        updated["status"] = json!("inactive");
        let patch = server.mock(|when, then| {
            when.method(PATCH).path("/api/users/u9").json_body(json!({ "status": "inactive" }));
            then.status(200).json_body(json!({ "doc": updated }));
        });

        let toggled = DataService::cms(client(&server)).toggle_user_status("u9").await.unwrap();

        patch.assert();
        assert_eq!(toggled.statut, UserStatus::Inactive);
        assert_eq!(toggled.role, Role::Beneficiaire);
        assert!(toggled.permissions.is_empty());
    }

    #[tokio::test]
    async fn test_empty_patch_sends_nothing() {
        let server = MockServer::start();
        let doc = serde_json::to_value(fixtures::programmes()[0].to_wire()).unwrap();
        server.mock(|when, then| {
            when.method(GET).path("/api/programmes/prog-1");
            then.status(200).json_body(doc.clone());
        });
        let patch = server.mock(|when, then| {
            when.method(PATCH).path("/api/programmes/prog-1");
            then.status(200).json_body(json!({ "doc": doc.clone() }));
        });

        let same = store(&server).update("prog-1", ProgrammePatch::default()).await.unwrap();

        patch.assert_hits(0);
        assert_eq!(same, fixtures::programmes()[0]);
    }

    #[tokio::test]
    async fn test_server_error_is_rethrown() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(DELETE).path("/api/programmes/prog-1");
            then.status(500).json_body(json!({ "message": "Something went wrong." }));
        });

        let err = store(&server).delete("prog-1").await.unwrap_err();
        assert!(matches!(err, AppError::Api(ref e) if e.status == 500 && e.message == "Something went wrong."));
    }
}
