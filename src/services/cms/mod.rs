// ============================================================================
// CMS - MODULE PRINCIPAL
// ============================================================================
//
// Description:
//   Accès au CMS headless (API REST `/api/<collection>`).
//
// Liste des modules:
//   - client : Transport HTTP (jeton, cookies, erreurs normalisées)
//   - token : Conservation du jeton d'authentification
//   - toast : Verbes du client décorés de notifications
//   - store : Magasin générique `CmsStore<E>`
//   - users, programmes, apprenants, rendez_vous, articles, formations :
//     Formes "fil" de chaque collection et conversions vers le domaine
//   - media : Médiathèque (téléversement)
//
// Conventions des documents reçus:
//   - Liste: {"docs": [...]}, création/mise à jour: {"doc": {...}}
//   - Relations: identifiant seul ou document peuplé selon `depth`
//   - Champs absents ou null: valeur par défaut
//
// ============================================================================

pub mod apprenants;
pub mod articles;
pub mod client;
pub mod formations;
pub mod media;
pub mod programmes;
pub mod rendez_vous;
pub mod store;
pub mod toast;
pub mod token;
pub mod users;

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

pub use client::{CmsClient, LoginResponse, UploadFile};
pub use media::MediaLibrary;
pub use store::{CmsResource, CmsStore};
pub use toast::ToastClient;
pub use token::{FileTokenStore, MemoryTokenStore, TokenStore};

/// Identifiant d'une relation: texte, nombre ou document peuplé
pub(crate) fn id_of(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Object(map) => map.get("id").and_then(id_of),
        _ => None,
    }
}

/// `id` d'un document, texte ou numérique selon la base du CMS
pub(crate) fn wire_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(id_of).unwrap_or_default())
}

/// Relation simple (`depth` 0 ou peuplée)
pub(crate) fn relation<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(id_of))
}

/// Relation multiple; une valeur isolée est acceptée comme liste d'un élément
pub(crate) fn relations<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Array(items)) => items.iter().filter_map(id_of).collect(),
        Some(other) => id_of(&other).into_iter().collect(),
        None => Vec::new(),
    })
}

/// Les champs date du CMS arrivent en ISO complet ("1994-03-12T00:00:00.000Z")
pub(crate) fn parse_date(raw: Option<&str>) -> Option<NaiveDate> {
    let raw = raw?.trim();
    let day = raw.get(..10).unwrap_or(raw);
    NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()
}

/// `where[field][equals]=value`
pub(crate) fn equals(field: &str, value: impl AsRef<str>) -> (String, String) {
    (format!("where[{}][equals]", field), value.as_ref().to_string())
}

/// `where[field][in]=value`, pour les relations multiples
pub(crate) fn contains(field: &str, value: impl AsRef<str>) -> (String, String) {
    (format!("where[{}][in]", field), value.as_ref().to_string())
}

pub(crate) fn like(field: &str, value: impl AsRef<str>) -> (String, String) {
    (format!("where[{}][like]", field), value.as_ref().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Deserialize)]
    struct Doc {
        #[serde(deserialize_with = "wire_id")]
        id: String,
        #[serde(default, deserialize_with = "relation")]
        programme: Option<String>,
        #[serde(default, deserialize_with = "relations")]
        trainers: Vec<String>,
    }

    #[test]
    fn test_relations_accept_ids_and_populated_docs() {
        let doc: Doc = serde_json::from_value(json!({
            "id": 42,
            "programme": { "id": "prog-1", "title": "SST" },
            "trainers": ["user-2", { "id": 7 }, null]
        }))
            .unwrap();

        assert_eq!(doc.id, "42");
        assert_eq!(doc.programme.as_deref(), Some("prog-1"));
        assert_eq!(doc.trainers, vec!["user-2".to_string(), "7".to_string()]);
    }

    #[test]
    fn test_missing_relations_default() {
        let doc: Doc = serde_json::from_value(json!({ "id": "a", "programme": null })).unwrap();
        assert_eq!(doc.programme, None);
        assert!(doc.trainers.is_empty());
    }

    #[test]
    fn test_date_parsing_accepts_iso_datetime() {
        assert_eq!(parse_date(Some("1994-03-12T00:00:00.000Z")), NaiveDate::from_ymd_opt(1994, 3, 12));
        assert_eq!(parse_date(Some("12/03/1994")), None);
        assert_eq!(parse_date(None), None);
    }
}
