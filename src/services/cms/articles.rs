use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::store::CmsResource;
use super::{contains, equals, relation, relations, wire_id};
use crate::domain::{Article, ArticleFilter, Seo, parse_or_default};
use crate::utils::text::{reading_time_minutes, slugify};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SeoWire {
    pub meta_title: Option<String>,
    pub meta_description: Option<String>,
    /// Mots-clés séparés par des virgules
    pub keywords: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TagRow {
    pub tag: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ArticleWire {
    #[serde(deserialize_with = "wire_id")]
    pub id: String,
    pub title: String,
    pub slug: Option<String>,
    /// Texte brut ou arbre de texte riche
    pub content: Value,
    pub excerpt: Option<String>,
    pub status: Option<String>,
    #[serde(deserialize_with = "relations")]
    pub categories: Vec<String>,
    pub tags: Vec<TagRow>,
    pub views: Option<u64>,
    pub reading_time: Option<u32>,
    pub seo: SeoWire,
    #[serde(deserialize_with = "relation")]
    pub author: Option<String>,
    pub published_at: Option<DateTime<Utc>>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Concatène les nœuds `text` d'un contenu riche, un bloc par ligne
fn plain_text(content: &Value) -> String {
    fn collect(node: &Value, out: &mut String) {
        match node {
            Value::String(s) => out.push_str(s),
            Value::Array(children) => {
                for child in children {
                    collect(child, out);
                }
            }
            Value::Object(map) => {
                if let Some(Value::String(text)) = map.get("text") {
                    out.push_str(text);
                }
                if let Some(children) = map.get("root").or_else(|| map.get("children")) {
                    let block = map.get("type").and_then(Value::as_str).is_some_and(|t| t != "text");
                    collect(children, out);
                    if block && !out.ends_with('\n') {
                        out.push('\n');
                    }
                }
            }
            _ => {}
        }
    }

    let mut out = String::new();
    collect(content, &mut out);
    out.trim().to_string()
}

impl CmsResource for Article {
    type Wire = ArticleWire;

    fn from_wire(wire: ArticleWire) -> Self {
        let contenu = plain_text(&wire.content);
        let slug = wire
            .slug
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| slugify(&wire.title));

        Self {
            id: wire.id,
            temps_lecture: wire.reading_time.unwrap_or_else(|| reading_time_minutes(&contenu)),
            titre: wire.title,
            slug,
            contenu,
            extrait: wire.excerpt.filter(|e| !e.trim().is_empty()),
            statut: parse_or_default(wire.status.as_deref()),
            categories: wire.categories,
            tags: wire.tags.into_iter().map(|row| row.tag).filter(|t| !t.is_empty()).collect(),
            vues: wire.views.unwrap_or_default(),
            seo: Seo {
                meta_title: wire.seo.meta_title,
                meta_description: wire.seo.meta_description,
                keywords: wire
                    .seo
                    .keywords
                    .unwrap_or_default()
                    .split(',')
                    .map(str::trim)
                    .filter(|k| !k.is_empty())
                    .map(str::to_string)
                    .collect(),
            },
            auteur: wire.author,
            published_at: wire.published_at,
            created_at: wire.created_at.unwrap_or_default(),
            updated_at: wire.updated_at.unwrap_or_default(),
        }
    }

    fn to_wire(&self) -> ArticleWire {
        ArticleWire {
            id: self.id.clone(),
            title: self.titre.clone(),
            slug: Some(self.slug.clone()),
            content: Value::String(self.contenu.clone()),
            excerpt: self.extrait.clone(),
            status: Some(self.statut.to_string()),
            categories: self.categories.clone(),
            tags: self.tags.iter().map(|tag| TagRow { tag: tag.clone() }).collect(),
            views: Some(self.vues),
            reading_time: Some(self.temps_lecture),
            seo: SeoWire {
                meta_title: self.seo.meta_title.clone(),
                meta_description: self.seo.meta_description.clone(),
                keywords: Some(self.seo.keywords.join(", ")).filter(|k| !k.is_empty()),
            },
            author: self.auteur.clone(),
            published_at: self.published_at,
            created_at: Some(self.created_at),
            updated_at: Some(self.updated_at),
        }
    }

    fn where_params(filter: &ArticleFilter) -> Vec<(String, String)> {
        let mut params = Vec::new();
        if let Some(statut) = filter.statut {
            params.push(equals("status", statut));
        }
        if let Some(slug) = &filter.slug {
            params.push(equals("slug", slug));
        }
        if let Some(categorie) = &filter.categorie {
            params.push(contains("categories", categorie));
        }
        params
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ArticleStatus;
    use crate::services::mock::fixtures;
    use serde_json::json;

    #[test]
    fn test_rich_text_is_flattened() {
        let content = json!({
            "root": {
                "type": "root",
                "children": [
                    { "type": "paragraph", "children": [{ "type": "text", "text": "Premier " }, { "type": "text", "text": "bloc." }] },
                    { "type": "paragraph", "children": [{ "type": "text", "text": "Second bloc." }] }
                ]
            }
        });
        assert_eq!(plain_text(&content), "Premier bloc.\nSecond bloc.");
        assert_eq!(plain_text(&json!("Déjà du texte")), "Déjà du texte");
        assert_eq!(plain_text(&Value::Null), "");
    }

    #[test]
    fn test_missing_slug_and_reading_time_are_derived() {
        let wire: ArticleWire = serde_json::from_value(json!({
            "id": "a1",
            "title": "Les Gestes Qui Sauvent",
            "content": "mot ".repeat(250),
            "status": "published",
            "tags": [{ "tag": "secourisme", "id": "row-1" }],
            "seo": { "keywords": "sst, secourisme ,," }
        }))
            .unwrap();
        let article = Article::from_wire(wire);

        assert_eq!(article.slug, "les-gestes-qui-sauvent");
        assert_eq!(article.temps_lecture, 2);
        assert_eq!(article.statut, ArticleStatus::Published);
        assert_eq!(article.tags, vec!["secourisme".to_string()]);
        assert_eq!(article.seo.keywords, vec!["sst".to_string(), "secourisme".to_string()]);
    }

    #[test]
    fn test_fixtures_survive_wire_conversion() {
        for article in fixtures::articles() {
            let doc = serde_json::to_value(article.to_wire()).unwrap();
            let back = Article::from_wire(serde_json::from_value(doc).unwrap());
            assert_eq!(back, article);
        }
    }
}
