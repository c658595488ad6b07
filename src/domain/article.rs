use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};
use validator::Validate;

use super::{Resource, patch_field};
use crate::utils::text::{matches_search, reading_time_minutes, slugify};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display, EnumString, AsRefStr)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ArticleStatus {
    #[default]
    Draft,
    Published,
    Archived,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Seo {
    pub meta_title: Option<String>,
    pub meta_description: Option<String>,
    #[serde(default)]
    pub keywords: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Article {
    pub id: String,
    pub titre: String,
    pub slug: String,
    pub contenu: String,
    pub extrait: Option<String>,
    pub statut: ArticleStatus,
    /// Slugs de catégories
    pub categories: Vec<String>,
    /// Slugs de tags
    pub tags: Vec<String>,
    pub vues: u64,
    /// Minutes, recalculé à chaque enregistrement
    pub temps_lecture: u32,
    pub seo: Seo,
    pub auteur: Option<String>,
    pub published_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Article {
    /// Date de publication posée au premier passage en "published"
    fn stamp_publication(&mut self, now: DateTime<Utc>) {
        if self.statut == ArticleStatus::Published && self.published_at.is_none() {
            self.published_at = Some(now);
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ArticleDraft {
    #[validate(length(min = 3, message = "Le titre doit contenir au moins 3 caractères"))]
    pub titre: String,
    /// Dérivé du titre si absent
    pub slug: Option<String>,
    #[validate(length(min = 1, message = "Le contenu est requis"))]
    pub contenu: String,
    pub extrait: Option<String>,
    #[serde(default)]
    pub statut: ArticleStatus,
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub seo: Seo,
    pub auteur: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct ArticlePatch {
    #[validate(length(min = 3, message = "Le titre doit contenir au moins 3 caractères"))]
    pub titre: Option<String>,
    pub slug: Option<String>,
    #[validate(length(min = 1, message = "Le contenu est requis"))]
    pub contenu: Option<String>,
    pub extrait: Option<String>,
    pub statut: Option<ArticleStatus>,
    pub categories: Option<Vec<String>>,
    pub tags: Option<Vec<String>>,
    pub vues: Option<u64>,
    pub seo: Option<Seo>,
    pub auteur: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ArticleFilter {
    pub statut: Option<ArticleStatus>,
    pub slug: Option<String>,
    /// Slug de catégorie
    pub categorie: Option<String>,
    pub tag: Option<String>,
    pub search: Option<String>,
}

impl Resource for Article {
    const COLLECTION: &'static str = "articles";

    type Filter = ArticleFilter;
    type Draft = ArticleDraft;
    type Patch = ArticlePatch;

    fn id(&self) -> &str {
        &self.id
    }

    fn from_draft(id: String, draft: ArticleDraft, now: DateTime<Utc>) -> Self {
        let slug = match draft.slug.as_deref().map(slugify) {
            Some(slug) if !slug.is_empty() => slug,
            _ => slugify(&draft.titre),
        };
        let mut article = Self {
            id,
            temps_lecture: reading_time_minutes(&draft.contenu),
            titre: draft.titre,
            slug,
            contenu: draft.contenu,
            extrait: draft.extrait,
            statut: draft.statut,
            categories: draft.categories.iter().map(|c| slugify(c)).collect(),
            tags: draft.tags.iter().map(|t| slugify(t)).collect(),
            vues: 0,
            seo: draft.seo,
            auteur: draft.auteur,
            published_at: None,
            created_at: now,
            updated_at: now,
        };
        article.stamp_publication(now);
        article
    }

    fn apply_patch(&mut self, patch: ArticlePatch, now: DateTime<Utc>) {
        patch_field(&mut self.titre, patch.titre);
        patch_field(&mut self.contenu, patch.contenu);
        patch_field(&mut self.statut, patch.statut);
        patch_field(&mut self.vues, patch.vues);
        patch_field(&mut self.seo, patch.seo);
        if let Some(categories) = patch.categories {
            self.categories = categories.iter().map(|c| slugify(c)).collect();
        }
        if let Some(tags) = patch.tags {
            self.tags = tags.iter().map(|t| slugify(t)).collect();
        }
        if patch.extrait.is_some() {
            self.extrait = patch.extrait;
        }
        if patch.auteur.is_some() {
            self.auteur = patch.auteur;
        }

        // Un slug publié ne bouge pas quand le titre change
        match patch.slug.as_deref().map(slugify) {
            Some(slug) if !slug.is_empty() => self.slug = slug,
            _ if self.slug.is_empty() => self.slug = slugify(&self.titre),
            _ => {}
        }

        self.temps_lecture = reading_time_minutes(&self.contenu);
        self.stamp_publication(now);
        self.updated_at = now;
    }

    fn matches(&self, filter: &ArticleFilter) -> bool {
        if filter.statut.is_some_and(|s| s != self.statut) {
            return false;
        }
        if filter.slug.as_ref().is_some_and(|slug| *slug != self.slug) {
            return false;
        }
        if filter.categorie.as_ref().is_some_and(|c| !self.categories.contains(c)) {
            return false;
        }
        if filter.tag.as_ref().is_some_and(|t| !self.tags.contains(t)) {
            return false;
        }
        match &filter.search {
            Some(term) => matches_search(
                [self.titre.as_str(), self.extrait.as_deref().unwrap_or(""), self.contenu.as_str()],
                term,
            ),
            None => true,
        }
    }
}
