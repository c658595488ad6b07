use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};
use validator::Validate;

use super::{Resource, patch_field};
use crate::utils::text::matches_search;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display, EnumString, AsRefStr)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Niveau {
    #[default]
    Debutant,
    Intermediaire,
    Avance,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display, EnumString, AsRefStr)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Modalite {
    #[default]
    Presentiel,
    Distanciel,
    Hybride,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display, EnumString, AsRefStr)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ProgrammeStatus {
    #[default]
    Draft,
    Published,
    Archived,
}

/// Programme de formation. `formateurs` et `competences` sont de simples
/// identifiants, aucune intégrité référentielle n'est vérifiée.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Programme {
    pub id: String,
    pub code: String,
    pub titre: String,
    pub description: String,
    pub duree_heures: u32,
    pub niveau: Niveau,
    pub modalite: Modalite,
    pub prix: Decimal,
    pub statut: ProgrammeStatus,
    pub competences: Vec<String>,
    pub formateurs: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ProgrammeDraft {
    #[validate(length(min = 2, message = "Le code doit contenir au moins 2 caractères"))]
    pub code: String,
    #[validate(length(min = 3, message = "Le titre doit contenir au moins 3 caractères"))]
    pub titre: String,
    #[serde(default)]
    pub description: String,
    #[validate(range(min = 1, message = "La durée doit être d'au moins 1 heure"))]
    pub duree_heures: u32,
    #[serde(default)]
    pub niveau: Niveau,
    #[serde(default)]
    pub modalite: Modalite,
    #[serde(default)]
    pub prix: Decimal,
    #[serde(default)]
    pub statut: ProgrammeStatus,
    #[serde(default)]
    pub competences: Vec<String>,
    #[serde(default)]
    pub formateurs: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct ProgrammePatch {
    #[validate(length(min = 2, message = "Le code doit contenir au moins 2 caractères"))]
    pub code: Option<String>,
    #[validate(length(min = 3, message = "Le titre doit contenir au moins 3 caractères"))]
    pub titre: Option<String>,
    pub description: Option<String>,
    #[validate(range(min = 1, message = "La durée doit être d'au moins 1 heure"))]
    pub duree_heures: Option<u32>,
    pub niveau: Option<Niveau>,
    pub modalite: Option<Modalite>,
    pub prix: Option<Decimal>,
    pub statut: Option<ProgrammeStatus>,
    pub competences: Option<Vec<String>>,
    pub formateurs: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProgrammeFilter {
    pub statut: Option<ProgrammeStatus>,
    pub niveau: Option<Niveau>,
    pub modalite: Option<Modalite>,
    pub search: Option<String>,
}

impl Resource for Programme {
    const COLLECTION: &'static str = "programmes";

    type Filter = ProgrammeFilter;
    type Draft = ProgrammeDraft;
    type Patch = ProgrammePatch;

    fn id(&self) -> &str {
        &self.id
    }

    fn from_draft(id: String, draft: ProgrammeDraft, now: DateTime<Utc>) -> Self {
        Self {
            id,
            code: draft.code,
            titre: draft.titre,
            description: draft.description,
            duree_heures: draft.duree_heures,
            niveau: draft.niveau,
            modalite: draft.modalite,
            prix: draft.prix,
            statut: draft.statut,
            competences: draft.competences,
            formateurs: draft.formateurs,
            created_at: now,
            updated_at: now,
        }
    }

    fn apply_patch(&mut self, patch: ProgrammePatch, now: DateTime<Utc>) {
        patch_field(&mut self.code, patch.code);
        patch_field(&mut self.titre, patch.titre);
        patch_field(&mut self.description, patch.description);
        patch_field(&mut self.duree_heures, patch.duree_heures);
        patch_field(&mut self.niveau, patch.niveau);
        patch_field(&mut self.modalite, patch.modalite);
        patch_field(&mut self.prix, patch.prix);
        patch_field(&mut self.statut, patch.statut);
        patch_field(&mut self.competences, patch.competences);
        patch_field(&mut self.formateurs, patch.formateurs);
        self.updated_at = now;
    }

    fn matches(&self, filter: &ProgrammeFilter) -> bool {
        if filter.statut.is_some_and(|s| s != self.statut)
            || filter.niveau.is_some_and(|n| n != self.niveau)
            || filter.modalite.is_some_and(|m| m != self.modalite)
        {
            return false;
        }
        match &filter.search {
            Some(term) => matches_search(
                [self.titre.as_str(), self.code.as_str(), self.description.as_str()],
                term,
            ),
            None => true,
        }
    }
}
