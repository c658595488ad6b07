use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};
use validator::Validate;

use super::{Resource, patch_field};
use crate::utils::text::matches_search;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display, EnumString, AsRefStr)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ApprenantStatus {
    #[default]
    Active,
    Inactive,
    Completed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Apprenant {
    pub id: String,
    pub prenom: String,
    pub nom: String,
    pub email: String,
    pub telephone: Option<String>,
    pub date_naissance: Option<NaiveDate>,
    /// Renseigné pour les apprenants envoyés par une entreprise (B2B)
    pub entreprise: Option<String>,
    pub statut: ApprenantStatus,
    pub programmes: Vec<String>,
    /// Pourcentage 0-100 attendu, conservé tel quel (ni borné ni validé)
    pub progression: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ApprenantDraft {
    #[validate(length(min = 1, message = "Le prénom est requis"))]
    pub prenom: String,
    #[validate(length(min = 1, message = "Le nom est requis"))]
    pub nom: String,
    #[validate(email(message = "Adresse email invalide"))]
    pub email: String,
    pub telephone: Option<String>,
    pub date_naissance: Option<NaiveDate>,
    pub entreprise: Option<String>,
    #[serde(default)]
    pub statut: ApprenantStatus,
    #[serde(default)]
    pub programmes: Vec<String>,
    #[serde(default)]
    pub progression: i32,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct ApprenantPatch {
    #[validate(length(min = 1, message = "Le prénom est requis"))]
    pub prenom: Option<String>,
    #[validate(length(min = 1, message = "Le nom est requis"))]
    pub nom: Option<String>,
    #[validate(email(message = "Adresse email invalide"))]
    pub email: Option<String>,
    pub telephone: Option<String>,
    pub date_naissance: Option<NaiveDate>,
    pub entreprise: Option<String>,
    pub statut: Option<ApprenantStatus>,
    pub programmes: Option<Vec<String>>,
    pub progression: Option<i32>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApprenantFilter {
    pub statut: Option<ApprenantStatus>,
    /// Apprenants inscrits à ce programme
    pub programme: Option<String>,
    pub search: Option<String>,
}

impl Resource for Apprenant {
    const COLLECTION: &'static str = "apprenants";

    type Filter = ApprenantFilter;
    type Draft = ApprenantDraft;
    type Patch = ApprenantPatch;

    fn id(&self) -> &str {
        &self.id
    }

    fn from_draft(id: String, draft: ApprenantDraft, now: DateTime<Utc>) -> Self {
        Self {
            id,
            prenom: draft.prenom,
            nom: draft.nom,
            email: draft.email,
            telephone: draft.telephone,
            date_naissance: draft.date_naissance,
            entreprise: draft.entreprise,
            statut: draft.statut,
            programmes: draft.programmes,
            progression: draft.progression,
            created_at: now,
            updated_at: now,
        }
    }

    fn apply_patch(&mut self, patch: ApprenantPatch, now: DateTime<Utc>) {
        patch_field(&mut self.prenom, patch.prenom);
        patch_field(&mut self.nom, patch.nom);
        patch_field(&mut self.email, patch.email);
        patch_field(&mut self.statut, patch.statut);
        patch_field(&mut self.programmes, patch.programmes);
        patch_field(&mut self.progression, patch.progression);
        if patch.telephone.is_some() {
            self.telephone = patch.telephone;
        }
        if patch.date_naissance.is_some() {
            self.date_naissance = patch.date_naissance;
        }
        if patch.entreprise.is_some() {
            self.entreprise = patch.entreprise;
        }
        self.updated_at = now;
    }

    fn matches(&self, filter: &ApprenantFilter) -> bool {
        if filter.statut.is_some_and(|s| s != self.statut) {
            return false;
        }
        if let Some(programme) = &filter.programme {
            if !self.programmes.iter().any(|p| p == programme) {
                return false;
            }
        }
        match &filter.search {
            Some(term) => matches_search(
                [
                    self.prenom.as_str(),
                    self.nom.as_str(),
                    self.email.as_str(),
                    self.entreprise.as_deref().unwrap_or(""),
                ],
                term,
            ),
            None => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progression_is_kept_as_is() {
        let now = Utc::now();
        let mut apprenant = Apprenant::from_draft(
            "a1".to_string(),
            ApprenantDraft {
                prenom: "Hugo".to_string(),
                nom: "Bernard".to_string(),
                email: "hugo@example.org".to_string(),
                telephone: None,
                date_naissance: None,
                entreprise: None,
                statut: ApprenantStatus::Active,
                programmes: vec!["p1".to_string()],
                progression: 0,
            },
            now,
        );

        apprenant.apply_patch(ApprenantPatch { progression: Some(140), ..Default::default() }, now);
        assert_eq!(apprenant.progression, 140);
    }

    #[test]
    fn test_filter_by_programme() {
        let now = Utc::now();
        let apprenant = Apprenant::from_draft(
            "a1".to_string(),
            ApprenantDraft {
                prenom: "Hugo".to_string(),
                nom: "Bernard".to_string(),
                email: "hugo@example.org".to_string(),
                telephone: None,
                date_naissance: None,
                entreprise: Some("Transports Durand".to_string()),
                statut: ApprenantStatus::Active,
                programmes: vec!["p1".to_string()],
                progression: 10,
            },
            now,
        );

        let by_programme = |p: &str| ApprenantFilter { programme: Some(p.to_string()), ..Default::default() };
        assert!(apprenant.matches(&by_programme("p1")));
        assert!(!apprenant.matches(&by_programme("p2")));
        assert!(apprenant.matches(&ApprenantFilter { search: Some("durand".into()), ..Default::default() }));
    }
}
