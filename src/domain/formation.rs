use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::{Resource, patch_field};
use crate::utils::text::matches_search;

/// Une journée du programme détaillé
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct JourFormation {
    #[validate(range(min = 1, message = "Les jours sont numérotés à partir de 1"))]
    pub jour: u32,
    #[validate(length(min = 1, message = "Le titre du module est requis"))]
    pub titre: String,
    #[serde(default)]
    pub contenus: Vec<String>,
    pub duree_heures: f32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
pub struct ContactFormateur {
    pub nom: String,
    #[validate(email(message = "Adresse email invalide"))]
    pub email: Option<String>,
    pub telephone: Option<String>,
}

/// Dossier de formation sur mesure: un document sans cycle de vie propre
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormationPersonnalisee {
    pub id: String,
    pub titre: String,
    pub entreprise: Option<String>,
    pub objectifs: Vec<String>,
    pub prerequis: String,
    pub public_vise: String,
    pub duree_totale_heures: f32,
    pub modules: Vec<JourFormation>,
    pub modalites_acces: String,
    pub formateur: ContactFormateur,
    pub methodes_evaluation: Vec<String>,
    pub accessibilite: String,
    pub conditions_abandon: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl FormationPersonnalisee {
    /// Somme des durées du programme détaillé
    pub fn duree_planifiee(&self) -> f32 {
        self.modules.iter().map(|m| m.duree_heures).sum()
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct FormationDraft {
    #[validate(length(min = 3, message = "Le titre doit contenir au moins 3 caractères"))]
    pub titre: String,
    pub entreprise: Option<String>,
    #[validate(length(min = 1, message = "Au moins un objectif est requis"))]
    pub objectifs: Vec<String>,
    #[serde(default)]
    pub prerequis: String,
    #[serde(default)]
    pub public_vise: String,
    #[serde(default)]
    pub duree_totale_heures: f32,
    #[serde(default)]
    #[validate(nested)]
    pub modules: Vec<JourFormation>,
    #[serde(default)]
    pub modalites_acces: String,
    #[serde(default)]
    #[validate(nested)]
    pub formateur: ContactFormateur,
    #[serde(default)]
    pub methodes_evaluation: Vec<String>,
    #[serde(default)]
    pub accessibilite: String,
    #[serde(default)]
    pub conditions_abandon: String,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct FormationPatch {
    #[validate(length(min = 3, message = "Le titre doit contenir au moins 3 caractères"))]
    pub titre: Option<String>,
    pub entreprise: Option<String>,
    #[validate(length(min = 1, message = "Au moins un objectif est requis"))]
    pub objectifs: Option<Vec<String>>,
    pub prerequis: Option<String>,
    pub public_vise: Option<String>,
    pub duree_totale_heures: Option<f32>,
    #[validate(nested)]
    pub modules: Option<Vec<JourFormation>>,
    pub modalites_acces: Option<String>,
    #[validate(nested)]
    pub formateur: Option<ContactFormateur>,
    pub methodes_evaluation: Option<Vec<String>>,
    pub accessibilite: Option<String>,
    pub conditions_abandon: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FormationFilter {
    pub entreprise: Option<String>,
    pub search: Option<String>,
}

impl Resource for FormationPersonnalisee {
    const COLLECTION: &'static str = "formations-personnalisees";

    type Filter = FormationFilter;
    type Draft = FormationDraft;
    type Patch = FormationPatch;

    fn id(&self) -> &str {
        &self.id
    }

    fn from_draft(id: String, draft: FormationDraft, now: DateTime<Utc>) -> Self {
        let mut formation = Self {
            id,
            titre: draft.titre,
            entreprise: draft.entreprise,
            objectifs: draft.objectifs,
            prerequis: draft.prerequis,
            public_vise: draft.public_vise,
            duree_totale_heures: draft.duree_totale_heures,
            modules: draft.modules,
            modalites_acces: draft.modalites_acces,
            formateur: draft.formateur,
            methodes_evaluation: draft.methodes_evaluation,
            accessibilite: draft.accessibilite,
            conditions_abandon: draft.conditions_abandon,
            created_at: now,
            updated_at: now,
        };
        formation.modules.sort_by_key(|m| m.jour);
        if formation.duree_totale_heures <= 0.0 {
            formation.duree_totale_heures = formation.duree_planifiee();
        }
        formation
    }

    fn apply_patch(&mut self, patch: FormationPatch, now: DateTime<Utc>) {
        patch_field(&mut self.titre, patch.titre);
        patch_field(&mut self.objectifs, patch.objectifs);
        patch_field(&mut self.prerequis, patch.prerequis);
        patch_field(&mut self.public_vise, patch.public_vise);
        patch_field(&mut self.duree_totale_heures, patch.duree_totale_heures);
        patch_field(&mut self.modalites_acces, patch.modalites_acces);
        patch_field(&mut self.formateur, patch.formateur);
        patch_field(&mut self.methodes_evaluation, patch.methodes_evaluation);
        patch_field(&mut self.accessibilite, patch.accessibilite);
        patch_field(&mut self.conditions_abandon, patch.conditions_abandon);
        if let Some(mut modules) = patch.modules {
            modules.sort_by_key(|m| m.jour);
            self.modules = modules;
        }
        if patch.entreprise.is_some() {
            self.entreprise = patch.entreprise;
        }
        self.updated_at = now;
    }

    fn matches(&self, filter: &FormationFilter) -> bool {
        if let Some(entreprise) = &filter.entreprise {
            if !matches_search([self.entreprise.as_deref().unwrap_or("")], entreprise) {
                return false;
            }
        }
        match &filter.search {
            Some(term) => matches_search(
                [self.titre.as_str(), self.entreprise.as_deref().unwrap_or(""), self.public_vise.as_str()],
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
    fn test_modules_sorted_and_duration_filled() {
        let formation = FormationPersonnalisee::from_draft(
            "f1".into(),
            FormationDraft {
                titre: "Management d'équipe".into(),
                entreprise: Some("Boulangeries Petit".into()),
                objectifs: vec!["Conduire un entretien annuel".into()],
                prerequis: String::new(),
                public_vise: "Chefs d'équipe".into(),
                duree_totale_heures: 0.0,
                modules: vec![
                    JourFormation { jour: 2, titre: "Feedback".into(), contenus: vec![], duree_heures: 7.0 },
                    JourFormation { jour: 1, titre: "Posture".into(), contenus: vec![], duree_heures: 3.5 },
                ],
                modalites_acces: String::new(),
                formateur: ContactFormateur::default(),
                methodes_evaluation: vec![],
                accessibilite: String::new(),
                conditions_abandon: String::new(),
            },
            Utc::now(),
        );

        assert_eq!(formation.modules[0].jour, 1);
        assert_eq!(formation.duree_totale_heures, 10.5);
    }
}
