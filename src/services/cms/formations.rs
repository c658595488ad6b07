use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::store::CmsResource;
use super::{like, wire_id};
use crate::domain::{ContactFormateur, FormationFilter, FormationPersonnalisee, JourFormation};

// Les listes du dossier sont des champs "array" du CMS: une ligne = un objet

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ObjectiveRow {
    pub objective: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MethodRow {
    pub method: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ContentRow {
    pub item: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DayRow {
    pub day: u32,
    pub title: String,
    pub contents: Vec<ContentRow>,
    pub hours: f32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainerWire {
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FormationWire {
    #[serde(deserialize_with = "wire_id")]
    pub id: String,
    pub title: String,
    pub company: Option<String>,
    pub objectives: Vec<ObjectiveRow>,
    pub prerequisites: Option<String>,
    pub target_audience: Option<String>,
    pub total_hours: Option<f32>,
    pub schedule: Vec<DayRow>,
    pub access_modalities: Option<String>,
    pub trainer: TrainerWire,
    pub evaluation_methods: Vec<MethodRow>,
    pub accessibility: Option<String>,
    pub dropout_conditions: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl CmsResource for FormationPersonnalisee {
    type Wire = FormationWire;

    fn from_wire(wire: FormationWire) -> Self {
        let mut modules: Vec<JourFormation> = wire
            .schedule
            .into_iter()
            .map(|row| JourFormation {
                jour: row.day,
                titre: row.title,
                contenus: row.contents.into_iter().map(|c| c.item).collect(),
                duree_heures: row.hours,
            })
            .collect();
        modules.sort_by_key(|m| m.jour);

        let mut formation = Self {
            id: wire.id,
            titre: wire.title,
            entreprise: wire.company.filter(|c| !c.trim().is_empty()),
            objectifs: wire.objectives.into_iter().map(|row| row.objective).collect(),
            prerequis: wire.prerequisites.unwrap_or_default(),
            public_vise: wire.target_audience.unwrap_or_default(),
            duree_totale_heures: wire.total_hours.unwrap_or_default(),
            modules,
            modalites_acces: wire.access_modalities.unwrap_or_default(),
            formateur: ContactFormateur {
                nom: wire.trainer.name,
                email: wire.trainer.email,
                telephone: wire.trainer.phone,
            },
            methodes_evaluation: wire.evaluation_methods.into_iter().map(|row| row.method).collect(),
            accessibilite: wire.accessibility.unwrap_or_default(),
            conditions_abandon: wire.dropout_conditions.unwrap_or_default(),
            created_at: wire.created_at.unwrap_or_default(),
            updated_at: wire.updated_at.unwrap_or_default(),
        };
        if formation.duree_totale_heures <= 0.0 {
            formation.duree_totale_heures = formation.duree_planifiee();
        }
        formation
    }

    fn to_wire(&self) -> FormationWire {
        FormationWire {
            id: self.id.clone(),
            title: self.titre.clone(),
            company: self.entreprise.clone(),
            objectives: self
                .objectifs
                .iter()
                .map(|objective| ObjectiveRow { objective: objective.clone() })
                .collect(),
            prerequisites: Some(self.prerequis.clone()),
            target_audience: Some(self.public_vise.clone()),
            total_hours: Some(self.duree_totale_heures),
            schedule: self
                .modules
                .iter()
                .map(|m| DayRow {
                    day: m.jour,
                    title: m.titre.clone(),
                    contents: m.contenus.iter().map(|item| ContentRow { item: item.clone() }).collect(),
                    hours: m.duree_heures,
                })
                .collect(),
            access_modalities: Some(self.modalites_acces.clone()),
            trainer: TrainerWire {
                name: self.formateur.nom.clone(),
                email: self.formateur.email.clone(),
                phone: self.formateur.telephone.clone(),
            },
            evaluation_methods: self
                .methodes_evaluation
                .iter()
                .map(|method| MethodRow { method: method.clone() })
                .collect(),
            accessibility: Some(self.accessibilite.clone()),
            dropout_conditions: Some(self.conditions_abandon.clone()),
            created_at: Some(self.created_at),
            updated_at: Some(self.updated_at),
        }
    }

    fn where_params(filter: &FormationFilter) -> Vec<(String, String)> {
        filter
            .entreprise
            .iter()
            .map(|entreprise| like("company", entreprise))
            .collect()
    }
}
