use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::store::CmsResource;
use super::{equals, relations, wire_id};
use crate::domain::{Programme, ProgrammeFilter, parse_or_default};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProgrammeWire {
    #[serde(deserialize_with = "wire_id")]
    pub id: String,
    pub code: String,
    pub title: String,
    pub description: Option<String>,
    /// Heures; le CMS stocke un nombre quelconque
    pub duration: Option<f64>,
    pub level: Option<String>,
    pub modality: Option<String>,
    pub price: Option<Decimal>,
    pub status: Option<String>,
    #[serde(deserialize_with = "relations")]
    pub competencies: Vec<String>,
    #[serde(deserialize_with = "relations")]
    pub trainers: Vec<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl CmsResource for Programme {
    type Wire = ProgrammeWire;

    fn from_wire(wire: ProgrammeWire) -> Self {
        Self {
            id: wire.id,
            code: wire.code,
            titre: wire.title,
            description: wire.description.unwrap_or_default(),
            duree_heures: wire.duration.map(|h| h.max(0.0).round() as u32).unwrap_or_default(),
            niveau: parse_or_default(wire.level.as_deref()),
            modalite: parse_or_default(wire.modality.as_deref()),
            prix: wire.price.unwrap_or_default(),
            statut: parse_or_default(wire.status.as_deref()),
            competences: wire.competencies,
            formateurs: wire.trainers,
            created_at: wire.created_at.unwrap_or_default(),
            updated_at: wire.updated_at.unwrap_or_default(),
        }
    }

    fn to_wire(&self) -> ProgrammeWire {
        ProgrammeWire {
            id: self.id.clone(),
            code: self.code.clone(),
            title: self.titre.clone(),
            description: Some(self.description.clone()),
            duration: Some(f64::from(self.duree_heures)),
            level: Some(self.niveau.to_string()),
            modality: Some(self.modalite.to_string()),
            price: Some(self.prix),
            status: Some(self.statut.to_string()),
            competencies: self.competences.clone(),
            trainers: self.formateurs.clone(),
            created_at: Some(self.created_at),
            updated_at: Some(self.updated_at),
        }
    }

    fn where_params(filter: &ProgrammeFilter) -> Vec<(String, String)> {
        let mut params = Vec::new();
        if let Some(statut) = filter.statut {
            params.push(equals("status", statut));
        }
        if let Some(niveau) = filter.niveau {
            params.push(equals("level", niveau));
        }
        if let Some(modalite) = filter.modalite {
            params.push(equals("modality", modalite));
        }
        params
    }
}
