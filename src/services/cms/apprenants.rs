use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::store::CmsResource;
use super::{contains, equals, parse_date, relations, wire_id};
use crate::domain::{Apprenant, ApprenantFilter, parse_or_default};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ApprenantWire {
    #[serde(deserialize_with = "wire_id")]
    pub id: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: String,
    pub phone: Option<String>,
    pub birth_date: Option<String>,
    pub company: Option<String>,
    pub status: Option<String>,
    #[serde(deserialize_with = "relations")]
    pub programmes: Vec<String>,
    pub progress: Option<f64>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl CmsResource for Apprenant {
    type Wire = ApprenantWire;

    fn from_wire(wire: ApprenantWire) -> Self {
        Self {
            id: wire.id,
            prenom: wire.first_name.unwrap_or_default(),
            nom: wire.last_name.unwrap_or_default(),
            email: wire.email,
            telephone: wire.phone.filter(|p| !p.trim().is_empty()),
            date_naissance: parse_date(wire.birth_date.as_deref()),
            entreprise: wire.company.filter(|c| !c.trim().is_empty()),
            statut: parse_or_default(wire.status.as_deref()),
            programmes: wire.programmes,
            progression: wire.progress.map(|p| p.round() as i32).unwrap_or_default(),
            created_at: wire.created_at.unwrap_or_default(),
            updated_at: wire.updated_at.unwrap_or_default(),
        }
    }

    fn to_wire(&self) -> ApprenantWire {
        ApprenantWire {
            id: self.id.clone(),
            first_name: Some(self.prenom.clone()),
            last_name: Some(self.nom.clone()),
            email: self.email.clone(),
            phone: self.telephone.clone(),
            birth_date: self.date_naissance.map(|d| d.format("%Y-%m-%d").to_string()),
            company: self.entreprise.clone(),
            status: Some(self.statut.to_string()),
            programmes: self.programmes.clone(),
            progress: Some(f64::from(self.progression)),
            created_at: Some(self.created_at),
            updated_at: Some(self.updated_at),
        }
    }

    fn where_params(filter: &ApprenantFilter) -> Vec<(String, String)> {
        let mut params = Vec::new();
        if let Some(statut) = filter.statut {
            params.push(equals("status", statut));
        }
        if let Some(programme) = &filter.programme {
            params.push(contains("programmes", programme));
        }
        params
    }
}
