use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::store::CmsResource;
use super::{equals, parse_date, relation, wire_id};
use crate::domain::rendez_vous::hhmm;
use crate::domain::{
    ClientContact, Lieu, RendezVous, RendezVousFilter, RendezVousType, parse_or, parse_or_default,
};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ClientWire {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub company: Option<String>,
}

/// Le lieu est aplati: `location` donne le mode, `address` et `videoLink`
/// les détails.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RendezVousWire {
    #[serde(deserialize_with = "wire_id")]
    pub id: String,
    pub client: ClientWire,
    #[serde(deserialize_with = "relation")]
    pub programme: Option<String>,
    #[serde(rename = "type")]
    pub type_rdv: Option<String>,
    pub status: Option<String>,
    pub date: Option<String>,
    pub time: Option<String>,
    pub duration: Option<u32>,
    pub location: Option<String>,
    pub address: Option<String>,
    pub video_link: Option<String>,
    pub notes: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

fn filled(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl CmsResource for RendezVous {
    type Wire = RendezVousWire;

    fn from_wire(wire: RendezVousWire) -> Self {
        let client = ClientContact {
            prenom: wire.client.first_name.unwrap_or_default(),
            nom: wire.client.last_name.unwrap_or_default(),
            email: wire.client.email.unwrap_or_default(),
            telephone: filled(wire.client.phone),
            entreprise: filled(wire.client.company),
        };
        let heure = wire
            .time
            .as_deref()
            .and_then(|t| hhmm::parse(t.trim()).ok())
            .unwrap_or_default();

        Self {
            id: wire.id,
            client,
            programme_id: wire.programme,
            type_rdv: parse_or(wire.type_rdv.as_deref(), RendezVousType::Information),
            statut: parse_or_default(wire.status.as_deref()),
            date: parse_date(wire.date.as_deref()).unwrap_or_default(),
            heure,
            duree_minutes: wire.duration.unwrap_or(60),
            lieu: Lieu::from_parts(
                wire.location.as_deref().unwrap_or_default(),
                filled(wire.address),
                filled(wire.video_link),
            ),
            notes: filled(wire.notes),
            created_at: wire.created_at.unwrap_or_default(),
            updated_at: wire.updated_at.unwrap_or_default(),
        }
    }

    fn to_wire(&self) -> RendezVousWire {
        RendezVousWire {
            id: self.id.clone(),
            client: ClientWire {
                first_name: Some(self.client.prenom.clone()),
                last_name: Some(self.client.nom.clone()),
                email: Some(self.client.email.clone()),
                phone: self.client.telephone.clone(),
                company: self.client.entreprise.clone(),
            },
            programme: self.programme_id.clone(),
            type_rdv: Some(self.type_rdv.to_string()),
            status: Some(self.statut.to_string()),
            date: Some(self.date.format("%Y-%m-%d").to_string()),
            time: Some(self.heure.format("%H:%M").to_string()),
            duration: Some(self.duree_minutes),
            location: Some(self.lieu.mode().to_string()),
            address: self.lieu.adresse().map(str::to_string),
            video_link: self.lieu.lien().map(str::to_string),
            notes: self.notes.clone(),
            created_at: Some(self.created_at),
            updated_at: Some(self.updated_at),
        }
    }

    fn where_params(filter: &RendezVousFilter) -> Vec<(String, String)> {
        let mut params = Vec::new();
        if let Some(statut) = filter.statut {
            params.push(equals("status", statut));
        }
        if let Some(type_rdv) = filter.type_rdv {
            params.push(equals("type", type_rdv));
        }
        if let Some(programme) = &filter.programme {
            params.push(equals("programme", programme));
        }
        params
    }
}
