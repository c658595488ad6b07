use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};
use validator::Validate;

use super::{Resource, patch_field};
use crate::utils::text::matches_search;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, AsRefStr)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum RendezVousType {
    Positionnement,
    Information,
    Inscription,
    Suivi,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display, EnumString, AsRefStr)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum RendezVousStatus {
    #[default]
    EnAttente,
    Confirme,
    Annule,
    Termine,
    Reporte,
}

/// Lieu du rendez-vous; chaque mode porte ses propres champs optionnels
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum Lieu {
    Presentiel { adresse: Option<String> },
    Visio { lien: Option<String> },
    Telephone,
}

impl Default for Lieu {
    fn default() -> Self {
        Lieu::Presentiel { adresse: None }
    }
}

impl Lieu {
    pub fn mode(&self) -> &'static str {
        match self {
            Lieu::Presentiel { .. } => "presentiel",
            Lieu::Visio { .. } => "visio",
            Lieu::Telephone => "telephone",
        }
    }

    /// Reconstruit le lieu depuis une représentation à plat (CMS, base)
    pub fn from_parts(mode: &str, adresse: Option<String>, lien: Option<String>) -> Self {
        match mode {
            "visio" => Lieu::Visio { lien },
            "telephone" => Lieu::Telephone,
            _ => Lieu::Presentiel { adresse },
        }
    }

    pub fn adresse(&self) -> Option<&str> {
        match self {
            Lieu::Presentiel { adresse } => adresse.as_deref(),
            _ => None,
        }
    }

    pub fn lien(&self) -> Option<&str> {
        match self {
            Lieu::Visio { lien } => lien.as_deref(),
            _ => None,
        }
    }
}

/// Contact ponctuel, pas forcément un utilisateur du back-office
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct ClientContact {
    #[validate(length(min = 1, message = "Le prénom est requis"))]
    pub prenom: String,
    #[validate(length(min = 1, message = "Le nom est requis"))]
    pub nom: String,
    #[validate(email(message = "Adresse email invalide"))]
    pub email: String,
    pub telephone: Option<String>,
    pub entreprise: Option<String>,
}

/// Heures au format "HH:MM", précision à la minute
pub mod hhmm {
    use chrono::{NaiveTime, Timelike};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&time.format("%H:%M").to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).map_err(serde::de::Error::custom)
    }

    /// Les secondes éventuelles ("10:30:45") sont ignorées
    pub fn parse(raw: &str) -> Result<NaiveTime, chrono::ParseError> {
        let time = NaiveTime::parse_from_str(raw, "%H:%M").or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M:%S"))?;
        Ok(to_minute(time))
    }

    pub fn to_minute(time: NaiveTime) -> NaiveTime {
        NaiveTime::from_hms_opt(time.hour(), time.minute(), 0).unwrap_or(time)
    }

    pub mod option {
        use chrono::NaiveTime;
        use serde::{Deserialize, Deserializer};

        pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<NaiveTime>, D::Error> {
            match Option::<String>::deserialize(deserializer)? {
                Some(raw) => super::parse(&raw).map(Some).map_err(serde::de::Error::custom),
                None => Ok(None),
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RendezVous {
    pub id: String,
    pub client: ClientContact,
    pub programme_id: Option<String>,
    pub type_rdv: RendezVousType,
    pub statut: RendezVousStatus,
    pub date: NaiveDate,
    #[serde(with = "hhmm")]
    pub heure: NaiveTime,
    pub duree_minutes: u32,
    pub lieu: Lieu,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RendezVousDraft {
    #[validate(nested)]
    pub client: ClientContact,
    pub programme_id: Option<String>,
    pub type_rdv: RendezVousType,
    #[serde(default)]
    pub statut: RendezVousStatus,
    pub date: NaiveDate,
    #[serde(with = "hhmm")]
    pub heure: NaiveTime,
    #[validate(range(min = 15, max = 480, message = "La durée doit être comprise entre 15 et 480 minutes"))]
    pub duree_minutes: u32,
    #[serde(default)]
    pub lieu: Lieu,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct RendezVousPatch {
    #[validate(nested)]
    pub client: Option<ClientContact>,
    pub programme_id: Option<String>,
    pub type_rdv: Option<RendezVousType>,
    pub statut: Option<RendezVousStatus>,
    pub date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "hhmm::option::deserialize")]
    pub heure: Option<NaiveTime>,
    #[validate(range(min = 15, max = 480, message = "La durée doit être comprise entre 15 et 480 minutes"))]
    pub duree_minutes: Option<u32>,
    pub lieu: Option<Lieu>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RendezVousFilter {
    pub statut: Option<RendezVousStatus>,
    pub type_rdv: Option<RendezVousType>,
    pub programme: Option<String>,
    pub search: Option<String>,
}

impl Resource for RendezVous {
    const COLLECTION: &'static str = "rendez-vous";

    type Filter = RendezVousFilter;
    type Draft = RendezVousDraft;
    type Patch = RendezVousPatch;

    fn id(&self) -> &str {
        &self.id
    }

    fn from_draft(id: String, draft: RendezVousDraft, now: DateTime<Utc>) -> Self {
        Self {
            id,
            client: draft.client,
            programme_id: draft.programme_id,
            type_rdv: draft.type_rdv,
            statut: draft.statut,
            date: draft.date,
            heure: draft.heure,
            duree_minutes: draft.duree_minutes,
            lieu: draft.lieu,
            notes: draft.notes,
            created_at: now,
            updated_at: now,
        }
    }

    fn apply_patch(&mut self, patch: RendezVousPatch, now: DateTime<Utc>) {
        patch_field(&mut self.client, patch.client);
        patch_field(&mut self.type_rdv, patch.type_rdv);
        patch_field(&mut self.statut, patch.statut);
        patch_field(&mut self.date, patch.date);
        patch_field(&mut self.heure, patch.heure);
        patch_field(&mut self.duree_minutes, patch.duree_minutes);
        patch_field(&mut self.lieu, patch.lieu);
        if patch.programme_id.is_some() {
            self.programme_id = patch.programme_id;
        }
        if patch.notes.is_some() {
            self.notes = patch.notes;
        }
        self.updated_at = now;
    }

    fn matches(&self, filter: &RendezVousFilter) -> bool {
        if filter.statut.is_some_and(|s| s != self.statut)
            || filter.type_rdv.is_some_and(|t| t != self.type_rdv)
        {
            return false;
        }
        if let Some(programme) = &filter.programme {
            if self.programme_id.as_deref() != Some(programme.as_str()) {
                return false;
            }
        }
        match &filter.search {
            Some(term) => matches_search(
                [
                    self.client.prenom.as_str(),
                    self.client.nom.as_str(),
                    self.client.email.as_str(),
                    self.client.entreprise.as_deref().unwrap_or(""),
                ],
                term,
            ),
            None => true,
        }
    }
}
