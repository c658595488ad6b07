use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::client::CmsClient;
use super::store::CmsResource;
use super::{equals, wire_id};
use crate::domain::user::permissions_for_role;
use crate::domain::{Role, User, UserDraft, UserFilter, parse_or_default};
use crate::error::AppError;

/// Document utilisateur du CMS.
///
/// Selon la version du CMS le nom arrive en `firstName`/`lastName`, en
/// `prenom`/`nom` ou d'un bloc dans `name`. Seule la forme
/// `firstName`/`lastName` est renvoyée.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserWire {
    #[serde(deserialize_with = "wire_id")]
    pub id: String,
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    #[serde(skip_serializing)]
    pub prenom: Option<String>,
    #[serde(skip_serializing)]
    pub nom: Option<String>,
    #[serde(skip_serializing)]
    pub name: Option<String>,
    pub role: Option<String>,
    pub status: Option<String>,
    pub phone: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

impl UserWire {
    /// (prénom, nom) quelle que soit la convention reçue
    fn names(&self) -> (String, String) {
        let first = non_blank(self.first_name.clone()).or_else(|| non_blank(self.prenom.clone()));
        let last = non_blank(self.last_name.clone()).or_else(|| non_blank(self.nom.clone()));
        if first.is_some() || last.is_some() {
            return (first.unwrap_or_default(), last.unwrap_or_default());
        }

        let full = non_blank(self.name.clone()).unwrap_or_default();
        match full.split_once(char::is_whitespace) {
            Some((first, last)) => (first.to_string(), last.trim().to_string()),
            None => (full, String::new()),
        }
    }
}

impl CmsResource for User {
    type Wire = UserWire;

    fn from_wire(wire: UserWire) -> Self {
        let (prenom, nom) = wire.names();
        let raw_role = wire.role.clone().unwrap_or_default();
        // Rôle inconnu: profil le plus restreint, sans aucune permission
        let role = raw_role.trim().to_ascii_uppercase().parse().unwrap_or(Role::Beneficiaire);

        Self {
            id: wire.id,
            email: wire.email,
            prenom,
            nom,
            role,
            statut: parse_or_default(wire.status.as_deref()),
            telephone: non_blank(wire.phone),
            permissions: permissions_for_role(&raw_role),
            created_at: wire.created_at.unwrap_or_default(),
            updated_at: wire.updated_at.unwrap_or_default(),
        }
    }

    fn to_wire(&self) -> UserWire {
        UserWire {
            id: self.id.clone(),
            email: self.email.clone(),
            first_name: Some(self.prenom.clone()),
            last_name: Some(self.nom.clone()),
            role: Some(self.role.to_string()),
            status: Some(self.statut.to_string()),
            phone: self.telephone.clone(),
            created_at: Some(self.created_at),
            updated_at: Some(self.updated_at),
            ..Default::default()
        }
    }

    fn where_params(filter: &UserFilter) -> Vec<(String, String)> {
        let mut params = Vec::new();
        if let Some(role) = filter.role {
            params.push(equals("role", role));
        }
        if let Some(statut) = filter.statut {
            params.push(equals("status", statut));
        }
        params
    }

    fn create_extras(draft: &UserDraft) -> Option<Map<String, Value>> {
        let password = draft.password.as_ref()?;
        let mut extras = Map::new();
        extras.insert("password".to_string(), Value::String(password.clone()));
        Some(extras)
    }
}

/// Ouvre une session CMS et renvoie l'utilisateur connecté
pub async fn login(client: &CmsClient, email: &str, password: &str) -> Result<User, AppError> {
    let response = client.login(email, password).await?;
    let wire: UserWire = serde_json::from_value(response.user)?;
    Ok(User::from_wire(wire))
}
