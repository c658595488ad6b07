use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};
use validator::Validate;

use super::{Resource, patch_field};
use crate::utils::text::matches_search;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, AsRefStr, EnumIter,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    SuperAdmin,
    Admin,
    Formateur,
    Gestionnaire,
    Apprenant,
    Beneficiaire,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum UserStatus {
    #[default]
    Active,
    Inactive,
    Pending,
}

impl UserStatus {
    /// Bascule utilisée par l'action "activer / désactiver" de la liste
    pub fn toggled(self) -> Self {
        match self {
            UserStatus::Active => UserStatus::Inactive,
            UserStatus::Inactive | UserStatus::Pending => UserStatus::Active,
        }
    }
}

// ========== PERMISSIONS ==========
pub const WILDCARD: &str = "*";

pub const ALL_PERMISSIONS: &[&str] = &[
    "users:read",
    "users:write",
    "programmes:read",
    "programmes:write",
    "apprenants:read",
    "apprenants:write",
    "rendez-vous:read",
    "rendez-vous:write",
    "articles:read",
    "articles:write",
    "media:read",
    "media:write",
    "formations:read",
    "formations:write",
    "settings:manage",
];

fn role_grants(role: Role) -> &'static [&'static str] {
    match role {
        Role::SuperAdmin => &[WILDCARD],
        Role::Admin => &[
            "users:read",
            "users:write",
            "programmes:read",
            "programmes:write",
            "apprenants:read",
            "apprenants:write",
            "rendez-vous:read",
            "rendez-vous:write",
            "articles:read",
            "articles:write",
            "media:read",
            "media:write",
            "formations:read",
            "formations:write",
        ],
        Role::Gestionnaire => &[
            "programmes:read",
            "programmes:write",
            "apprenants:read",
            "apprenants:write",
            "rendez-vous:read",
            "rendez-vous:write",
            "formations:read",
            "formations:write",
            "articles:read",
            "media:read",
        ],
        Role::Formateur => &[
            "programmes:read",
            "apprenants:read",
            "apprenants:write",
            "rendez-vous:read",
            "formations:read",
            "articles:read",
        ],
        Role::Apprenant => &["programmes:read", "rendez-vous:read", "articles:read"],
        Role::Beneficiaire => &["programmes:read", "articles:read"],
    }
}
// =================================

/// Permissions d'un rôle, joker développé
pub fn permissions_for(role: Role) -> Vec<String> {
    let grants = role_grants(role);
    if grants.contains(&WILDCARD) {
        return ALL_PERMISSIONS.iter().map(|p| p.to_string()).collect();
    }
    grants.iter().map(|p| p.to_string()).collect()
}

/// Variante tolérante pour les rôles venant de l'extérieur: un rôle inconnu
/// ne donne aucune permission.
pub fn permissions_for_role(role: &str) -> Vec<String> {
    match role.trim().to_ascii_uppercase().parse::<Role>() {
        Ok(role) => permissions_for(role),
        Err(_) => Vec::new(),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: String,
    pub prenom: String,
    pub nom: String,
    pub role: Role,
    pub statut: UserStatus,
    pub telephone: Option<String>,
    pub permissions: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn nom_complet(&self) -> String {
        format!("{} {}", self.prenom, self.nom).trim().to_string()
    }

    pub fn has_permission(&self, permission: &str) -> bool {
        self.permissions.iter().any(|p| p == permission || p == WILDCARD)
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UserDraft {
    #[validate(email(message = "Adresse email invalide"))]
    pub email: String,
    #[validate(length(min = 1, message = "Le prénom est requis"))]
    pub prenom: String,
    #[validate(length(min = 1, message = "Le nom est requis"))]
    pub nom: String,
    pub role: Role,
    #[serde(default)]
    pub statut: UserStatus,
    pub telephone: Option<String>,
    /// Transmis au CMS uniquement, jamais conservé dans l'entité
    #[validate(length(min = 8, message = "Le mot de passe doit contenir au moins 8 caractères"))]
    pub password: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UserPatch {
    #[validate(email(message = "Adresse email invalide"))]
    pub email: Option<String>,
    #[validate(length(min = 1, message = "Le prénom est requis"))]
    pub prenom: Option<String>,
    #[validate(length(min = 1, message = "Le nom est requis"))]
    pub nom: Option<String>,
    pub role: Option<Role>,
    pub statut: Option<UserStatus>,
    pub telephone: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserFilter {
    pub role: Option<Role>,
    pub statut: Option<UserStatus>,
    pub search: Option<String>,
}

impl Resource for User {
    const COLLECTION: &'static str = "users";

    type Filter = UserFilter;
    type Draft = UserDraft;
    type Patch = UserPatch;

    fn id(&self) -> &str {
        &self.id
    }

    fn from_draft(id: String, draft: UserDraft, now: DateTime<Utc>) -> Self {
        Self {
            id,
            email: draft.email,
            prenom: draft.prenom,
            nom: draft.nom,
            permissions: permissions_for(draft.role),
            role: draft.role,
            statut: draft.statut,
            telephone: draft.telephone,
            created_at: now,
            updated_at: now,
        }
    }

    fn apply_patch(&mut self, patch: UserPatch, now: DateTime<Utc>) {
        patch_field(&mut self.email, patch.email);
        patch_field(&mut self.prenom, patch.prenom);
        patch_field(&mut self.nom, patch.nom);
        patch_field(&mut self.statut, patch.statut);
        if patch.telephone.is_some() {
            self.telephone = patch.telephone;
        }
        if let Some(role) = patch.role {
            self.role = role;
            self.permissions = permissions_for(role);
        }
        self.updated_at = now;
    }

    fn matches(&self, filter: &UserFilter) -> bool {
        if filter.role.is_some_and(|role| role != self.role) {
            return false;
        }
        if filter.statut.is_some_and(|statut| statut != self.statut) {
            return false;
        }
        match &filter.search {
            Some(term) => matches_search([self.prenom.as_str(), self.nom.as_str(), self.email.as_str()], term),
            None => true,
        }
    }
}
