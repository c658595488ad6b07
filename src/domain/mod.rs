// ============================================================================
// DOMAIN - MODULE PRINCIPAL
// ============================================================================
//
// Description:
//   Entités canoniques de l'application, indépendantes du stockage.
//   Chaque magasin (mock, CMS, base de données) convertit depuis/vers ces
//   types à sa propre frontière.
//
// Liste des modules:
//   - user : Utilisateurs, rôles et table rôle → permissions
//   - programme : Programmes de formation
//   - apprenant : Apprenants (learners)
//   - rendez_vous : Rendez-vous avec un contact client
//   - article : Articles de blog (slug + temps de lecture calculés)
//   - formation : Dossiers de formation personnalisée
//   - media : Fichiers téléversés sur le CMS
//
// ============================================================================

pub mod apprenant;
pub mod article;
pub mod formation;
pub mod media;
pub mod programme;
pub mod rendez_vous;
pub mod user;

use std::str::FromStr;

use chrono::{DateTime, Utc};

pub use apprenant::{Apprenant, ApprenantDraft, ApprenantFilter, ApprenantPatch, ApprenantStatus};
pub use article::{Article, ArticleDraft, ArticleFilter, ArticlePatch, ArticleStatus, Seo};
pub use formation::{
    ContactFormateur, FormationDraft, FormationFilter, FormationPatch, FormationPersonnalisee,
    JourFormation,
};
pub use media::Media;
pub use programme::{
    Modalite, Niveau, Programme, ProgrammeDraft, ProgrammeFilter, ProgrammePatch, ProgrammeStatus,
};
pub use rendez_vous::{
    ClientContact, Lieu, RendezVous, RendezVousDraft, RendezVousFilter, RendezVousPatch,
    RendezVousStatus, RendezVousType,
};
pub use user::{Role, User, UserDraft, UserFilter, UserPatch, UserStatus};

/// Une collection gérée par le back-office.
///
/// Les créations partent d'un `Draft` (formulaire complet), les mises à jour
/// d'un `Patch` (champs optionnels). Les champs dérivés (slug, temps de
/// lecture, permissions) sont recalculés ici, donc identiques quel que soit
/// le magasin utilisé.
pub trait Resource: Clone + Send + Sync + Sized + 'static {
    /// Nom de la collection côté API (`/api/<collection>`)
    const COLLECTION: &'static str;

    type Filter: Default + Send + Sync;
    type Draft: Send + Sync;
    type Patch: Send + Sync;

    fn id(&self) -> &str;

    fn from_draft(id: String, draft: Self::Draft, now: DateTime<Utc>) -> Self;

    fn apply_patch(&mut self, patch: Self::Patch, now: DateTime<Utc>);

    fn matches(&self, filter: &Self::Filter) -> bool;
}

/// Écrase `target` seulement si le patch porte une valeur
pub(crate) fn patch_field<T>(target: &mut T, value: Option<T>) {
    if let Some(value) = value {
        *target = value;
    }
}

/// Valeur d'énumération venue d'un stockage; inconnue ou absente → défaut
pub(crate) fn parse_or_default<T: FromStr + Default>(raw: Option<&str>) -> T {
    parse_or(raw, T::default())
}

pub(crate) fn parse_or<T: FromStr>(raw: Option<&str>, fallback: T) -> T {
    raw.and_then(|r| r.trim().to_ascii_lowercase().parse().ok())
        .unwrap_or(fallback)
}
