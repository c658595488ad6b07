// ============================================================================
// MODELS - MODULE PRINCIPAL
// ============================================================================
//
// Description:
//   Tables PostgreSQL du mode "database", une par collection.
//   Conversions vers le domaine dans services::database.
//
// Liste des modules:
//   - users : Utilisateurs du back-office
//   - programmes : Programmes de formation
//   - apprenants : Apprenants
//   - rendez_vous : Rendez-vous (contact client et lieu à plat)
//   - articles : Articles de blog
//   - formations_personnalisees : Dossiers sur mesure (document JSON)
//
// Points d'attention:
//   - Identifiants texte (UUID v4), générés côté application
//   - Les listes (compétences, programmes, tags...) sont des colonnes JSONB
//   - Les énumérations sont stockées en texte, valeur inconnue = défaut
//
// ============================================================================

pub mod apprenants;
pub mod articles;
pub mod formations_personnalisees;
pub mod programmes;
pub mod rendez_vous;
pub mod users;
