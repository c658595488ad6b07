// ============================================================================
// SERVICES - MODULE PRINCIPAL
// ============================================================================
//
// Description:
//   Couche d'accès aux données du back-office.
//
// Liste des modules:
//   - store : Trait `Store<E>` commun aux trois magasins
//   - mock : Magasin en mémoire (fixtures)
//   - cms : Client REST du CMS et magasins par collection
//   - database : Magasin sea-orm (une table par entité)
//   - data_service : Façade choisie au démarrage selon `DataMode`
//   - notifier : Notifications (toasts) liées aux appels
//   - rendez_vous_workflow : Soumission rendez-vous + dossier apprenant
//
// ============================================================================

pub mod cms;
pub mod data_service;
pub mod database;
pub mod mock;
pub mod notifier;
pub mod rendez_vous_workflow;
pub mod store;
