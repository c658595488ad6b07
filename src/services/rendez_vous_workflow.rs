//! Soumission du formulaire de rendez-vous.
//!
//! Un rendez-vous de positionnement peut embarquer le dossier d'un apprenant
//! envoyé par son entreprise. Les deux créations sont successives et sans
//! transaction: si le dossier échoue, le rendez-vous reste enregistré et
//! l'échec est signalé par un avertissement distinct.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use validator::Validate;

use crate::domain::{
    Apprenant, ApprenantDraft, ApprenantStatus, RendezVous, RendezVousDraft, RendezVousType,
};
use crate::error::AppError;
use crate::services::data_service::DataService;
use crate::services::notifier::{Notifier, ToastMessages, format_error, with_toast};

/// Sous-formulaire "apprenant" d'un positionnement B2B
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct DossierApprenant {
    #[validate(length(min = 1, message = "Le prénom est requis"))]
    pub prenom: String,
    #[validate(length(min = 1, message = "Le nom est requis"))]
    pub nom: String,
    #[validate(email(message = "Adresse email invalide"))]
    pub email: String,
    pub telephone: Option<String>,
    pub date_naissance: Option<NaiveDate>,
    #[validate(length(min = 1, message = "L'entreprise est requise"))]
    pub entreprise: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RendezVousSubmission {
    pub rendez_vous: RendezVousDraft,
    #[serde(default)]
    pub apprenant: Option<DossierApprenant>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SubmissionOutcome {
    pub rendez_vous: RendezVous,
    pub apprenant: Option<Apprenant>,
    /// Échec de la seconde création, le rendez-vous étant conservé
    pub warning: Option<String>,
}

impl RendezVousSubmission {
    /// Le dossier n'est créé que pour un positionnement
    fn dossier(&self) -> Option<&DossierApprenant> {
        match self.rendez_vous.type_rdv {
            RendezVousType::Positionnement => self.apprenant.as_ref(),
            _ => None,
        }
    }

    pub fn validate(&self) -> Result<(), AppError> {
        self.rendez_vous.validate()?;
        if let Some(dossier) = self.dossier() {
            dossier.validate()?;
        }
        Ok(())
    }
}

fn apprenant_draft(dossier: DossierApprenant, programme_id: Option<String>) -> ApprenantDraft {
    ApprenantDraft {
        prenom: dossier.prenom,
        nom: dossier.nom,
        email: dossier.email,
        telephone: dossier.telephone,
        date_naissance: dossier.date_naissance,
        entreprise: Some(dossier.entreprise),
        statut: ApprenantStatus::Active,
        programmes: programme_id.into_iter().collect(),
        progression: 0,
    }
}

pub async fn submit_rendez_vous(
    data: &DataService,
    notifier: &dyn Notifier,
    submission: RendezVousSubmission,
) -> Result<SubmissionOutcome, AppError> {
    if let Err(err) = submission.validate() {
        notifier.error(&format_error(Some("Formulaire incomplet"), &err));
        return Err(err);
    }

    let dossier = submission.dossier().cloned();
    if dossier.is_none() && submission.apprenant.is_some() {
        debug!(type_rdv = %submission.rendez_vous.type_rdv, "learner dossier ignored");
    }

    let messages = ToastMessages::new("Enregistrement du rendez-vous...", "Rendez-vous enregistré")
        .with_error("Échec de l'enregistrement du rendez-vous");
    let rendez_vous = with_toast(notifier, &messages, data.rendez_vous.create(submission.rendez_vous)).await?;
    info!(id = %rendez_vous.id, type_rdv = %rendez_vous.type_rdv, "rendez-vous created");

    let Some(dossier) = dossier else {
        return Ok(SubmissionOutcome {
            rendez_vous,
            apprenant: None,
            warning: None,
        });
    };

    let draft = apprenant_draft(dossier, rendez_vous.programme_id.clone());
    match data.apprenants.create(draft).await {
        Ok(apprenant) => {
            notifier.success("Dossier apprenant créé");
            info!(id = %apprenant.id, rendez_vous = %rendez_vous.id, "learner dossier created");
            Ok(SubmissionOutcome {
                rendez_vous,
                apprenant: Some(apprenant),
                warning: None,
            })
        }
        Err(err) => {
            let warning = format_error(
                Some("Rendez-vous enregistré, mais le dossier apprenant n'a pas pu être créé"),
                &err,
            );
            warn!(rendez_vous = %rendez_vous.id, error = %err, "learner dossier creation failed");
            notifier.warning(&warning);
            Ok(SubmissionOutcome {
                rendez_vous,
                apprenant: None,
                warning: Some(warning),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        ApprenantFilter, ApprenantPatch, ClientContact, Lieu, RendezVousFilter, RendezVousStatus,
    };
    use crate::error::ApiError;
    use crate::services::notifier::{ToastLevel, ToastRecorder};
    use crate::services::store::Store;
    use async_trait::async_trait;
    use chrono::NaiveTime;
    use std::sync::Arc;

    /// Magasin dont chaque écriture est refusée par le serveur
    struct RejectingStore;

    #[async_trait]
    impl Store<Apprenant> for RejectingStore {
        async fn list(&self, _filter: &ApprenantFilter) -> Result<Vec<Apprenant>, AppError> {
            Ok(Vec::new())
        }

        async fn get(&self, _id: &str) -> Result<Option<Apprenant>, AppError> {
            Ok(None)
        }

        async fn create(&self, _draft: ApprenantDraft) -> Result<Apprenant, AppError> {
            Err(ApiError::new(500, "Service indisponible").into())
        }

        async fn update(&self, id: &str, _patch: ApprenantPatch) -> Result<Apprenant, AppError> {
            Err(AppError::not_found("apprenants", id))
        }

        async fn delete(&self, id: &str) -> Result<(), AppError> {
            Err(AppError::not_found("apprenants", id))
        }
    }

    fn submission(type_rdv: RendezVousType, with_dossier: bool) -> RendezVousSubmission {
        RendezVousSubmission {
            rendez_vous: RendezVousDraft {
                client: ClientContact {
                    prenom: "Nadia".to_string(),
                    nom: "Lefèvre".to_string(),
                    email: "rh@transports-durand.fr".to_string(),
                    telephone: None,
                    entreprise: Some("Transports Durand".to_string()),
                },
                programme_id: Some("prog-1".to_string()),
                type_rdv,
                statut: RendezVousStatus::EnAttente,
                date: NaiveDate::from_ymd_opt(2025, 11, 20).unwrap(),
                heure: NaiveTime::from_hms_opt(10, 30, 0).unwrap(),
                duree_minutes: 60,
                lieu: Lieu::Visio { lien: None },
                notes: None,
            },
            apprenant: with_dossier.then(|| DossierApprenant {
                prenom: "Yanis".to_string(),
                nom: "Caron".to_string(),
                email: "y.caron@transports-durand.fr".to_string(),
                telephone: None,
                date_naissance: None,
                entreprise: "Transports Durand".to_string(),
            }),
        }
    }

    #[tokio::test]
    async fn test_positionnement_creates_linked_dossier() {
        let data = DataService::mock();
        let recorder = ToastRecorder::new();

        let outcome = submit_rendez_vous(&data, &recorder, submission(RendezVousType::Positionnement, true))
            .await
            .unwrap();

        let apprenant = outcome.apprenant.unwrap();
        assert_eq!(apprenant.programmes, vec!["prog-1".to_string()]);
        assert_eq!(apprenant.entreprise.as_deref(), Some("Transports Durand"));
        assert_eq!(outcome.warning, None);
        assert_eq!(data.apprenants_by_programme("prog-1").await.unwrap().len(), 3);

        let levels: Vec<ToastLevel> = recorder.settled().iter().map(|t| t.level).collect();
        assert_eq!(levels, vec![ToastLevel::Success, ToastLevel::Success]);
    }

    #[tokio::test]
    async fn test_dossier_failure_keeps_rendez_vous() {
        let mut data = DataService::mock();
        data.apprenants = Arc::new(RejectingStore);
        let recorder = ToastRecorder::new();

        let outcome = submit_rendez_vous(&data, &recorder, submission(RendezVousType::Positionnement, true))
            .await
            .unwrap();

        assert!(outcome.apprenant.is_none());
        let warning = outcome.warning.unwrap();
        assert!(warning.contains("Service indisponible"));

        let stored = data.rendez_vous.get(&outcome.rendez_vous.id).await.unwrap();
        assert_eq!(stored, Some(outcome.rendez_vous));

        let settled = recorder.settled();
        assert_eq!(settled.len(), 2);
        assert_eq!(settled[0].level, ToastLevel::Success);
        assert_eq!(settled[1].level, ToastLevel::Warning);
        assert_eq!(settled[1].message, warning);
    }

    #[tokio::test]
    async fn test_dossier_ignored_outside_positionnement() {
        let data = DataService::mock();
        let recorder = ToastRecorder::new();

        let outcome = submit_rendez_vous(&data, &recorder, submission(RendezVousType::Information, true))
            .await
            .unwrap();

        assert!(outcome.apprenant.is_none());
        assert_eq!(data.apprenants.list(&ApprenantFilter::default()).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_invalid_form_creates_nothing() {
        let data = DataService::mock();
        let recorder = ToastRecorder::new();
        let mut invalid = submission(RendezVousType::Positionnement, true);
        invalid.rendez_vous.duree_minutes = 5;

        let err = submit_rendez_vous(&data, &recorder, invalid).await.unwrap_err();

        assert!(matches!(err, AppError::Validation(_)));
        assert_eq!(data.rendez_vous.list(&RendezVousFilter::default()).await.unwrap().len(), 2);
        assert_eq!(recorder.settled()[0].level, ToastLevel::Error);
    }
}
