use sea_orm::{ColumnTrait, QueryFilter, Select, Set};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{Column, DbResource, Row};
use crate::domain::rendez_vous::hhmm;
use crate::domain::user::permissions_for_role;
use crate::domain::{
    Apprenant, ApprenantFilter, Article, ArticleFilter, ClientContact, ContactFormateur, FormationFilter,
    FormationPersonnalisee, JourFormation, Lieu, Programme, ProgrammeFilter, RendezVous, RendezVousFilter,
    RendezVousType, Role, Seo, User, UserFilter, parse_or, parse_or_default,
};
use crate::error::AppError;
use crate::models::{apprenants, articles, formations_personnalisees, programmes, rendez_vous, users};

// ========== COLONNES JSON ==========
fn string_list(value: Value) -> Vec<String> {
    match value {
        Value::Array(items) => items
            .into_iter()
            .filter_map(|item| match item {
                Value::String(s) => Some(s),
                Value::Number(n) => Some(n.to_string()),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    }
}

fn json_list(items: &[String]) -> Value {
    Value::from(items.to_vec())
}

fn to_i32(value: u32) -> i32 {
    i32::try_from(value).unwrap_or(i32::MAX)
}

fn to_u32(value: i32) -> u32 {
    u32::try_from(value).unwrap_or_default()
}
// ===================================

impl DbResource for User {
    type Entity = users::Entity;
    type Active = users::ActiveModel;

    fn id_column() -> Column<Self> {
        users::Column::Id
    }

    fn from_row(row: Row<Self>) -> Result<Self, AppError> {
        Ok(Self {
            permissions: permissions_for_role(&row.role),
            role: row.role.trim().to_ascii_uppercase().parse().unwrap_or(Role::Beneficiaire),
            statut: parse_or_default(Some(row.statut.as_str())),
            id: row.id,
            email: row.email,
            prenom: row.prenom,
            nom: row.nom,
            telephone: row.telephone,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }

    fn to_active(&self) -> Result<users::ActiveModel, AppError> {
        Ok(users::ActiveModel {
            id: Set(self.id.clone()),
            email: Set(self.email.clone()),
            prenom: Set(self.prenom.clone()),
            nom: Set(self.nom.clone()),
            role: Set(self.role.to_string()),
            statut: Set(self.statut.to_string()),
            telephone: Set(self.telephone.clone()),
            created_at: Set(self.created_at),
            updated_at: Set(self.updated_at),
        })
    }

    fn apply_filter(mut query: Select<users::Entity>, filter: &UserFilter) -> Select<users::Entity> {
        if let Some(role) = filter.role {
            query = query.filter(users::Column::Role.eq(role.to_string()));
        }
        if let Some(statut) = filter.statut {
            query = query.filter(users::Column::Statut.eq(statut.to_string()));
        }
        query
    }
}

impl DbResource for Programme {
    type Entity = programmes::Entity;
    type Active = programmes::ActiveModel;

    fn id_column() -> Column<Self> {
        programmes::Column::Id
    }

    fn from_row(row: Row<Self>) -> Result<Self, AppError> {
        Ok(Self {
            id: row.id,
            code: row.code,
            titre: row.titre,
            description: row.description,
            duree_heures: to_u32(row.duree_heures),
            niveau: parse_or_default(Some(row.niveau.as_str())),
            modalite: parse_or_default(Some(row.modalite.as_str())),
            prix: row.prix,
            statut: parse_or_default(Some(row.statut.as_str())),
            competences: string_list(row.competences),
            formateurs: string_list(row.formateurs),
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }

    fn to_active(&self) -> Result<programmes::ActiveModel, AppError> {
        Ok(programmes::ActiveModel {
            id: Set(self.id.clone()),
            code: Set(self.code.clone()),
            titre: Set(self.titre.clone()),
            description: Set(self.description.clone()),
            duree_heures: Set(to_i32(self.duree_heures)),
            niveau: Set(self.niveau.to_string()),
            modalite: Set(self.modalite.to_string()),
            prix: Set(self.prix),
            statut: Set(self.statut.to_string()),
            competences: Set(json_list(&self.competences)),
            formateurs: Set(json_list(&self.formateurs)),
            created_at: Set(self.created_at),
            updated_at: Set(self.updated_at),
        })
    }

    fn apply_filter(mut query: Select<programmes::Entity>, filter: &ProgrammeFilter) -> Select<programmes::Entity> {
        if let Some(statut) = filter.statut {
            query = query.filter(programmes::Column::Statut.eq(statut.to_string()));
        }
        if let Some(niveau) = filter.niveau {
            query = query.filter(programmes::Column::Niveau.eq(niveau.to_string()));
        }
        if let Some(modalite) = filter.modalite {
            query = query.filter(programmes::Column::Modalite.eq(modalite.to_string()));
        }
        query
    }
}

impl DbResource for Apprenant {
    type Entity = apprenants::Entity;
    type Active = apprenants::ActiveModel;

    fn id_column() -> Column<Self> {
        apprenants::Column::Id
    }

    fn from_row(row: Row<Self>) -> Result<Self, AppError> {
        Ok(Self {
            id: row.id,
            prenom: row.prenom,
            nom: row.nom,
            email: row.email,
            telephone: row.telephone,
            date_naissance: row.date_naissance,
            entreprise: row.entreprise,
            statut: parse_or_default(Some(row.statut.as_str())),
            programmes: string_list(row.programmes),
            progression: row.progression,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }

    fn to_active(&self) -> Result<apprenants::ActiveModel, AppError> {
        Ok(apprenants::ActiveModel {
            id: Set(self.id.clone()),
            prenom: Set(self.prenom.clone()),
            nom: Set(self.nom.clone()),
            email: Set(self.email.clone()),
            telephone: Set(self.telephone.clone()),
            date_naissance: Set(self.date_naissance),
            entreprise: Set(self.entreprise.clone()),
            statut: Set(self.statut.to_string()),
            programmes: Set(json_list(&self.programmes)),
            progression: Set(self.progression),
            created_at: Set(self.created_at),
            updated_at: Set(self.updated_at),
        })
    }

    fn apply_filter(mut query: Select<apprenants::Entity>, filter: &ApprenantFilter) -> Select<apprenants::Entity> {
        if let Some(statut) = filter.statut {
            query = query.filter(apprenants::Column::Statut.eq(statut.to_string()));
        }
        query
    }
}

impl DbResource for RendezVous {
    type Entity = rendez_vous::Entity;
    type Active = rendez_vous::ActiveModel;

    fn id_column() -> Column<Self> {
        rendez_vous::Column::Id
    }

    fn from_row(row: Row<Self>) -> Result<Self, AppError> {
        Ok(Self {
            id: row.id,
            client: ClientContact {
                prenom: row.client_prenom,
                nom: row.client_nom,
                email: row.client_email,
                telephone: row.client_telephone,
                entreprise: row.client_entreprise,
            },
            programme_id: row.programme_id,
            type_rdv: parse_or(Some(row.type_rdv.as_str()), RendezVousType::Information),
            statut: parse_or_default(Some(row.statut.as_str())),
            date: row.date,
            heure: hhmm::to_minute(row.heure),
            duree_minutes: to_u32(row.duree_minutes),
            lieu: Lieu::from_parts(&row.lieu_mode, row.lieu_adresse, row.lieu_lien),
            notes: row.notes,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }

    fn to_active(&self) -> Result<rendez_vous::ActiveModel, AppError> {
        Ok(rendez_vous::ActiveModel {
            id: Set(self.id.clone()),
            client_prenom: Set(self.client.prenom.clone()),
            client_nom: Set(self.client.nom.clone()),
            client_email: Set(self.client.email.clone()),
            client_telephone: Set(self.client.telephone.clone()),
            client_entreprise: Set(self.client.entreprise.clone()),
            programme_id: Set(self.programme_id.clone()),
            type_rdv: Set(self.type_rdv.to_string()),
            statut: Set(self.statut.to_string()),
            date: Set(self.date),
            heure: Set(self.heure),
            duree_minutes: Set(to_i32(self.duree_minutes)),
            lieu_mode: Set(self.lieu.mode().to_string()),
            lieu_adresse: Set(self.lieu.adresse().map(str::to_string)),
            lieu_lien: Set(self.lieu.lien().map(str::to_string)),
            notes: Set(self.notes.clone()),
            created_at: Set(self.created_at),
            updated_at: Set(self.updated_at),
        })
    }

    fn apply_filter(
        mut query: Select<rendez_vous::Entity>,
        filter: &RendezVousFilter,
    ) -> Select<rendez_vous::Entity> {
        if let Some(statut) = filter.statut {
            query = query.filter(rendez_vous::Column::Statut.eq(statut.to_string()));
        }
        if let Some(type_rdv) = filter.type_rdv {
            query = query.filter(rendez_vous::Column::TypeRdv.eq(type_rdv.to_string()));
        }
        if let Some(programme) = &filter.programme {
            query = query.filter(rendez_vous::Column::ProgrammeId.eq(programme.as_str()));
        }
        query
    }
}

impl DbResource for Article {
    type Entity = articles::Entity;
    type Active = articles::ActiveModel;

    fn id_column() -> Column<Self> {
        articles::Column::Id
    }

    fn from_row(row: Row<Self>) -> Result<Self, AppError> {
        // Un SEO illisible ne doit pas rendre l'article inaccessible
        let seo: Seo = serde_json::from_value(row.seo).unwrap_or_default();
        Ok(Self {
            id: row.id,
            titre: row.titre,
            slug: row.slug,
            contenu: row.contenu,
            extrait: row.extrait,
            statut: parse_or_default(Some(row.statut.as_str())),
            categories: string_list(row.categories),
            tags: string_list(row.tags),
            vues: u64::try_from(row.vues).unwrap_or_default(),
            temps_lecture: to_u32(row.temps_lecture),
            seo,
            auteur: row.auteur,
            published_at: row.published_at,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }

    fn to_active(&self) -> Result<articles::ActiveModel, AppError> {
        Ok(articles::ActiveModel {
            id: Set(self.id.clone()),
            titre: Set(self.titre.clone()),
            slug: Set(self.slug.clone()),
            contenu: Set(self.contenu.clone()),
            extrait: Set(self.extrait.clone()),
            statut: Set(self.statut.to_string()),
            categories: Set(json_list(&self.categories)),
            tags: Set(json_list(&self.tags)),
            vues: Set(i64::try_from(self.vues).unwrap_or(i64::MAX)),
            temps_lecture: Set(to_i32(self.temps_lecture)),
            seo: Set(serde_json::to_value(&self.seo)?),
            auteur: Set(self.auteur.clone()),
            published_at: Set(self.published_at),
            created_at: Set(self.created_at),
            updated_at: Set(self.updated_at),
        })
    }

    fn apply_filter(mut query: Select<articles::Entity>, filter: &ArticleFilter) -> Select<articles::Entity> {
        if let Some(statut) = filter.statut {
            query = query.filter(articles::Column::Statut.eq(statut.to_string()));
        }
        if let Some(slug) = &filter.slug {
            query = query.filter(articles::Column::Slug.eq(slug.as_str()));
        }
        query
    }
}

/// Contenu de la colonne `document`
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
struct FormationDocument {
    objectifs: Vec<String>,
    prerequis: String,
    public_vise: String,
    duree_totale_heures: f32,
    modules: Vec<JourFormation>,
    modalites_acces: String,
    formateur: ContactFormateur,
    methodes_evaluation: Vec<String>,
    accessibilite: String,
    conditions_abandon: String,
}

impl DbResource for FormationPersonnalisee {
    type Entity = formations_personnalisees::Entity;
    type Active = formations_personnalisees::ActiveModel;

    fn id_column() -> Column<Self> {
        formations_personnalisees::Column::Id
    }

    fn from_row(row: Row<Self>) -> Result<Self, AppError> {
        let doc: FormationDocument = serde_json::from_value(row.document)
            .map_err(|e| AppError::InvalidData(format!("formation {}: {}", row.id, e)))?;
        Ok(Self {
            id: row.id,
            titre: row.titre,
            entreprise: row.entreprise,
            objectifs: doc.objectifs,
            prerequis: doc.prerequis,
            public_vise: doc.public_vise,
            duree_totale_heures: doc.duree_totale_heures,
            modules: doc.modules,
            modalites_acces: doc.modalites_acces,
            formateur: doc.formateur,
            methodes_evaluation: doc.methodes_evaluation,
            accessibilite: doc.accessibilite,
            conditions_abandon: doc.conditions_abandon,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }

    fn to_active(&self) -> Result<formations_personnalisees::ActiveModel, AppError> {
        let doc = FormationDocument {
            objectifs: self.objectifs.clone(),
            prerequis: self.prerequis.clone(),
            public_vise: self.public_vise.clone(),
            duree_totale_heures: self.duree_totale_heures,
            modules: self.modules.clone(),
            modalites_acces: self.modalites_acces.clone(),
            formateur: self.formateur.clone(),
            methodes_evaluation: self.methodes_evaluation.clone(),
            accessibilite: self.accessibilite.clone(),
            conditions_abandon: self.conditions_abandon.clone(),
        };
        Ok(formations_personnalisees::ActiveModel {
            id: Set(self.id.clone()),
            titre: Set(self.titre.clone()),
            entreprise: Set(self.entreprise.clone()),
            document: Set(serde_json::to_value(doc)?),
            created_at: Set(self.created_at),
            updated_at: Set(self.updated_at),
        })
    }

    fn apply_filter(
        query: Select<formations_personnalisees::Entity>,
        _filter: &FormationFilter,
    ) -> Select<formations_personnalisees::Entity> {
        // Recherche approximative sur l'entreprise: filtrée après lecture
        query
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::mock::fixtures;
    use sea_orm::ActiveValue;

    fn unwrap_set<T: Into<sea_orm::Value> + std::fmt::Debug>(value: ActiveValue<T>) -> T {
        match value {
            ActiveValue::Set(v) => v,
            other => panic!("expected Set, got {:?}", other),
        }
    }

    #[test]
    fn test_formation_document_round_trip() {
        let formation = fixtures::formations().remove(0);
        let active = formation.to_active().unwrap();

        let row = formations_personnalisees::Model {
            id: unwrap_set(active.id),
            titre: unwrap_set(active.titre),
            entreprise: unwrap_set(active.entreprise),
            document: unwrap_set(active.document),
            created_at: unwrap_set(active.created_at),
            updated_at: unwrap_set(active.updated_at),
        };
        assert_eq!(FormationPersonnalisee::from_row(row).unwrap(), formation);
    }

    #[test]
    fn test_rendez_vous_lieu_flattened() {
        let rdv = fixtures::rendez_vous().remove(1);
        let active = rdv.to_active().unwrap();

        assert_eq!(unwrap_set(active.lieu_mode), "visio");
        assert_eq!(unwrap_set(active.lieu_lien).as_deref(), Some("https://visio.formapro.fr/rdv-2"));
        assert_eq!(unwrap_set(active.lieu_adresse), None);
    }

    #[test]
    fn test_corrupt_formation_document_is_invalid_data() {
        let now = chrono::Utc::now();
        let row = formations_personnalisees::Model {
            id: "fp-x".to_string(),
            titre: "Dossier".to_string(),
            entreprise: None,
            document: Value::String("pas un objet".to_string()),
            created_at: now,
            updated_at: now,
        };
        assert!(matches!(FormationPersonnalisee::from_row(row), Err(AppError::InvalidData(_))));
    }
}
