// Jeu de données de démonstration pour le mode mock.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use rust_decimal::Decimal;

use crate::domain::user::permissions_for;
use crate::domain::{
    Apprenant, ApprenantStatus, Article, ArticleStatus, ClientContact, ContactFormateur,
    FormationPersonnalisee, JourFormation, Lieu, Modalite, Niveau, Programme, ProgrammeStatus,
    RendezVous, RendezVousStatus, RendezVousType, Role, Seo, User, UserStatus,
};

fn at(rfc3339: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(rfc3339)
        .map(|d| d.with_timezone(&Utc))
        .unwrap_or_default()
}

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default()
}

fn user(id: &str, email: &str, prenom: &str, nom: &str, role: Role, statut: UserStatus) -> User {
    let created = at("2025-09-01T08:00:00Z");
    User {
        id: id.to_string(),
        email: email.to_string(),
        prenom: prenom.to_string(),
        nom: nom.to_string(),
        role,
        statut,
        telephone: None,
        permissions: permissions_for(role),
        created_at: created,
        updated_at: created,
    }
}

pub fn users() -> Vec<User> {
    vec![
        user("user-1", "direction@formapro.fr", "Claire", "Dubois", Role::SuperAdmin, UserStatus::Active),
        user("user-2", "j.morel@formapro.fr", "Julien", "Morel", Role::Formateur, UserStatus::Active),
        user("user-3", "s.lambert@formapro.fr", "Sonia", "Lambert", Role::Gestionnaire, UserStatus::Active),
        user("user-4", "k.nguyen@example.org", "Kim", "Nguyen", Role::Apprenant, UserStatus::Pending),
    ]
}

pub fn programmes() -> Vec<Programme> {
    let created = at("2025-09-15T09:30:00Z");
    vec![
        Programme {
            id: "prog-1".to_string(),
            code: "SST-INI".to_string(),
            titre: "Sauveteur Secouriste du Travail".to_string(),
            description: "Formation initiale SST, certification INRS".to_string(),
            duree_heures: 14,
            niveau: Niveau::Debutant,
            modalite: Modalite::Presentiel,
            prix: Decimal::new(39000, 2),
            statut: ProgrammeStatus::Published,
            competences: vec!["secourisme".to_string(), "prevention".to_string()],
            formateurs: vec!["user-2".to_string()],
            created_at: created,
            updated_at: created,
        },
        Programme {
            id: "prog-2".to_string(),
            code: "EXC-AV".to_string(),
            titre: "Excel avancé : tableaux croisés et macros".to_string(),
            description: "Automatiser ses tableaux de bord".to_string(),
            duree_heures: 21,
            niveau: Niveau::Avance,
            modalite: Modalite::Hybride,
            prix: Decimal::new(129000, 2),
            statut: ProgrammeStatus::Published,
            competences: vec!["bureautique".to_string()],
            formateurs: vec!["user-2".to_string()],
            created_at: created,
            updated_at: created,
        },
        Programme {
            id: "prog-3".to_string(),
            code: "MGT-01".to_string(),
            titre: "Manager de proximité".to_string(),
            description: "Les fondamentaux du management d'équipe".to_string(),
            duree_heures: 35,
            niveau: Niveau::Intermediaire,
            modalite: Modalite::Distanciel,
            prix: Decimal::new(185000, 2),
            statut: ProgrammeStatus::Draft,
            competences: vec!["management".to_string(), "communication".to_string()],
            formateurs: vec![],
            created_at: created,
            updated_at: created,
        },
    ]
}

pub fn apprenants() -> Vec<Apprenant> {
    let created = at("2025-10-01T10:00:00Z");
    vec![
        Apprenant {
            id: "app-1".to_string(),
            prenom: "Kim".to_string(),
            nom: "Nguyen".to_string(),
            email: "k.nguyen@example.org".to_string(),
            telephone: Some("06 12 34 56 78".to_string()),
            date_naissance: Some(day(1994, 3, 12)),
            entreprise: None,
            statut: ApprenantStatus::Active,
            programmes: vec!["prog-1".to_string()],
            progression: 50,
            created_at: created,
            updated_at: created,
        },
        Apprenant {
            id: "app-2".to_string(),
            prenom: "Marc".to_string(),
            nom: "Perrin".to_string(),
            email: "m.perrin@transports-durand.fr".to_string(),
            telephone: None,
            date_naissance: None,
            entreprise: Some("Transports Durand".to_string()),
            statut: ApprenantStatus::Completed,
            programmes: vec!["prog-1".to_string(), "prog-2".to_string()],
            progression: 100,
            created_at: created,
            updated_at: created,
        },
    ]
}

pub fn rendez_vous() -> Vec<RendezVous> {
    let created = at("2025-10-05T14:00:00Z");
    vec![
        RendezVous {
            id: "rdv-1".to_string(),
            client: ClientContact {
                prenom: "Inès".to_string(),
                nom: "Roux".to_string(),
                email: "ines.roux@example.org".to_string(),
                telephone: Some("07 11 22 33 44".to_string()),
                entreprise: None,
            },
            programme_id: Some("prog-2".to_string()),
            type_rdv: RendezVousType::Information,
            statut: RendezVousStatus::Confirme,
            date: day(2025, 10, 20),
            heure: NaiveTime::from_hms_opt(10, 0, 0).unwrap_or_default(),
            duree_minutes: 30,
            lieu: Lieu::Telephone,
            notes: None,
            created_at: created,
            updated_at: created,
        },
        RendezVous {
            id: "rdv-2".to_string(),
            client: ClientContact {
                prenom: "Paul".to_string(),
                nom: "Garnier".to_string(),
                email: "rh@boulangeries-petit.fr".to_string(),
                telephone: None,
                entreprise: Some("Boulangeries Petit".to_string()),
            },
            programme_id: Some("prog-3".to_string()),
            type_rdv: RendezVousType::Positionnement,
            statut: RendezVousStatus::EnAttente,
            date: day(2025, 11, 4),
            heure: NaiveTime::from_hms_opt(14, 30, 0).unwrap_or_default(),
            duree_minutes: 60,
            lieu: Lieu::Visio { lien: Some("https://visio.formapro.fr/rdv-2".to_string()) },
            notes: Some("Trois chefs d'équipe à positionner".to_string()),
            created_at: created,
            updated_at: created,
        },
    ]
}

pub fn articles() -> Vec<Article> {
    let created = at("2025-08-20T07:00:00Z");
    vec![
        Article {
            id: "art-1".to_string(),
            titre: "Financer sa formation avec le CPF".to_string(),
            slug: "financer-sa-formation-avec-le-cpf".to_string(),
            contenu: "Le compte personnel de formation permet de financer une formation certifiante.".to_string(),
            extrait: Some("Tout savoir sur le CPF".to_string()),
            statut: ArticleStatus::Published,
            categories: vec!["financement".to_string()],
            tags: vec!["cpf".to_string()],
            vues: 128,
            temps_lecture: 1,
            seo: Seo {
                meta_title: Some("Financer sa formation avec le CPF".to_string()),
                meta_description: None,
                keywords: vec!["cpf".to_string(), "financement".to_string()],
            },
            auteur: Some("user-1".to_string()),
            published_at: Some(created),
            created_at: created,
            updated_at: created,
        },
        Article {
            id: "art-2".to_string(),
            titre: "Nouveautés Qualiopi".to_string(),
            slug: "nouveautes-qualiopi".to_string(),
            contenu: "Brouillon en cours de rédaction.".to_string(),
            extrait: None,
            statut: ArticleStatus::Draft,
            categories: vec!["qualite".to_string()],
            tags: vec![],
            vues: 0,
            temps_lecture: 1,
            seo: Seo::default(),
            auteur: Some("user-3".to_string()),
            published_at: None,
            created_at: created,
            updated_at: created,
        },
    ]
}

pub fn formations() -> Vec<FormationPersonnalisee> {
    let created = at("2025-10-10T16:00:00Z");
    vec![FormationPersonnalisee {
        id: "fp-1".to_string(),
        titre: "Management d'équipe en boulangerie".to_string(),
        entreprise: Some("Boulangeries Petit".to_string()),
        objectifs: vec![
            "Animer un brief d'équipe".to_string(),
            "Conduire un entretien annuel".to_string(),
        ],
        prerequis: "Encadrer au moins une personne".to_string(),
        public_vise: "Chefs d'équipe".to_string(),
        duree_totale_heures: 14.0,
        modules: vec![
            JourFormation {
                jour: 1,
                titre: "Posture managériale".to_string(),
                contenus: vec!["Styles de management".to_string()],
                duree_heures: 7.0,
            },
            JourFormation {
                jour: 2,
                titre: "Entretiens et feedback".to_string(),
                contenus: vec!["Mises en situation".to_string()],
                duree_heures: 7.0,
            },
        ],
        modalites_acces: "Inscription sous 15 jours".to_string(),
        formateur: ContactFormateur {
            nom: "Julien Morel".to_string(),
            email: Some("j.morel@formapro.fr".to_string()),
            telephone: None,
        },
        methodes_evaluation: vec!["QCM".to_string(), "Mise en situation".to_string()],
        accessibilite: "Locaux accessibles PMR".to_string(),
        conditions_abandon: "Facturation au prorata des heures suivies".to_string(),
        created_at: created,
        updated_at: created,
    }]
}

/// Formulaires de création complets, un par collection
#[cfg(test)]
pub mod drafts {
    use chrono::{NaiveDate, NaiveTime};
    use rust_decimal::Decimal;

    use crate::domain::{
        ApprenantDraft, ApprenantStatus, ArticleDraft, ArticleStatus, ClientContact, ContactFormateur,
        FormationDraft, JourFormation, Lieu, Modalite, Niveau, ProgrammeDraft, ProgrammeStatus, RendezVousDraft,
        RendezVousStatus, RendezVousType, Role, Seo, UserDraft, UserStatus,
    };

    pub fn user() -> UserDraft {
        UserDraft {
            email: "a.faure@formapro.fr".to_string(),
            prenom: "Anaïs".to_string(),
            nom: "Faure".to_string(),
            role: Role::Gestionnaire,
            statut: UserStatus::Active,
            telephone: Some("04 72 00 00 00".to_string()),
            password: None,
        }
    }

    pub fn programme() -> ProgrammeDraft {
        ProgrammeDraft {
            code: "HAB-B0".to_string(),
            titre: "Habilitation électrique B0".to_string(),
            description: "Personnel non électricien".to_string(),
            duree_heures: 7,
            niveau: Niveau::Debutant,
            modalite: Modalite::Presentiel,
            prix: Decimal::new(25000, 2),
            statut: ProgrammeStatus::Published,
            competences: vec!["prevention".to_string()],
            formateurs: vec!["user-2".to_string()],
        }
    }

    pub fn apprenant() -> ApprenantDraft {
        ApprenantDraft {
            prenom: "Lucas".to_string(),
            nom: "Girard".to_string(),
            email: "l.girard@example.org".to_string(),
            telephone: None,
            date_naissance: NaiveDate::from_ymd_opt(1988, 7, 14),
            entreprise: Some("Menuiserie Girard".to_string()),
            statut: ApprenantStatus::Active,
            programmes: vec!["prog-1".to_string()],
            progression: 25,
        }
    }

    pub fn rendez_vous() -> RendezVousDraft {
        RendezVousDraft {
            client: ClientContact {
                prenom: "Élodie".to_string(),
                nom: "Marchand".to_string(),
                email: "e.marchand@example.org".to_string(),
                telephone: Some("06 00 00 00 00".to_string()),
                entreprise: None,
            },
            programme_id: Some("prog-2".to_string()),
            type_rdv: RendezVousType::Information,
            statut: RendezVousStatus::EnAttente,
            date: NaiveDate::from_ymd_opt(2025, 12, 3).unwrap_or_default(),
            heure: NaiveTime::from_hms_opt(9, 15, 0).unwrap_or_default(),
            duree_minutes: 30,
            lieu: Lieu::Presentiel { adresse: Some("12 rue de la République, Lyon".to_string()) },
            notes: Some("Rappeler avant".to_string()),
        }
    }

    pub fn article() -> ArticleDraft {
        ArticleDraft {
            titre: "Bien choisir sa formation bureautique".to_string(),
            slug: None,
            contenu: "Word, Excel ou PowerPoint : par où commencer ?".to_string(),
            extrait: Some("Nos conseils".to_string()),
            statut: ArticleStatus::Published,
            categories: vec!["conseils".to_string()],
            tags: vec!["bureautique".to_string()],
            seo: Seo {
                meta_title: Some("Formation bureautique".to_string()),
                meta_description: None,
                keywords: vec!["excel".to_string(), "word".to_string()],
            },
            auteur: Some("user-3".to_string()),
        }
    }

    pub fn formation() -> FormationDraft {
        FormationDraft {
            titre: "Accueil client en pharmacie".to_string(),
            entreprise: Some("Pharmacie du Centre".to_string()),
            objectifs: vec!["Accueillir et orienter".to_string()],
            prerequis: "Aucun".to_string(),
            public_vise: "Préparateurs".to_string(),
            duree_totale_heures: 3.5,
            modules: vec![JourFormation {
                jour: 1,
                titre: "Les bases de l'accueil".to_string(),
                contenus: vec!["Posture".to_string(), "Reformulation".to_string()],
                duree_heures: 3.5,
            }],
            modalites_acces: "Intra-entreprise".to_string(),
            formateur: ContactFormateur {
                nom: "Sonia Lambert".to_string(),
                email: Some("s.lambert@formapro.fr".to_string()),
                telephone: None,
            },
            methodes_evaluation: vec!["Quiz".to_string()],
            accessibilite: "Nous contacter".to_string(),
            conditions_abandon: "Aucun frais".to_string(),
        }
    }
}
