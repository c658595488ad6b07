// ============================================================================
// DATA SERVICE - FAÇADE D'ACCÈS AUX DONNÉES
// ============================================================================
//
// Description:
//   Point d'entrée unique des appelants (routes, workflows). Le magasin de
//   chaque collection est choisi une fois au démarrage selon `DataMode`,
//   puis utilisé tel quel: aucun cache, chaque appel relit la source.
//
// ============================================================================

use std::sync::Arc;

use sea_orm::DatabaseConnection;
use tracing::{debug, info};

use crate::config::DataMode;
use crate::domain::{
    Apprenant, ApprenantFilter, Article, ArticleFilter, ArticlePatch, FormationPersonnalisee,
    Programme, ProgrammeFilter, ProgrammeStatus, RendezVous, RendezVousFilter, RendezVousStatus,
    Resource, Role, User, UserFilter, UserPatch,
};
use crate::error::AppError;
use crate::services::cms::{self, CmsClient, CmsStore, MediaLibrary};
use crate::services::database::DbStore;
use crate::services::mock::{MockStore, fixtures};
use crate::services::store::Store;

pub struct DataService {
    mode: DataMode,
    pub users: Arc<dyn Store<User>>,
    pub programmes: Arc<dyn Store<Programme>>,
    pub apprenants: Arc<dyn Store<Apprenant>>,
    pub rendez_vous: Arc<dyn Store<RendezVous>>,
    pub articles: Arc<dyn Store<Article>>,
    pub formations: Arc<dyn Store<FormationPersonnalisee>>,
    cms: Option<CmsClient>,
}

impl DataService {
    /// Fixtures en mémoire, réinitialisées à chaque démarrage
    pub fn mock() -> Self {
        Self {
            mode: DataMode::Mock,
            users: Arc::new(MockStore::new(fixtures::users())),
            programmes: Arc::new(MockStore::new(fixtures::programmes())),
            apprenants: Arc::new(MockStore::new(fixtures::apprenants())),
            rendez_vous: Arc::new(MockStore::new(fixtures::rendez_vous())),
            articles: Arc::new(MockStore::new(fixtures::articles())),
            formations: Arc::new(MockStore::new(fixtures::formations())),
            cms: None,
        }
    }

    pub fn cms(client: CmsClient) -> Self {
        Self {
            mode: DataMode::Cms,
            users: Arc::new(CmsStore::new(client.clone())),
            programmes: Arc::new(CmsStore::new(client.clone())),
            apprenants: Arc::new(CmsStore::new(client.clone())),
            rendez_vous: Arc::new(CmsStore::new(client.clone())),
            articles: Arc::new(CmsStore::new(client.clone())),
            formations: Arc::new(CmsStore::new(client.clone())),
            cms: Some(client),
        }
    }

    /// La connexion reste la propriété de l'appelant (fermeture à l'arrêt)
    pub fn database(db: Arc<DatabaseConnection>) -> Self {
        Self {
            mode: DataMode::Database,
            users: Arc::new(DbStore::new(db.clone())),
            programmes: Arc::new(DbStore::new(db.clone())),
            apprenants: Arc::new(DbStore::new(db.clone())),
            rendez_vous: Arc::new(DbStore::new(db.clone())),
            articles: Arc::new(DbStore::new(db.clone())),
            formations: Arc::new(DbStore::new(db)),
            cms: None,
        }
    }

    pub fn mode(&self) -> DataMode {
        self.mode
    }

    /// Client CMS, présent uniquement en mode CMS
    pub fn cms_client(&self) -> Result<&CmsClient, AppError> {
        self.cms
            .as_ref()
            .ok_or_else(|| AppError::Config(format!("CMS indisponible en mode {:?}", self.mode)))
    }

    pub fn media(&self) -> Result<MediaLibrary, AppError> {
        Ok(MediaLibrary::new(self.cms_client()?.clone()))
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<User, AppError> {
        let client = self.cms_client()?;
        let user = cms::users::login(client, email, password).await?;
        info!(user = %user.id, "CMS session opened");
        Ok(user)
    }

    // ------------------------------------------------------------------------
    // Utilisateurs
    // ------------------------------------------------------------------------

    pub async fn search_users(&self, term: &str) -> Result<Vec<User>, AppError> {
        self.users
            .list(&UserFilter { search: Some(term.to_string()), ..Default::default() })
            .await
    }

    pub async fn users_by_role(&self, role: Role) -> Result<Vec<User>, AppError> {
        self.users
            .list(&UserFilter { role: Some(role), ..Default::default() })
            .await
    }

    /// active ↔ inactive; un compte `pending` devient actif
    pub async fn toggle_user_status(&self, id: &str) -> Result<User, AppError> {
        let user = self
            .users
            .get(id)
            .await?
            .ok_or_else(|| AppError::not_found(User::COLLECTION, id))?;
        let statut = user.statut.toggled();
        debug!(user = %id, from = %user.statut, to = %statut, "toggle user status");
        self.users
            .update(id, UserPatch { statut: Some(statut), ..Default::default() })
            .await
    }

    // ------------------------------------------------------------------------
    // Programmes
    // ------------------------------------------------------------------------

    pub async fn programmes_by_status(&self, statut: ProgrammeStatus) -> Result<Vec<Programme>, AppError> {
        self.programmes
            .list(&ProgrammeFilter { statut: Some(statut), ..Default::default() })
            .await
    }

    pub async fn search_programmes(&self, term: &str) -> Result<Vec<Programme>, AppError> {
        self.programmes
            .list(&ProgrammeFilter { search: Some(term.to_string()), ..Default::default() })
            .await
    }

    // ------------------------------------------------------------------------
    // Apprenants, rendez-vous, articles
    // ------------------------------------------------------------------------

    pub async fn apprenants_by_programme(&self, programme_id: &str) -> Result<Vec<Apprenant>, AppError> {
        self.apprenants
            .list(&ApprenantFilter { programme: Some(programme_id.to_string()), ..Default::default() })
            .await
    }

    pub async fn rendez_vous_by_status(&self, statut: RendezVousStatus) -> Result<Vec<RendezVous>, AppError> {
        self.rendez_vous
            .list(&RendezVousFilter { statut: Some(statut), ..Default::default() })
            .await
    }

    pub async fn article_by_slug(&self, slug: &str) -> Result<Option<Article>, AppError> {
        self.articles
            .find_one(&ArticleFilter { slug: Some(slug.to_string()), ..Default::default() })
            .await
    }

    /// Relit le compteur puis l'incrémente (dernier écrivain gagnant)
    pub async fn record_article_view(&self, id: &str) -> Result<Article, AppError> {
        let article = self
            .articles
            .get(id)
            .await?
            .ok_or_else(|| AppError::not_found(Article::COLLECTION, id))?;
        self.articles
            .update(id, ArticlePatch { vues: Some(article.vues + 1), ..Default::default() })
            .await
    }
}

/// Entité servie par la façade: donne accès à son magasin
pub trait Stored: Resource {
    fn store(data: &DataService) -> &Arc<dyn Store<Self>>;
}

macro_rules! stored {
    ($entity:ty, $field:ident) => {
        impl Stored for $entity {
            fn store(data: &DataService) -> &Arc<dyn Store<Self>> {
                &data.$field
            }
        }
    };
}

stored!(User, users);
stored!(Programme, programmes);
stored!(Apprenant, apprenants);
stored!(RendezVous, rendez_vous);
stored!(Article, articles);
stored!(FormationPersonnalisee, formations);
