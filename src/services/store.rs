use async_trait::async_trait;

use crate::domain::Resource;
use crate::error::AppError;

// trait = Interface commune aux trois stratégies de persistance
// (mock en mémoire, CMS, base de données)
#[async_trait]
pub trait Store<E: Resource>: Send + Sync {
    /// Tous les éléments correspondant au filtre
    async fn list(&self, filter: &E::Filter) -> Result<Vec<E>, AppError>;

    /// `None` si l'identifiant n'existe pas
    async fn get(&self, id: &str) -> Result<Option<E>, AppError>;

    async fn create(&self, draft: E::Draft) -> Result<E, AppError>;

    /// `AppError::NotFound` si l'identifiant n'existe pas
    async fn update(&self, id: &str, patch: E::Patch) -> Result<E, AppError>;

    async fn delete(&self, id: &str) -> Result<(), AppError>;

    /// Premier élément correspondant au filtre
    async fn find_one(&self, filter: &E::Filter) -> Result<Option<E>, AppError> {
        Ok(self.list(filter).await?.into_iter().next())
    }
}
