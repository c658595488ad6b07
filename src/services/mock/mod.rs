//! Magasin en mémoire alimenté par des fixtures.
//!
//! Les modifications vivent le temps du processus seulement.

pub mod fixtures;

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::RwLock;
use tracing::debug;
use uuid::Uuid;

use crate::domain::Resource;
use crate::error::AppError;
use crate::services::store::Store;

pub struct MockStore<E: Resource> {
    items: RwLock<Vec<E>>,
}

impl<E: Resource> MockStore<E> {
    pub fn new(items: Vec<E>) -> Self {
        Self {
            items: RwLock::new(items),
        }
    }
}

#[async_trait]
impl<E: Resource> Store<E> for MockStore<E> {
    async fn list(&self, filter: &E::Filter) -> Result<Vec<E>, AppError> {
        let items = self.items.read();
        let found: Vec<E> = items.iter().filter(|item| item.matches(filter)).cloned().collect();
        debug!(collection = E::COLLECTION, count = found.len(), "mock list");
        Ok(found)
    }

    async fn get(&self, id: &str) -> Result<Option<E>, AppError> {
        Ok(self.items.read().iter().find(|item| item.id() == id).cloned())
    }

    async fn create(&self, draft: E::Draft) -> Result<E, AppError> {
        let entity = E::from_draft(Uuid::new_v4().to_string(), draft, Utc::now());
        self.items.write().push(entity.clone());
        debug!(collection = E::COLLECTION, id = entity.id(), "mock create");
        Ok(entity)
    }

    async fn update(&self, id: &str, patch: E::Patch) -> Result<E, AppError> {
        let mut items = self.items.write();
        let item = items
            .iter_mut()
            .find(|item| item.id() == id)
            .ok_or_else(|| AppError::not_found(E::COLLECTION, id))?;
        item.apply_patch(patch, Utc::now());
        Ok(item.clone())
    }

    async fn delete(&self, id: &str) -> Result<(), AppError> {
        let mut items = self.items.write();
        let before = items.len();
        items.retain(|item| item.id() != id);
        if items.len() == before {
            return Err(AppError::not_found(E::COLLECTION, id));
        }
        Ok(())
    }
}
