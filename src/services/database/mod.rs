//! Magasin PostgreSQL (sea-orm), une table par collection.
//!
//! Les filtres simples (statut, rôle, slug...) partent en conditions SQL.
//! La recherche plein texte et l'appartenance aux listes JSON sont
//! appliquées ensuite avec le même filtre que les autres modes, pour des
//! résultats identiques (insensibles aux accents et à la casse).

mod mappers;

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelBehavior, ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel, QueryFilter,
    Select,
};
use tracing::{debug, error};
use uuid::Uuid;

use crate::domain::Resource;
use crate::error::AppError;
use crate::services::store::Store;

pub type Row<E> = <<E as DbResource>::Entity as EntityTrait>::Model;
pub type Column<E> = <<E as DbResource>::Entity as EntityTrait>::Column;

/// Correspondance entre une entité du domaine et sa table
pub trait DbResource: Resource {
    type Entity: EntityTrait;
    type Active: ActiveModelTrait<Entity = Self::Entity> + ActiveModelBehavior + Send + 'static;

    fn id_column() -> Column<Self>;

    fn from_row(row: Row<Self>) -> Result<Self, AppError>;

    fn to_active(&self) -> Result<Self::Active, AppError>;

    /// Conditions SQL du filtre; le reste est filtré après lecture
    fn apply_filter(query: Select<Self::Entity>, _filter: &Self::Filter) -> Select<Self::Entity> {
        query
    }
}

/// Les magasins partagent la même connexion, propriété du point d'entrée
pub struct DbStore<E: DbResource> {
    db: Arc<DatabaseConnection>,
    _entity: std::marker::PhantomData<fn() -> E>,
}

impl<E: DbResource> DbStore<E> {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self {
            db,
            _entity: std::marker::PhantomData,
        }
    }

    fn log_failure(operation: &str, err: &AppError) {
        error!(collection = E::COLLECTION, "Database error during {}: {}", operation, err);
    }
}

#[async_trait]
impl<E: DbResource> Store<E> for DbStore<E>
where
    Row<E>: IntoActiveModel<E::Active>,
{
    async fn list(&self, filter: &E::Filter) -> Result<Vec<E>, AppError> {
        let query = E::apply_filter(E::Entity::find(), filter);
        let rows = query
            .all(self.db.as_ref())
            .await
            .map_err(AppError::from)
            .inspect_err(|e| Self::log_failure("list", e))?;

        let mut found = Vec::with_capacity(rows.len());
        for row in rows {
            let item = E::from_row(row)?;
            if item.matches(filter) {
                found.push(item);
            }
        }
        debug!(collection = E::COLLECTION, count = found.len(), "db list");
        Ok(found)
    }

    async fn get(&self, id: &str) -> Result<Option<E>, AppError> {
        let row = E::Entity::find()
            .filter(E::id_column().eq(id))
            .one(self.db.as_ref())
            .await
            .map_err(AppError::from)
            .inspect_err(|e| Self::log_failure("get", e))?;
        row.map(E::from_row).transpose()
    }

    async fn create(&self, draft: E::Draft) -> Result<E, AppError> {
        let entity = E::from_draft(Uuid::new_v4().to_string(), draft, Utc::now());
        E::Entity::insert(entity.to_active()?)
            .exec_without_returning(self.db.as_ref())
            .await
            .map_err(AppError::from)
            .inspect_err(|e| Self::log_failure("create", e))?;
        debug!(collection = E::COLLECTION, id = entity.id(), "db create");
        Ok(entity)
    }

    async fn update(&self, id: &str, patch: E::Patch) -> Result<E, AppError> {
        let mut current = self
            .get(id)
            .await?
            .ok_or_else(|| AppError::not_found(E::COLLECTION, id))?;
        current.apply_patch(patch, Utc::now());

        let result = E::Entity::update_many()
            .set(current.to_active()?)
            .filter(E::id_column().eq(id))
            .exec(self.db.as_ref())
            .await
            .map_err(AppError::from)
            .inspect_err(|e| Self::log_failure("update", e))?;
        // Supprimé entre la lecture et l'écriture
        if result.rows_affected == 0 {
            return Err(AppError::not_found(E::COLLECTION, id));
        }
        Ok(current)
    }

    async fn delete(&self, id: &str) -> Result<(), AppError> {
        let result = E::Entity::delete_many()
            .filter(E::id_column().eq(id))
            .exec(self.db.as_ref())
            .await
            .map_err(AppError::from)
            .inspect_err(|e| Self::log_failure("delete", e))?;
        if result.rows_affected == 0 {
            return Err(AppError::not_found(E::COLLECTION, id));
        }
        Ok(())
    }
}
