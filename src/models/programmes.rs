use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "programmes")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub code: String,
    pub titre: String,
    pub description: String,
    pub duree_heures: i32,
    pub niveau: String,
    pub modalite: String,
    pub prix: Decimal,
    pub statut: String,
    /// Tableau JSON d'identifiants
    #[sea_orm(column_type = "JsonBinary")]
    pub competences: Json,
    #[sea_orm(column_type = "JsonBinary")]
    pub formateurs: Json,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
