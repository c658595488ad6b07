use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "rendez_vous")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    // Contact client, à plat
    pub client_prenom: String,
    pub client_nom: String,
    pub client_email: String,
    pub client_telephone: Option<String>,
    pub client_entreprise: Option<String>,

    pub programme_id: Option<String>,
    pub type_rdv: String,
    pub statut: String,
    pub date: Date,
    pub heure: Time,
    pub duree_minutes: i32,

    // presentiel | visio | telephone
    pub lieu_mode: String,
    pub lieu_adresse: Option<String>,
    pub lieu_lien: Option<String>,

    pub notes: Option<String>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
