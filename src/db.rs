// connexion BD (mode "database" uniquement)

use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};
use tracing::info;

use crate::config::DatabaseConfig;

/// Ouvre l'unique pool de connexions du processus. Appelé une fois au
/// démarrage; les magasins en reçoivent un clone.
pub async fn establish_connection(config: &DatabaseConfig) -> Result<DatabaseConnection, DbErr> {
    let url = config
        .url
        .as_deref()
        .ok_or_else(|| DbErr::Custom("DATABASE_URL must be set for the database data source".to_string()))?;

    let mut options = ConnectOptions::new(url);
    options.sqlx_logging(false);

    let conn = Database::connect(options).await?;
    info!("Database connection established");
    Ok(conn)
}

pub async fn close(conn: DatabaseConnection) -> Result<(), DbErr> {
    conn.close().await?;
    info!("Database connection closed");
    Ok(())
}
