use std::sync::Arc;

use actix_web::{App, HttpServer, web};
use tracing::{error, info, warn};

use backoffice::config::{AppConfig, DataMode};
use backoffice::services::cms::CmsClient;
use backoffice::services::data_service::DataService;
use backoffice::{db, logging, routes};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv::dotenv().ok();
    logging::init();

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Invalid configuration: {}", e);
            return Err(std::io::Error::other(e.to_string()));
        }
    };

    // La connexion BD appartient au point d'entrée: créée ici, fermée ici
    let mut connection = None;
    let data = match config.data_mode {
        DataMode::Mock => {
            info!("Using in-memory mock data");
            DataService::mock()
        }
        DataMode::Cms => {
            info!(url = %config.cms.base_url, "Using CMS backend");
            let client = CmsClient::from_config(&config.cms).map_err(std::io::Error::other)?;
            DataService::cms(client)
        }
        DataMode::Database => {
            info!("Connecting to database...");
            let conn = db::establish_connection(&config.database)
                .await
                .map_err(std::io::Error::other)?;
            let conn = Arc::new(conn);
            connection = Some(conn.clone());
            DataService::database(conn)
        }
    };

    info!(addr = %config.bind_addr, mode = ?config.data_mode, "Starting server");

    let data = web::Data::new(data);
    let result = HttpServer::new(move || {
        App::new()
            .app_data(data.clone())
            .configure(routes::configure_routes)
    })
        .bind(config.bind_addr.as_str())?
        .run()
        .await;

    if let Some(conn) = connection {
        match Arc::try_unwrap(conn) {
            Ok(conn) => {
                if let Err(e) = db::close(conn).await {
                    error!("Failed to close database connection: {}", e);
                }
            }
            Err(_) => warn!("Database connection still shared at shutdown, pool released on drop"),
        }
    }

    result
}
