// ============================================================================
// CONFIGURATION
// ============================================================================
//
// Variables lues une seule fois au démarrage (.env supporté via dotenv):
//   - CMS_API_URL    : URL de base du CMS (défaut http://localhost:3000)
//   - USE_MOCK_DATA  : "true"/"1" => données en mémoire, prioritaire
//   - DATA_SOURCE    : "cms" (défaut) ou "database"
//   - DATABASE_URL   : obligatoire si DATA_SOURCE=database
//   - CMS_TOKEN_FILE : fichier où persister le jeton du CMS (optionnel)
//   - BIND_ADDR      : adresse d'écoute (défaut 127.0.0.1:8080)
//
// ============================================================================

use std::path::PathBuf;

use crate::error::AppError;

pub const DEFAULT_CMS_URL: &str = "http://localhost:3000";
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8080";

/// Stratégie de persistance, choisie une fois pour tout le processus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataMode {
    Mock,
    Cms,
    Database,
}

#[derive(Debug, Clone)]
pub struct CmsConfig {
    pub base_url: String,
    pub token_file: Option<PathBuf>,
}

#[derive(Debug, Clone, Default)]
pub struct DatabaseConfig {
    pub url: Option<String>,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub data_mode: DataMode,
    pub cms: CmsConfig,
    pub database: DatabaseConfig,
    pub bind_addr: String,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Construit la configuration à partir d'une fonction de lecture quelconque
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let use_mock = non_empty("USE_MOCK_DATA")
            .map(|v| parse_bool(&v))
            .transpose()?
            .unwrap_or(false);

        let data_mode = if use_mock {
            DataMode::Mock
        } else {
            match non_empty("DATA_SOURCE").map(|v| v.to_ascii_lowercase()).as_deref() {
                None | Some("cms") => DataMode::Cms,
                Some("database") | Some("db") => DataMode::Database,
                Some(other) => {
                    return Err(AppError::Config(format!(
                        "DATA_SOURCE must be 'cms' or 'database', got '{}'",
                        other
                    )));
                }
            }
        };

        let database = DatabaseConfig {
            url: non_empty("DATABASE_URL"),
        };

        if data_mode == DataMode::Database && database.url.is_none() {
            return Err(AppError::Config(
                "DATABASE_URL must be set when DATA_SOURCE=database".to_string(),
            ));
        }

        let base_url = non_empty("CMS_API_URL")
            .unwrap_or_else(|| DEFAULT_CMS_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        Ok(Self {
            data_mode,
            cms: CmsConfig {
                base_url,
                token_file: non_empty("CMS_TOKEN_FILE").map(PathBuf::from),
            },
            database,
            bind_addr: non_empty("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string()),
        })
    }
}

fn parse_bool(value: &str) -> Result<bool, AppError> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(AppError::Config(format!("invalid boolean '{}'", other))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<AppConfig, AppError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults_to_cms() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.data_mode, DataMode::Cms);
        assert_eq!(config.cms.base_url, DEFAULT_CMS_URL);
        assert_eq!(config.bind_addr, DEFAULT_BIND_ADDR);
        assert!(config.cms.token_file.is_none());
    }

    #[test]
    fn test_mock_flag_wins_over_data_source() {
        let config = config_from(&[("USE_MOCK_DATA", "true"), ("DATA_SOURCE", "database")]).unwrap();
        assert_eq!(config.data_mode, DataMode::Mock);
    }

    #[test]
    fn test_database_requires_url() {
        assert!(config_from(&[("DATA_SOURCE", "database")]).is_err());

        let config = config_from(&[
            ("DATA_SOURCE", "database"),
            ("DATABASE_URL", "postgres://localhost/formations"),
        ])
            .unwrap();
        assert_eq!(config.data_mode, DataMode::Database);
        assert_eq!(config.database.url.as_deref(), Some("postgres://localhost/formations"));
    }

    #[test]
    fn test_trailing_slash_is_trimmed() {
        let config = config_from(&[("CMS_API_URL", "https://cms.example.org/")]).unwrap();
        assert_eq!(config.cms.base_url, "https://cms.example.org");
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        assert!(config_from(&[("USE_MOCK_DATA", "peut-etre")]).is_err());
        assert!(config_from(&[("DATA_SOURCE", "mongo")]).is_err());
    }
}
