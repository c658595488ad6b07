//! Conservation du jeton d'authentification du CMS entre deux appels
//! (et entre deux démarrages avec `FileTokenStore`).

use std::collections::HashSet;
use std::fs;
use std::path::PathBuf;

use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use parking_lot::RwLock;
use serde::Deserialize;
use tracing::warn;

pub trait TokenStore: Send + Sync {
    fn load(&self) -> Option<String>;
    /// `None` efface le jeton
    fn save(&self, token: Option<&str>);
}

#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    token: RwLock<Option<String>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> Option<String> {
        self.token.read().clone()
    }

    fn save(&self, token: Option<&str>) {
        *self.token.write() = token.map(str::to_string);
    }
}

/// Jeton persisté dans un fichier texte
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> Option<String> {
        let raw = fs::read_to_string(&self.path).ok()?;
        let token = raw.trim();
        if token.is_empty() { None } else { Some(token.to_string()) }
    }

    fn save(&self, token: Option<&str>) {
        let result = match token {
            Some(token) => fs::write(&self.path, token),
            None if self.path.exists() => fs::remove_file(&self.path),
            None => Ok(()),
        };
        if let Err(e) = result {
            warn!(path = %self.path.display(), "Failed to persist CMS token: {}", e);
        }
    }
}

#[derive(Debug, Deserialize)]
struct ExpiryClaims {
    #[allow(dead_code)]
    exp: Option<i64>,
}

/// Vrai si le jeton est illisible ou si son `exp` est dépassé.
/// La signature n'est pas vérifiée: seul le CMS connaît la clé.
pub fn is_expired(token: &str) -> bool {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.insecure_disable_signature_validation();
    validation.required_spec_claims = HashSet::new();
    validation.validate_aud = false;
    validation.leeway = 0;

    decode::<ExpiryClaims>(token, &DecodingKey::from_secret(&[]), &validation).is_err()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use jsonwebtoken::{EncodingKey, Header, encode};
    use serde::Serialize;

    #[derive(Serialize)]
    struct Claims {
        id: String,
        exp: i64,
    }

    fn token_expiring_in(delta: Duration) -> String {
        let claims = Claims {
            id: "user-1".to_string(),
            exp: (Utc::now() + delta).timestamp(),
        };
        encode(&Header::default(), &claims, &EncodingKey::from_secret(b"cms-secret")).unwrap()
    }

    #[test]
    fn test_expiry_detection() {
        assert!(!is_expired(&token_expiring_in(Duration::hours(2))));
        assert!(is_expired(&token_expiring_in(Duration::hours(-2))));
        assert!(is_expired("pas.un.jwt"));
    }

    #[test]
    fn test_memory_store() {
        let store = MemoryTokenStore::new();
        assert_eq!(store.load(), None);
        store.save(Some("abc"));
        assert_eq!(store.load().as_deref(), Some("abc"));
        store.save(None);
        assert_eq!(store.load(), None);
    }

    #[test]
    fn test_file_store_persists_across_instances() {
        let path = std::env::temp_dir().join(format!("cms-token-{}", uuid::Uuid::new_v4()));
        FileTokenStore::new(&path).save(Some("persisted-token\n"));

        assert_eq!(FileTokenStore::new(&path).load().as_deref(), Some("persisted-token"));

        FileTokenStore::new(&path).save(None);
        assert!(!path.exists());
    }
}
