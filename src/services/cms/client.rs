use std::sync::Arc;

use reqwest::{Method, RequestBuilder, Response, multipart};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info};

use super::token::{FileTokenStore, MemoryTokenStore, TokenStore, is_expired};
use crate::config::CmsConfig;
use crate::error::{ApiError, AppError};

/// Fichier à téléverser via `upload`
#[derive(Debug, Clone)]
pub struct UploadFile {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    #[serde(default)]
    pub exp: Option<i64>,
    /// Document utilisateur brut, converti par `cms::users`
    #[serde(default)]
    pub user: Value,
}

/// Client REST du CMS.
///
/// Une seule tentative par appel. Toute réponse non-2xx devient une
/// `ApiError` (statut + messages par champ), les pannes réseau un
/// `AppError::Network`. Le jeton est relu à chaque appel depuis le
/// `TokenStore` et envoyé en `Authorization: Bearer`; les cookies de
/// session sont conservés par le client HTTP.
#[derive(Clone)]
pub struct CmsClient {
    http: reqwest::Client,
    base_url: String,
    tokens: Arc<dyn TokenStore>,
}

impl CmsClient {
    pub fn new(base_url: impl Into<String>, tokens: Arc<dyn TokenStore>) -> Result<Self, AppError> {
        let http = reqwest::Client::builder().cookie_store(true).build()?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            tokens,
        })
    }

    pub fn from_config(config: &CmsConfig) -> Result<Self, AppError> {
        let tokens: Arc<dyn TokenStore> = match &config.token_file {
            Some(path) => Arc::new(FileTokenStore::new(path)),
            None => Arc::new(MemoryTokenStore::new()),
        };
        Self::new(&config.base_url, tokens)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `programmes/12` → `{base}/api/programmes/12`
    pub fn url(&self, endpoint: &str) -> String {
        if endpoint.starts_with("http://") || endpoint.starts_with("https://") {
            return endpoint.to_string();
        }
        let path = endpoint.trim_start_matches('/');
        let path = path.strip_prefix("api/").unwrap_or(path);
        format!("{}/api/{}", self.base_url, path)
    }

    /// Jeton utilisable; un jeton expiré est effacé au lieu d'être rejoué
    pub fn token(&self) -> Option<String> {
        let token = self.tokens.load()?;
        if is_expired(&token) {
            debug!("Stored CMS token expired, clearing it");
            self.tokens.save(None);
            return None;
        }
        Some(token)
    }

    pub fn set_token(&self, token: &str) {
        self.tokens.save(Some(token));
    }

    pub fn clear_token(&self) {
        self.tokens.save(None);
    }

    fn request(&self, method: Method, endpoint: &str) -> RequestBuilder {
        let url = self.url(endpoint);
        debug!(%method, %url, "CMS request");
        let builder = self.http.request(method, url);
        match self.token() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn read(response: Response) -> Result<Value, AppError> {
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let err = ApiError::from_body(status.as_u16(), &body);
            debug!(status = err.status, "CMS error: {}", err.message);
            return Err(err.into());
        }

        if body.trim().is_empty() {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_str(&body)?)
    }

    async fn send(&self, builder: RequestBuilder) -> Result<Value, AppError> {
        let response = builder.send().await?;
        Self::read(response).await
    }

    pub async fn get(&self, endpoint: &str) -> Result<Value, AppError> {
        self.send(self.request(Method::GET, endpoint)).await
    }

    pub async fn get_with_query(&self, endpoint: &str, query: &[(String, String)]) -> Result<Value, AppError> {
        self.send(self.request(Method::GET, endpoint).query(query)).await
    }

    pub async fn post(&self, endpoint: &str, payload: &Value) -> Result<Value, AppError> {
        self.send(self.request(Method::POST, endpoint).json(payload)).await
    }

    pub async fn put(&self, endpoint: &str, payload: &Value) -> Result<Value, AppError> {
        self.send(self.request(Method::PUT, endpoint).json(payload)).await
    }

    pub async fn patch(&self, endpoint: &str, payload: &Value) -> Result<Value, AppError> {
        self.send(self.request(Method::PATCH, endpoint).json(payload)).await
    }

    pub async fn delete(&self, endpoint: &str) -> Result<Value, AppError> {
        self.send(self.request(Method::DELETE, endpoint)).await
    }

    /// Envoi multipart: le fichier dans `file`, les autres champs en JSON dans `_payload`
    pub async fn upload(&self, endpoint: &str, file: UploadFile, fields: Option<&Value>) -> Result<Value, AppError> {
        let part = multipart::Part::bytes(file.bytes)
            .file_name(file.file_name)
            .mime_str(&file.mime_type)?;
        let mut form = multipart::Form::new().part("file", part);
        if let Some(fields) = fields {
            form = form.text("_payload", serde_json::to_string(fields)?);
        }
        self.send(self.request(Method::POST, endpoint).multipart(form)).await
    }

    /// Ouvre une session et conserve le jeton retourné
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginResponse, AppError> {
        let body = self
            .post("users/login", &serde_json::json!({ "email": email, "password": password }))
            .await?;
        let response: LoginResponse = serde_json::from_value(body)?;
        self.set_token(&response.token);
        info!(email, "CMS session opened");
        Ok(response)
    }

    /// Le jeton local est effacé même si le CMS refuse la déconnexion
    pub async fn logout(&self) -> Result<(), AppError> {
        let result = self.post("users/logout", &Value::Null).await;
        self.clear_token();
        result.map(|_| ())
    }
}
