use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use sea_orm::DbErr;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use thiserror::Error;

/// Message de validation attaché à un champ précis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

/// Erreur normalisée d'une réponse non-2xx du CMS
#[derive(Debug, Clone, PartialEq, Error, Serialize)]
#[error("{message} (HTTP {status})")]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    pub message: String,
    pub status: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field_errors: Option<Vec<FieldError>>,
}

impl ApiError {
    pub fn new(status: u16, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status,
            field_errors: None,
        }
    }

    /// Lit un corps d'erreur du CMS. Formats acceptés:
    ///   {"errors":[{"message":..., "data":{"errors":[{"field"|"path":..., "message":...}]}}]}
    ///   {"message": ...} ou {"error": ...}
    pub fn from_body(status: u16, body: &str) -> Self {
        let fallback = || {
            let reason = StatusCode::from_u16(status)
                .ok()
                .and_then(|s| s.canonical_reason())
                .unwrap_or("Request failed");
            format!("HTTP {}: {}", status, reason)
        };

        let Ok(value) = serde_json::from_str::<Value>(body) else {
            let trimmed = body.trim();
            let message = if trimmed.is_empty() { fallback() } else { trimmed.to_string() };
            return Self::new(status, message);
        };

        let mut messages = Vec::new();
        let mut field_errors = Vec::new();

        if let Some(errors) = value.get("errors").and_then(Value::as_array) {
            for err in errors {
                if let Some(msg) = err.get("message").and_then(Value::as_str) {
                    messages.push(msg.to_string());
                }
                let nested = err
                    .get("data")
                    .and_then(|d| d.get("errors"))
                    .and_then(Value::as_array)
                    .or_else(|| err.get("errors").and_then(Value::as_array));
                for field_err in nested.into_iter().flatten() {
                    let field = field_err
                        .get("field")
                        .or_else(|| field_err.get("path"))
                        .and_then(Value::as_str);
                    let message = field_err.get("message").and_then(Value::as_str);
                    if let (Some(field), Some(message)) = (field, message) {
                        field_errors.push(FieldError {
                            field: field.to_string(),
                            message: message.to_string(),
                        });
                    }
                }
            }
        }

        if messages.is_empty() {
            if let Some(msg) = value
                .get("message")
                .or_else(|| value.get("error"))
                .and_then(Value::as_str)
            {
                messages.push(msg.to_string());
            }
        }

        Self {
            message: if messages.is_empty() { fallback() } else { messages.join("; ") },
            status,
            field_errors: if field_errors.is_empty() { None } else { Some(field_errors) },
        }
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Validation failed: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Database error: {0}")]
    Database(#[from] DbErr),

    #[error("{collection} not found: {id}")]
    NotFound { collection: &'static str, id: String },

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("Invalid JSON payload: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl AppError {
    pub fn not_found(collection: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            collection,
            id: id.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        match self {
            Self::NotFound { .. } => true,
            Self::Api(e) => e.status == 404,
            _ => false,
        }
    }

    /// Erreurs par champ, qu'elles viennent du validateur local ou du CMS
    pub fn field_errors(&self) -> Vec<FieldError> {
        match self {
            Self::Api(e) => e.field_errors.clone().unwrap_or_default(),
            Self::Validation(errors) => {
                let mut out: Vec<FieldError> = errors
                    .field_errors()
                    .into_iter()
                    .flat_map(|(field, errs)| {
                        let field = field.to_string();
                        errs.iter().map(move |e| FieldError {
                            field: field.clone(),
                            message: e
                                .message
                                .as_ref()
                                .map(|m| m.to_string())
                                .unwrap_or_else(|| e.code.to_string()),
                        })
                    })
                    .collect();
                out.sort_by(|a, b| a.field.cmp(&b.field));
                out
            }
            _ => Vec::new(),
        }
    }

    pub fn body(&self) -> Value {
        let field_errors = self.field_errors();
        if field_errors.is_empty() {
            json!({ "error": self.to_string() })
        } else {
            json!({ "error": self.to_string(), "fieldErrors": field_errors })
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::Api(e) => StatusCode::from_u16(e.status).unwrap_or(StatusCode::BAD_GATEWAY),
            Self::Network(_) => StatusCode::BAD_GATEWAY,
            Self::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::Decode(_) => StatusCode::BAD_REQUEST,
            Self::Config(_) => StatusCode::NOT_IMPLEMENTED,
            Self::Database(_) | Self::InvalidData(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(self.body())
    }
}
