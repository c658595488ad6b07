//! Notifications visibles par l'utilisateur ("toasts").
//!
//! `with_toast` lie l'état chargement → succès/erreur au résultat d'un appel.
//! Purement présentationnel: l'erreur est rendue telle quelle à l'appelant.

use std::future::Future;

use parking_lot::Mutex;
use serde::Serialize;
use tracing::{error, info, warn};

use crate::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ToastLevel {
    Loading,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Toast {
    pub level: ToastLevel,
    pub message: String,
}

impl Toast {
    pub fn new(level: ToastLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
        }
    }
}

pub trait Notifier: Send + Sync {
    fn notify(&self, toast: Toast);

    fn success(&self, message: &str) {
        self.notify(Toast::new(ToastLevel::Success, message));
    }

    fn warning(&self, message: &str) {
        self.notify(Toast::new(ToastLevel::Warning, message));
    }

    fn error(&self, message: &str) {
        self.notify(Toast::new(ToastLevel::Error, message));
    }
}

/// Envoie les notifications dans les logs
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, toast: Toast) {
        match toast.level {
            ToastLevel::Loading | ToastLevel::Success => info!(level = ?toast.level, "{}", toast.message),
            ToastLevel::Warning => warn!("{}", toast.message),
            ToastLevel::Error => error!("{}", toast.message),
        }
    }
}

/// Conserve les notifications d'une requête pour les renvoyer au client
#[derive(Debug, Default)]
pub struct ToastRecorder {
    toasts: Mutex<Vec<Toast>>,
}

impl ToastRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn toasts(&self) -> Vec<Toast> {
        self.toasts.lock().clone()
    }

    /// Sans les toasts "loading", déjà remplacés côté interface
    pub fn settled(&self) -> Vec<Toast> {
        self.toasts
            .lock()
            .iter()
            .filter(|t| t.level != ToastLevel::Loading)
            .cloned()
            .collect()
    }
}

impl Notifier for ToastRecorder {
    fn notify(&self, toast: Toast) {
        self.toasts.lock().push(toast);
    }
}

#[derive(Debug, Clone)]
pub struct ToastMessages {
    pub loading: String,
    pub success: String,
    /// Préfixe du message d'erreur; le détail de l'erreur est ajouté
    pub error: Option<String>,
}

impl ToastMessages {
    pub fn new(loading: impl Into<String>, success: impl Into<String>) -> Self {
        Self {
            loading: loading.into(),
            success: success.into(),
            error: None,
        }
    }

    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self
    }
}

/// Texte affiché pour une erreur, avec les messages par champ
pub fn format_error(prefix: Option<&str>, err: &AppError) -> String {
    let detail = match err {
        AppError::Api(api) => api.message.clone(),
        AppError::Network(_) => "Erreur réseau, veuillez réessayer".to_string(),
        other => other.to_string(),
    };
    let mut message = match prefix {
        Some(prefix) => format!("{} : {}", prefix, detail),
        None => detail,
    };
    let fields = err.field_errors();
    if !fields.is_empty() {
        let joined: Vec<String> = fields.iter().map(|f| format!("{} ({})", f.message, f.field)).collect();
        message.push_str(" - ");
        message.push_str(&joined.join(", "));
    }
    message
}

pub async fn with_toast<T, F>(notifier: &dyn Notifier, messages: &ToastMessages, fut: F) -> Result<T, AppError>
where
    F: Future<Output = Result<T, AppError>>,
{
    notifier.notify(Toast::new(ToastLevel::Loading, messages.loading.clone()));
    match fut.await {
        Ok(value) => {
            notifier.notify(Toast::new(ToastLevel::Success, messages.success.clone()));
            Ok(value)
        }
        Err(err) => {
            notifier.notify(Toast::new(ToastLevel::Error, format_error(messages.error.as_deref(), &err)));
            Err(err)
        }
    }
}
