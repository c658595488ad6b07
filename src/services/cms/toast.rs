use serde_json::Value;

use super::client::{CmsClient, UploadFile};
use crate::error::AppError;
use crate::services::notifier::{Notifier, ToastMessages, with_toast};

/// Verbes du client avec notification chargement → succès / erreur.
/// L'erreur est toujours rendue à l'appelant.
pub struct ToastClient<'a> {
    client: &'a CmsClient,
    notifier: &'a dyn Notifier,
}

impl<'a> ToastClient<'a> {
    pub fn new(client: &'a CmsClient, notifier: &'a dyn Notifier) -> Self {
        Self { client, notifier }
    }

    pub async fn get(&self, endpoint: &str, messages: &ToastMessages) -> Result<Value, AppError> {
        with_toast(self.notifier, messages, self.client.get(endpoint)).await
    }

    pub async fn post(&self, endpoint: &str, payload: &Value, messages: &ToastMessages) -> Result<Value, AppError> {
        with_toast(self.notifier, messages, self.client.post(endpoint, payload)).await
    }

    pub async fn put(&self, endpoint: &str, payload: &Value, messages: &ToastMessages) -> Result<Value, AppError> {
        with_toast(self.notifier, messages, self.client.put(endpoint, payload)).await
    }

    pub async fn patch(&self, endpoint: &str, payload: &Value, messages: &ToastMessages) -> Result<Value, AppError> {
        with_toast(self.notifier, messages, self.client.patch(endpoint, payload)).await
    }

    pub async fn delete(&self, endpoint: &str, messages: &ToastMessages) -> Result<Value, AppError> {
        with_toast(self.notifier, messages, self.client.delete(endpoint)).await
    }

    pub async fn upload(
        &self,
        endpoint: &str,
        file: UploadFile,
        fields: Option<&Value>,
        messages: &ToastMessages,
    ) -> Result<Value, AppError> {
        with_toast(self.notifier, messages, self.client.upload(endpoint, file, fields)).await
    }
}
