use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::{error, info};

use super::client::{CmsClient, UploadFile};
use super::toast::ToastClient;
use super::wire_id;
use crate::domain::Media;
use crate::error::AppError;
use crate::services::notifier::{Notifier, ToastMessages};

const COLLECTION: &str = "media";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MediaWire {
    #[serde(deserialize_with = "wire_id")]
    pub id: String,
    pub filename: Option<String>,
    pub alt: Option<String>,
    pub mime_type: Option<String>,
    pub filesize: Option<u64>,
    pub url: Option<String>,
}

impl From<MediaWire> for Media {
    fn from(wire: MediaWire) -> Self {
        Self {
            id: wire.id,
            filename: wire.filename.unwrap_or_default(),
            alt: wire.alt.filter(|a| !a.trim().is_empty()),
            mime_type: wire.mime_type.unwrap_or_else(|| "application/octet-stream".to_string()),
            filesize: wire.filesize.unwrap_or_default(),
            url: wire.url,
        }
    }
}

fn decode(body: Value) -> Result<Media, AppError> {
    let doc = match body {
        Value::Object(mut map) => map.remove("doc").unwrap_or(Value::Object(map)),
        other => other,
    };
    let wire: MediaWire = serde_json::from_value(doc)?;
    Ok(wire.into())
}

/// Médiathèque du CMS. Le téléversement n'existe qu'en mode CMS.
#[derive(Clone)]
pub struct MediaLibrary {
    client: CmsClient,
}

impl MediaLibrary {
    pub fn new(client: CmsClient) -> Self {
        Self { client }
    }

    fn item_path(id: &str) -> String {
        format!("{}/{}", COLLECTION, id)
    }

    pub async fn upload(&self, file: UploadFile, alt: Option<&str>, notifier: &dyn Notifier) -> Result<Media, AppError> {
        let file_name = file.file_name.clone();
        let fields = alt.map(|alt| json!({ "alt": alt }));
        let messages = ToastMessages::new("Téléversement...", "Fichier téléversé").with_error("Échec du téléversement");
        let body = ToastClient::new(&self.client, notifier)
            .upload(COLLECTION, file, fields.as_ref(), &messages)
            .await
            .inspect_err(|e| error!(file_name = %file_name, "Error uploading media: {}", e))?;
        let media = decode(body)?;
        info!(id = %media.id, file_name = %file_name, "Media uploaded");
        Ok(media)
    }

    pub async fn get(&self, id: &str) -> Result<Option<Media>, AppError> {
        match self.client.get(&Self::item_path(id)).await {
            Ok(body) => decode(body).map(Some),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => {
                error!(id, "Error fetching media: {}", e);
                Err(e)
            }
        }
    }

    pub async fn delete(&self, id: &str, notifier: &dyn Notifier) -> Result<(), AppError> {
        let messages = ToastMessages::new("Suppression...", "Fichier supprimé").with_error("Échec de la suppression");
        match ToastClient::new(&self.client, notifier).delete(&Self::item_path(id), &messages).await {
            Ok(_) => Ok(()),
            Err(e) if e.is_not_found() => Err(AppError::not_found(COLLECTION, id)),
            Err(e) => {
                error!(id, "Error deleting media: {}", e);
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::cms::token::MemoryTokenStore;
    use crate::services::notifier::{ToastLevel, ToastRecorder};
    use httpmock::prelude::*;
    use std::sync::Arc;

    fn library(server: &MockServer) -> MediaLibrary {
        MediaLibrary::new(CmsClient::new(server.base_url(), Arc::new(MemoryTokenStore::new())).unwrap())
    }

    #[tokio::test]
    async fn test_upload_returns_media() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/api/media").body_includes("Plaquette SST");
            then.status(201).json_body(json!({
                "doc": {
                    "id": 31, "filename": "sst.pdf", "alt": "Plaquette SST",
                    "mimeType": "application/pdf", "filesize": 8, "url": "/media/sst.pdf"
                }
            }));
        });

        let file = UploadFile {
            file_name: "sst.pdf".to_string(),
            mime_type: "application/pdf".to_string(),
            bytes: b"%PDF-1.4".to_vec(),
        };
        let recorder = ToastRecorder::new();
        let media = library(&server).upload(file, Some("Plaquette SST"), &recorder).await.unwrap();

        assert_eq!(recorder.settled()[0].message, "Fichier téléversé");
        assert_eq!(media.id, "31");
        assert_eq!(media.mime_type, "application/pdf");
        assert_eq!(media.url.as_deref(), Some("/media/sst.pdf"));
    }

    #[tokio::test]
    async fn test_missing_media_is_none() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/api/media/404");
            then.status(404);
        });

        assert_eq!(library(&server).get("404").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_server_errors_are_rethrown() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/api/media/12");
            then.status(500).json_body(json!({ "message": "Something went wrong." }));
        });
        server.mock(|when, then| {
            when.method(DELETE).path("/api/media/12");
            then.status(500).json_body(json!({ "message": "Something went wrong." }));
        });

        let library = library(&server);
        assert!(matches!(library.get("12").await, Err(AppError::Api(ref e)) if e.status == 500));

        let recorder = ToastRecorder::new();
        assert!(library.delete("12", &recorder).await.is_err());
        assert_eq!(recorder.settled()[0].level, ToastLevel::Error);
    }

    #[tokio::test]
    async fn test_delete_missing_media_is_not_found() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(DELETE).path("/api/media/404");
            then.status(404);
        });

        let err = library(&server).delete("404", &ToastRecorder::new()).await.unwrap_err();
        assert!(err.is_not_found());
    }
}
