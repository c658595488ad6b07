use serde::{Deserialize, Serialize};

/// Fichier téléversé dans la médiathèque du CMS
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Media {
    pub id: String,
    pub filename: String,
    pub alt: Option<String>,
    pub mime_type: String,
    pub filesize: u64,
    pub url: Option<String>,
}
