use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A study file stored in object storage; only its name and public URL live here.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct FileRecord {
    pub id: String,
    pub folder_id: String,
    pub file_name: String,
    pub file_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl FileRecord {
    pub fn new(folder_id: &str, file_name: &str, file_url: &str) -> Self {
        FileRecord {
            id: Uuid::new_v4().to_string(),
            folder_id: folder_id.to_string(),
            file_name: file_name.trim().to_string(),
            file_url: file_url.trim().to_string(),
            created_at: Some(Utc::now()),
        }
    }
}
