use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Folder {
    pub id: String,
    pub name: String,
    pub parent_id: Option<String>, // None for root folders
    pub thumbnail: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modified_at: Option<DateTime<Utc>>,
}

impl Folder {
    pub fn new(name: &str, parent_id: Option<&str>, thumbnail: Option<&str>) -> Self {
        Folder {
            id: Uuid::new_v4().to_string(),
            name: name.trim().to_string(),
            parent_id: parent_id.map(str::to_string),
            thumbnail: thumbnail.map(str::to_string),
            created_at: Some(Utc::now()),
            modified_at: Some(Utc::now()),
        }
    }

    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }
}
