use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

static NON_SLUG_CHARS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[^a-z0-9]+").expect("NON_SLUG_CHARS is a valid regex pattern")
});

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct PracticeTopic {
    pub id: String,
    pub subject_folder_id: String,
    pub name: String,
    pub slug: String,
    pub order_index: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl PracticeTopic {
    pub fn new(subject_folder_id: &str, name: &str, order_index: i32) -> Self {
        let name = name.trim();
        PracticeTopic {
            id: Uuid::new_v4().to_string(),
            subject_folder_id: subject_folder_id.to_string(),
            name: name.to_string(),
            slug: slugify(name),
            order_index,
            created_at: Some(Utc::now()),
        }
    }

    pub fn rename(&mut self, name: &str) {
        self.name = name.trim().to_string();
        self.slug = slugify(&self.name);
    }
}

/// Lowercases and joins alphanumeric runs with single hyphens.
pub fn slugify(name: &str) -> String {
    let lower = name.to_lowercase();
    NON_SLUG_CHARS
        .replace_all(&lower, "-")
        .trim_matches('-')
        .to_string()
}
