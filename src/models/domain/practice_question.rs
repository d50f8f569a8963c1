use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::domain::option_letter::OptionLetter;

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct PracticeQuestion {
    pub id: String,
    pub topic_id: String,
    pub question: String,
    pub option_a: String,
    pub option_b: String,
    pub option_c: String,
    pub option_d: String,
    pub correct_option: OptionLetter,
    pub explanation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modified_at: Option<DateTime<Utc>>,
}

/// Question text and options as they arrive from a form or a spreadsheet row.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuestionContent {
    pub question: String,
    pub options: [String; 4],
    pub correct_option: OptionLetter,
    pub explanation: Option<String>,
}

impl PracticeQuestion {
    pub fn new(topic_id: &str, content: QuestionContent) -> Self {
        let [option_a, option_b, option_c, option_d] = content.options;
        PracticeQuestion {
            id: Uuid::new_v4().to_string(),
            topic_id: topic_id.to_string(),
            question: content.question,
            option_a,
            option_b,
            option_c,
            option_d,
            correct_option: content.correct_option,
            explanation: content.explanation.filter(|e| !e.trim().is_empty()),
            created_at: Some(Utc::now()),
            modified_at: Some(Utc::now()),
        }
    }

    pub fn options(&self) -> [&str; 4] {
        [
            self.option_a.as_str(),
            self.option_b.as_str(),
            self.option_c.as_str(),
            self.option_d.as_str(),
        ]
    }

    pub fn option_text(&self, letter: OptionLetter) -> &str {
        self.options()[letter.index()]
    }
}
