use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum QuizMode {
    #[default]
    Exam,     // answers revealed only after finishing
    Practice, // answers revealed as each one is saved
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Quiz {
    pub id: String,
    pub title: String,
    pub subject_folder_id: Option<String>,
    pub topic_id: Option<String>,
    pub total_questions: i32,
    pub mode: QuizMode,
    pub duration_minutes: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modified_at: Option<DateTime<Utc>>,
}

/// Row of the join table ordering practice questions inside a quiz.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct QuizQuestionLink {
    pub quiz_id: String,
    pub practice_question_id: String,
    pub order_index: i32,
}

impl Quiz {
    pub fn new(
        title: &str,
        subject_folder_id: Option<String>,
        topic_id: Option<String>,
        mode: QuizMode,
        duration_minutes: Option<i32>,
        total_questions: i32,
    ) -> Self {
        Quiz {
            id: Uuid::new_v4().to_string(),
            title: title.trim().to_string(),
            subject_folder_id,
            topic_id,
            total_questions,
            mode,
            duration_minutes,
            created_at: Some(Utc::now()),
            modified_at: Some(Utc::now()),
        }
    }

    pub fn links_for(&self, question_ids: &[String]) -> Vec<QuizQuestionLink> {
        question_ids
            .iter()
            .enumerate()
            .map(|(index, question_id)| QuizQuestionLink {
                quiz_id: self.id.clone(),
                practice_question_id: question_id.clone(),
                order_index: index as i32,
            })
            .collect()
    }
}
