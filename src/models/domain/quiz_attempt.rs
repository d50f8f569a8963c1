use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::domain::option_letter::OptionLetter;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AttemptStatus {
    InProgress,
    Completed,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct QuizAttempt {
    pub id: String,
    pub quiz_id: String,
    pub user_id: Option<String>, // None for guest attempts
    pub status: AttemptStatus,
    pub score: i32,
    pub total_questions: i32,
    pub correct_answers: i32,
    pub wrong_answers: i32,
    pub unanswered: i32,
    pub started_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finished_at: Option<DateTime<Utc>>,
}

/// How a single question ended up once an attempt is scored.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AnswerOutcome {
    Correct,
    Wrong,
    Unanswered,
}

/// One row per question per attempt, upserted as the user answers.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct QuizAttemptAnswer {
    pub attempt_id: String,
    pub question_id: String,
    pub selected_option: Option<OptionLetter>,
    pub is_marked: bool,
    pub updated_at: DateTime<Utc>,
}

impl QuizAttempt {
    pub fn start(quiz_id: &str, user_id: Option<&str>, total_questions: i32) -> Self {
        QuizAttempt {
            id: Uuid::new_v4().to_string(),
            quiz_id: quiz_id.to_string(),
            user_id: user_id.map(str::to_string),
            status: AttemptStatus::InProgress,
            score: 0,
            total_questions,
            correct_answers: 0,
            wrong_answers: 0,
            unanswered: total_questions,
            started_at: Utc::now(),
            finished_at: None,
        }
    }

    pub fn is_completed(&self) -> bool {
        self.status == AttemptStatus::Completed
    }

    pub fn is_guest(&self) -> bool {
        self.user_id.is_none()
    }
}

impl QuizAttemptAnswer {
    pub fn new(
        attempt_id: &str,
        question_id: &str,
        selected_option: Option<OptionLetter>,
        is_marked: bool,
    ) -> Self {
        QuizAttemptAnswer {
            attempt_id: attempt_id.to_string(),
            question_id: question_id.to_string(),
            selected_option,
            is_marked,
            updated_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn started_attempt_counts_everything_as_unanswered() {
        let attempt = QuizAttempt::start("quiz-1", None, 10);

        assert_eq!(attempt.status, AttemptStatus::InProgress);
        assert_eq!(attempt.unanswered, 10);
        assert_eq!(attempt.score, 0);
        assert!(attempt.is_guest());
        assert!(!attempt.is_completed());
        assert!(attempt.finished_at.is_none());
    }

    #[test]
    fn attempt_status_serializes_snake_case() {
        let json = serde_json::to_string(&AttemptStatus::InProgress).unwrap();
        assert_eq!(json, "\"in_progress\"");
    }

    #[test]
    fn answer_round_trip_keeps_cleared_selection() {
        let answer = QuizAttemptAnswer::new("attempt-1", "q-1", None, true);

        let json = serde_json::to_string(&answer).expect("answer should serialize");
        let parsed: QuizAttemptAnswer =
            serde_json::from_str(&json).expect("answer should deserialize");

        assert!(parsed.selected_option.is_none());
        assert!(parsed.is_marked);
    }
}
