use serde::Serialize;

use crate::models::domain::{
    AnswerOutcome, OptionLetter, PracticeQuestion, Quiz, QuizAttempt, QuizAttemptAnswer,
};

#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub data: T,
    pub message: String,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn new(data: T, message: impl Into<String>) -> Self {
        Self {
            data,
            message: message.into(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct PaginatedResponse<T: Serialize> {
    pub items: Vec<T>,
    pub total: i64,
    pub offset: i64,
    pub limit: i64,
}

#[derive(Debug, Serialize)]
pub struct AdminTokenResponse {
    pub token: String,
    pub expires_in_hours: i64,
}

/// A question as shown to someone taking it: the answer and explanation are withheld.
#[derive(Debug, Clone, Serialize)]
pub struct QuestionView {
    pub id: String,
    pub topic_id: String,
    pub question: String,
    pub option_a: String,
    pub option_b: String,
    pub option_c: String,
    pub option_d: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_index: Option<i32>,
}

impl QuestionView {
    pub fn from_question(question: PracticeQuestion, order_index: Option<i32>) -> Self {
        QuestionView {
            id: question.id,
            topic_id: question.topic_id,
            question: question.question,
            option_a: question.option_a,
            option_b: question.option_b,
            option_c: question.option_c,
            option_d: question.option_d,
            order_index,
        }
    }
}

impl From<PracticeQuestion> for QuestionView {
    fn from(question: PracticeQuestion) -> Self {
        QuestionView::from_question(question, None)
    }
}

#[derive(Debug, Serialize)]
pub struct QuizDetail {
    pub quiz: Quiz,
    pub questions: Vec<QuestionView>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AnswerFeedback {
    pub question_id: String,
    pub selected_option: Option<OptionLetter>,
    pub outcome: AnswerOutcome,
    pub correct_option: OptionLetter,
    pub explanation: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SaveAnswerResponse {
    pub answer: QuizAttemptAnswer,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub feedback: Option<AnswerFeedback>,
}

#[derive(Debug, Serialize)]
pub struct SubmitAnswersResponse {
    pub saved: usize,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub feedback: Vec<AnswerFeedback>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AttemptResult {
    #[serde(flatten)]
    pub attempt: QuizAttempt,
    pub percentage: f64,
}

impl From<QuizAttempt> for AttemptResult {
    fn from(attempt: QuizAttempt) -> Self {
        let percentage = percentage(attempt.correct_answers, attempt.total_questions);
        AttemptResult {
            attempt,
            percentage,
        }
    }
}

/// Correct share of the quiz as a percentage rounded to two decimals.
pub fn percentage(correct: i32, total: i32) -> f64 {
    if total <= 0 {
        return 0.0;
    }
    let raw = correct as f64 * 100.0 / total as f64;
    (raw * 100.0).round() / 100.0
}

#[derive(Debug, Clone, Serialize)]
pub struct ReviewItem {
    pub order_index: i32,
    pub question_id: String,
    pub question: String,
    pub option_a: String,
    pub option_b: String,
    pub option_c: String,
    pub option_d: String,
    pub correct_option: OptionLetter,
    pub selected_option: Option<OptionLetter>,
    pub is_marked: bool,
    pub outcome: AnswerOutcome,
    pub explanation: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AttemptReview {
    pub result: AttemptResult,
    pub items: Vec<ReviewItem>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedRow {
    pub row: usize, // 1-based, as shown by spreadsheet software
    pub reason: String,
}

#[derive(Debug, Serialize)]
pub struct ImportReport {
    pub imported: usize,
    pub question_ids: Vec<String>,
    pub skipped: Vec<SkippedRow>,
}
