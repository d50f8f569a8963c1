use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use validator::Validate;

use crate::errors::{AppError, AppResult};
use crate::models::domain::{OptionLetter, QuestionContent, QuizMode};

// Names and titles are trimmed before storage, so they need a visible character.
static NOT_BLANK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\S").expect("NOT_BLANK is a valid regex pattern"));

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct AdminLoginRequest {
    #[validate(length(min = 1, max = 256))]
    pub password: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateFolderRequest {
    #[validate(
        length(min = 1, max = 200),
        regex(path = *NOT_BLANK, message = "must not be blank")
    )]
    pub name: String,

    pub parent_id: Option<String>,

    #[validate(url)]
    pub thumbnail: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateFolderRequest {
    #[validate(
        length(min = 1, max = 200),
        regex(path = *NOT_BLANK, message = "must not be blank")
    )]
    pub name: Option<String>,

    #[validate(url)]
    pub thumbnail: Option<String>,

    /// New parent folder. Ignored when `move_to_root` is set.
    pub parent_id: Option<String>,

    #[serde(default)]
    pub move_to_root: bool,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct BulkCreateFoldersRequest {
    pub parent_id: Option<String>,

    #[validate(length(min = 1, max = 100000))]
    pub outline: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateFileRequest {
    #[validate(
        length(min = 1, max = 255),
        regex(path = *NOT_BLANK, message = "must not be blank")
    )]
    pub file_name: String,

    #[validate(url)]
    pub file_url: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateFileRequest {
    #[validate(
        length(min = 1, max = 255),
        regex(path = *NOT_BLANK, message = "must not be blank")
    )]
    pub file_name: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateTopicRequest {
    #[validate(
        length(min = 1, max = 200),
        regex(path = *NOT_BLANK, message = "must not be blank")
    )]
    pub name: String,

    #[validate(range(min = 0))]
    pub order_index: Option<i32>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateTopicRequest {
    #[validate(
        length(min = 1, max = 200),
        regex(path = *NOT_BLANK, message = "must not be blank")
    )]
    pub name: Option<String>,

    #[validate(range(min = 0))]
    pub order_index: Option<i32>,
}

/// Body for creating a question and for replacing one wholesale.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct QuestionRequest {
    #[validate(length(min = 1, max = 5000))]
    pub question: String,

    #[validate(length(min = 1, max = 1000))]
    pub option_a: String,

    #[validate(length(min = 1, max = 1000))]
    pub option_b: String,

    #[validate(length(min = 1, max = 1000))]
    pub option_c: String,

    #[validate(length(min = 1, max = 1000))]
    pub option_d: String,

    /// Any spelling `OptionLetter::normalize` accepts: "B", "b)", "2", "OPTION_B".
    pub correct_option: String,

    #[validate(length(max = 5000))]
    pub explanation: Option<String>,
}

impl QuestionRequest {
    pub fn into_content(self) -> AppResult<QuestionContent> {
        let correct_option: OptionLetter = self.correct_option.parse()?;
        let options = [self.option_a, self.option_b, self.option_c, self.option_d]
            .map(|o| o.trim().to_string());

        if options.iter().any(|o| o.is_empty()) || self.question.trim().is_empty() {
            return Err(AppError::ValidationError(
                "Question text and all four options must be non-empty".to_string(),
            ));
        }

        Ok(QuestionContent {
            question: self.question.trim().to_string(),
            options,
            correct_option,
            explanation: self.explanation.map(|e| e.trim().to_string()),
        })
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CheckAnswerRequest {
    pub selected_option: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateQuizRequest {
    #[validate(
        length(min = 1, max = 200),
        regex(path = *NOT_BLANK, message = "must not be blank")
    )]
    pub title: String,

    pub subject_folder_id: Option<String>,

    pub topic_id: Option<String>,

    #[serde(default)]
    pub mode: QuizMode,

    #[validate(range(min = 1, max = 600))]
    pub duration_minutes: Option<i32>,

    #[validate(length(min = 1, max = 500))]
    pub question_ids: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateQuizRequest {
    #[validate(
        length(min = 1, max = 200),
        regex(path = *NOT_BLANK, message = "must not be blank")
    )]
    pub title: Option<String>,

    pub mode: Option<QuizMode>,

    #[validate(range(min = 1, max = 600))]
    pub duration_minutes: Option<i32>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ReplaceQuizQuestionsRequest {
    #[validate(length(min = 1, max = 500))]
    pub question_ids: Vec<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SaveAnswerRequest {
    /// `null` clears a previously saved answer.
    pub selected_option: Option<String>,

    #[serde(default)]
    pub is_marked: bool,
}

/// Answers keyed by question id; a `null` value clears the answer.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct SubmitAnswersRequest {
    #[serde(default)]
    pub answers: HashMap<String, Option<String>>,

    #[serde(default)]
    pub marked: Vec<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct PaginationParams {
    #[validate(range(min = 0))]
    pub offset: Option<i64>,

    #[validate(range(min = 1, max = 100))]
    pub limit: Option<i64>,
}

impl Default for PaginationParams {
    fn default() -> Self {
        Self {
            offset: Some(0),
            limit: Some(20),
        }
    }
}

impl PaginationParams {
    pub fn offset(&self) -> i64 {
        self.offset.unwrap_or(0).max(0)
    }

    pub fn limit(&self) -> i64 {
        self.limit.unwrap_or(20).clamp(1, 100)
    }
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct QuizListParams {
    pub subject_folder_id: Option<String>,

    #[validate(range(min = 0))]
    pub offset: Option<i64>,

    #[validate(range(min = 1, max = 100))]
    pub limit: Option<i64>,
}

impl QuizListParams {
    pub fn pagination(&self) -> PaginationParams {
        PaginationParams {
            offset: self.offset,
            limit: self.limit,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct AttemptListParams {
    pub quiz_id: Option<String>,

    #[validate(range(min = 0))]
    pub offset: Option<i64>,

    #[validate(range(min = 1, max = 100))]
    pub limit: Option<i64>,
}

impl AttemptListParams {
    pub fn pagination(&self) -> PaginationParams {
        PaginationParams {
            offset: self.offset,
            limit: self.limit,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ImportParams {
    /// Original file name; its extension picks the parser when `format` is absent.
    pub filename: Option<String>,
    pub format: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    fn question_request(correct: &str) -> QuestionRequest {
        QuestionRequest {
            question: " Capital of France? ".to_string(),
            option_a: "Paris".to_string(),
            option_b: "Lyon".to_string(),
            option_c: "Nice".to_string(),
            option_d: "Lille".to_string(),
            correct_option: correct.to_string(),
            explanation: None,
        }
    }

    #[test]
    fn question_request_normalizes_correct_option() {
        let content = question_request("option_a").into_content().expect("valid request");
        assert_eq!(content.correct_option, OptionLetter::A);
        assert_eq!(content.question, "Capital of France?");
    }

    #[test]
    fn question_request_rejects_unknown_letter() {
        let result = question_request("E").into_content();
        assert!(matches!(result, Err(AppError::ValidationError(_))));
    }

    #[test]
    fn question_request_rejects_whitespace_option() {
        let mut request = question_request("A");
        request.option_c = "   ".to_string();
        assert!(request.validate().is_ok());
        assert!(request.into_content().is_err());
    }

    #[test]
    fn create_quiz_request_requires_questions() {
        let request = CreateQuizRequest {
            title: "Quiz".to_string(),
            subject_folder_id: None,
            topic_id: None,
            mode: QuizMode::Exam,
            duration_minutes: None,
            question_ids: vec![],
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn blank_names_and_titles_fail_validation() {
        let folder = CreateFolderRequest {
            name: "   ".to_string(),
            parent_id: None,
            thumbnail: None,
        };
        assert!(folder.validate().is_err());

        let topic = UpdateTopicRequest {
            name: Some("\t \n".to_string()),
            order_index: None,
        };
        assert!(topic.validate().is_err());

        let file = UpdateFileRequest {
            file_name: " notes.pdf ".to_string(),
        };
        assert!(file.validate().is_ok());
    }

    #[test]
    fn create_folder_request_rejects_bad_thumbnail() {
        let request = CreateFolderRequest {
            name: "Maths".to_string(),
            parent_id: None,
            thumbnail: Some("not a url".to_string()),
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn pagination_defaults_and_clamps() {
        let params = PaginationParams {
            offset: None,
            limit: Some(1000),
        };
        assert_eq!(params.offset(), 0);
        assert_eq!(params.limit(), 100);
        assert_eq!(PaginationParams::default().limit(), 20);
    }
}
