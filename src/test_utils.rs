pub mod fixtures {
    use crate::{
        auth::{Claims, UserRole},
        models::domain::{Folder, OptionLetter, PracticeQuestion, PracticeTopic, QuestionContent},
    };

    pub fn test_folder(name: &str) -> Folder {
        Folder::new(name, None, None)
    }

    pub fn test_topic(folder: &Folder, name: &str) -> PracticeTopic {
        PracticeTopic::new(&folder.id, name, 0)
    }

    /// A question whose correct answer is `correct`; option texts are "<letter> text".
    pub fn test_question(topic_id: &str, correct: OptionLetter) -> PracticeQuestion {
        PracticeQuestion::new(
            topic_id,
            QuestionContent {
                question: format!("Which option is {}?", correct),
                options: OptionLetter::ALL.map(|l| format!("{} text", l)),
                correct_option: correct,
                explanation: Some(format!("{} is correct", correct)),
            },
        )
    }

    pub fn user_claims(sub: &str) -> Claims {
        Claims::new(sub, Some(&format!("{}@example.com", sub)), UserRole::User, 1)
    }

    pub fn admin_claims() -> Claims {
        Claims::admin(1)
    }
}

pub mod test_helpers {
    use actix_web::http::StatusCode;

    /// Asserts that a status code represents an error (4xx or 5xx)
    pub fn assert_error_status(status: StatusCode) {
        assert!(
            status.is_client_error() || status.is_server_error(),
            "Expected error status, got: {}",
            status
        );
    }

    /// Asserts that a status code represents success (2xx)
    pub fn assert_success_status(status: StatusCode) {
        assert!(
            status.is_success(),
            "Expected success status, got: {}",
            status
        );
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::test_helpers::*;
    use crate::models::domain::OptionLetter;
    use actix_web::http::StatusCode;

    #[test]
    fn test_question_fixture_points_at_its_answer() {
        let question = test_question("topic-1", OptionLetter::C);
        assert_eq!(question.option_text(question.correct_option), "C text");
    }

    #[test]
    fn test_claims_fixtures() {
        assert!(!user_claims("alice").is_admin());
        assert!(admin_claims().is_admin());
    }

    #[test]
    fn test_status_helpers() {
        assert_error_status(StatusCode::NOT_FOUND);
        assert_success_status(StatusCode::CREATED);
    }
}
