pub mod file_record;
pub mod folder;
pub mod option_letter;
pub mod practice_question;
pub mod practice_topic;
pub mod quiz;
pub mod quiz_attempt;

pub use file_record::FileRecord;
pub use folder::Folder;
pub use option_letter::OptionLetter;
pub use practice_question::{PracticeQuestion, QuestionContent};
pub use practice_topic::PracticeTopic;
pub use quiz::{Quiz, QuizMode, QuizQuestionLink};
pub use quiz_attempt::{AnswerOutcome, AttemptStatus, QuizAttempt, QuizAttemptAnswer};
