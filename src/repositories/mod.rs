pub mod attempt_answer_repository;
pub mod file_repository;
pub mod folder_repository;
pub mod question_repository;
pub mod quiz_attempt_repository;
pub mod quiz_repository;
pub mod topic_repository;

pub use attempt_answer_repository::{AttemptAnswerRepository, MongoAttemptAnswerRepository};
pub use file_repository::{FileRepository, MongoFileRepository};
pub use folder_repository::{FolderRepository, MongoFolderRepository};
pub use question_repository::{MongoQuestionRepository, QuestionRepository};
pub use quiz_attempt_repository::{MongoQuizAttemptRepository, QuizAttemptRepository};
pub use quiz_repository::{MongoQuizRepository, QuizRepository};
pub use topic_repository::{MongoTopicRepository, TopicRepository};
