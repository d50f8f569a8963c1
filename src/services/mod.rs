pub mod file_service;
pub mod folder_service;
pub mod import;
pub mod question_service;
pub mod quiz_attempt_service;
pub mod quiz_service;
pub mod scoring;
pub mod topic_service;

pub use file_service::FileService;
pub use folder_service::FolderService;
pub use question_service::QuestionService;
pub use quiz_attempt_service::QuizAttemptService;
pub use quiz_service::QuizService;
pub use topic_service::TopicService;
