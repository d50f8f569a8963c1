use std::sync::Arc;

use crate::{
    auth::JwtService,
    config::Config,
    db::Database,
    errors::AppResult,
    repositories::{
        AttemptAnswerRepository, FileRepository, FolderRepository, MongoAttemptAnswerRepository,
        MongoFileRepository, MongoFolderRepository, MongoQuestionRepository,
        MongoQuizAttemptRepository, MongoQuizRepository, MongoTopicRepository, QuestionRepository,
        QuizAttemptRepository, QuizRepository, TopicRepository,
    },
    services::{
        FileService, FolderService, QuestionService, QuizAttemptService, QuizService, TopicService,
    },
};

/// One handle per collection group; services are wired from these.
#[derive(Clone)]
pub struct Repositories {
    pub folders: Arc<dyn FolderRepository>,
    pub files: Arc<dyn FileRepository>,
    pub topics: Arc<dyn TopicRepository>,
    pub questions: Arc<dyn QuestionRepository>,
    pub quizzes: Arc<dyn QuizRepository>,
    pub attempts: Arc<dyn QuizAttemptRepository>,
    pub answers: Arc<dyn AttemptAnswerRepository>,
}

#[derive(Clone)]
pub struct AppState {
    pub folder_service: Arc<FolderService>,
    pub file_service: Arc<FileService>,
    pub topic_service: Arc<TopicService>,
    pub question_service: Arc<QuestionService>,
    pub quiz_service: Arc<QuizService>,
    pub attempt_service: Arc<QuizAttemptService>,
    pub jwt_service: Arc<JwtService>,
    pub config: Arc<Config>,
    /// None when running on in-memory repositories.
    pub db: Option<Database>,
}

impl AppState {
    pub async fn new(config: Config) -> AppResult<Self> {
        let db = Database::connect(&config).await?;

        let folders = Arc::new(MongoFolderRepository::new(&db));
        folders.ensure_indexes().await?;
        let files = Arc::new(MongoFileRepository::new(&db));
        files.ensure_indexes().await?;
        let topics = Arc::new(MongoTopicRepository::new(&db));
        topics.ensure_indexes().await?;
        let questions = Arc::new(MongoQuestionRepository::new(&db));
        questions.ensure_indexes().await?;
        let quizzes = Arc::new(MongoQuizRepository::new(&db));
        quizzes.ensure_indexes().await?;
        let attempts = Arc::new(MongoQuizAttemptRepository::new(&db));
        attempts.ensure_indexes().await?;
        let answers = Arc::new(MongoAttemptAnswerRepository::new(&db));
        answers.ensure_indexes().await?;

        let repositories = Repositories {
            folders,
            files,
            topics,
            questions,
            quizzes,
            attempts,
            answers,
        };

        let mut state = Self::from_repositories(repositories, config);
        state.db = Some(db);
        Ok(state)
    }

    pub fn from_repositories(repos: Repositories, config: Config) -> Self {
        let quiz_service = Arc::new(QuizService::new(
            repos.quizzes.clone(),
            repos.questions.clone(),
            repos.attempts.clone(),
            repos.answers.clone(),
        ));

        let topic_service = Arc::new(TopicService::new(
            repos.topics.clone(),
            repos.questions.clone(),
            repos.quizzes.clone(),
            repos.folders.clone(),
        ));

        Self {
            folder_service: Arc::new(FolderService::new(
                repos.folders.clone(),
                repos.files.clone(),
                topic_service.clone(),
            )),
            file_service: Arc::new(FileService::new(repos.files.clone(), repos.folders.clone())),
            topic_service,
            question_service: Arc::new(QuestionService::new(
                repos.questions.clone(),
                repos.topics.clone(),
                repos.quizzes.clone(),
            )),
            attempt_service: Arc::new(QuizAttemptService::new(
                repos.attempts.clone(),
                repos.answers.clone(),
                quiz_service.clone(),
            )),
            quiz_service,
            jwt_service: Arc::new(JwtService::new(
                &config.jwt_secret,
                config.jwt_expiration_hours,
                &config.admin_password,
            )),
            config: Arc::new(config),
            db: None,
        }
    }
}
