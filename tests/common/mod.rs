#![allow(dead_code)]

use std::sync::Arc;

use actix_web::web;
use async_trait::async_trait;
use tokio::sync::RwLock;

use polyhub_server::{
    app_state::{AppState, Repositories},
    auth::{Claims, JwtService, UserRole},
    config::Config,
    errors::{AppError, AppResult},
    models::domain::{
        FileRecord, Folder, PracticeQuestion, PracticeTopic, Quiz, QuizAttempt,
        QuizAttemptAnswer, QuizQuestionLink,
    },
    repositories::{
        AttemptAnswerRepository, FileRepository, FolderRepository, QuestionRepository,
        QuizAttemptRepository, QuizRepository, TopicRepository,
    },
};

fn page<T: Clone>(items: &[T], offset: i64, limit: i64) -> Vec<T> {
    items
        .iter()
        .skip(offset.max(0) as usize)
        .take(limit.max(0) as usize)
        .cloned()
        .collect()
}

#[derive(Default)]
pub struct InMemoryFolderRepository {
    folders: RwLock<Vec<Folder>>,
}

#[async_trait]
impl FolderRepository for InMemoryFolderRepository {
    async fn create(&self, folder: Folder) -> AppResult<Folder> {
        let mut folders = self.folders.write().await;
        if folders.iter().any(|f| f.id == folder.id) {
            return Err(AppError::AlreadyExists(format!(
                "Folder with id '{}' already exists",
                folder.id
            )));
        }
        folders.push(folder.clone());
        Ok(folder)
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<Folder>> {
        Ok(self.folders.read().await.iter().find(|f| f.id == id).cloned())
    }

    async fn list_roots(&self) -> AppResult<Vec<Folder>> {
        let mut roots: Vec<Folder> = self
            .folders
            .read()
            .await
            .iter()
            .filter(|f| f.parent_id.is_none())
            .cloned()
            .collect();
        roots.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(roots)
    }

    async fn list_children(&self, parent_id: &str) -> AppResult<Vec<Folder>> {
        let mut children: Vec<Folder> = self
            .folders
            .read()
            .await
            .iter()
            .filter(|f| f.parent_id.as_deref() == Some(parent_id))
            .cloned()
            .collect();
        children.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(children)
    }

    async fn update(&self, folder: Folder) -> AppResult<Folder> {
        let mut folders = self.folders.write().await;
        let slot = folders
            .iter_mut()
            .find(|f| f.id == folder.id)
            .ok_or_else(|| {
                AppError::NotFound(format!("Folder with id '{}' not found", folder.id))
            })?;
        *slot = folder.clone();
        Ok(folder)
    }

    async fn delete_many(&self, ids: &[String]) -> AppResult<u64> {
        let mut folders = self.folders.write().await;
        let before = folders.len();
        folders.retain(|f| !ids.contains(&f.id));
        Ok((before - folders.len()) as u64)
    }
}

#[derive(Default)]
pub struct InMemoryFileRepository {
    files: RwLock<Vec<FileRecord>>,
}

#[async_trait]
impl FileRepository for InMemoryFileRepository {
    async fn create(&self, file: FileRecord) -> AppResult<FileRecord> {
        self.files.write().await.push(file.clone());
        Ok(file)
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<FileRecord>> {
        Ok(self.files.read().await.iter().find(|f| f.id == id).cloned())
    }

    async fn list_by_folder(&self, folder_id: &str) -> AppResult<Vec<FileRecord>> {
        let mut files: Vec<FileRecord> = self
            .files
            .read()
            .await
            .iter()
            .filter(|f| f.folder_id == folder_id)
            .cloned()
            .collect();
        files.sort_by(|a, b| a.file_name.cmp(&b.file_name));
        Ok(files)
    }

    async fn update(&self, file: FileRecord) -> AppResult<FileRecord> {
        let mut files = self.files.write().await;
        let slot = files
            .iter_mut()
            .find(|f| f.id == file.id)
            .ok_or_else(|| AppError::NotFound(format!("File with id '{}' not found", file.id)))?;
        *slot = file.clone();
        Ok(file)
    }

    async fn delete(&self, id: &str) -> AppResult<()> {
        let mut files = self.files.write().await;
        let before = files.len();
        files.retain(|f| f.id != id);
        if files.len() == before {
            return Err(AppError::NotFound(format!("File with id '{}' not found", id)));
        }
        Ok(())
    }

    async fn delete_by_folders(&self, folder_ids: &[String]) -> AppResult<u64> {
        let mut files = self.files.write().await;
        let before = files.len();
        files.retain(|f| !folder_ids.contains(&f.folder_id));
        Ok((before - files.len()) as u64)
    }
}

#[derive(Default)]
pub struct InMemoryTopicRepository {
    topics: RwLock<Vec<PracticeTopic>>,
}

#[async_trait]
impl TopicRepository for InMemoryTopicRepository {
    async fn create(&self, topic: PracticeTopic) -> AppResult<PracticeTopic> {
        self.topics.write().await.push(topic.clone());
        Ok(topic)
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<PracticeTopic>> {
        Ok(self.topics.read().await.iter().find(|t| t.id == id).cloned())
    }

    async fn list_by_folder(&self, subject_folder_id: &str) -> AppResult<Vec<PracticeTopic>> {
        let mut topics: Vec<PracticeTopic> = self
            .topics
            .read()
            .await
            .iter()
            .filter(|t| t.subject_folder_id == subject_folder_id)
            .cloned()
            .collect();
        topics.sort_by(|a, b| {
            a.order_index
                .cmp(&b.order_index)
                .then_with(|| a.name.cmp(&b.name))
        });
        Ok(topics)
    }

    async fn count_by_folder(&self, subject_folder_id: &str) -> AppResult<i64> {
        Ok(self
            .topics
            .read()
            .await
            .iter()
            .filter(|t| t.subject_folder_id == subject_folder_id)
            .count() as i64)
    }

    async fn update(&self, topic: PracticeTopic) -> AppResult<PracticeTopic> {
        let mut topics = self.topics.write().await;
        let slot = topics
            .iter_mut()
            .find(|t| t.id == topic.id)
            .ok_or_else(|| AppError::NotFound(format!("Topic with id '{}' not found", topic.id)))?;
        *slot = topic.clone();
        Ok(topic)
    }

    async fn delete(&self, id: &str) -> AppResult<()> {
        let mut topics = self.topics.write().await;
        let before = topics.len();
        topics.retain(|t| t.id != id);
        if topics.len() == before {
            return Err(AppError::NotFound(format!("Topic with id '{}' not found", id)));
        }
        Ok(())
    }
}

/// Keeps insertion order, which matches the creation-time sort of the Mongo store.
#[derive(Default)]
pub struct InMemoryQuestionRepository {
    questions: RwLock<Vec<PracticeQuestion>>,
}

#[async_trait]
impl QuestionRepository for InMemoryQuestionRepository {
    async fn create(&self, question: PracticeQuestion) -> AppResult<PracticeQuestion> {
        self.questions.write().await.push(question.clone());
        Ok(question)
    }

    async fn insert_many(
        &self,
        questions: Vec<PracticeQuestion>,
    ) -> AppResult<Vec<PracticeQuestion>> {
        self.questions.write().await.extend(questions.iter().cloned());
        Ok(questions)
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<PracticeQuestion>> {
        Ok(self.questions.read().await.iter().find(|q| q.id == id).cloned())
    }

    async fn find_by_ids(&self, ids: &[String]) -> AppResult<Vec<PracticeQuestion>> {
        Ok(self
            .questions
            .read()
            .await
            .iter()
            .filter(|q| ids.contains(&q.id))
            .cloned()
            .collect())
    }

    async fn list_by_topic(
        &self,
        topic_id: &str,
        offset: i64,
        limit: i64,
    ) -> AppResult<(Vec<PracticeQuestion>, i64)> {
        let questions = self.questions.read().await;
        let matching: Vec<PracticeQuestion> = questions
            .iter()
            .filter(|q| q.topic_id == topic_id)
            .cloned()
            .collect();
        Ok((page(&matching, offset, limit), matching.len() as i64))
    }

    async fn ids_by_topic(&self, topic_id: &str) -> AppResult<Vec<String>> {
        Ok(self
            .questions
            .read()
            .await
            .iter()
            .filter(|q| q.topic_id == topic_id)
            .map(|q| q.id.clone())
            .collect())
    }

    async fn update(&self, question: PracticeQuestion) -> AppResult<PracticeQuestion> {
        let mut questions = self.questions.write().await;
        let slot = questions
            .iter_mut()
            .find(|q| q.id == question.id)
            .ok_or_else(|| {
                AppError::NotFound(format!("Question with id '{}' not found", question.id))
            })?;
        *slot = question.clone();
        Ok(question)
    }

    async fn delete(&self, id: &str) -> AppResult<()> {
        let mut questions = self.questions.write().await;
        let before = questions.len();
        questions.retain(|q| q.id != id);
        if questions.len() == before {
            return Err(AppError::NotFound(format!("Question with id '{}' not found", id)));
        }
        Ok(())
    }

    async fn delete_by_topic(&self, topic_id: &str) -> AppResult<u64> {
        let mut questions = self.questions.write().await;
        let before = questions.len();
        questions.retain(|q| q.topic_id != topic_id);
        Ok((before - questions.len()) as u64)
    }
}

#[derive(Default)]
pub struct InMemoryQuizRepository {
    quizzes: RwLock<Vec<Quiz>>,
    links: RwLock<Vec<QuizQuestionLink>>,
    /// When set, `add_questions` fails, to exercise the compensating delete.
    pub fail_linking: std::sync::atomic::AtomicBool,
}

#[async_trait]
impl QuizRepository for InMemoryQuizRepository {
    async fn create(&self, quiz: Quiz) -> AppResult<Quiz> {
        self.quizzes.write().await.push(quiz.clone());
        Ok(quiz)
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<Quiz>> {
        Ok(self.quizzes.read().await.iter().find(|q| q.id == id).cloned())
    }

    async fn list_quizzes(
        &self,
        subject_folder_id: Option<String>,
        offset: i64,
        limit: i64,
    ) -> AppResult<(Vec<Quiz>, i64)> {
        let quizzes = self.quizzes.read().await;
        // Newest first.
        let matching: Vec<Quiz> = quizzes
            .iter()
            .rev()
            .filter(|q| {
                subject_folder_id.is_none() || q.subject_folder_id == subject_folder_id
            })
            .cloned()
            .collect();
        Ok((page(&matching, offset, limit), matching.len() as i64))
    }

    async fn update(&self, quiz: Quiz) -> AppResult<Quiz> {
        let mut quizzes = self.quizzes.write().await;
        let slot = quizzes
            .iter_mut()
            .find(|q| q.id == quiz.id)
            .ok_or_else(|| AppError::NotFound(format!("Quiz with id '{}' not found", quiz.id)))?;
        *slot = quiz.clone();
        Ok(quiz)
    }

    async fn delete(&self, id: &str) -> AppResult<()> {
        let mut quizzes = self.quizzes.write().await;
        let before = quizzes.len();
        quizzes.retain(|q| q.id != id);
        if quizzes.len() == before {
            return Err(AppError::NotFound(format!("Quiz with id '{}' not found", id)));
        }
        Ok(())
    }

    async fn add_questions(&self, links: Vec<QuizQuestionLink>) -> AppResult<()> {
        if self.fail_linking.load(std::sync::atomic::Ordering::SeqCst) {
            return Err(AppError::DatabaseError("link write failed".to_string()));
        }
        let mut stored = self.links.write().await;
        for link in &links {
            if stored.iter().any(|l| {
                l.quiz_id == link.quiz_id && l.practice_question_id == link.practice_question_id
            }) {
                return Err(AppError::AlreadyExists(format!(
                    "Question '{}' is already linked to quiz '{}'",
                    link.practice_question_id, link.quiz_id
                )));
            }
        }
        stored.extend(links);
        Ok(())
    }

    async fn questions_for_quiz(&self, quiz_id: &str) -> AppResult<Vec<QuizQuestionLink>> {
        let mut links: Vec<QuizQuestionLink> = self
            .links
            .read()
            .await
            .iter()
            .filter(|l| l.quiz_id == quiz_id)
            .cloned()
            .collect();
        links.sort_by_key(|l| l.order_index);
        Ok(links)
    }

    async fn remove_quiz_links(&self, quiz_id: &str) -> AppResult<u64> {
        let mut links = self.links.write().await;
        let before = links.len();
        links.retain(|l| l.quiz_id != quiz_id);
        Ok((before - links.len()) as u64)
    }

    async fn remove_question_links(&self, question_ids: &[String]) -> AppResult<u64> {
        let mut links = self.links.write().await;
        let before = links.len();
        links.retain(|l| !question_ids.contains(&l.practice_question_id));
        Ok((before - links.len()) as u64)
    }

    async fn quiz_ids_for_questions(&self, question_ids: &[String]) -> AppResult<Vec<String>> {
        let mut quiz_ids: Vec<String> = Vec::new();
        for link in self.links.read().await.iter() {
            if question_ids.contains(&link.practice_question_id)
                && !quiz_ids.contains(&link.quiz_id)
            {
                quiz_ids.push(link.quiz_id.clone());
            }
        }
        Ok(quiz_ids)
    }
}

#[derive(Default)]
pub struct InMemoryQuizAttemptRepository {
    attempts: RwLock<Vec<QuizAttempt>>,
}

#[async_trait]
impl QuizAttemptRepository for InMemoryQuizAttemptRepository {
    async fn create(&self, attempt: QuizAttempt) -> AppResult<QuizAttempt> {
        self.attempts.write().await.push(attempt.clone());
        Ok(attempt)
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<QuizAttempt>> {
        Ok(self.attempts.read().await.iter().find(|a| a.id == id).cloned())
    }

    async fn update(&self, attempt: QuizAttempt) -> AppResult<QuizAttempt> {
        let mut attempts = self.attempts.write().await;
        let slot = attempts
            .iter_mut()
            .find(|a| a.id == attempt.id)
            .ok_or_else(|| {
                AppError::NotFound(format!("Attempt with id '{}' not found", attempt.id))
            })?;
        *slot = attempt.clone();
        Ok(attempt)
    }

    async fn get_user_attempts(
        &self,
        user_id: &str,
        quiz_id: Option<String>,
        offset: i64,
        limit: i64,
    ) -> AppResult<(Vec<QuizAttempt>, i64)> {
        let attempts = self.attempts.read().await;
        let matching: Vec<QuizAttempt> = attempts
            .iter()
            .rev()
            .filter(|a| a.user_id.as_deref() == Some(user_id))
            .filter(|a| quiz_id.as_deref().map_or(true, |q| a.quiz_id == q))
            .cloned()
            .collect();
        Ok((page(&matching, offset, limit), matching.len() as i64))
    }

    async fn get_quiz_attempts(
        &self,
        quiz_id: &str,
        offset: i64,
        limit: i64,
    ) -> AppResult<(Vec<QuizAttempt>, i64)> {
        let attempts = self.attempts.read().await;
        let matching: Vec<QuizAttempt> = attempts
            .iter()
            .rev()
            .filter(|a| a.quiz_id == quiz_id)
            .cloned()
            .collect();
        Ok((page(&matching, offset, limit), matching.len() as i64))
    }

    async fn delete_by_quiz(&self, quiz_id: &str) -> AppResult<Vec<String>> {
        let mut attempts = self.attempts.write().await;
        let removed = attempts
            .iter()
            .filter(|a| a.quiz_id == quiz_id)
            .map(|a| a.id.clone())
            .collect();
        attempts.retain(|a| a.quiz_id != quiz_id);
        Ok(removed)
    }
}

#[derive(Default)]
pub struct InMemoryAttemptAnswerRepository {
    answers: RwLock<Vec<QuizAttemptAnswer>>,
}

#[async_trait]
impl AttemptAnswerRepository for InMemoryAttemptAnswerRepository {
    async fn upsert(&self, answer: QuizAttemptAnswer) -> AppResult<QuizAttemptAnswer> {
        let mut answers = self.answers.write().await;
        match answers
            .iter_mut()
            .find(|a| a.attempt_id == answer.attempt_id && a.question_id == answer.question_id)
        {
            Some(slot) => *slot = answer.clone(),
            None => answers.push(answer.clone()),
        }
        Ok(answer)
    }

    async fn find_by_attempt(&self, attempt_id: &str) -> AppResult<Vec<QuizAttemptAnswer>> {
        Ok(self
            .answers
            .read()
            .await
            .iter()
            .filter(|a| a.attempt_id == attempt_id)
            .cloned()
            .collect())
    }

    async fn delete_by_attempts(&self, attempt_ids: &[String]) -> AppResult<u64> {
        let mut answers = self.answers.write().await;
        let before = answers.len();
        answers.retain(|a| !attempt_ids.contains(&a.attempt_id));
        Ok((before - answers.len()) as u64)
    }
}

/// Concrete handles kept next to the state so tests can inspect storage.
pub struct TestContext {
    pub state: AppState,
    pub folders: Arc<InMemoryFolderRepository>,
    pub files: Arc<InMemoryFileRepository>,
    pub topics: Arc<InMemoryTopicRepository>,
    pub questions: Arc<InMemoryQuestionRepository>,
    pub quizzes: Arc<InMemoryQuizRepository>,
    pub attempts: Arc<InMemoryQuizAttemptRepository>,
    pub answers: Arc<InMemoryAttemptAnswerRepository>,
}

impl TestContext {
    pub fn new() -> Self {
        let folders = Arc::new(InMemoryFolderRepository::default());
        let files = Arc::new(InMemoryFileRepository::default());
        let topics = Arc::new(InMemoryTopicRepository::default());
        let questions = Arc::new(InMemoryQuestionRepository::default());
        let quizzes = Arc::new(InMemoryQuizRepository::default());
        let attempts = Arc::new(InMemoryQuizAttemptRepository::default());
        let answers = Arc::new(InMemoryAttemptAnswerRepository::default());

        let repositories = Repositories {
            folders: folders.clone(),
            files: files.clone(),
            topics: topics.clone(),
            questions: questions.clone(),
            quizzes: quizzes.clone(),
            attempts: attempts.clone(),
            answers: answers.clone(),
        };

        Self {
            state: AppState::from_repositories(repositories, Config::test_config()),
            folders,
            files,
            topics,
            questions,
            quizzes,
            attempts,
            answers,
        }
    }

    pub fn jwt_data(&self) -> web::Data<JwtService> {
        web::Data::from(self.state.jwt_service.clone())
    }

    pub fn state_data(&self) -> web::Data<AppState> {
        web::Data::new(self.state.clone())
    }

    pub fn token_for(&self, claims: &Claims) -> String {
        self.state
            .jwt_service
            .create_token(claims)
            .expect("token should be signed")
    }

    pub fn admin_token(&self) -> String {
        self.token_for(&Claims::admin(1))
    }

    pub fn user_token(&self, sub: &str) -> String {
        self.token_for(&Claims::new(sub, None, UserRole::User, 1))
    }
}

pub fn user(sub: &str) -> Claims {
    Claims::new(sub, None, UserRole::User, 1)
}

pub fn admin() -> Claims {
    Claims::admin(1)
}
