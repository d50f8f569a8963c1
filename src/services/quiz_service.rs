use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use validator::Validate;

use crate::{
    errors::{AppError, AppResult},
    models::{
        domain::{PracticeQuestion, Quiz, QuizQuestionLink},
        dto::{
            request::{
                CreateQuizRequest, QuizListParams, ReplaceQuizQuestionsRequest, UpdateQuizRequest,
            },
            response::{DeleteResponse, PaginatedResponse, QuestionView, QuizDetail},
        },
    },
    repositories::{
        AttemptAnswerRepository, QuestionRepository, QuizAttemptRepository, QuizRepository,
    },
};

/// Drops `question_ids` from every quiz that links them and recounts
/// `total_questions` on each affected quiz. Returns the number of links removed.
pub(crate) async fn unlink_questions(
    quizzes: &dyn QuizRepository,
    question_ids: &[String],
) -> AppResult<u64> {
    if question_ids.is_empty() {
        return Ok(0);
    }

    let quiz_ids = quizzes.quiz_ids_for_questions(question_ids).await?;
    let removed = quizzes.remove_question_links(question_ids).await?;

    for quiz_id in &quiz_ids {
        let Some(mut quiz) = quizzes.find_by_id(quiz_id).await? else {
            continue;
        };
        quiz.total_questions = quizzes.questions_for_quiz(quiz_id).await?.len() as i32;
        quiz.modified_at = Some(chrono::Utc::now());
        quizzes.update(quiz).await?;
    }

    if !quiz_ids.is_empty() {
        log::info!(
            "Removed {} quiz links and recounted {} quizzes",
            removed,
            quiz_ids.len()
        );
    }
    Ok(removed)
}

pub struct QuizService {
    quizzes: Arc<dyn QuizRepository>,
    questions: Arc<dyn QuestionRepository>,
    attempts: Arc<dyn QuizAttemptRepository>,
    answers: Arc<dyn AttemptAnswerRepository>,
}

/// Trims ids, drops blanks and repeats, keeps first-seen order.
fn dedupe_question_ids(ids: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    ids.iter()
        .map(|id| id.trim())
        .filter(|id| !id.is_empty() && seen.insert(id.to_string()))
        .map(str::to_string)
        .collect()
}

impl QuizService {
    pub fn new(
        quizzes: Arc<dyn QuizRepository>,
        questions: Arc<dyn QuestionRepository>,
        attempts: Arc<dyn QuizAttemptRepository>,
        answers: Arc<dyn AttemptAnswerRepository>,
    ) -> Self {
        Self {
            quizzes,
            questions,
            attempts,
            answers,
        }
    }

    pub async fn get_quiz(&self, id: &str) -> AppResult<Quiz> {
        self.quizzes
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Quiz with id '{}' not found", id)))
    }

    pub async fn list_quizzes(
        &self,
        params: &QuizListParams,
    ) -> AppResult<PaginatedResponse<Quiz>> {
        params.validate()?;
        let page = params.pagination();

        let (items, total) = self
            .quizzes
            .list_quizzes(params.subject_folder_id.clone(), page.offset(), page.limit())
            .await?;

        Ok(PaginatedResponse {
            items,
            total,
            offset: page.offset(),
            limit: page.limit(),
        })
    }

    /// The quiz questions in quiz order, each with its link. Links whose
    /// question no longer exists are left out.
    pub async fn ordered_questions(
        &self,
        quiz_id: &str,
    ) -> AppResult<Vec<(QuizQuestionLink, PracticeQuestion)>> {
        let links = self.quizzes.questions_for_quiz(quiz_id).await?;
        let ids: Vec<String> = links.iter().map(|l| l.practice_question_id.clone()).collect();

        let mut by_id: HashMap<String, PracticeQuestion> = self
            .questions
            .find_by_ids(&ids)
            .await?
            .into_iter()
            .map(|q| (q.id.clone(), q))
            .collect();

        let mut ordered = Vec::with_capacity(links.len());
        for link in links {
            match by_id.remove(&link.practice_question_id) {
                Some(question) => ordered.push((link, question)),
                None => log::warn!(
                    "Quiz {} links missing question {}",
                    quiz_id,
                    link.practice_question_id
                ),
            }
        }
        Ok(ordered)
    }

    pub async fn get_quiz_detail(&self, id: &str) -> AppResult<QuizDetail> {
        let quiz = self.get_quiz(id).await?;
        let questions = self
            .ordered_questions(&quiz.id)
            .await?
            .into_iter()
            .map(|(link, question)| QuestionView::from_question(question, Some(link.order_index)))
            .collect();

        Ok(QuizDetail { quiz, questions })
    }

    /// Resolves requested question ids, rejecting unknown ones.
    async fn resolve_question_ids(&self, requested: &[String]) -> AppResult<Vec<String>> {
        let ids = dedupe_question_ids(requested);
        if ids.is_empty() {
            return Err(AppError::ValidationError(
                "A quiz needs at least one question".to_string(),
            ));
        }

        let found: HashSet<String> = self
            .questions
            .find_by_ids(&ids)
            .await?
            .into_iter()
            .map(|q| q.id)
            .collect();

        let missing: Vec<&str> = ids
            .iter()
            .filter(|id| !found.contains(*id))
            .map(String::as_str)
            .collect();
        if !missing.is_empty() {
            return Err(AppError::ValidationError(format!(
                "Unknown question ids: {}",
                missing.join(", ")
            )));
        }

        Ok(ids)
    }

    /// Creates the quiz row, then its question links. If linking fails the quiz
    /// row is removed again so no empty quiz is left behind.
    pub async fn create_quiz(&self, request: CreateQuizRequest) -> AppResult<QuizDetail> {
        request.validate()?;

        let ids = self.resolve_question_ids(&request.question_ids).await?;

        let quiz = Quiz::new(
            &request.title,
            request.subject_folder_id,
            request.topic_id,
            request.mode,
            request.duration_minutes,
            ids.len() as i32,
        );
        let quiz = self.quizzes.create(quiz).await?;

        if let Err(err) = self.quizzes.add_questions(quiz.links_for(&ids)).await {
            log::error!("Linking questions to quiz {} failed: {}", quiz.id, err);
            if let Err(cleanup) = self.quizzes.delete(&quiz.id).await {
                log::warn!("Could not remove unlinked quiz {}: {}", quiz.id, cleanup);
            }
            return Err(err);
        }

        log::info!("Created quiz '{}' ({}) with {} questions", quiz.title, quiz.id, ids.len());
        self.get_quiz_detail(&quiz.id).await
    }

    pub async fn update_quiz(&self, id: &str, request: UpdateQuizRequest) -> AppResult<Quiz> {
        request.validate()?;

        let mut quiz = self.get_quiz(id).await?;
        if let Some(title) = request.title.as_deref() {
            quiz.title = title.trim().to_string();
        }
        if let Some(mode) = request.mode {
            quiz.mode = mode;
        }
        if let Some(duration) = request.duration_minutes {
            quiz.duration_minutes = Some(duration);
        }
        quiz.modified_at = Some(chrono::Utc::now());

        self.quizzes.update(quiz).await
    }

    /// Replaces the ordered question set. Attempts already started keep the
    /// question count they were started with until they are finished.
    pub async fn replace_questions(
        &self,
        id: &str,
        request: ReplaceQuizQuestionsRequest,
    ) -> AppResult<QuizDetail> {
        request.validate()?;

        let mut quiz = self.get_quiz(id).await?;
        let ids = self.resolve_question_ids(&request.question_ids).await?;

        self.quizzes.remove_quiz_links(&quiz.id).await?;
        self.quizzes.add_questions(quiz.links_for(&ids)).await?;

        quiz.total_questions = ids.len() as i32;
        quiz.modified_at = Some(chrono::Utc::now());
        self.quizzes.update(quiz).await?;

        self.get_quiz_detail(id).await
    }

    /// Deletes the quiz with its links, attempts and attempt answers.
    pub async fn delete_quiz(&self, id: &str) -> AppResult<DeleteResponse> {
        let quiz = self.get_quiz(id).await?;

        let attempt_ids = self.attempts.delete_by_quiz(&quiz.id).await?;
        let answers_removed = if attempt_ids.is_empty() {
            0
        } else {
            self.answers.delete_by_attempts(&attempt_ids).await?
        };
        self.quizzes.remove_quiz_links(&quiz.id).await?;
        self.quizzes.delete(&quiz.id).await?;

        log::info!(
            "Deleted quiz {} with {} attempts and {} answers",
            quiz.id,
            attempt_ids.len(),
            answers_removed
        );

        Ok(DeleteResponse {
            message: format!("Quiz deleted with {} attempt(s)", attempt_ids.len()),
        })
    }
}
