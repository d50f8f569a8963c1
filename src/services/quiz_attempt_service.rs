use std::collections::HashMap;
use std::sync::Arc;

use validator::Validate;

use crate::{
    auth::{can_access_attempt, Claims},
    errors::{AppError, AppResult},
    models::{
        domain::{
            AnswerOutcome, AttemptStatus, OptionLetter, PracticeQuestion, QuizAttempt,
            QuizAttemptAnswer, QuizMode,
        },
        dto::{
            request::{AttemptListParams, PaginationParams, SaveAnswerRequest, SubmitAnswersRequest},
            response::{
                AnswerFeedback, AttemptResult, AttemptReview, PaginatedResponse, ReviewItem,
                SaveAnswerResponse, SubmitAnswersResponse,
            },
        },
    },
    repositories::{AttemptAnswerRepository, QuizAttemptRepository},
    services::{
        quiz_service::QuizService,
        scoring::{judge, score_answers},
    },
};

pub struct QuizAttemptService {
    attempts: Arc<dyn QuizAttemptRepository>,
    answers: Arc<dyn AttemptAnswerRepository>,
    quizzes: Arc<QuizService>,
}

/// Parses an optional submitted letter; blank counts as cleared.
fn parse_selection(raw: Option<&str>) -> AppResult<Option<OptionLetter>> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => value.parse().map(Some),
    }
}

fn answer_feedback(question: &PracticeQuestion, selected: Option<OptionLetter>) -> AnswerFeedback {
    AnswerFeedback {
        question_id: question.id.clone(),
        selected_option: selected,
        outcome: judge(
            selected.as_ref().map(OptionLetter::as_str),
            question.correct_option.as_str(),
        ),
        correct_option: question.correct_option,
        explanation: question.explanation.clone(),
    }
}

impl QuizAttemptService {
    pub fn new(
        attempts: Arc<dyn QuizAttemptRepository>,
        answers: Arc<dyn AttemptAnswerRepository>,
        quizzes: Arc<QuizService>,
    ) -> Self {
        Self {
            attempts,
            answers,
            quizzes,
        }
    }

    pub async fn start_attempt(
        &self,
        quiz_id: &str,
        caller: Option<&Claims>,
    ) -> AppResult<QuizAttempt> {
        let quiz = self.quizzes.get_quiz(quiz_id).await?;
        let questions = self.quizzes.ordered_questions(&quiz.id).await?;

        let attempt = QuizAttempt::start(
            &quiz.id,
            caller.map(|c| c.sub.as_str()),
            questions.len() as i32,
        );
        let attempt = self.attempts.create(attempt).await?;

        log::info!(
            "Started attempt {} on quiz {} ({})",
            attempt.id,
            quiz.id,
            attempt.user_id.as_deref().unwrap_or("guest")
        );
        Ok(attempt)
    }

    /// Loads an attempt the caller is allowed to see.
    async fn load_attempt(&self, id: &str, caller: Option<&Claims>) -> AppResult<QuizAttempt> {
        let attempt = self
            .attempts
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Attempt with id '{}' not found", id)))?;

        can_access_attempt(caller, &attempt)?;
        Ok(attempt)
    }

    async fn load_open_attempt(&self, id: &str, caller: Option<&Claims>) -> AppResult<QuizAttempt> {
        let attempt = self.load_attempt(id, caller).await?;
        if attempt.status != AttemptStatus::InProgress {
            return Err(AppError::ValidationError(
                "Attempt is already finished".to_string(),
            ));
        }
        Ok(attempt)
    }

    async fn quiz_questions(&self, quiz_id: &str) -> AppResult<HashMap<String, PracticeQuestion>> {
        Ok(self
            .quizzes
            .ordered_questions(quiz_id)
            .await?
            .into_iter()
            .map(|(_, q)| (q.id.clone(), q))
            .collect())
    }

    fn practice_mode(&self, mode: QuizMode) -> bool {
        mode == QuizMode::Practice
    }

    pub async fn get_attempt(&self, id: &str, caller: Option<&Claims>) -> AppResult<AttemptResult> {
        Ok(self.load_attempt(id, caller).await?.into())
    }

    pub async fn save_answer(
        &self,
        attempt_id: &str,
        question_id: &str,
        request: SaveAnswerRequest,
        caller: Option<&Claims>,
    ) -> AppResult<SaveAnswerResponse> {
        request.validate()?;

        let attempt = self.load_open_attempt(attempt_id, caller).await?;
        let quiz = self.quizzes.get_quiz(&attempt.quiz_id).await?;
        let questions = self.quiz_questions(&quiz.id).await?;

        let question = questions.get(question_id).ok_or_else(|| {
            AppError::ValidationError(format!(
                "Question '{}' is not part of this quiz",
                question_id
            ))
        })?;
        let selected = parse_selection(request.selected_option.as_deref())?;

        let answer = self
            .answers
            .upsert(QuizAttemptAnswer::new(
                &attempt.id,
                &question.id,
                selected,
                request.is_marked,
            ))
            .await?;

        let feedback = self
            .practice_mode(quiz.mode)
            .then(|| answer_feedback(question, selected));

        Ok(SaveAnswerResponse { answer, feedback })
    }

    /// Saves several answers at once. Every entry is checked before anything is
    /// written, so one bad entry rejects the whole batch.
    pub async fn submit_answers(
        &self,
        attempt_id: &str,
        request: SubmitAnswersRequest,
        caller: Option<&Claims>,
    ) -> AppResult<SubmitAnswersResponse> {
        let attempt = self.load_open_attempt(attempt_id, caller).await?;
        let quiz = self.quizzes.get_quiz(&attempt.quiz_id).await?;
        let questions = self.quiz_questions(&quiz.id).await?;

        let not_in_quiz = |id: &str| {
            AppError::ValidationError(format!("Question '{}' is not part of this quiz", id))
        };

        let mut pending: Vec<(&PracticeQuestion, Option<OptionLetter>)> = Vec::new();
        for (question_id, raw) in &request.answers {
            let question = questions.get(question_id).ok_or_else(|| not_in_quiz(question_id))?;
            pending.push((question, parse_selection(raw.as_deref())?));
        }
        for question_id in &request.marked {
            if !questions.contains_key(question_id) {
                return Err(not_in_quiz(question_id));
            }
        }

        // Marking alone must not clobber a selection saved earlier.
        let existing: HashMap<String, Option<OptionLetter>> = self
            .answers
            .find_by_attempt(&attempt.id)
            .await?
            .into_iter()
            .map(|a| (a.question_id, a.selected_option))
            .collect();
        for question_id in &request.marked {
            if !request.answers.contains_key(question_id) {
                let question = &questions[question_id];
                let selected = existing.get(question_id).copied().flatten();
                pending.push((question, selected));
            }
        }

        let practice = self.practice_mode(quiz.mode);
        let mut response = SubmitAnswersResponse {
            saved: 0,
            feedback: Vec::new(),
        };

        for (question, selected) in pending {
            let is_marked = request.marked.iter().any(|id| id == &question.id);
            self.answers
                .upsert(QuizAttemptAnswer::new(&attempt.id, &question.id, selected, is_marked))
                .await?;
            response.saved += 1;
            if practice {
                response.feedback.push(answer_feedback(question, selected));
            }
        }

        Ok(response)
    }

    /// Scores and completes the attempt. A completed attempt is returned as
    /// stored.
    pub async fn finish_attempt(
        &self,
        attempt_id: &str,
        caller: Option<&Claims>,
    ) -> AppResult<AttemptResult> {
        let mut attempt = self.load_attempt(attempt_id, caller).await?;
        if attempt.is_completed() {
            return Ok(attempt.into());
        }

        let questions = self.quizzes.ordered_questions(&attempt.quiz_id).await?;
        let saved = self.answers.find_by_attempt(&attempt.id).await?;

        let answer_key: Vec<(&str, &str)> = questions
            .iter()
            .map(|(_, q)| (q.id.as_str(), q.correct_option.as_str()))
            .collect();
        let given: HashMap<&str, &str> = saved
            .iter()
            .filter_map(|a| {
                a.selected_option
                    .as_ref()
                    .map(|letter| (a.question_id.as_str(), letter.as_str()))
            })
            .collect();

        let summary = score_answers(&answer_key, &given);

        attempt.status = AttemptStatus::Completed;
        attempt.score = summary.score();
        attempt.total_questions = summary.total;
        attempt.correct_answers = summary.correct;
        attempt.wrong_answers = summary.wrong;
        attempt.unanswered = summary.unanswered;
        attempt.finished_at = Some(chrono::Utc::now());

        let attempt = self.attempts.update(attempt).await?;
        log::info!(
            "Finished attempt {}: {}/{}",
            attempt.id,
            attempt.score,
            attempt.total_questions
        );
        Ok(attempt.into())
    }

    pub async fn review_attempt(
        &self,
        attempt_id: &str,
        caller: Option<&Claims>,
    ) -> AppResult<AttemptReview> {
        let attempt = self.load_attempt(attempt_id, caller).await?;
        if !attempt.is_completed() {
            return Err(AppError::ValidationError(
                "Review is available once the attempt is finished".to_string(),
            ));
        }

        let questions = self.quizzes.ordered_questions(&attempt.quiz_id).await?;
        let saved: HashMap<String, QuizAttemptAnswer> = self
            .answers
            .find_by_attempt(&attempt.id)
            .await?
            .into_iter()
            .map(|a| (a.question_id.clone(), a))
            .collect();

        let items = questions
            .into_iter()
            .map(|(link, question)| {
                let answer = saved.get(&question.id);
                let selected = answer.and_then(|a| a.selected_option);
                let outcome = match selected {
                    Some(letter) => judge(Some(letter.as_str()), question.correct_option.as_str()),
                    None => AnswerOutcome::Unanswered,
                };

                ReviewItem {
                    order_index: link.order_index,
                    question_id: question.id,
                    question: question.question,
                    option_a: question.option_a,
                    option_b: question.option_b,
                    option_c: question.option_c,
                    option_d: question.option_d,
                    correct_option: question.correct_option,
                    selected_option: selected,
                    is_marked: answer.map(|a| a.is_marked).unwrap_or(false),
                    outcome,
                    explanation: question.explanation,
                }
            })
            .collect();

        Ok(AttemptReview {
            result: attempt.into(),
            items,
        })
    }

    pub async fn list_user_attempts(
        &self,
        user_id: &str,
        params: &AttemptListParams,
    ) -> AppResult<PaginatedResponse<AttemptResult>> {
        params.validate()?;
        let page = params.pagination();

        let (attempts, total) = self
            .attempts
            .get_user_attempts(user_id, params.quiz_id.clone(), page.offset(), page.limit())
            .await?;

        Ok(paginate(attempts, total, &page))
    }

    pub async fn list_quiz_attempts(
        &self,
        quiz_id: &str,
        params: &PaginationParams,
    ) -> AppResult<PaginatedResponse<AttemptResult>> {
        params.validate()?;
        self.quizzes.get_quiz(quiz_id).await?;

        let (attempts, total) = self
            .attempts
            .get_quiz_attempts(quiz_id, params.offset(), params.limit())
            .await?;

        Ok(paginate(attempts, total, params))
    }
}

fn paginate(
    attempts: Vec<QuizAttempt>,
    total: i64,
    page: &PaginationParams,
) -> PaginatedResponse<AttemptResult> {
    PaginatedResponse {
        items: attempts.into_iter().map(AttemptResult::from).collect(),
        total,
        offset: page.offset(),
        limit: page.limit(),
    }
}
