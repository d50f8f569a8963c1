use std::sync::Arc;

use validator::Validate;

use crate::{
    errors::{AppError, AppResult},
    models::{
        domain::{OptionLetter, PracticeQuestion, PracticeTopic},
        dto::{
            request::{CheckAnswerRequest, PaginationParams, QuestionRequest},
            response::{AnswerFeedback, ImportReport, PaginatedResponse, QuestionView},
        },
    },
    repositories::{QuestionRepository, QuizRepository, TopicRepository},
    services::{
        import::question_sheet::{parse_question_rows, read_rows, SheetFormat},
        quiz_service::unlink_questions,
        scoring::judge,
    },
};

pub struct QuestionService {
    questions: Arc<dyn QuestionRepository>,
    topics: Arc<dyn TopicRepository>,
    quizzes: Arc<dyn QuizRepository>,
}

impl QuestionService {
    pub fn new(
        questions: Arc<dyn QuestionRepository>,
        topics: Arc<dyn TopicRepository>,
        quizzes: Arc<dyn QuizRepository>,
    ) -> Self {
        Self {
            questions,
            topics,
            quizzes,
        }
    }

    async fn get_topic(&self, topic_id: &str) -> AppResult<PracticeTopic> {
        self.topics
            .find_by_id(topic_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Topic with id '{}' not found", topic_id)))
    }

    pub async fn get_question(&self, id: &str) -> AppResult<PracticeQuestion> {
        self.questions
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Question with id '{}' not found", id)))
    }

    /// Full questions, answers included. Admin listing.
    pub async fn list_questions(
        &self,
        topic_id: &str,
        params: &PaginationParams,
    ) -> AppResult<PaginatedResponse<PracticeQuestion>> {
        params.validate()?;
        self.get_topic(topic_id).await?;

        let (items, total) = self
            .questions
            .list_by_topic(topic_id, params.offset(), params.limit())
            .await?;

        Ok(PaginatedResponse {
            items,
            total,
            offset: params.offset(),
            limit: params.limit(),
        })
    }

    /// Questions with the answer withheld, for practising a topic.
    pub async fn list_practice_questions(
        &self,
        topic_id: &str,
        params: &PaginationParams,
    ) -> AppResult<PaginatedResponse<QuestionView>> {
        let page = self.list_questions(topic_id, params).await?;

        Ok(PaginatedResponse {
            items: page.items.into_iter().map(QuestionView::from).collect(),
            total: page.total,
            offset: page.offset,
            limit: page.limit,
        })
    }

    pub async fn create_question(
        &self,
        topic_id: &str,
        request: QuestionRequest,
    ) -> AppResult<PracticeQuestion> {
        request.validate()?;
        self.get_topic(topic_id).await?;

        let question = PracticeQuestion::new(topic_id, request.into_content()?);
        self.questions.create(question).await
    }

    pub async fn update_question(
        &self,
        id: &str,
        request: QuestionRequest,
    ) -> AppResult<PracticeQuestion> {
        request.validate()?;

        let existing = self.get_question(id).await?;
        let content = request.into_content()?;
        let [option_a, option_b, option_c, option_d] = content.options;

        let question = PracticeQuestion {
            question: content.question,
            option_a,
            option_b,
            option_c,
            option_d,
            correct_option: content.correct_option,
            explanation: content.explanation.filter(|e| !e.is_empty()),
            modified_at: Some(chrono::Utc::now()),
            ..existing
        };

        self.questions.update(question).await
    }

    /// Deletes the question and drops it from every quiz that used it.
    pub async fn delete_question(&self, id: &str) -> AppResult<()> {
        let question = self.get_question(id).await?;

        unlink_questions(self.quizzes.as_ref(), std::slice::from_ref(&question.id)).await?;
        self.questions.delete(&question.id).await
    }

    /// Judges a single selection without recording it anywhere.
    pub async fn check_answer(
        &self,
        id: &str,
        request: CheckAnswerRequest,
    ) -> AppResult<AnswerFeedback> {
        let question = self.get_question(id).await?;
        let selected: OptionLetter = request.selected_option.parse()?;

        Ok(AnswerFeedback {
            question_id: question.id.clone(),
            selected_option: Some(selected),
            outcome: judge(Some(selected.as_str()), question.correct_option.as_str()),
            correct_option: question.correct_option,
            explanation: question.explanation,
        })
    }

    /// Imports a CSV or workbook into `topic_id`. Rows that cannot be read are
    /// reported back; the valid ones are written in a single batch.
    pub async fn import_questions(
        &self,
        topic_id: &str,
        bytes: &[u8],
        format: SheetFormat,
    ) -> AppResult<ImportReport> {
        self.get_topic(topic_id).await?;

        let rows = read_rows(bytes, format)?;
        let parsed = parse_question_rows(&rows)?;

        if parsed.questions.is_empty() {
            return Err(AppError::ValidationError(format!(
                "No valid questions found ({} row(s) skipped)",
                parsed.skipped.len()
            )));
        }

        let questions: Vec<PracticeQuestion> = parsed
            .questions
            .into_iter()
            .map(|content| PracticeQuestion::new(topic_id, content))
            .collect();

        let inserted = self.questions.insert_many(questions).await?;

        log::info!(
            "Imported {} questions into topic {} ({} rows skipped)",
            inserted.len(),
            topic_id,
            parsed.skipped.len()
        );

        Ok(ImportReport {
            imported: inserted.len(),
            question_ids: inserted.into_iter().map(|q| q.id).collect(),
            skipped: parsed.skipped,
        })
    }
}
