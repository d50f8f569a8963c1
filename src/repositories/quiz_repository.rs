use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{bson::doc, options::IndexOptions, Collection, IndexModel};

use crate::{
    db::{collections, Database},
    errors::{AppError, AppResult},
    models::domain::{Quiz, QuizQuestionLink},
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait QuizRepository: Send + Sync {
    async fn create(&self, quiz: Quiz) -> AppResult<Quiz>;
    async fn find_by_id(&self, id: &str) -> AppResult<Option<Quiz>>;
    async fn list_quizzes(
        &self,
        subject_folder_id: Option<String>,
        offset: i64,
        limit: i64,
    ) -> AppResult<(Vec<Quiz>, i64)>;
    async fn update(&self, quiz: Quiz) -> AppResult<Quiz>;
    async fn delete(&self, id: &str) -> AppResult<()>;

    async fn add_questions(&self, links: Vec<QuizQuestionLink>) -> AppResult<()>;
    /// Links of a quiz sorted by `order_index`.
    async fn questions_for_quiz(&self, quiz_id: &str) -> AppResult<Vec<QuizQuestionLink>>;
    async fn remove_quiz_links(&self, quiz_id: &str) -> AppResult<u64>;
    async fn remove_question_links(&self, question_ids: &[String]) -> AppResult<u64>;
    /// Distinct ids of the quizzes linking any of `question_ids`.
    async fn quiz_ids_for_questions(&self, question_ids: &[String]) -> AppResult<Vec<String>>;
}

pub struct MongoQuizRepository {
    collection: Collection<Quiz>,
    links: Collection<QuizQuestionLink>,
}

impl MongoQuizRepository {
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.get_collection(collections::QUIZZES),
            links: db.get_collection(collections::QUIZ_QUESTIONS),
        }
    }

    pub async fn ensure_indexes(&self) -> AppResult<()> {
        log::info!("Creating indexes for quizzes and quiz_questions collections");

        let id_index = IndexModel::builder()
            .keys(doc! { "id": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("id_unique".to_string())
                    .build(),
            )
            .build();

        let folder_index = IndexModel::builder()
            .keys(doc! { "subject_folder_id": 1 })
            .options(
                IndexOptions::builder()
                    .name("subject_folder_id".to_string())
                    .build(),
            )
            .build();

        let link_index = IndexModel::builder()
            .keys(doc! { "quiz_id": 1, "practice_question_id": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("quiz_question_unique".to_string())
                    .build(),
            )
            .build();

        let link_question_index = IndexModel::builder()
            .keys(doc! { "practice_question_id": 1 })
            .options(
                IndexOptions::builder()
                    .name("practice_question_id".to_string())
                    .build(),
            )
            .build();

        self.collection.create_index(id_index).await?;
        self.collection.create_index(folder_index).await?;
        self.links.create_index(link_index).await?;
        self.links.create_index(link_question_index).await?;

        log::info!("Successfully created indexes for quizzes and quiz_questions collections");
        Ok(())
    }
}

#[async_trait]
impl QuizRepository for MongoQuizRepository {
    async fn create(&self, quiz: Quiz) -> AppResult<Quiz> {
        self.collection.insert_one(&quiz).await?;
        Ok(quiz)
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<Quiz>> {
        let quiz = self.collection.find_one(doc! { "id": id }).await?;
        Ok(quiz)
    }

    async fn list_quizzes(
        &self,
        subject_folder_id: Option<String>,
        offset: i64,
        limit: i64,
    ) -> AppResult<(Vec<Quiz>, i64)> {
        let mut filter = doc! {};
        if let Some(folder_id) = subject_folder_id {
            filter.insert("subject_folder_id", folder_id);
        }

        let total = self.collection.count_documents(filter.clone()).await? as i64;

        let items = self
            .collection
            .find(filter)
            .sort(doc! { "created_at": -1 })
            .skip(offset as u64)
            .limit(limit)
            .await?
            .try_collect()
            .await?;

        Ok((items, total))
    }

    async fn update(&self, quiz: Quiz) -> AppResult<Quiz> {
        let result = self
            .collection
            .replace_one(doc! { "id": &quiz.id }, &quiz)
            .await?;

        if result.matched_count == 0 {
            return Err(AppError::NotFound(format!(
                "Quiz with id '{}' not found",
                quiz.id
            )));
        }

        Ok(quiz)
    }

    async fn delete(&self, id: &str) -> AppResult<()> {
        let result = self.collection.delete_one(doc! { "id": id }).await?;

        if result.deleted_count == 0 {
            return Err(AppError::NotFound(format!("Quiz with id '{}' not found", id)));
        }

        Ok(())
    }

    async fn add_questions(&self, links: Vec<QuizQuestionLink>) -> AppResult<()> {
        if links.is_empty() {
            return Ok(());
        }
        self.links.insert_many(&links).await?;
        Ok(())
    }

    async fn questions_for_quiz(&self, quiz_id: &str) -> AppResult<Vec<QuizQuestionLink>> {
        let links = self
            .links
            .find(doc! { "quiz_id": quiz_id })
            .sort(doc! { "order_index": 1 })
            .await?
            .try_collect()
            .await?;
        Ok(links)
    }

    async fn remove_quiz_links(&self, quiz_id: &str) -> AppResult<u64> {
        let result = self.links.delete_many(doc! { "quiz_id": quiz_id }).await?;
        Ok(result.deleted_count)
    }

    async fn remove_question_links(&self, question_ids: &[String]) -> AppResult<u64> {
        let result = self
            .links
            .delete_many(doc! { "practice_question_id": { "$in": question_ids.to_vec() } })
            .await?;
        Ok(result.deleted_count)
    }

    async fn quiz_ids_for_questions(&self, question_ids: &[String]) -> AppResult<Vec<String>> {
        let ids = self
            .links
            .distinct(
                "quiz_id",
                doc! { "practice_question_id": { "$in": question_ids.to_vec() } },
            )
            .await?;
        Ok(ids
            .into_iter()
            .filter_map(|id| id.as_str().map(str::to_string))
            .collect())
    }
}
