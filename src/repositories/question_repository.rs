use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{bson::doc, options::IndexOptions, Collection, IndexModel};

use crate::{
    db::{collections, Database},
    errors::{AppError, AppResult},
    models::domain::PracticeQuestion,
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait QuestionRepository: Send + Sync {
    async fn create(&self, question: PracticeQuestion) -> AppResult<PracticeQuestion>;
    async fn insert_many(
        &self,
        questions: Vec<PracticeQuestion>,
    ) -> AppResult<Vec<PracticeQuestion>>;
    async fn find_by_id(&self, id: &str) -> AppResult<Option<PracticeQuestion>>;
    async fn find_by_ids(&self, ids: &[String]) -> AppResult<Vec<PracticeQuestion>>;
    async fn list_by_topic(
        &self,
        topic_id: &str,
        offset: i64,
        limit: i64,
    ) -> AppResult<(Vec<PracticeQuestion>, i64)>;
    async fn ids_by_topic(&self, topic_id: &str) -> AppResult<Vec<String>>;
    async fn update(&self, question: PracticeQuestion) -> AppResult<PracticeQuestion>;
    async fn delete(&self, id: &str) -> AppResult<()>;
    async fn delete_by_topic(&self, topic_id: &str) -> AppResult<u64>;
}

pub struct MongoQuestionRepository {
    collection: Collection<PracticeQuestion>,
}

impl MongoQuestionRepository {
    pub fn new(db: &Database) -> Self {
        let collection = db.get_collection(collections::QUESTIONS);
        Self { collection }
    }

    pub async fn ensure_indexes(&self) -> AppResult<()> {
        log::info!("Creating indexes for practice_questions collection");

        let id_index = IndexModel::builder()
            .keys(doc! { "id": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("id_unique".to_string())
                    .build(),
            )
            .build();

        let topic_index = IndexModel::builder()
            .keys(doc! { "topic_id": 1 })
            .options(IndexOptions::builder().name("topic_id".to_string()).build())
            .build();

        self.collection.create_index(id_index).await?;
        self.collection.create_index(topic_index).await?;

        log::info!("Successfully created indexes for practice_questions collection");
        Ok(())
    }
}

#[async_trait]
impl QuestionRepository for MongoQuestionRepository {
    async fn create(&self, question: PracticeQuestion) -> AppResult<PracticeQuestion> {
        self.collection.insert_one(&question).await?;
        Ok(question)
    }

    async fn insert_many(
        &self,
        questions: Vec<PracticeQuestion>,
    ) -> AppResult<Vec<PracticeQuestion>> {
        if questions.is_empty() {
            return Ok(questions);
        }
        self.collection.insert_many(&questions).await?;
        Ok(questions)
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<PracticeQuestion>> {
        let question = self.collection.find_one(doc! { "id": id }).await?;
        Ok(question)
    }

    async fn find_by_ids(&self, ids: &[String]) -> AppResult<Vec<PracticeQuestion>> {
        let questions = self
            .collection
            .find(doc! { "id": { "$in": ids.to_vec() } })
            .await?
            .try_collect()
            .await?;
        Ok(questions)
    }

    async fn list_by_topic(
        &self,
        topic_id: &str,
        offset: i64,
        limit: i64,
    ) -> AppResult<(Vec<PracticeQuestion>, i64)> {
        let filter = doc! { "topic_id": topic_id };

        let total = self.collection.count_documents(filter.clone()).await?;

        let questions = self
            .collection
            .find(filter)
            .sort(doc! { "created_at": 1, "id": 1 })
            .skip(offset as u64)
            .limit(limit)
            .await?
            .try_collect()
            .await?;

        Ok((questions, total as i64))
    }

    async fn ids_by_topic(&self, topic_id: &str) -> AppResult<Vec<String>> {
        let questions: Vec<PracticeQuestion> = self
            .collection
            .find(doc! { "topic_id": topic_id })
            .await?
            .try_collect()
            .await?;
        Ok(questions.into_iter().map(|q| q.id).collect())
    }

    async fn update(&self, question: PracticeQuestion) -> AppResult<PracticeQuestion> {
        let result = self
            .collection
            .replace_one(doc! { "id": &question.id }, &question)
            .await?;

        if result.matched_count == 0 {
            return Err(AppError::NotFound(format!(
                "Question with id '{}' not found",
                question.id
            )));
        }

        Ok(question)
    }

    async fn delete(&self, id: &str) -> AppResult<()> {
        let result = self.collection.delete_one(doc! { "id": id }).await?;

        if result.deleted_count == 0 {
            return Err(AppError::NotFound(format!("Question with id '{}' not found", id)));
        }

        Ok(())
    }

    async fn delete_by_topic(&self, topic_id: &str) -> AppResult<u64> {
        let result = self
            .collection
            .delete_many(doc! { "topic_id": topic_id })
            .await?;
        Ok(result.deleted_count)
    }
}
