use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{
    bson::doc,
    options::{IndexOptions, ReplaceOptions},
    Collection, IndexModel,
};

use crate::{
    db::{collections, Database},
    errors::AppResult,
    models::domain::QuizAttemptAnswer,
};

#[async_trait]
pub trait AttemptAnswerRepository: Send + Sync {
    /// Inserts or replaces the answer keyed by `(attempt_id, question_id)`.
    async fn upsert(&self, answer: QuizAttemptAnswer) -> AppResult<QuizAttemptAnswer>;
    async fn find_by_attempt(&self, attempt_id: &str) -> AppResult<Vec<QuizAttemptAnswer>>;
    async fn delete_by_attempts(&self, attempt_ids: &[String]) -> AppResult<u64>;
}

pub struct MongoAttemptAnswerRepository {
    collection: Collection<QuizAttemptAnswer>,
}

impl MongoAttemptAnswerRepository {
    pub fn new(db: &Database) -> Self {
        let collection = db.get_collection(collections::ATTEMPT_ANSWERS);
        Self { collection }
    }

    pub async fn ensure_indexes(&self) -> AppResult<()> {
        log::info!("Creating indexes for quiz_attempt_answers collection");

        let attempt_question_index = IndexModel::builder()
            .keys(doc! { "attempt_id": 1, "question_id": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("attempt_question_unique".to_string())
                    .build(),
            )
            .build();

        self.collection.create_index(attempt_question_index).await?;

        log::info!("Successfully created indexes for quiz_attempt_answers collection");
        Ok(())
    }
}

#[async_trait]
impl AttemptAnswerRepository for MongoAttemptAnswerRepository {
    async fn upsert(&self, answer: QuizAttemptAnswer) -> AppResult<QuizAttemptAnswer> {
        let filter = doc! { "attempt_id": &answer.attempt_id, "question_id": &answer.question_id };
        let options = ReplaceOptions::builder().upsert(true).build();

        self.collection
            .replace_one(filter, &answer)
            .with_options(options)
            .await?;
        Ok(answer)
    }

    async fn find_by_attempt(&self, attempt_id: &str) -> AppResult<Vec<QuizAttemptAnswer>> {
        let answers = self
            .collection
            .find(doc! { "attempt_id": attempt_id })
            .await?
            .try_collect()
            .await?;
        Ok(answers)
    }

    async fn delete_by_attempts(&self, attempt_ids: &[String]) -> AppResult<u64> {
        let result = self
            .collection
            .delete_many(doc! { "attempt_id": { "$in": attempt_ids.to_vec() } })
            .await?;
        Ok(result.deleted_count)
    }
}
