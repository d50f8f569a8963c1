use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{bson::doc, options::IndexOptions, Collection, IndexModel};

use crate::{
    db::{collections, Database},
    errors::{AppError, AppResult},
    models::domain::QuizAttempt,
};

#[async_trait]
pub trait QuizAttemptRepository: Send + Sync {
    async fn create(&self, attempt: QuizAttempt) -> AppResult<QuizAttempt>;
    async fn find_by_id(&self, id: &str) -> AppResult<Option<QuizAttempt>>;
    async fn update(&self, attempt: QuizAttempt) -> AppResult<QuizAttempt>;
    async fn get_user_attempts(
        &self,
        user_id: &str,
        quiz_id: Option<String>,
        offset: i64,
        limit: i64,
    ) -> AppResult<(Vec<QuizAttempt>, i64)>;
    async fn get_quiz_attempts(
        &self,
        quiz_id: &str,
        offset: i64,
        limit: i64,
    ) -> AppResult<(Vec<QuizAttempt>, i64)>;
    /// Removes every attempt of a quiz and returns the removed attempt ids.
    async fn delete_by_quiz(&self, quiz_id: &str) -> AppResult<Vec<String>>;
}

pub struct MongoQuizAttemptRepository {
    collection: Collection<QuizAttempt>,
}

impl MongoQuizAttemptRepository {
    pub fn new(db: &Database) -> Self {
        let collection = db.get_collection(collections::ATTEMPTS);
        Self { collection }
    }

    pub async fn ensure_indexes(&self) -> AppResult<()> {
        log::info!("Creating indexes for quiz_attempts collection");

        let id_index = IndexModel::builder()
            .keys(doc! { "id": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("id_unique".to_string())
                    .build(),
            )
            .build();

        let user_quiz_index = IndexModel::builder()
            .keys(doc! { "user_id": 1, "quiz_id": 1 })
            .options(
                IndexOptions::builder()
                    .name("user_quiz".to_string())
                    .build(),
            )
            .build();

        let quiz_id_index = IndexModel::builder()
            .keys(doc! { "quiz_id": 1 })
            .options(
                IndexOptions::builder()
                    .name("quiz_id".to_string())
                    .build(),
            )
            .build();

        self.collection.create_index(id_index).await?;
        self.collection.create_index(user_quiz_index).await?;
        self.collection.create_index(quiz_id_index).await?;

        log::info!("Successfully created indexes for quiz_attempts collection");
        Ok(())
    }
}

#[async_trait]
impl QuizAttemptRepository for MongoQuizAttemptRepository {
    async fn create(&self, attempt: QuizAttempt) -> AppResult<QuizAttempt> {
        self.collection.insert_one(&attempt).await?;
        Ok(attempt)
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<QuizAttempt>> {
        let attempt = self
            .collection
            .find_one(doc! { "id": id })
            .await?;
        Ok(attempt)
    }

    async fn update(&self, attempt: QuizAttempt) -> AppResult<QuizAttempt> {
        let result = self
            .collection
            .replace_one(doc! { "id": &attempt.id }, &attempt)
            .await?;

        if result.matched_count == 0 {
            return Err(AppError::NotFound(format!(
                "Attempt with id '{}' not found",
                attempt.id
            )));
        }

        Ok(attempt)
    }

    async fn get_user_attempts(
        &self,
        user_id: &str,
        quiz_id: Option<String>,
        offset: i64,
        limit: i64,
    ) -> AppResult<(Vec<QuizAttempt>, i64)> {
        let mut filter = doc! { "user_id": user_id };

        if let Some(qid) = quiz_id {
            filter.insert("quiz_id", qid);
        }

        let total = self.collection.count_documents(filter.clone()).await?;

        let attempts = self
            .collection
            .find(filter)
            .skip(offset as u64)
            .limit(limit)
            .sort(doc! { "started_at": -1 })
            .await?
            .try_collect()
            .await?;

        Ok((attempts, total as i64))
    }

    async fn get_quiz_attempts(
        &self,
        quiz_id: &str,
        offset: i64,
        limit: i64,
    ) -> AppResult<(Vec<QuizAttempt>, i64)> {
        let filter = doc! { "quiz_id": quiz_id };

        let total = self.collection.count_documents(filter.clone()).await?;

        let attempts = self
            .collection
            .find(filter)
            .skip(offset as u64)
            .limit(limit)
            .sort(doc! { "started_at": -1 })
            .await?
            .try_collect()
            .await?;

        Ok((attempts, total as i64))
    }

    async fn delete_by_quiz(&self, quiz_id: &str) -> AppResult<Vec<String>> {
        let attempts: Vec<QuizAttempt> = self
            .collection
            .find(doc! { "quiz_id": quiz_id })
            .await?
            .try_collect()
            .await?;

        self.collection
            .delete_many(doc! { "quiz_id": quiz_id })
            .await?;

        Ok(attempts.into_iter().map(|a| a.id).collect())
    }
}
