use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{bson::doc, options::IndexOptions, Collection, IndexModel};

use crate::{
    db::{collections, Database},
    errors::{AppError, AppResult},
    models::domain::PracticeTopic,
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TopicRepository: Send + Sync {
    async fn create(&self, topic: PracticeTopic) -> AppResult<PracticeTopic>;
    async fn find_by_id(&self, id: &str) -> AppResult<Option<PracticeTopic>>;
    async fn list_by_folder(&self, subject_folder_id: &str) -> AppResult<Vec<PracticeTopic>>;
    async fn count_by_folder(&self, subject_folder_id: &str) -> AppResult<i64>;
    async fn update(&self, topic: PracticeTopic) -> AppResult<PracticeTopic>;
    async fn delete(&self, id: &str) -> AppResult<()>;
}

pub struct MongoTopicRepository {
    collection: Collection<PracticeTopic>,
}

impl MongoTopicRepository {
    pub fn new(db: &Database) -> Self {
        let collection = db.get_collection(collections::TOPICS);
        Self { collection }
    }

    pub async fn ensure_indexes(&self) -> AppResult<()> {
        log::info!("Creating indexes for practice_topics collection");

        let id_index = IndexModel::builder()
            .keys(doc! { "id": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("id_unique".to_string())
                    .build(),
            )
            .build();

        let folder_order_index = IndexModel::builder()
            .keys(doc! { "subject_folder_id": 1, "order_index": 1 })
            .options(
                IndexOptions::builder()
                    .name("folder_order".to_string())
                    .build(),
            )
            .build();

        self.collection.create_index(id_index).await?;
        self.collection.create_index(folder_order_index).await?;

        log::info!("Successfully created indexes for practice_topics collection");
        Ok(())
    }
}

#[async_trait]
impl TopicRepository for MongoTopicRepository {
    async fn create(&self, topic: PracticeTopic) -> AppResult<PracticeTopic> {
        self.collection.insert_one(&topic).await?;
        Ok(topic)
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<PracticeTopic>> {
        let topic = self.collection.find_one(doc! { "id": id }).await?;
        Ok(topic)
    }

    async fn list_by_folder(&self, subject_folder_id: &str) -> AppResult<Vec<PracticeTopic>> {
        let topics = self
            .collection
            .find(doc! { "subject_folder_id": subject_folder_id })
            .sort(doc! { "order_index": 1, "name": 1 })
            .await?
            .try_collect()
            .await?;
        Ok(topics)
    }

    async fn count_by_folder(&self, subject_folder_id: &str) -> AppResult<i64> {
        let count = self
            .collection
            .count_documents(doc! { "subject_folder_id": subject_folder_id })
            .await?;
        Ok(count as i64)
    }

    async fn update(&self, topic: PracticeTopic) -> AppResult<PracticeTopic> {
        let result = self
            .collection
            .replace_one(doc! { "id": &topic.id }, &topic)
            .await?;

        if result.matched_count == 0 {
            return Err(AppError::NotFound(format!(
                "Topic with id '{}' not found",
                topic.id
            )));
        }

        Ok(topic)
    }

    async fn delete(&self, id: &str) -> AppResult<()> {
        let result = self.collection.delete_one(doc! { "id": id }).await?;

        if result.deleted_count == 0 {
            return Err(AppError::NotFound(format!("Topic with id '{}' not found", id)));
        }

        Ok(())
    }
}
