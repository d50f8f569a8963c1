use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{bson::doc, options::IndexOptions, Collection, IndexModel};

use crate::{
    db::{collections, Database},
    errors::{AppError, AppResult},
    models::domain::FileRecord,
};

#[async_trait]
pub trait FileRepository: Send + Sync {
    async fn create(&self, file: FileRecord) -> AppResult<FileRecord>;
    async fn find_by_id(&self, id: &str) -> AppResult<Option<FileRecord>>;
    async fn list_by_folder(&self, folder_id: &str) -> AppResult<Vec<FileRecord>>;
    async fn update(&self, file: FileRecord) -> AppResult<FileRecord>;
    async fn delete(&self, id: &str) -> AppResult<()>;
    async fn delete_by_folders(&self, folder_ids: &[String]) -> AppResult<u64>;
}

pub struct MongoFileRepository {
    collection: Collection<FileRecord>,
}

impl MongoFileRepository {
    pub fn new(db: &Database) -> Self {
        let collection = db.get_collection(collections::FILES);
        Self { collection }
    }

    pub async fn ensure_indexes(&self) -> AppResult<()> {
        log::info!("Creating indexes for files collection");

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
            .keys(doc! { "folder_id": 1 })
            .options(IndexOptions::builder().name("folder_id".to_string()).build())
            .build();

        self.collection.create_index(id_index).await?;
        self.collection.create_index(folder_index).await?;

        log::info!("Successfully created indexes for files collection");
        Ok(())
    }
}

#[async_trait]
impl FileRepository for MongoFileRepository {
    async fn create(&self, file: FileRecord) -> AppResult<FileRecord> {
        self.collection.insert_one(&file).await?;
        Ok(file)
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<FileRecord>> {
        let file = self.collection.find_one(doc! { "id": id }).await?;
        Ok(file)
    }

    async fn list_by_folder(&self, folder_id: &str) -> AppResult<Vec<FileRecord>> {
        let files = self
            .collection
            .find(doc! { "folder_id": folder_id })
            .sort(doc! { "file_name": 1 })
            .await?
            .try_collect()
            .await?;
        Ok(files)
    }

    async fn update(&self, file: FileRecord) -> AppResult<FileRecord> {
        let result = self
            .collection
            .replace_one(doc! { "id": &file.id }, &file)
            .await?;

        if result.matched_count == 0 {
            return Err(AppError::NotFound(format!(
                "File with id '{}' not found",
                file.id
            )));
        }

        Ok(file)
    }

    async fn delete(&self, id: &str) -> AppResult<()> {
        let result = self.collection.delete_one(doc! { "id": id }).await?;

        if result.deleted_count == 0 {
            return Err(AppError::NotFound(format!("File with id '{}' not found", id)));
        }

        Ok(())
    }

    async fn delete_by_folders(&self, folder_ids: &[String]) -> AppResult<u64> {
        let result = self
            .collection
            .delete_many(doc! { "folder_id": { "$in": folder_ids.to_vec() } })
            .await?;
        Ok(result.deleted_count)
    }
}
