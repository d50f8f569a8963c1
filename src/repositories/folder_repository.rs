use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{bson::doc, options::IndexOptions, Collection, IndexModel};

use crate::{
    db::{collections, Database},
    errors::{AppError, AppResult},
    models::domain::Folder,
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FolderRepository: Send + Sync {
    async fn create(&self, folder: Folder) -> AppResult<Folder>;
    async fn find_by_id(&self, id: &str) -> AppResult<Option<Folder>>;
    async fn list_roots(&self) -> AppResult<Vec<Folder>>;
    async fn list_children(&self, parent_id: &str) -> AppResult<Vec<Folder>>;
    async fn update(&self, folder: Folder) -> AppResult<Folder>;
    async fn delete_many(&self, ids: &[String]) -> AppResult<u64>;
}

pub struct MongoFolderRepository {
    collection: Collection<Folder>,
}

impl MongoFolderRepository {
    pub fn new(db: &Database) -> Self {
        let collection = db.get_collection(collections::FOLDERS);
        Self { collection }
    }

    pub async fn ensure_indexes(&self) -> AppResult<()> {
        log::info!("Creating indexes for folders collection");

        let id_index = IndexModel::builder()
            .keys(doc! { "id": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("id_unique".to_string())
                    .build(),
            )
            .build();

        let parent_index = IndexModel::builder()
            .keys(doc! { "parent_id": 1, "name": 1 })
            .options(IndexOptions::builder().name("parent_name".to_string()).build())
            .build();

        self.collection.create_index(id_index).await?;
        self.collection.create_index(parent_index).await?;

        log::info!("Successfully created indexes for folders collection");
        Ok(())
    }
}

#[async_trait]
impl FolderRepository for MongoFolderRepository {
    async fn create(&self, folder: Folder) -> AppResult<Folder> {
        self.collection.insert_one(&folder).await?;
        Ok(folder)
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<Folder>> {
        let folder = self.collection.find_one(doc! { "id": id }).await?;
        Ok(folder)
    }

    async fn list_roots(&self) -> AppResult<Vec<Folder>> {
        let folders = self
            .collection
            .find(doc! { "parent_id": null })
            .sort(doc! { "name": 1 })
            .await?
            .try_collect()
            .await?;
        Ok(folders)
    }

    async fn list_children(&self, parent_id: &str) -> AppResult<Vec<Folder>> {
        let folders = self
            .collection
            .find(doc! { "parent_id": parent_id })
            .sort(doc! { "name": 1 })
            .await?
            .try_collect()
            .await?;
        Ok(folders)
    }

    async fn update(&self, folder: Folder) -> AppResult<Folder> {
        let result = self
            .collection
            .replace_one(doc! { "id": &folder.id }, &folder)
            .await?;

        if result.matched_count == 0 {
            return Err(AppError::NotFound(format!(
                "Folder with id '{}' not found",
                folder.id
            )));
        }

        Ok(folder)
    }

    async fn delete_many(&self, ids: &[String]) -> AppResult<u64> {
        let result = self
            .collection
            .delete_many(doc! { "id": { "$in": ids.to_vec() } })
            .await?;
        Ok(result.deleted_count)
    }
}
