use std::collections::HashSet;
use std::sync::Arc;

use validator::Validate;

use crate::{
    errors::{AppError, AppResult},
    models::{
        domain::Folder,
        dto::{
            request::{BulkCreateFoldersRequest, CreateFolderRequest, UpdateFolderRequest},
            response::DeleteResponse,
        },
    },
    repositories::{FileRepository, FolderRepository},
    services::{import::folder_outline::parse_outline, topic_service::TopicService},
};

// Guards path walks against corrupted parent chains.
const MAX_FOLDER_DEPTH: usize = 64;

pub struct FolderService {
    folders: Arc<dyn FolderRepository>,
    files: Arc<dyn FileRepository>,
    topics: Arc<TopicService>,
}

impl FolderService {
    pub fn new(
        folders: Arc<dyn FolderRepository>,
        files: Arc<dyn FileRepository>,
        topics: Arc<TopicService>,
    ) -> Self {
        Self {
            folders,
            files,
            topics,
        }
    }

    pub async fn get_folder(&self, id: &str) -> AppResult<Folder> {
        self.folders
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Folder with id '{}' not found", id)))
    }

    pub async fn list_roots(&self) -> AppResult<Vec<Folder>> {
        self.folders.list_roots().await
    }

    pub async fn list_children(&self, id: &str) -> AppResult<Vec<Folder>> {
        self.get_folder(id).await?;
        self.folders.list_children(id).await
    }

    /// Breadcrumb from the root folder down to `id`, inclusive.
    pub async fn get_path(&self, id: &str) -> AppResult<Vec<Folder>> {
        let mut path = vec![self.get_folder(id).await?];

        while let Some(parent_id) = path.last().and_then(|f| f.parent_id.clone()) {
            if path.len() >= MAX_FOLDER_DEPTH {
                return Err(AppError::InternalError(format!(
                    "Folder '{}' exceeds the maximum nesting depth",
                    id
                )));
            }
            path.push(self.get_folder(&parent_id).await?);
        }

        path.reverse();
        Ok(path)
    }

    pub async fn create_folder(&self, request: CreateFolderRequest) -> AppResult<Folder> {
        request.validate()?;

        if let Some(parent_id) = request.parent_id.as_deref() {
            self.get_folder(parent_id).await?;
        }

        let folder = Folder::new(
            &request.name,
            request.parent_id.as_deref(),
            request.thumbnail.as_deref(),
        );
        let folder = self.folders.create(folder).await?;

        log::info!("Created folder '{}' ({})", folder.name, folder.id);
        Ok(folder)
    }

    pub async fn update_folder(&self, id: &str, request: UpdateFolderRequest) -> AppResult<Folder> {
        request.validate()?;

        let mut folder = self.get_folder(id).await?;

        if let Some(name) = request.name.as_deref() {
            folder.name = name.trim().to_string();
        }
        if let Some(thumbnail) = request.thumbnail {
            folder.thumbnail = Some(thumbnail);
        }

        if request.move_to_root {
            folder.parent_id = None;
        } else if let Some(new_parent) = request.parent_id {
            self.ensure_not_descendant(id, &new_parent).await?;
            folder.parent_id = Some(new_parent);
        }

        folder.modified_at = Some(chrono::Utc::now());
        self.folders.update(folder).await
    }

    /// Rejects moving `id` under itself or one of its descendants.
    async fn ensure_not_descendant(&self, id: &str, new_parent: &str) -> AppResult<()> {
        let ancestors = self.get_path(new_parent).await?;
        if ancestors.iter().any(|f| f.id == id) {
            return Err(AppError::ValidationError(
                "A folder cannot be moved into itself or one of its subfolders".to_string(),
            ));
        }
        Ok(())
    }

    /// Deletes the folder, every folder below it, their file records and the
    /// practice topics keyed by any of them.
    /// Root folders are not protected here; admin role is the only gate.
    pub async fn delete_folder(&self, id: &str) -> AppResult<DeleteResponse> {
        let folder = self.get_folder(id).await?;

        let mut subtree = vec![folder.id.clone()];
        let mut seen: HashSet<String> = subtree.iter().cloned().collect();
        let mut cursor = 0;
        while cursor < subtree.len() {
            let children = self.folders.list_children(&subtree[cursor]).await?;
            for child in children {
                if seen.insert(child.id.clone()) {
                    subtree.push(child.id);
                }
            }
            cursor += 1;
        }

        let topics_removed = self.topics.delete_folder_topics(&subtree).await?;
        let files_removed = self.files.delete_by_folders(&subtree).await?;
        let folders_removed = self.folders.delete_many(&subtree).await?;

        if folder.is_root() {
            log::warn!("Deleted root folder '{}' ({})", folder.name, folder.id);
        }
        log::info!(
            "Deleted folder {} with {} folders, {} files and {} topics",
            folder.id,
            folders_removed,
            files_removed,
            topics_removed
        );

        Ok(DeleteResponse {
            message: format!(
                "Deleted {} folder(s), {} file(s) and {} topic(s)",
                folders_removed, files_removed, topics_removed
            ),
        })
    }

    /// Creates one folder per outline line, strictly in order so that a parent
    /// exists before its children. The first failure aborts the batch; folders
    /// created before it are kept.
    pub async fn bulk_create(&self, request: BulkCreateFoldersRequest) -> AppResult<Vec<Folder>> {
        request.validate()?;

        let nodes = parse_outline(&request.outline);
        if nodes.is_empty() {
            return Err(AppError::ValidationError(
                "Outline contains no folder names".to_string(),
            ));
        }

        if let Some(parent_id) = request.parent_id.as_deref() {
            self.get_folder(parent_id).await?;
        }

        let mut created: Vec<Folder> = Vec::with_capacity(nodes.len());
        for node in &nodes {
            let parent_id = match node.parent {
                Some(index) => Some(created[index].id.as_str()),
                None => request.parent_id.as_deref(),
            };

            let folder = Folder::new(&node.name, parent_id, None);
            match self.folders.create(folder).await {
                Ok(folder) => created.push(folder),
                Err(err) => {
                    log::error!(
                        "Bulk folder creation stopped at line {} ('{}') after {} folder(s): {}",
                        node.line,
                        node.name,
                        created.len(),
                        err
                    );
                    return Err(err);
                }
            }
        }

        log::info!("Bulk created {} folders", created.len());
        Ok(created)
    }
}
