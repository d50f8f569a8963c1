use std::sync::Arc;

use validator::Validate;

use crate::{
    errors::{AppError, AppResult},
    models::{
        domain::FileRecord,
        dto::request::{CreateFileRequest, UpdateFileRequest},
    },
    repositories::{FileRepository, FolderRepository},
};

pub struct FileService {
    files: Arc<dyn FileRepository>,
    folders: Arc<dyn FolderRepository>,
}

impl FileService {
    pub fn new(files: Arc<dyn FileRepository>, folders: Arc<dyn FolderRepository>) -> Self {
        Self { files, folders }
    }

    async fn ensure_folder(&self, folder_id: &str) -> AppResult<()> {
        self.folders
            .find_by_id(folder_id)
            .await?
            .map(|_| ())
            .ok_or_else(|| AppError::NotFound(format!("Folder with id '{}' not found", folder_id)))
    }

    pub async fn get_file(&self, id: &str) -> AppResult<FileRecord> {
        self.files
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("File with id '{}' not found", id)))
    }

    pub async fn list_files(&self, folder_id: &str) -> AppResult<Vec<FileRecord>> {
        self.ensure_folder(folder_id).await?;
        self.files.list_by_folder(folder_id).await
    }

    /// Registers a file that was uploaded elsewhere; only its URL is stored.
    pub async fn create_file(
        &self,
        folder_id: &str,
        request: CreateFileRequest,
    ) -> AppResult<FileRecord> {
        request.validate()?;
        self.ensure_folder(folder_id).await?;

        let file = FileRecord::new(folder_id, request.file_name.trim(), &request.file_url);
        self.files.create(file).await
    }

    pub async fn rename_file(&self, id: &str, request: UpdateFileRequest) -> AppResult<FileRecord> {
        request.validate()?;

        let mut file = self.get_file(id).await?;
        file.file_name = request.file_name.trim().to_string();
        self.files.update(file).await
    }

    pub async fn delete_file(&self, id: &str) -> AppResult<()> {
        self.get_file(id).await?;
        self.files.delete(id).await
    }
}
