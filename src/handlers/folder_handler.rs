use actix_web::{delete, get, post, put, web, HttpResponse};

use crate::{
    app_state::AppState,
    auth::AdminUser,
    errors::AppError,
    models::dto::request::{
        BulkCreateFoldersRequest, CreateFileRequest, CreateFolderRequest, UpdateFileRequest,
        UpdateFolderRequest,
    },
};

#[get("/api/folders")]
async fn list_root_folders(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let folders = state.folder_service.list_roots().await?;
    Ok(HttpResponse::Ok().json(folders))
}

#[post("/api/folders")]
async fn create_folder(
    state: web::Data<AppState>,
    request: web::Json<CreateFolderRequest>,
    _admin: AdminUser,
) -> Result<HttpResponse, AppError> {
    let folder = state.folder_service.create_folder(request.into_inner()).await?;
    Ok(HttpResponse::Created().json(folder))
}

#[post("/api/folders/bulk")]
async fn bulk_create_folders(
    state: web::Data<AppState>,
    request: web::Json<BulkCreateFoldersRequest>,
    _admin: AdminUser,
) -> Result<HttpResponse, AppError> {
    let folders = state.folder_service.bulk_create(request.into_inner()).await?;
    Ok(HttpResponse::Created().json(folders))
}

#[get("/api/folders/{id}")]
async fn get_folder(
    state: web::Data<AppState>,
    id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let folder = state.folder_service.get_folder(&id).await?;
    Ok(HttpResponse::Ok().json(folder))
}

#[put("/api/folders/{id}")]
async fn update_folder(
    state: web::Data<AppState>,
    id: web::Path<String>,
    request: web::Json<UpdateFolderRequest>,
    _admin: AdminUser,
) -> Result<HttpResponse, AppError> {
    let folder = state
        .folder_service
        .update_folder(&id, request.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(folder))
}

#[delete("/api/folders/{id}")]
async fn delete_folder(
    state: web::Data<AppState>,
    id: web::Path<String>,
    _admin: AdminUser,
) -> Result<HttpResponse, AppError> {
    let response = state.folder_service.delete_folder(&id).await?;
    Ok(HttpResponse::Ok().json(response))
}

#[get("/api/folders/{id}/children")]
async fn list_child_folders(
    state: web::Data<AppState>,
    id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let folders = state.folder_service.list_children(&id).await?;
    Ok(HttpResponse::Ok().json(folders))
}

#[get("/api/folders/{id}/path")]
async fn get_folder_path(
    state: web::Data<AppState>,
    id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let path = state.folder_service.get_path(&id).await?;
    Ok(HttpResponse::Ok().json(path))
}

#[get("/api/folders/{id}/files")]
async fn list_files(
    state: web::Data<AppState>,
    id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let files = state.file_service.list_files(&id).await?;
    Ok(HttpResponse::Ok().json(files))
}

#[post("/api/folders/{id}/files")]
async fn create_file(
    state: web::Data<AppState>,
    id: web::Path<String>,
    request: web::Json<CreateFileRequest>,
    _admin: AdminUser,
) -> Result<HttpResponse, AppError> {
    let file = state
        .file_service
        .create_file(&id, request.into_inner())
        .await?;
    Ok(HttpResponse::Created().json(file))
}

#[put("/api/files/{id}")]
async fn rename_file(
    state: web::Data<AppState>,
    id: web::Path<String>,
    request: web::Json<UpdateFileRequest>,
    _admin: AdminUser,
) -> Result<HttpResponse, AppError> {
    let file = state
        .file_service
        .rename_file(&id, request.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(file))
}

#[delete("/api/files/{id}")]
async fn delete_file(
    state: web::Data<AppState>,
    id: web::Path<String>,
    _admin: AdminUser,
) -> Result<HttpResponse, AppError> {
    state.file_service.delete_file(&id).await?;
    Ok(HttpResponse::NoContent().finish())
}
