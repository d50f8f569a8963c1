use actix_web::{delete, get, http::header::CONTENT_TYPE, post, put, web, HttpRequest, HttpResponse};

use crate::{
    app_state::AppState,
    auth::AdminUser,
    errors::AppError,
    models::dto::request::{
        CreateTopicRequest, ImportParams, PaginationParams, QuestionRequest, UpdateTopicRequest,
    },
    services::import::question_sheet::SheetFormat,
};

#[get("/api/folders/{id}/topics")]
async fn list_topics(
    state: web::Data<AppState>,
    folder_id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let topics = state.topic_service.list_topics(&folder_id).await?;
    Ok(HttpResponse::Ok().json(topics))
}

#[post("/api/folders/{id}/topics")]
async fn create_topic(
    state: web::Data<AppState>,
    folder_id: web::Path<String>,
    request: web::Json<CreateTopicRequest>,
    _admin: AdminUser,
) -> Result<HttpResponse, AppError> {
    let topic = state
        .topic_service
        .create_topic(&folder_id, request.into_inner())
        .await?;
    Ok(HttpResponse::Created().json(topic))
}

#[get("/api/topics/{id}")]
async fn get_topic(
    state: web::Data<AppState>,
    id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let topic = state.topic_service.get_topic(&id).await?;
    Ok(HttpResponse::Ok().json(topic))
}

#[put("/api/topics/{id}")]
async fn update_topic(
    state: web::Data<AppState>,
    id: web::Path<String>,
    request: web::Json<UpdateTopicRequest>,
    _admin: AdminUser,
) -> Result<HttpResponse, AppError> {
    let topic = state
        .topic_service
        .update_topic(&id, request.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(topic))
}

#[delete("/api/topics/{id}")]
async fn delete_topic(
    state: web::Data<AppState>,
    id: web::Path<String>,
    _admin: AdminUser,
) -> Result<HttpResponse, AppError> {
    let response = state.topic_service.delete_topic(&id).await?;
    Ok(HttpResponse::Ok().json(response))
}

#[get("/api/topics/{id}/questions")]
async fn list_topic_questions(
    state: web::Data<AppState>,
    id: web::Path<String>,
    query: web::Query<PaginationParams>,
    _admin: AdminUser,
) -> Result<HttpResponse, AppError> {
    let page = state.question_service.list_questions(&id, &query).await?;
    Ok(HttpResponse::Ok().json(page))
}

#[post("/api/topics/{id}/questions")]
async fn create_question(
    state: web::Data<AppState>,
    id: web::Path<String>,
    request: web::Json<QuestionRequest>,
    _admin: AdminUser,
) -> Result<HttpResponse, AppError> {
    let question = state
        .question_service
        .create_question(&id, request.into_inner())
        .await?;
    Ok(HttpResponse::Created().json(question))
}

/// The spreadsheet is the raw request body, read only after the admin check.
#[post("/api/topics/{id}/questions/import")]
async fn import_questions(
    state: web::Data<AppState>,
    _admin: AdminUser,
    req: HttpRequest,
    id: web::Path<String>,
    query: web::Query<ImportParams>,
    body: web::Bytes,
) -> Result<HttpResponse, AppError> {
    if body.is_empty() {
        return Err(AppError::ValidationError("Upload is empty".to_string()));
    }

    let content_type = req
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok());
    let format = SheetFormat::detect(
        query.format.as_deref(),
        query.filename.as_deref(),
        content_type,
    )?;

    let report = state
        .question_service
        .import_questions(&id, &body, format)
        .await?;
    Ok(HttpResponse::Created().json(report))
}

#[get("/api/topics/{id}/practice")]
async fn list_practice_questions(
    state: web::Data<AppState>,
    id: web::Path<String>,
    query: web::Query<PaginationParams>,
) -> Result<HttpResponse, AppError> {
    let page = state
        .question_service
        .list_practice_questions(&id, &query)
        .await?;
    Ok(HttpResponse::Ok().json(page))
}
