use actix_web::{delete, get, post, put, web, HttpResponse};

use crate::{
    app_state::AppState,
    auth::{AdminUser, MaybeUser},
    errors::AppError,
    models::dto::request::{
        CreateQuizRequest, PaginationParams, QuizListParams, ReplaceQuizQuestionsRequest,
        UpdateQuizRequest,
    },
};

#[get("/api/quizzes")]
async fn list_quizzes(
    state: web::Data<AppState>,
    query: web::Query<QuizListParams>,
) -> Result<HttpResponse, AppError> {
    let page = state.quiz_service.list_quizzes(&query).await?;
    Ok(HttpResponse::Ok().json(page))
}

#[post("/api/quizzes")]
async fn create_quiz(
    state: web::Data<AppState>,
    request: web::Json<CreateQuizRequest>,
    _admin: AdminUser,
) -> Result<HttpResponse, AppError> {
    let detail = state.quiz_service.create_quiz(request.into_inner()).await?;
    Ok(HttpResponse::Created().json(detail))
}

#[get("/api/quizzes/{id}")]
async fn get_quiz(
    state: web::Data<AppState>,
    id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let detail = state.quiz_service.get_quiz_detail(&id).await?;
    Ok(HttpResponse::Ok().json(detail))
}

#[put("/api/quizzes/{id}")]
async fn update_quiz(
    state: web::Data<AppState>,
    id: web::Path<String>,
    request: web::Json<UpdateQuizRequest>,
    _admin: AdminUser,
) -> Result<HttpResponse, AppError> {
    let quiz = state
        .quiz_service
        .update_quiz(&id, request.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(quiz))
}

#[put("/api/quizzes/{id}/questions")]
async fn replace_quiz_questions(
    state: web::Data<AppState>,
    id: web::Path<String>,
    request: web::Json<ReplaceQuizQuestionsRequest>,
    _admin: AdminUser,
) -> Result<HttpResponse, AppError> {
    let detail = state
        .quiz_service
        .replace_questions(&id, request.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(detail))
}

#[delete("/api/quizzes/{id}")]
async fn delete_quiz(
    state: web::Data<AppState>,
    id: web::Path<String>,
    _admin: AdminUser,
) -> Result<HttpResponse, AppError> {
    let response = state.quiz_service.delete_quiz(&id).await?;
    Ok(HttpResponse::Ok().json(response))
}

#[get("/api/quizzes/{id}/attempts")]
async fn list_quiz_attempts(
    state: web::Data<AppState>,
    id: web::Path<String>,
    query: web::Query<PaginationParams>,
    _admin: AdminUser,
) -> Result<HttpResponse, AppError> {
    let page = state
        .attempt_service
        .list_quiz_attempts(&id, &query)
        .await?;
    Ok(HttpResponse::Ok().json(page))
}

#[post("/api/quizzes/{id}/attempts")]
async fn start_attempt(
    state: web::Data<AppState>,
    id: web::Path<String>,
    user: MaybeUser,
) -> Result<HttpResponse, AppError> {
    let attempt = state
        .attempt_service
        .start_attempt(&id, user.claims())
        .await?;
    Ok(HttpResponse::Created().json(attempt))
}
