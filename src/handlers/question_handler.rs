use actix_web::{delete, post, put, web, HttpResponse};

use crate::{
    app_state::AppState,
    auth::AdminUser,
    errors::AppError,
    models::dto::request::{CheckAnswerRequest, QuestionRequest},
};

#[put("/api/questions/{id}")]
async fn update_question(
    state: web::Data<AppState>,
    id: web::Path<String>,
    request: web::Json<QuestionRequest>,
    _admin: AdminUser,
) -> Result<HttpResponse, AppError> {
    let question = state
        .question_service
        .update_question(&id, request.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(question))
}

#[delete("/api/questions/{id}")]
async fn delete_question(
    state: web::Data<AppState>,
    id: web::Path<String>,
    _admin: AdminUser,
) -> Result<HttpResponse, AppError> {
    state.question_service.delete_question(&id).await?;
    Ok(HttpResponse::NoContent().finish())
}

#[post("/api/questions/{id}/check")]
async fn check_answer(
    state: web::Data<AppState>,
    id: web::Path<String>,
    request: web::Json<CheckAnswerRequest>,
) -> Result<HttpResponse, AppError> {
    let feedback = state
        .question_service
        .check_answer(&id, request.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(feedback))
}
