use actix_web::{get, post, put, web, HttpResponse};

use crate::{
    app_state::AppState,
    auth::{AuthenticatedUser, MaybeUser},
    errors::AppError,
    models::dto::request::{AttemptListParams, SaveAnswerRequest, SubmitAnswersRequest},
};

#[get("/api/attempts/{id}")]
async fn get_attempt(
    state: web::Data<AppState>,
    id: web::Path<String>,
    user: MaybeUser,
) -> Result<HttpResponse, AppError> {
    let result = state.attempt_service.get_attempt(&id, user.claims()).await?;
    Ok(HttpResponse::Ok().json(result))
}

#[put("/api/attempts/{id}/answers/{question_id}")]
async fn save_answer(
    state: web::Data<AppState>,
    path: web::Path<(String, String)>,
    request: web::Json<SaveAnswerRequest>,
    user: MaybeUser,
) -> Result<HttpResponse, AppError> {
    let (attempt_id, question_id) = path.into_inner();
    let response = state
        .attempt_service
        .save_answer(&attempt_id, &question_id, request.into_inner(), user.claims())
        .await?;
    Ok(HttpResponse::Ok().json(response))
}

#[post("/api/attempts/{id}/answers")]
async fn submit_answers(
    state: web::Data<AppState>,
    id: web::Path<String>,
    request: web::Json<SubmitAnswersRequest>,
    user: MaybeUser,
) -> Result<HttpResponse, AppError> {
    let response = state
        .attempt_service
        .submit_answers(&id, request.into_inner(), user.claims())
        .await?;
    Ok(HttpResponse::Ok().json(response))
}

#[post("/api/attempts/{id}/finish")]
async fn finish_attempt(
    state: web::Data<AppState>,
    id: web::Path<String>,
    user: MaybeUser,
) -> Result<HttpResponse, AppError> {
    let result = state
        .attempt_service
        .finish_attempt(&id, user.claims())
        .await?;
    Ok(HttpResponse::Ok().json(result))
}

#[get("/api/attempts/{id}/review")]
async fn review_attempt(
    state: web::Data<AppState>,
    id: web::Path<String>,
    user: MaybeUser,
) -> Result<HttpResponse, AppError> {
    let review = state
        .attempt_service
        .review_attempt(&id, user.claims())
        .await?;
    Ok(HttpResponse::Ok().json(review))
}

#[get("/api/me/attempts")]
async fn list_my_attempts(
    state: web::Data<AppState>,
    query: web::Query<AttemptListParams>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let page = state
        .attempt_service
        .list_user_attempts(&auth.0.sub, &query)
        .await?;
    Ok(HttpResponse::Ok().json(page))
}
