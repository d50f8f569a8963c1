use actix_web::{get, post, web, HttpResponse};
use validator::Validate;

use crate::{
    app_state::AppState,
    auth::{AdminUser, AuthenticatedUser},
    errors::AppError,
    models::dto::{request::AdminLoginRequest, response::AdminTokenResponse},
};

#[post("/api/auth/admin")]
async fn admin_login(
    state: web::Data<AppState>,
    request: web::Json<AdminLoginRequest>,
) -> Result<HttpResponse, AppError> {
    let request = request.into_inner();
    request.validate()?;

    let token = state.jwt_service.issue_admin_token(&request.password)?;
    log::info!("Issued admin token");

    Ok(HttpResponse::Ok().json(AdminTokenResponse {
        token,
        expires_in_hours: state.jwt_service.expiration_hours(),
    }))
}

#[get("/api/auth/verify")]
async fn verify_token(auth: AuthenticatedUser) -> Result<HttpResponse, AppError> {
    Ok(HttpResponse::Ok().json(auth.0))
}

#[get("/api/auth/admin/verify")]
async fn verify_admin(admin: AdminUser) -> Result<HttpResponse, AppError> {
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "valid": true,
        "role": admin.0.role,
    })))
}
