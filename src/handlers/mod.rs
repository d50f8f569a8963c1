pub mod attempt_handler;
pub mod auth_handler;
pub mod folder_handler;
pub mod health_handler;
pub mod question_handler;
pub mod quiz_handler;
pub mod topic_handler;

use actix_web::web;

use crate::errors::AppError;

/// Malformed JSON bodies and query strings become 400s in the shared error shape.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        AppError::ValidationError(format!("Invalid request body: {}", err)).into()
    })
}

pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(|err, _req| {
        AppError::ValidationError(format!("Invalid query string: {}", err)).into()
    })
}

pub fn path_config() -> web::PathConfig {
    web::PathConfig::default().error_handler(|err, _req| {
        AppError::ValidationError(format!("Invalid path: {}", err)).into()
    })
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .app_data(query_config())
        .app_data(path_config())
        .service(health_handler::health_check)
        .service(health_handler::health_check_live)
        .service(health_handler::health_check_ready)
        .service(auth_handler::admin_login)
        .service(auth_handler::verify_token)
        .service(auth_handler::verify_admin)
        .service(folder_handler::list_root_folders)
        .service(folder_handler::create_folder)
        .service(folder_handler::bulk_create_folders)
        .service(folder_handler::get_folder)
        .service(folder_handler::update_folder)
        .service(folder_handler::delete_folder)
        .service(folder_handler::list_child_folders)
        .service(folder_handler::get_folder_path)
        .service(folder_handler::list_files)
        .service(folder_handler::create_file)
        .service(folder_handler::rename_file)
        .service(folder_handler::delete_file)
        .service(topic_handler::list_topics)
        .service(topic_handler::create_topic)
        .service(topic_handler::get_topic)
        .service(topic_handler::update_topic)
        .service(topic_handler::delete_topic)
        .service(topic_handler::list_topic_questions)
        .service(topic_handler::create_question)
        .service(topic_handler::import_questions)
        .service(topic_handler::list_practice_questions)
        .service(question_handler::update_question)
        .service(question_handler::delete_question)
        .service(question_handler::check_answer)
        .service(quiz_handler::list_quizzes)
        .service(quiz_handler::create_quiz)
        .service(quiz_handler::get_quiz)
        .service(quiz_handler::update_quiz)
        .service(quiz_handler::replace_quiz_questions)
        .service(quiz_handler::delete_quiz)
        .service(quiz_handler::list_quiz_attempts)
        .service(quiz_handler::start_attempt)
        .service(attempt_handler::get_attempt)
        .service(attempt_handler::save_answer)
        .service(attempt_handler::submit_answers)
        .service(attempt_handler::finish_attempt)
        .service(attempt_handler::review_attempt)
        .service(attempt_handler::list_my_attempts);
}
