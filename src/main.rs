use actix_cors::Cors;
use actix_web::{http::header, middleware::Logger, web, App, HttpServer};

use polyhub_server::{
    app_state::AppState, auth::IdentityMiddleware, config::Config, handlers,
    middleware::RequestIdMiddleware,
};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let config = Config::from_env();
    if config.is_production() {
        if let Err(problem) = config.validate_for_production() {
            log::error!("Refusing to start: {}", problem);
            return Err(std::io::Error::new(std::io::ErrorKind::InvalidInput, problem));
        }
    }

    let host = config.web_server_host.clone();
    let port = config.web_server_port;
    let max_upload_bytes = config.max_upload_bytes;
    let allowed_origin = config.cors_allowed_origin.clone();

    let state = AppState::new(config).await.map_err(|err| {
        log::error!("Failed to initialise application state: {}", err);
        std::io::Error::other(err.to_string())
    })?;

    let jwt_service = web::Data::from(state.jwt_service.clone());
    let state = web::Data::new(state);

    log::info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        let cors = Cors::default()
            .allowed_origin(&allowed_origin)
            .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
            .allowed_headers(vec![header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT])
            .expose_headers(vec![header::HeaderName::from_static("x-request-id")])
            .max_age(3600);

        App::new()
            .app_data(state.clone())
            .app_data(jwt_service.clone())
            .app_data(web::PayloadConfig::new(max_upload_bytes))
            .wrap(IdentityMiddleware)
            .wrap(RequestIdMiddleware)
            .wrap(cors)
            .wrap(Logger::new(r#"%a "%r" %s %b %{x-request-id}o %Dms"#))
            .configure(handlers::configure)
    })
    .bind((host.as_str(), port))?
    .run()
    .await
}
