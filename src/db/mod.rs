use mongodb::{
    bson::doc,
    options::{ClientOptions, ServerApi, ServerApiVersion},
    Client, Collection,
};
use std::time::Duration;

use crate::{
    config::Config,
    errors::{AppError, AppResult},
};

/// Collection names shared by the repositories and the readiness check.
pub mod collections {
    pub const FOLDERS: &str = "folders";
    pub const FILES: &str = "files";
    pub const TOPICS: &str = "practice_topics";
    pub const QUESTIONS: &str = "practice_questions";
    pub const QUIZZES: &str = "quizzes";
    pub const QUIZ_QUESTIONS: &str = "quiz_questions";
    pub const ATTEMPTS: &str = "quiz_attempts";
    pub const ATTEMPT_ANSWERS: &str = "quiz_attempt_answers";

    pub const ALL: [&str; 8] = [
        FOLDERS,
        FILES,
        TOPICS,
        QUESTIONS,
        QUIZZES,
        QUIZ_QUESTIONS,
        ATTEMPTS,
        ATTEMPT_ANSWERS,
    ];
}

#[derive(Clone)]
pub struct Database {
    client: Client,
    db_name: String,
}

impl Database {
    pub async fn connect(config: &Config) -> AppResult<Self> {
        let mut client_options = ClientOptions::parse(&config.mongo_conn_string).await?;

        let server_api = ServerApi::builder().version(ServerApiVersion::V1).build();
        client_options.server_api = Some(server_api);
        client_options.app_name = Some("polyhub-server".to_string());
        client_options.max_pool_size = Some(10);
        client_options.min_pool_size = Some(2);
        client_options.connect_timeout = Some(Duration::from_secs(5));
        client_options.server_selection_timeout = Some(Duration::from_secs(5));

        let database = Self {
            client: Client::with_options(client_options)?,
            db_name: config.mongo_db_name.clone(),
        };
        database.ping().await?;

        log::info!("Connected to MongoDB database '{}'", database.db_name);
        Ok(database)
    }

    pub fn get_collection<T>(&self, collection_name: &str) -> Collection<T>
    where
        T: Send + Sync,
    {
        self.client
            .database(&self.db_name)
            .collection(collection_name)
    }

    async fn ping(&self) -> AppResult<()> {
        self.client
            .database("admin")
            .run_command(doc! { "ping": 1 })
            .await?;
        Ok(())
    }

    /// Ready once the server answers and every collection exists. Index
    /// creation at startup creates them, so a missing one means the
    /// bootstrap did not finish.
    pub async fn health_check(&self) -> AppResult<()> {
        let existing = self
            .client
            .database(&self.db_name)
            .list_collection_names()
            .await?;

        let missing = missing_collections(&existing);
        if !missing.is_empty() {
            return Err(AppError::DatabaseError(format!(
                "Missing collections: {}",
                missing.join(", ")
            )));
        }
        Ok(())
    }
}

fn missing_collections(existing: &[String]) -> Vec<&'static str> {
    collections::ALL
        .into_iter()
        .filter(|name| !existing.iter().any(|e| e == name))
        .collect()
}
