use std::env;
use secrecy::SecretString;

const DEV_JWT_SECRET: &str = "dev_secret_key_change_in_production";
const DEV_ADMIN_PASSWORD: &str = "polyhub-admin";

#[derive(Clone, Debug)]
pub struct Config {
    pub app_env: String,
    pub mongo_conn_string: String,
    pub mongo_db_name: String,
    pub web_server_host: String,
    pub web_server_port: u16,
    pub jwt_secret: SecretString,
    pub jwt_expiration_hours: i64,
    pub admin_password: SecretString,
    pub cors_allowed_origin: String,
    pub max_upload_bytes: usize,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            app_env: env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
            mongo_conn_string: env::var("MONGO_CONN_STRING")
                .unwrap_or_else(|_| "mongodb://localhost:27017".to_string()),
            mongo_db_name: env::var("MONGO_DB_NAME")
                .unwrap_or_else(|_| "polyhub-local".to_string()),
            web_server_host: env::var("WEB_SERVER_HOST")
                .unwrap_or_else(|_| "localhost".to_string()),
            web_server_port: env::var("WEB_SERVER_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            jwt_secret: SecretString::from(
                env::var("JWT_SECRET").unwrap_or_else(|_| DEV_JWT_SECRET.to_string()),
            ),
            jwt_expiration_hours: env::var("JWT_EXPIRATION_HOURS")
                .ok()
                .and_then(|h| h.parse().ok())
                .unwrap_or(24),
            admin_password: SecretString::from(
                env::var("ADMIN_PASSWORD").unwrap_or_else(|_| DEV_ADMIN_PASSWORD.to_string()),
            ),
            cors_allowed_origin: env::var("CORS_ALLOWED_ORIGIN")
                .unwrap_or_else(|_| "http://localhost:3000".to_string()),
            max_upload_bytes: env::var("MAX_UPLOAD_BYTES")
                .ok()
                .and_then(|b| b.parse().ok())
                .unwrap_or(5 * 1024 * 1024),
        }
    }

    pub fn is_production(&self) -> bool {
        self.app_env.eq_ignore_ascii_case("production")
    }

    /// Validate that production-critical configuration is set.
    /// Returns a description of the first problem found.
    pub fn validate_for_production(&self) -> Result<(), String> {
        use secrecy::ExposeSecret;

        let jwt_secret = self.jwt_secret.expose_secret();
        let admin_password = self.admin_password.expose_secret();

        if jwt_secret == DEV_JWT_SECRET {
            return Err(
                "JWT_SECRET is using the default value. Use the auth provider's signing secret."
                    .to_string(),
            );
        }

        if jwt_secret.len() < 32 {
            return Err(format!(
                "JWT_SECRET is too short ({}). Must be at least 32 characters.",
                jwt_secret.len()
            ));
        }

        if admin_password == DEV_ADMIN_PASSWORD {
            return Err(
                "ADMIN_PASSWORD is using the default value. Set ADMIN_PASSWORD.".to_string(),
            );
        }

        Ok(())
    }

    pub fn test_config() -> Self {
        Self {
            app_env: "test".to_string(),
            mongo_conn_string: "mongodb://localhost:27017".to_string(),
            mongo_db_name: "polyhub-test".to_string(),
            web_server_host: "127.0.0.1".to_string(),
            web_server_port: 8080,
            jwt_secret: SecretString::from("test_jwt_secret_key".to_string()),
            jwt_expiration_hours: 1,
            admin_password: SecretString::from("test-admin-password".to_string()),
            cors_allowed_origin: "http://localhost:3000".to_string(),
            max_upload_bytes: 1024 * 1024,
        }
    }
}
