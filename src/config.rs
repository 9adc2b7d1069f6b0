use std::{env, time::Duration};

use secrecy::{ExposeSecret, SecretString};

use crate::errors::{AppError, AppResult};

const DEV_JWT_SECRET: &str = "dev_secret_key_change_in_production";

/// Settings for the OpenAI-compatible chat completion endpoint.
#[derive(Clone, Debug)]
pub struct ModelSettings {
    pub api_key: SecretString,
    pub api_base: String,
    pub model: String,
    pub timeout: Duration,
}

#[derive(Clone, Debug)]
pub struct Config {
    pub app_env: String,
    pub mongo_conn_string: String,
    pub mongo_db_name: String,
    pub web_server_host: String,
    pub web_server_port: u16,
    pub cors_allowed_origin: String,
    pub jwt_secret: SecretString,
    pub jwt_expiration_hours: i64,
    pub model: ModelSettings,
    pub tesseract_path: String,
    pub ocr_language: String,
    pub max_upload_bytes: usize,
    pub guest_session_ttl_minutes: i64,
}

fn var_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn parsed_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            app_env: var_or("APP_ENV", "development"),
            mongo_conn_string: var_or("MONGO_CONN_STRING", "mongodb://localhost:27017"),
            mongo_db_name: var_or("MONGO_DB_NAME", "quizcraft-local"),
            web_server_host: var_or("WEB_SERVER_HOST", "localhost"),
            web_server_port: parsed_or("WEB_SERVER_PORT", 8080),
            cors_allowed_origin: var_or("CORS_ALLOWED_ORIGIN", "http://localhost:5173"),
            jwt_secret: SecretString::from(var_or("JWT_SECRET", DEV_JWT_SECRET)),
            jwt_expiration_hours: parsed_or("JWT_EXPIRATION_HOURS", 24),
            model: ModelSettings {
                api_key: SecretString::from(var_or("MODEL_API_KEY", "")),
                api_base: var_or("MODEL_API_BASE", "https://api.openai.com/v1"),
                model: var_or("MODEL_NAME", "gpt-4o-mini"),
                timeout: Duration::from_secs(parsed_or("MODEL_TIMEOUT_SECS", 120)),
            },
            tesseract_path: var_or("TESSERACT_PATH", "tesseract"),
            ocr_language: var_or("OCR_LANGUAGE", "eng"),
            max_upload_bytes: parsed_or("MAX_UPLOAD_BYTES", 16 * 1024 * 1024),
            guest_session_ttl_minutes: parsed_or("GUEST_SESSION_TTL_MINUTES", 120),
        }
    }

    pub fn is_production(&self) -> bool {
        self.app_env.eq_ignore_ascii_case("production")
    }

    /// Rejects configuration that must never reach a production deployment.
    pub fn validate_for_production(&self) -> AppResult<()> {
        let jwt_secret = self.jwt_secret.expose_secret();

        if jwt_secret == DEV_JWT_SECRET {
            return Err(AppError::ValidationError(
                "JWT_SECRET is using the default value".to_string(),
            ));
        }

        if jwt_secret.len() < 32 {
            return Err(AppError::ValidationError(format!(
                "JWT_SECRET is too short ({}); it must be at least 32 characters",
                jwt_secret.len()
            )));
        }

        if self.model.api_key.expose_secret().is_empty() {
            return Err(AppError::ValidationError(
                "MODEL_API_KEY must be set".to_string(),
            ));
        }

        Ok(())
    }

    #[cfg(test)]
    pub fn test_config() -> Self {
        Self {
            app_env: "test".to_string(),
            mongo_conn_string: "mongodb://localhost:27017".to_string(),
            mongo_db_name: "quizcraft-test".to_string(),
            web_server_host: "127.0.0.1".to_string(),
            web_server_port: 8080,
            cors_allowed_origin: "http://localhost:5173".to_string(),
            jwt_secret: SecretString::from("test_jwt_secret_key".to_string()),
            jwt_expiration_hours: 1,
            model: ModelSettings {
                api_key: SecretString::from("test-model-key".to_string()),
                api_base: "http://localhost:9999/v1".to_string(),
                model: "test-model".to_string(),
                timeout: Duration::from_secs(5),
            },
            tesseract_path: "tesseract".to_string(),
            ocr_language: "eng".to_string(),
            max_upload_bytes: 1024 * 1024,
            guest_session_ttl_minutes: 30,
        }
    }
}
