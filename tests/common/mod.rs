#![allow(dead_code)]

use std::{collections::HashMap, sync::Arc, time::Duration};

use async_trait::async_trait;
use secrecy::SecretString;
use tokio::sync::RwLock;

use quizcraft_server::{
    app_state::AppState,
    config::{Config, ModelSettings},
    errors::{AppError, AppResult},
    models::domain::{Quiz, QuizRecord, User},
    pipeline::OcrEngine,
    repositories::{QuizRepository, UserRepository},
    services::QuizModel,
};

/// Quiz store that keeps the same record shape the Mongo repository writes.
pub struct InMemoryQuizRepository {
    records: Arc<RwLock<HashMap<String, QuizRecord>>>,
}

impl InMemoryQuizRepository {
    pub fn new() -> Self {
        Self {
            records: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

#[async_trait]
impl QuizRepository for InMemoryQuizRepository {
    async fn find_by_id(&self, id: &str) -> AppResult<Option<Quiz>> {
        let records = self.records.read().await;
        records.get(id).cloned().map(Quiz::try_from).transpose()
    }

    async fn list_by_owner(
        &self,
        user_id: &str,
        offset: i64,
        limit: i64,
    ) -> AppResult<(Vec<Quiz>, i64)> {
        let records = self.records.read().await;
        let mut items: Vec<_> = records
            .values()
            .filter(|r| r.user_id == user_id)
            .cloned()
            .collect();
        items.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| a.id.cmp(&b.id)));

        let total = items.len() as i64;
        let page = items
            .into_iter()
            .skip(offset.max(0) as usize)
            .take(limit.max(0) as usize)
            .map(Quiz::try_from)
            .collect::<AppResult<Vec<_>>>()?;

        Ok((page, total))
    }

    async fn create(&self, quiz: Quiz) -> AppResult<Quiz> {
        let record = quiz.to_record()?;
        let mut records = self.records.write().await;

        if records.contains_key(&record.id) {
            return Err(AppError::AlreadyExists(format!(
                "Quiz with id '{}' already exists",
                record.id
            )));
        }
        records.insert(record.id.clone(), record);
        Ok(quiz)
    }

    async fn replace(&self, quiz: Quiz) -> AppResult<Quiz> {
        let record = quiz.to_record()?;
        let mut records = self.records.write().await;

        match records.get_mut(&record.id) {
            Some(existing) => {
                *existing = record;
                Ok(quiz)
            }
            None => Err(AppError::NotFound(format!(
                "Quiz with id '{}' not found",
                quiz.id
            ))),
        }
    }

    async fn delete(&self, id: &str) -> AppResult<()> {
        let mut records = self.records.write().await;
        records
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| AppError::NotFound(format!("Quiz with id '{}' not found", id)))
    }

    async fn ping(&self) -> AppResult<()> {
        Ok(())
    }

    async fn ensure_indexes(&self) -> AppResult<()> {
        Ok(())
    }
}

pub struct InMemoryUserRepository {
    users: Arc<RwLock<HashMap<String, User>>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self {
            users: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: User) -> AppResult<User> {
        let mut users = self.users.write().await;

        let duplicate = users
            .values()
            .any(|u| u.username == user.username || u.email == user.email);
        if duplicate {
            return Err(AppError::AlreadyExists(format!(
                "User '{}' already exists",
                user.username
            )));
        }

        users.insert(user.id.clone(), user.clone());
        Ok(user)
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<User>> {
        Ok(self.users.read().await.get(id).cloned())
    }

    async fn find_by_username(&self, username: &str) -> AppResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.username == username).cloned())
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let email = email.to_lowercase();
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.email == email).cloned())
    }

    async fn ensure_indexes(&self) -> AppResult<()> {
        Ok(())
    }
}

/// Model that answers every prompt with the same reply and records prompts.
pub struct ScriptedModel {
    reply: AppResult<String>,
    pub prompts: Arc<RwLock<Vec<String>>>,
}

impl ScriptedModel {
    pub fn replying(reply: &str) -> Self {
        Self {
            reply: Ok(reply.to_string()),
            prompts: Arc::new(RwLock::new(Vec::new())),
        }
    }

    pub fn failing(err: AppError) -> Self {
        Self {
            reply: Err(err),
            prompts: Arc::new(RwLock::new(Vec::new())),
        }
    }
}

#[async_trait]
impl QuizModel for ScriptedModel {
    async fn complete(&self, prompt: &str) -> AppResult<String> {
        self.prompts.write().await.push(prompt.to_string());
        self.reply.clone()
    }
}

/// OCR stand-in returning fixed text for any image.
pub struct FakeOcr(pub AppResult<String>);

#[async_trait]
impl OcrEngine for FakeOcr {
    async fn recognize(&self, _image: &[u8]) -> AppResult<String> {
        self.0.clone()
    }
}

pub const STUDY_TEXT: &str = "Photosynthesis converts light energy into chemical energy. \
Chlorophyll absorbs mostly blue and red light, and the process releases oxygen.";

/// Five True/False questions in the shape the model is asked for.
pub fn true_false_reply() -> String {
    let items: Vec<String> = (1..=5)
        .map(|i| {
            format!(
                r#"{{"question":"Q{i}","answer":"{}","explanation":"E{i}"}}"#,
                if i % 2 == 1 { "True" } else { "False" }
            )
        })
        .collect();
    format!("Here is your quiz:\n[{}]\nGood luck!", items.join(","))
}

pub fn test_config() -> Config {
    Config {
        app_env: "test".to_string(),
        mongo_conn_string: "mongodb://localhost:27017".to_string(),
        mongo_db_name: "quizcraft-test".to_string(),
        web_server_host: "127.0.0.1".to_string(),
        web_server_port: 8080,
        cors_allowed_origin: "http://localhost:5173".to_string(),
        jwt_secret: SecretString::from("integration_test_jwt_secret".to_string()),
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

pub fn test_state(model: ScriptedModel, ocr: FakeOcr) -> AppState {
    AppState::with_components(
        test_config(),
        Arc::new(InMemoryUserRepository::new()),
        Arc::new(InMemoryQuizRepository::new()),
        Arc::new(model),
        Arc::new(ocr),
    )
}

pub const BOUNDARY: &str = "quizcraft-test-boundary";

pub enum Part<'a> {
    Text(&'a str, &'a str),
    File {
        name: &'a str,
        filename: &'a str,
        content_type: &'a str,
        bytes: &'a [u8],
    },
}

/// Hand-built `multipart/form-data` body using `BOUNDARY`.
pub fn multipart_body(parts: &[Part<'_>]) -> Vec<u8> {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        match part {
            Part::Text(name, value) => {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{}\"\r\n\r\n", name).as_bytes(),
                );
                body.extend_from_slice(value.as_bytes());
            }
            Part::File {
                name,
                filename,
                content_type,
                bytes,
            } => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: {}\r\n\r\n",
                        name, filename, content_type
                    )
                    .as_bytes(),
                );
                body.extend_from_slice(bytes);
            }
        }
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
    body
}

pub fn multipart_content_type() -> String {
    format!("multipart/form-data; boundary={}", BOUNDARY)
}
