use std::collections::HashMap;

use actix_multipart::Multipart;
use futures::TryStreamExt;

use crate::errors::{AppError, AppResult};
use crate::models::domain::quiz::{QuizType, DEFAULT_QUIZ_TITLE};
use crate::pipeline::prompt::validate_question_count;
use crate::pipeline::ContentSource;

pub const DEFAULT_QUESTION_COUNT: i64 = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    pub filename: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMethod {
    Text,
    File,
    Image,
}

impl InputMethod {
    fn parse(value: &str) -> AppResult<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "text" => Ok(InputMethod::Text),
            "file" => Ok(InputMethod::File),
            "image" => Ok(InputMethod::Image),
            other => Err(AppError::ValidationError(format!(
                "Unknown input method '{}'",
                other
            ))),
        }
    }
}

/// Multipart parts split into text fields and file uploads.
#[derive(Debug, Default)]
pub struct RawForm {
    pub fields: HashMap<String, String>,
    pub files: HashMap<String, UploadedFile>,
}

impl RawForm {
    /// Reads every part, refusing payloads larger than `max_bytes` in total.
    /// File inputs submitted without a file are dropped.
    pub async fn read(mut payload: Multipart, max_bytes: usize) -> AppResult<Self> {
        let mut form = RawForm::default();
        let mut total = 0usize;

        while let Some(mut field) = payload.try_next().await? {
            let name = field.name().unwrap_or_default().to_string();
            let filename = field
                .content_disposition()
                .and_then(|cd| cd.get_filename())
                .map(str::to_string);

            let mut bytes = Vec::new();
            while let Some(chunk) = field.try_next().await? {
                total += chunk.len();
                if total > max_bytes {
                    return Err(AppError::ValidationError(format!(
                        "Upload exceeds the {} byte limit",
                        max_bytes
                    )));
                }
                bytes.extend_from_slice(&chunk);
            }

            match filename {
                Some(filename) if !filename.is_empty() && !bytes.is_empty() => {
                    form.files.insert(name, UploadedFile { filename, bytes });
                }
                Some(_) => {}
                None => {
                    let value = String::from_utf8(bytes).map_err(|_| {
                        AppError::ValidationError(format!("Field '{}' is not valid UTF-8", name))
                    })?;
                    form.fields.insert(name, value);
                }
            }
        }

        Ok(form)
    }
}

/// The quiz generation form: title, type, count and one content source.
#[derive(Debug, Clone)]
pub struct GenerateQuizForm {
    pub quiz_title: String,
    pub quiz_type: QuizType,
    pub question_count: i64,
    pub input_method: InputMethod,
    pub content: Option<String>,
    pub file: Option<UploadedFile>,
    pub image: Option<UploadedFile>,
}

impl GenerateQuizForm {
    pub async fn from_multipart(payload: Multipart, max_bytes: usize) -> AppResult<Self> {
        Self::from_raw(RawForm::read(payload, max_bytes).await?)
    }

    /// Checks title, type and count up front so a bad form never reaches
    /// extraction or OCR.
    pub fn from_raw(mut raw: RawForm) -> AppResult<Self> {
        let field = |name: &str| {
            raw.fields
                .get(name)
                .map(|v| v.trim())
                .filter(|v| !v.is_empty())
        };

        let quiz_title = field("quiz_title").unwrap_or(DEFAULT_QUIZ_TITLE).to_string();

        let quiz_type = match field("quiz_type") {
            Some(value) => QuizType::from_label(value).ok_or_else(|| {
                AppError::ValidationError(format!("Unknown quiz type '{}'", value))
            })?,
            None => {
                return Err(AppError::ValidationError(
                    "Please select a quiz type".to_string(),
                ))
            }
        };

        let question_count = match field("question_count") {
            Some(value) => value.parse::<i64>().map_err(|_| {
                AppError::ValidationError(format!("Question count '{}' is not a number", value))
            })?,
            None => DEFAULT_QUESTION_COUNT,
        };
        validate_question_count(question_count)?;

        let input_method = match field("input_method") {
            Some(value) => InputMethod::parse(value)?,
            None if raw.files.contains_key("file") => InputMethod::File,
            None if raw.files.contains_key("image") => InputMethod::Image,
            None => InputMethod::Text,
        };

        Ok(GenerateQuizForm {
            quiz_title,
            quiz_type,
            question_count,
            input_method,
            content: raw.fields.remove("content"),
            file: raw.files.remove("file"),
            image: raw.files.remove("image"),
        })
    }

    /// The source picked by `input_method`; missing input is `EmptyContent`.
    pub fn into_content_source(self) -> AppResult<ContentSource> {
        match self.input_method {
            InputMethod::Text => self
                .content
                .filter(|c| !c.trim().is_empty())
                .map(ContentSource::Text),
            InputMethod::File => self.file.map(|f| ContentSource::Document {
                filename: f.filename,
                bytes: f.bytes,
            }),
            InputMethod::Image => self.image.map(|f| ContentSource::Image { bytes: f.bytes }),
        }
        .ok_or(AppError::EmptyContent)
    }
}
