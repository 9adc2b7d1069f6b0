use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use async_graphql::ErrorExtensions;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum AppError {
    #[error("Unsupported file format: {0}. Please upload PDF, DOCX, TXT, or CSV files")]
    UnsupportedFormat(String),

    #[error("OCR engine unavailable: {0}")]
    OcrUnavailable(String),

    #[error("Could not extract sufficient text from the image. Please try a clearer image")]
    InsufficientText,

    #[error("Please provide some content for the quiz")]
    EmptyContent,

    #[error("Could not read the uploaded content: {0}")]
    ExtractionFailed(String),

    #[error("Content is too short. Please provide at least {0} characters of text")]
    MinimumContentNotMet(usize),

    #[error("Question count must be between {min} and {max}, got {requested}")]
    QuestionCountOutOfRange { requested: i64, min: u32, max: u32 },

    #[error("Invalid response format from the language model: {0}")]
    MalformedResponse(String),

    #[error("The quiz contains no questions")]
    EmptyQuiz,

    #[error("Could not generate the PDF document")]
    RenderFailure(String),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Language model request failed: {0}")]
    ModelError(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Already exists: {0}")]
    AlreadyExists(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Internal server error: {0}")]
    InternalError(String),
}

impl AppError {
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::UnsupportedFormat(_) => "UNSUPPORTED_FORMAT",
            AppError::OcrUnavailable(_) => "OCR_UNAVAILABLE",
            AppError::InsufficientText => "INSUFFICIENT_TEXT",
            AppError::EmptyContent => "EMPTY_CONTENT",
            AppError::ExtractionFailed(_) => "EXTRACTION_FAILED",
            AppError::MinimumContentNotMet(_) => "MINIMUM_CONTENT_NOT_MET",
            AppError::QuestionCountOutOfRange { .. } => "QUESTION_COUNT_OUT_OF_RANGE",
            AppError::MalformedResponse(_) => "MALFORMED_RESPONSE",
            AppError::EmptyQuiz => "EMPTY_QUIZ",
            AppError::RenderFailure(_) => "RENDER_FAILURE",
            AppError::PermissionDenied(_) => "PERMISSION_DENIED",
            AppError::ModelError(_) => "MODEL_ERROR",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::AlreadyExists(_) => "ALREADY_EXISTS",
            AppError::ValidationError(_) => "VALIDATION_ERROR",
            AppError::DatabaseError(_) => "DATABASE_ERROR",
            AppError::Unauthorized(_) => "UNAUTHORIZED",
            AppError::InternalError(_) => "INTERNAL_ERROR",
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: &'static str,
    pub status: u16,
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::UnsupportedFormat(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            AppError::OcrUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::InsufficientText
            | AppError::EmptyContent
            | AppError::MinimumContentNotMet(_)
            | AppError::QuestionCountOutOfRange { .. }
            | AppError::ValidationError(_) => StatusCode::BAD_REQUEST,
            AppError::ExtractionFailed(_) | AppError::EmptyQuiz => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            AppError::MalformedResponse(_) | AppError::ModelError(_) => StatusCode::BAD_GATEWAY,
            AppError::PermissionDenied(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::AlreadyExists(_) => StatusCode::CONFLICT,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::RenderFailure(_)
            | AppError::DatabaseError(_)
            | AppError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            log::error!("{} ({}): {:?}", self, self.error_code(), self);
        } else {
            log::warn!("{} ({})", self, self.error_code());
        }

        HttpResponse::build(status).json(ErrorResponse {
            error: self.to_string(),
            code: self.error_code(),
            status: status.as_u16(),
        })
    }
}

impl From<mongodb::error::Error> for AppError {
    fn from(err: mongodb::error::Error) -> Self {
        AppError::DatabaseError(err.to_string())
    }
}

impl From<mongodb::bson::ser::Error> for AppError {
    fn from(err: mongodb::bson::ser::Error) -> Self {
        AppError::InternalError(format!("BSON serialization error: {}", err))
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::ValidationError(err.to_string())
    }
}

impl From<async_graphql::Error> for AppError {
    fn from(err: async_graphql::Error) -> Self {
        AppError::InternalError(err.message)
    }
}

impl From<actix_multipart::MultipartError> for AppError {
    fn from(err: actix_multipart::MultipartError) -> Self {
        AppError::ValidationError(format!("Invalid multipart payload: {}", err))
    }
}

impl ErrorExtensions for AppError {
    fn extend(&self) -> async_graphql::Error {
        async_graphql::Error::new(self.to_string()).extend_with(|_err, e| {
            e.set("code", self.error_code());
        })
    }
}

pub type AppResult<T> = Result<T, AppError>;
