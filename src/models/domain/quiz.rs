use std::fmt;

use async_graphql::Enum;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{AppError, AppResult};
use crate::models::domain::question::{normalize_label, Question, QuestionType};

pub const DEFAULT_QUIZ_TITLE: &str = "Untitled Quiz";

/// The kind of quiz a user asks for. `Mixed` lets the model pick a type per question.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize, Serialize, Enum)]
pub enum QuizType {
    #[serde(rename = "Multiple Choice")]
    MultipleChoice,
    #[serde(rename = "True/False")]
    TrueFalse,
    #[serde(rename = "Fill in the Blanks")]
    FillInBlank,
    #[serde(rename = "Short Answer")]
    ShortAnswer,
    #[serde(rename = "Mixed")]
    Mixed,
}

impl QuizType {
    pub const fn label(self) -> &'static str {
        match self {
            QuizType::MultipleChoice => QuestionType::MultipleChoice.label(),
            QuizType::TrueFalse => QuestionType::TrueFalse.label(),
            QuizType::FillInBlank => QuestionType::FillInBlank.label(),
            QuizType::ShortAnswer => QuestionType::ShortAnswer.label(),
            QuizType::Mixed => "Mixed",
        }
    }

    pub fn from_label(value: &str) -> Option<Self> {
        if normalize_label(value) == "mixed" {
            return Some(QuizType::Mixed);
        }

        QuestionType::from_label(value).map(|question_type| match question_type {
            QuestionType::MultipleChoice => QuizType::MultipleChoice,
            QuestionType::TrueFalse => QuizType::TrueFalse,
            QuestionType::FillInBlank => QuizType::FillInBlank,
            QuestionType::ShortAnswer => QuizType::ShortAnswer,
        })
    }
}

impl fmt::Display for QuizType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Quiz {
    pub id: String,
    pub title: String,
    pub quiz_type: QuizType,
    pub question_count: i32,
    pub questions: Vec<Question>,
    /// `None` for guest quizzes, which only live in a session slot.
    pub owner_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub modified_at: DateTime<Utc>,
}

impl Quiz {
    pub fn new(
        title: &str,
        quiz_type: QuizType,
        question_count: i32,
        questions: Vec<Question>,
        owner_id: Option<&str>,
    ) -> Self {
        let now = Utc::now();
        Quiz {
            id: Uuid::new_v4().to_string(),
            title: title.to_string(),
            quiz_type,
            question_count,
            questions,
            owner_id: owner_id.map(str::to_string),
            created_at: now,
            modified_at: now,
        }
    }

    pub fn is_owned_by(&self, user_id: &str) -> bool {
        self.owner_id.as_deref() == Some(user_id)
    }

    /// Replaces title and questions wholesale; the count follows the new list.
    pub fn replace_content(&mut self, title: String, questions: Vec<Question>) {
        self.title = title;
        self.question_count = questions.len() as i32;
        self.questions = questions;
        self.modified_at = Utc::now();
    }

    pub fn to_record(&self) -> AppResult<QuizRecord> {
        let user_id = self.owner_id.clone().ok_or_else(|| {
            AppError::InternalError("guest quizzes cannot be persisted".to_string())
        })?;
        let content = serde_json::to_string(&self.questions)
            .map_err(|e| AppError::InternalError(format!("failed to encode questions: {}", e)))?;

        Ok(QuizRecord {
            id: self.id.clone(),
            user_id,
            title: self.title.clone(),
            quiz_type: self.quiz_type,
            question_count: self.question_count,
            content,
            created_at: self.created_at,
            modified_at: self.modified_at,
        })
    }
}

/// Stored form of a saved quiz. `content` holds the question list as JSON text.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct QuizRecord {
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub quiz_type: QuizType,
    pub question_count: i32,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub modified_at: DateTime<Utc>,
}

impl TryFrom<QuizRecord> for Quiz {
    type Error = AppError;

    fn try_from(record: QuizRecord) -> Result<Self, Self::Error> {
        let questions: Vec<Question> = serde_json::from_str(&record.content).map_err(|e| {
            AppError::InternalError(format!(
                "stored quiz {} has unreadable content: {}",
                record.id, e
            ))
        })?;

        Ok(Quiz {
            id: record.id,
            title: record.title,
            quiz_type: record.quiz_type,
            question_count: record.question_count,
            questions,
            owner_id: Some(record.user_id),
            created_at: record.created_at,
            modified_at: record.modified_at,
        })
    }
}
