use std::collections::HashMap;
use std::sync::Arc;

use crate::{
    auth::{require_owner, Claims},
    errors::{AppError, AppResult},
    models::domain::Quiz,
    pipeline::reconcile_fields,
    repositories::QuizRepository,
};

/// Saved-quiz operations. Every read or change goes through the owner check.
pub struct QuizService {
    repository: Arc<dyn QuizRepository>,
}

impl QuizService {
    pub fn new(repository: Arc<dyn QuizRepository>) -> Self {
        Self { repository }
    }

    pub async fn save_generated(&self, quiz: Quiz) -> AppResult<Quiz> {
        let quiz = self.repository.create(quiz).await?;
        log::info!(
            "Saved quiz '{}' ({} questions) for user {}",
            quiz.id,
            quiz.questions.len(),
            quiz.owner_id.as_deref().unwrap_or("-")
        );
        Ok(quiz)
    }

    pub async fn get_owned(&self, claims: &Claims, id: &str) -> AppResult<Quiz> {
        let quiz = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Quiz with id '{}' not found", id)))?;

        require_owner(claims, &quiz)?;
        Ok(quiz)
    }

    pub async fn list_owned(
        &self,
        claims: &Claims,
        offset: i64,
        limit: i64,
    ) -> AppResult<(Vec<Quiz>, i64)> {
        self.repository
            .list_by_owner(claims.user_id(), offset, limit)
            .await
    }

    /// Rebuilds the quiz from edit-form fields and replaces it wholesale.
    /// Ownership is checked before the fields are looked at; an empty rebuild
    /// is refused and the stored quiz stays as it was.
    pub async fn apply_edits(
        &self,
        claims: &Claims,
        id: &str,
        fields: &HashMap<String, String>,
    ) -> AppResult<Quiz> {
        let mut quiz = self.get_owned(claims, id).await?;

        let edited = reconcile_fields(fields)?;
        if edited.questions.is_empty() {
            return Err(AppError::EmptyQuiz);
        }

        quiz.replace_content(edited.title, edited.questions);
        let quiz = self.repository.replace(quiz).await?;

        log::info!("Quiz '{}' edited by {}", quiz.id, claims.username);
        Ok(quiz)
    }

    pub async fn delete(&self, claims: &Claims, id: &str) -> AppResult<()> {
        self.get_owned(claims, id).await?;
        self.repository.delete(id).await?;

        log::info!("Quiz '{}' deleted by {}", id, claims.username);
        Ok(())
    }

    pub async fn health(&self) -> AppResult<()> {
        self.repository.ping().await
    }
}
