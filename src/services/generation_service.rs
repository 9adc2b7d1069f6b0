use std::sync::Arc;
use std::time::Duration;

use crate::errors::{AppError, AppResult};
use crate::models::domain::{Question, QuizType};
use crate::pipeline::{parse_quiz_response, synthesize_prompt};
use crate::services::model_service::QuizModel;

/// Prompt, model call and parse as one all-or-nothing step. No retries.
pub struct GenerationService {
    model: Arc<dyn QuizModel>,
    timeout: Duration,
}

impl GenerationService {
    pub fn new(model: Arc<dyn QuizModel>, timeout: Duration) -> Self {
        Self { model, timeout }
    }

    pub async fn generate(
        &self,
        text: &str,
        quiz_type: QuizType,
        question_count: i64,
    ) -> AppResult<Vec<Question>> {
        let prompt = synthesize_prompt(text, quiz_type, question_count)?;

        log::info!(
            "Generating {} quiz with {} questions",
            quiz_type,
            question_count
        );

        let reply = tokio::time::timeout(self.timeout, self.model.complete(&prompt))
            .await
            .map_err(|_| {
                AppError::ModelError(format!(
                    "no reply within {} seconds",
                    self.timeout.as_secs_f32()
                ))
            })??;

        let questions = parse_quiz_response(&reply)?;
        if questions.len() as i64 != question_count {
            log::warn!(
                "Model returned {} questions, {} were requested",
                questions.len(),
                question_count
            );
        }

        Ok(questions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::domain::QuestionType;
    use crate::services::model_service::MockQuizModel;
    use async_trait::async_trait;

    const CONTENT: &str = "The mitochondria is the powerhouse of the cell and produces ATP.";

    fn service_with_reply(reply: &str) -> GenerationService {
        let reply = reply.to_string();
        let mut model = MockQuizModel::new();
        model
            .expect_complete()
            .times(1)
            .return_once(move |_| Ok(reply));
        GenerationService::new(Arc::new(model), Duration::from_secs(5))
    }

    #[tokio::test]
    async fn test_generate_parses_model_reply() {
        let service = service_with_reply(
            r#"Here you go: [{"question":"Cells make ATP","answer":"True","explanation":"Mitochondria"}]"#,
        );

        let questions = service
            .generate(CONTENT, QuizType::TrueFalse, 5)
            .await
            .unwrap();

        assert_eq!(questions.len(), 1);
        assert_eq!(questions[0].question_type(), QuestionType::TrueFalse);
    }

    #[tokio::test]
    async fn test_invalid_input_never_reaches_the_model() {
        let mut model = MockQuizModel::new();
        model.expect_complete().never();
        let service = GenerationService::new(Arc::new(model), Duration::from_secs(5));

        assert!(matches!(
            service.generate("too short", QuizType::Mixed, 10).await,
            Err(AppError::MinimumContentNotMet(_))
        ));
        assert!(matches!(
            service.generate(CONTENT, QuizType::Mixed, 76).await,
            Err(AppError::QuestionCountOutOfRange { .. })
        ));
    }

    #[tokio::test]
    async fn test_model_errors_are_surfaced() {
        let mut model = MockQuizModel::new();
        model
            .expect_complete()
            .times(1)
            .return_once(|_| Err(AppError::ModelError("rate limited".into())));
        let service = GenerationService::new(Arc::new(model), Duration::from_secs(5));

        assert!(matches!(
            service.generate(CONTENT, QuizType::ShortAnswer, 5).await,
            Err(AppError::ModelError(_))
        ));
    }

    #[tokio::test]
    async fn test_malformed_reply_is_rejected() {
        let service = service_with_reply("I am unable to comply.");
        assert!(matches!(
            service.generate(CONTENT, QuizType::ShortAnswer, 5).await,
            Err(AppError::MalformedResponse(_))
        ));
    }

    struct SlowModel;

    #[async_trait]
    impl QuizModel for SlowModel {
        async fn complete(&self, _prompt: &str) -> AppResult<String> {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok("[]".to_string())
        }
    }

    #[tokio::test]
    async fn test_slow_model_times_out() {
        let service = GenerationService::new(Arc::new(SlowModel), Duration::from_millis(50));
        assert!(matches!(
            service.generate(CONTENT, QuizType::ShortAnswer, 5).await,
            Err(AppError::ModelError(_))
        ));
    }
}
