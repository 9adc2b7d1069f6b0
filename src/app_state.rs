use std::sync::Arc;

use crate::{
    auth::JwtService,
    config::Config,
    db::Database,
    errors::AppResult,
    pipeline::{OcrEngine, TesseractOcr, TextExtractor},
    repositories::{MongoQuizRepository, MongoUserRepository, QuizRepository, UserRepository},
    services::{
        GenerationService, GuestSessionStore, OpenAiQuizModel, QuizModel, QuizService,
        UserService,
    },
};

#[derive(Clone)]
pub struct AppState {
    pub user_service: Arc<UserService>,
    pub quiz_service: Arc<QuizService>,
    pub generation_service: Arc<GenerationService>,
    pub text_extractor: Arc<TextExtractor>,
    pub guest_sessions: Arc<GuestSessionStore>,
    pub jwt_service: Arc<JwtService>,
    pub config: Arc<Config>,
}

impl AppState {
    pub async fn new(config: Config) -> AppResult<Self> {
        let db = Database::connect(&config).await?;

        let user_repository = Arc::new(MongoUserRepository::new(&db));
        user_repository.ensure_indexes().await?;

        let quiz_repository = Arc::new(MongoQuizRepository::new(&db));
        quiz_repository.ensure_indexes().await?;

        let model = Arc::new(OpenAiQuizModel::new(&config.model));
        let ocr = Arc::new(TesseractOcr::from_config(&config));

        Ok(Self::with_components(
            config,
            user_repository,
            quiz_repository,
            model,
            ocr,
        ))
    }

    /// Wires the services around the given collaborators.
    pub fn with_components(
        config: Config,
        user_repository: Arc<dyn UserRepository>,
        quiz_repository: Arc<dyn QuizRepository>,
        model: Arc<dyn QuizModel>,
        ocr: Arc<dyn OcrEngine>,
    ) -> Self {
        let jwt_service = Arc::new(JwtService::new(
            &config.jwt_secret,
            config.jwt_expiration_hours,
        ));

        Self {
            user_service: Arc::new(UserService::new(user_repository)),
            quiz_service: Arc::new(QuizService::new(quiz_repository)),
            generation_service: Arc::new(GenerationService::new(model, config.model.timeout)),
            text_extractor: Arc::new(TextExtractor::new(ocr)),
            guest_sessions: Arc::new(GuestSessionStore::new(config.guest_session_ttl_minutes)),
            jwt_service,
            config: Arc::new(config),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::ocr::MockOcrEngine;
    use crate::repositories::quiz_repository::MockQuizRepository;
    use crate::repositories::user_repository::MockUserRepository;
    use crate::services::model_service::MockQuizModel;

    #[test]
    fn test_app_state_is_cloneable() {
        fn assert_clone<T: Clone>() {}
        assert_clone::<AppState>();
    }

    #[test]
    fn test_with_components_uses_config() {
        let state = AppState::with_components(
            Config::test_config(),
            Arc::new(MockUserRepository::new()),
            Arc::new(MockQuizRepository::new()),
            Arc::new(MockQuizModel::new()),
            Arc::new(MockOcrEngine::new()),
        );

        assert_eq!(state.jwt_service.expiration_hours(), 1);
        assert_eq!(state.config.mongo_db_name, "quizcraft-test");
    }
}
