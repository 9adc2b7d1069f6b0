pub mod generation_service;
pub mod guest_session_service;
pub mod model_service;
pub mod quiz_service;
pub mod user_service;

pub use generation_service::GenerationService;
pub use guest_session_service::{GuestSessionStore, GUEST_SESSION_COOKIE};
pub use model_service::{OpenAiQuizModel, QuizModel};
pub use quiz_service::QuizService;
pub use user_service::UserService;
