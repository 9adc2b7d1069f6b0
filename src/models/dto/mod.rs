pub mod generate_form;
pub mod quiz_dto;
pub mod request;
pub mod response;

pub use generate_form::GenerateQuizForm;
pub use quiz_dto::{QuestionDto, QuizDto, QuizPage, QuizSummaryDto};
pub use request::{LoginRequest, PaginationParams, RegisterRequest};
pub use response::{AuthResponse, DeleteQuizResponse, HealthResponse, UserDto};
