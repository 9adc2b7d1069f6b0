pub mod question;
pub mod quiz;
pub mod user;
pub use question::{Question, QuestionKind, QuestionType};
pub use quiz::{Quiz, QuizRecord, QuizType};
pub use user::User;
