pub mod fixtures {
    use crate::auth::Claims;
    use crate::models::domain::{Question, QuestionKind, Quiz, QuizType, User};

    /// Creates a standard test user
    pub fn test_user() -> User {
        User::test_user("testuser")
    }

    /// Claims as the auth middleware would attach them for `user_id`
    pub fn claims_for(user_id: &str) -> Claims {
        Claims {
            sub: user_id.to_string(),
            username: format!("user-{}", user_id),
            email: format!("{}@example.com", user_id),
            iat: 0,
            exp: 9_999_999_999,
        }
    }

    pub fn true_false(text: &str, answer: bool) -> Question {
        Question {
            kind: QuestionKind::TrueFalse,
            text: text.to_string(),
            answer: if answer { "True" } else { "False" }.to_string(),
            explanation: Some(format!("Because {}", text)),
        }
    }

    pub fn multiple_choice(text: &str, options: &[&str], answer: &str) -> Question {
        Question {
            kind: QuestionKind::MultipleChoice {
                options: options.iter().map(|o| o.to_string()).collect(),
            },
            text: text.to_string(),
            answer: answer.to_string(),
            explanation: None,
        }
    }

    /// A five-question True/False quiz saved by `owner_id`
    pub fn sample_quiz(owner_id: &str) -> Quiz {
        let questions = (1..=5)
            .map(|i| true_false(&format!("Statement {}", i), i % 2 == 1))
            .collect();
        Quiz::new("Cell Biology", QuizType::TrueFalse, 5, questions, Some(owner_id))
    }
}

pub mod test_helpers {
    use actix_web::http::StatusCode;

    /// Asserts that a status code represents an error (4xx or 5xx)
    pub fn assert_error_status(status: StatusCode) {
        assert!(
            status.is_client_error() || status.is_server_error(),
            "Expected error status, got: {}",
            status
        );
    }

    /// Asserts that a status code represents success (2xx)
    pub fn assert_success_status(status: StatusCode) {
        assert!(
            status.is_success(),
            "Expected success status, got: {}",
            status
        );
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::test_helpers::*;
    use actix_web::http::StatusCode;

    #[test]
    fn test_fixtures_test_user() {
        let user = test_user();
        assert_eq!(user.username, "testuser");
        assert_eq!(user.email, "testuser@example.com");
    }

    #[test]
    fn test_sample_quiz_is_owned() {
        let quiz = sample_quiz("owner-1");
        assert!(quiz.is_owned_by("owner-1"));
        assert_eq!(quiz.questions.len() as i32, quiz.question_count);
        assert_eq!(quiz.questions[0].answer, "True");
        assert_eq!(quiz.questions[1].answer, "False");
    }

    #[test]
    fn test_status_helpers() {
        assert_error_status(StatusCode::FORBIDDEN);
        assert_success_status(StatusCode::CREATED);
    }
}
