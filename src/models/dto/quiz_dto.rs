use async_graphql::SimpleObject;
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::domain::{question::option_label, Question, QuestionType, Quiz, QuizType};

#[derive(Debug, Clone, Serialize, SimpleObject)]
pub struct QuestionOptionDto {
    pub label: String,
    pub text: String,
}

#[derive(Debug, Clone, Serialize, SimpleObject)]
pub struct QuestionDto {
    /// 1-based position in the quiz.
    pub number: i32,
    pub question_type: QuestionType,
    pub question: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<QuestionOptionDto>,
    pub answer: String,
    /// Option the answer points at; `null` when it matches none.
    pub answer_option_index: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
}

impl QuestionDto {
    pub fn new(index: usize, question: &Question) -> Self {
        let options = question
            .options()
            .unwrap_or_default()
            .iter()
            .enumerate()
            .map(|(i, text)| QuestionOptionDto {
                label: option_label(i),
                text: text.clone(),
            })
            .collect();

        QuestionDto {
            number: index as i32 + 1,
            question_type: question.question_type(),
            question: question.text.clone(),
            options,
            answer: question.answer.clone(),
            answer_option_index: question.answer_option_index().map(|i| i as i32),
            explanation: question.explanation.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, SimpleObject)]
pub struct QuizDto {
    pub id: String,
    pub title: String,
    pub quiz_type: QuizType,
    pub question_count: i32,
    /// False for guest quizzes, which live only in the session.
    pub saved: bool,
    pub questions: Vec<QuestionDto>,
    pub created_at: DateTime<Utc>,
    pub modified_at: DateTime<Utc>,
}

impl From<&Quiz> for QuizDto {
    fn from(quiz: &Quiz) -> Self {
        QuizDto {
            id: quiz.id.clone(),
            title: quiz.title.clone(),
            quiz_type: quiz.quiz_type,
            question_count: quiz.question_count,
            saved: quiz.owner_id.is_some(),
            questions: quiz
                .questions
                .iter()
                .enumerate()
                .map(|(i, q)| QuestionDto::new(i, q))
                .collect(),
            created_at: quiz.created_at,
            modified_at: quiz.modified_at,
        }
    }
}

impl From<Quiz> for QuizDto {
    fn from(quiz: Quiz) -> Self {
        QuizDto::from(&quiz)
    }
}

/// Dashboard row.
#[derive(Debug, Clone, Serialize, SimpleObject)]
pub struct QuizSummaryDto {
    pub id: String,
    pub title: String,
    pub quiz_type: QuizType,
    pub question_count: i32,
    pub created_at: DateTime<Utc>,
    pub modified_at: DateTime<Utc>,
}

impl From<Quiz> for QuizSummaryDto {
    fn from(quiz: Quiz) -> Self {
        QuizSummaryDto {
            id: quiz.id,
            title: quiz.title,
            quiz_type: quiz.quiz_type,
            question_count: quiz.question_count,
            created_at: quiz.created_at,
            modified_at: quiz.modified_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, SimpleObject)]
pub struct QuizPage {
    pub items: Vec<QuizSummaryDto>,
    pub total: i64,
    pub offset: i64,
    pub limit: i64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::fixtures::{multiple_choice, sample_quiz};

    #[test]
    fn test_quiz_dto_numbers_questions_from_one() {
        let dto = QuizDto::from(sample_quiz("owner-1"));

        assert!(dto.saved);
        assert_eq!(dto.questions.len(), 5);
        assert_eq!(dto.questions[0].number, 1);
        assert_eq!(dto.questions[4].number, 5);
        assert_eq!(dto.questions[0].question_type, QuestionType::TrueFalse);
        assert!(dto.questions[0].options.is_empty());
    }

    #[test]
    fn test_options_are_labelled() {
        let question = multiple_choice("Largest planet?", &["Mars", "Jupiter", "Venus"], "B");
        let dto = QuestionDto::new(0, &question);

        let labels: Vec<_> = dto.options.iter().map(|o| o.label.as_str()).collect();
        assert_eq!(labels, ["A", "B", "C"]);
        assert_eq!(dto.answer_option_index, Some(1));
    }

    #[test]
    fn test_dangling_answer_has_no_index() {
        let question = multiple_choice("Largest planet?", &["Mars", "Venus"], "E");
        let dto = QuestionDto::new(0, &question);

        assert_eq!(dto.answer, "E");
        assert_eq!(dto.answer_option_index, None);

        let json = serde_json::to_value(&dto).unwrap();
        assert_eq!(json["answer_option_index"], serde_json::Value::Null);
        assert!(json.as_object().unwrap().contains_key("answer_option_index"));
    }

    #[test]
    fn test_guest_quiz_is_not_saved() {
        let quiz = Quiz::new("Guest", QuizType::Mixed, 5, vec![], None);
        assert!(!QuizDto::from(&quiz).saved);
    }
}
