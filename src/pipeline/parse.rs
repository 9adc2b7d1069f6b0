use serde_json::Value;

use crate::errors::{AppError, AppResult};
use crate::models::domain::question::QuestionRecord;
use crate::models::domain::Question;

/// The span from the first `[` to the last `]`, inclusive.
fn array_payload(reply: &str) -> AppResult<&str> {
    let start = reply.find('[');
    let end = reply.rfind(']');

    match (start, end) {
        (Some(start), Some(end)) if start < end => Ok(&reply[start..=end]),
        _ => Err(AppError::MalformedResponse(
            "reply does not contain a JSON array".to_string(),
        )),
    }
}

/// Turns a free-form model reply into validated questions.
///
/// Either every element decodes or the whole reply is rejected.
pub fn parse_quiz_response(reply: &str) -> AppResult<Vec<Question>> {
    let payload = array_payload(reply)?;
    let value: Value = serde_json::from_str(payload)
        .map_err(|e| AppError::MalformedResponse(format!("invalid JSON: {}", e)))?;

    let questions = decode_questions(value).map_err(|err| match err {
        AppError::ValidationError(msg) => AppError::MalformedResponse(msg),
        other => other,
    })?;

    for (index, question) in questions.iter().enumerate() {
        if question.options().is_some() && question.answer_option_index().is_none() {
            log::warn!(
                "question {}: answer '{}' does not match any option",
                index + 1,
                question.answer
            );
        }
    }

    log::debug!("Parsed {} questions from model reply", questions.len());
    Ok(questions)
}

/// Decodes a JSON array of question objects.
///
/// Fails with `EmptyQuiz` when the value is not a non-empty array of objects
/// and with `ValidationError` naming the first element that does not decode.
pub fn decode_questions(value: Value) -> AppResult<Vec<Question>> {
    let items = match value {
        Value::Array(items) if !items.is_empty() && items.iter().all(Value::is_object) => items,
        _ => return Err(AppError::EmptyQuiz),
    };

    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| {
            let record: QuestionRecord = serde_json::from_value(item)
                .map_err(|e| AppError::ValidationError(format!("question {}: {}", index + 1, e)))?;
            Question::try_from(record)
                .map_err(|e| AppError::ValidationError(format!("question {}: {}", index + 1, e)))
        })
        .collect()
}
