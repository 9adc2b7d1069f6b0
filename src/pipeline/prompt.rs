use crate::constants::quiz_prompts::{
    FILL_IN_BLANK_PROMPT, MIXED_PROMPT, MULTIPLE_CHOICE_PROMPT, SHORT_ANSWER_PROMPT,
    TRUE_FALSE_PROMPT,
};
use crate::errors::{AppError, AppResult};
use crate::models::domain::QuizType;

pub const MIN_CONTENT_CHARS: usize = 50;
pub const MAX_CONTENT_CHARS: usize = 10_000;
pub const MIN_QUESTION_COUNT: u32 = 5;
pub const MAX_QUESTION_COUNT: u32 = 75;

fn template_for(quiz_type: QuizType) -> &'static str {
    match quiz_type {
        QuizType::MultipleChoice => MULTIPLE_CHOICE_PROMPT,
        QuizType::TrueFalse => TRUE_FALSE_PROMPT,
        QuizType::FillInBlank => FILL_IN_BLANK_PROMPT,
        QuizType::ShortAnswer => SHORT_ANSWER_PROMPT,
        QuizType::Mixed => MIXED_PROMPT,
    }
}

pub fn validate_question_count(requested: i64) -> AppResult<u32> {
    if requested < MIN_QUESTION_COUNT as i64 || requested > MAX_QUESTION_COUNT as i64 {
        return Err(AppError::QuestionCountOutOfRange {
            requested,
            min: MIN_QUESTION_COUNT,
            max: MAX_QUESTION_COUNT,
        });
    }
    Ok(requested as u32)
}

/// Checks the minimum length and cuts the text to the model input budget.
/// Lengths are counted in characters, not bytes.
pub fn prepare_content(text: &str) -> AppResult<&str> {
    if text.trim().chars().count() < MIN_CONTENT_CHARS {
        return Err(AppError::MinimumContentNotMet(MIN_CONTENT_CHARS));
    }

    match text.char_indices().nth(MAX_CONTENT_CHARS) {
        Some((cut, _)) => {
            log::info!("Content truncated to {} characters", MAX_CONTENT_CHARS);
            Ok(&text[..cut])
        }
        None => Ok(text),
    }
}

/// Builds the model instruction for `quiz_type`.
pub fn synthesize_prompt(text: &str, quiz_type: QuizType, question_count: i64) -> AppResult<String> {
    let content = prepare_content(text)?;
    let count = validate_question_count(question_count)?;

    log::debug!("Building {} prompt for {} questions", quiz_type, count);

    // Content goes in last so braces inside user text are never treated as placeholders.
    Ok(template_for(quiz_type)
        .replace("{question_count}", &count.to_string())
        .replace("{content}", content))
}
