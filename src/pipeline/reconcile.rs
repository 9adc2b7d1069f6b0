use std::collections::{BTreeSet, HashMap};

use once_cell::sync::Lazy;
use regex::Regex;

use crate::errors::{AppError, AppResult};
use crate::models::domain::question::QuestionRecord;
use crate::models::domain::quiz::DEFAULT_QUIZ_TITLE;
use crate::models::domain::Question;

/// Highest number of questions an edit form may describe.
pub const MAX_EDIT_QUESTIONS: usize = 200;

static QUESTION_KEY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^question_(\d+)$").expect("QUESTION_KEY is a valid regex"));

static OPTION_KEY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^option_(\d+)_(.*)$").expect("OPTION_KEY is a valid regex"));

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconciledQuiz {
    pub title: String,
    pub questions: Vec<Question>,
}

fn non_empty(fields: &HashMap<String, String>, key: &str) -> Option<String> {
    fields
        .get(key)
        .filter(|value| !value.trim().is_empty())
        .cloned()
}

fn question_indices(fields: &HashMap<String, String>) -> AppResult<BTreeSet<usize>> {
    let mut indices = BTreeSet::new();

    for key in fields.keys() {
        let Some(captures) = QUESTION_KEY.captures(key) else {
            continue;
        };
        let index = captures[1]
            .parse::<usize>()
            .ok()
            .filter(|i| *i < MAX_EDIT_QUESTIONS)
            .ok_or_else(|| {
                AppError::ValidationError(format!(
                    "question index in '{}' exceeds the limit of {} questions",
                    key, MAX_EDIT_QUESTIONS
                ))
            })?;
        indices.insert(index);
    }

    Ok(indices)
}

fn options_for(fields: &HashMap<String, String>, index: usize) -> Vec<String> {
    let mut options: Vec<(u64, &str, &str)> = fields
        .iter()
        .filter_map(|(key, value)| {
            let captures = OPTION_KEY.captures(key)?;
            if captures[1].parse::<usize>().ok()? != index {
                return None;
            }
            let suffix = captures.get(2)?.as_str();
            let position = suffix.parse::<u64>().unwrap_or(0);
            Some((position, key.as_str(), value.as_str()))
        })
        .collect();

    // Key as tiebreaker keeps the order stable when suffixes collide.
    options.sort_by(|a, b| a.0.cmp(&b.0).then_with(|| a.1.cmp(b.1)));

    options
        .into_iter()
        .filter(|(_, _, value)| !value.trim().is_empty())
        .map(|(_, _, value)| value.to_string())
        .collect()
}

/// Rebuilds a quiz from flat edit-form fields.
///
/// Questions come out in ascending index order no matter how the map
/// iterates; indices with a blank `question_<i>` are dropped.
pub fn reconcile_fields(fields: &HashMap<String, String>) -> AppResult<ReconciledQuiz> {
    let title = non_empty(fields, "quiz_title")
        .map(|title| title.trim().to_string())
        .unwrap_or_else(|| DEFAULT_QUIZ_TITLE.to_string());

    let mut questions = Vec::new();
    for index in question_indices(fields)? {
        let Some(text) = non_empty(fields, &format!("question_{}", index)) else {
            continue;
        };

        let options = options_for(fields, index);
        let record = QuestionRecord {
            question_type: non_empty(fields, &format!("question_type_{}", index)),
            question: text,
            options: (!options.is_empty()).then_some(options),
            answer: fields
                .get(&format!("answer_{}", index))
                .cloned()
                .unwrap_or_default(),
            explanation: non_empty(fields, &format!("explanation_{}", index)),
        };

        let question = Question::try_from(record).map_err(|e| {
            AppError::ValidationError(format!("question {}: {}", index + 1, e))
        })?;
        questions.push(question);
    }

    Ok(ReconciledQuiz { title, questions })
}

/// Flattens a quiz into the edit-form field names `reconcile_fields` reads.
pub fn flatten_quiz(title: &str, questions: &[Question]) -> HashMap<String, String> {
    let mut fields = HashMap::new();
    fields.insert("quiz_title".to_string(), title.to_string());

    for (i, question) in questions.iter().enumerate() {
        fields.insert(format!("question_{}", i), question.text.clone());
        fields.insert(format!("answer_{}", i), question.answer.clone());
        fields.insert(
            format!("question_type_{}", i),
            question.question_type().label().to_string(),
        );
        if let Some(explanation) = &question.explanation {
            fields.insert(format!("explanation_{}", i), explanation.clone());
        }
        if let Some(options) = question.options() {
            for (j, option) in options.iter().enumerate() {
                fields.insert(format!("option_{}_{}", i, j), option.clone());
            }
        }
    }

    fields
}
