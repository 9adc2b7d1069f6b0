use std::fmt;

use async_graphql::Enum;
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

/// Marker the fill-in-the-blank template asks the model to put in place of the blank.
pub const BLANK_MARKER: &str = "_____";

pub const MIN_OPTIONS: usize = 2;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize, Serialize, Enum)]
pub enum QuestionType {
    #[serde(rename = "Multiple Choice")]
    MultipleChoice,
    #[serde(rename = "True/False")]
    TrueFalse,
    #[serde(rename = "Fill in the Blanks")]
    FillInBlank,
    #[serde(rename = "Short Answer")]
    ShortAnswer,
}

impl QuestionType {
    pub const ALL: [QuestionType; 4] = [
        QuestionType::MultipleChoice,
        QuestionType::TrueFalse,
        QuestionType::FillInBlank,
        QuestionType::ShortAnswer,
    ];

    /// Human-readable label, also the tag value used in model output and edit forms.
    pub const fn label(self) -> &'static str {
        match self {
            QuestionType::MultipleChoice => "Multiple Choice",
            QuestionType::TrueFalse => "True/False",
            QuestionType::FillInBlank => "Fill in the Blanks",
            QuestionType::ShortAnswer => "Short Answer",
        }
    }

    /// Accepts the display label as well as common spellings such as
    /// `multiple_choice`, `TrueFalse` or `fill in the blank`.
    pub fn from_label(value: &str) -> Option<Self> {
        match normalize_label(value).as_str() {
            "multiplechoice" | "mcq" => Some(QuestionType::MultipleChoice),
            "truefalse" | "boolean" => Some(QuestionType::TrueFalse),
            "fillintheblanks" | "fillintheblank" | "fillinblanks" | "fillinblank" => {
                Some(QuestionType::FillInBlank)
            }
            "shortanswer" => Some(QuestionType::ShortAnswer),
            _ => None,
        }
    }
}

impl fmt::Display for QuestionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

pub(crate) fn normalize_label(value: &str) -> String {
    value
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// Type of an untagged question, decided purely from its shape.
///
/// Every stage that needs a question's type goes through this function, so
/// generation and rendering can never disagree.
pub fn infer_question_type(text: &str, has_options: bool, answer: &str) -> QuestionType {
    if has_options {
        QuestionType::MultipleChoice
    } else if answer == "True" || answer == "False" {
        QuestionType::TrueFalse
    } else if text.contains(BLANK_MARKER) {
        QuestionType::FillInBlank
    } else {
        QuestionType::ShortAnswer
    }
}

/// Letter shown in front of an option: 0 -> "A", 25 -> "Z", 26 -> "AA".
pub fn option_label(index: usize) -> String {
    let mut label = Vec::new();
    let mut n = index + 1;
    while n > 0 {
        let rem = (n - 1) % 26;
        label.push(b'A' + rem as u8);
        n = (n - 1) / 26;
    }
    label.reverse();
    String::from_utf8(label).unwrap_or_default()
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum QuestionKind {
    MultipleChoice { options: Vec<String> },
    TrueFalse,
    FillInBlank,
    ShortAnswer,
}

impl QuestionKind {
    pub fn question_type(&self) -> QuestionType {
        match self {
            QuestionKind::MultipleChoice { .. } => QuestionType::MultipleChoice,
            QuestionKind::TrueFalse => QuestionType::TrueFalse,
            QuestionKind::FillInBlank => QuestionType::FillInBlank,
            QuestionKind::ShortAnswer => QuestionType::ShortAnswer,
        }
    }
}

/// A fully validated quiz item.
///
/// Serializes to (and strictly deserializes from) the question object shape
/// the model is asked to produce, which is also the stored `content` format.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "QuestionRecord", into = "QuestionRecord")]
pub struct Question {
    pub kind: QuestionKind,
    pub text: String,
    pub answer: String,
    pub explanation: Option<String>,
}

impl Question {
    pub fn question_type(&self) -> QuestionType {
        self.kind.question_type()
    }

    pub fn options(&self) -> Option<&[String]> {
        match &self.kind {
            QuestionKind::MultipleChoice { options } => Some(options),
            _ => None,
        }
    }

    /// Position of the option a multiple-choice answer points at.
    ///
    /// The answer is usually a letter ("B"), occasionally the option text
    /// itself. `None` means the answer does not resolve to any option; such
    /// answers are kept as-is.
    pub fn answer_option_index(&self) -> Option<usize> {
        let options = self.options()?;
        let answer = self.answer.trim();

        if let Some(index) = (0..options.len()).find(|i| option_label(*i).eq_ignore_ascii_case(answer)) {
            return Some(index);
        }

        options
            .iter()
            .position(|option| option.trim().eq_ignore_ascii_case(answer))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QuestionDecodeError {
    #[error("question text is empty")]
    EmptyText,

    #[error("answer is empty")]
    EmptyAnswer,

    #[error("unknown question type '{0}'")]
    UnknownType(String),

    #[error("multiple choice questions need at least {MIN_OPTIONS} options, got {0}")]
    TooFewOptions(usize),

    #[error("option {0} is empty")]
    EmptyOption(usize),

    #[error("{0} questions cannot have options")]
    UnexpectedOptions(QuestionType),

    #[error("true/false answer must be 'True' or 'False', got '{0}'")]
    InvalidTrueFalseAnswer(String),
}

/// Wire shape of a single question, as produced by the model and stored in
/// the `content` column.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct QuestionRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub question_type: Option<String>,
    #[serde(alias = "question_text")]
    pub question: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
    #[serde(deserialize_with = "answer_as_text")]
    pub answer: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
}

// Models sometimes emit `"answer": true` or `"answer": 3` instead of strings.
fn answer_as_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Bool(true) => Ok("True".to_string()),
        serde_json::Value::Bool(false) => Ok("False".to_string()),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        other => Err(D::Error::custom(format!(
            "answer must be a string, got {}",
            other
        ))),
    }
}

impl TryFrom<QuestionRecord> for Question {
    type Error = QuestionDecodeError;

    fn try_from(record: QuestionRecord) -> Result<Self, Self::Error> {
        if record.question.trim().is_empty() {
            return Err(QuestionDecodeError::EmptyText);
        }
        if record.answer.trim().is_empty() {
            return Err(QuestionDecodeError::EmptyAnswer);
        }

        let explicit_type = record
            .question_type
            .as_deref()
            .map(str::trim)
            .filter(|tag| !tag.is_empty());

        let question_type = match explicit_type {
            Some(tag) => QuestionType::from_label(tag)
                .ok_or_else(|| QuestionDecodeError::UnknownType(tag.to_string()))?,
            None => infer_question_type(&record.question, record.options.is_some(), &record.answer),
        };

        let mut answer = record.answer;
        let kind = match question_type {
            QuestionType::MultipleChoice => {
                let options = record.options.unwrap_or_default();
                if options.len() < MIN_OPTIONS {
                    return Err(QuestionDecodeError::TooFewOptions(options.len()));
                }
                if let Some(blank) = options.iter().position(|o| o.trim().is_empty()) {
                    return Err(QuestionDecodeError::EmptyOption(blank + 1));
                }
                QuestionKind::MultipleChoice { options }
            }
            other => {
                if record.options.as_ref().is_some_and(|o| !o.is_empty()) {
                    return Err(QuestionDecodeError::UnexpectedOptions(other));
                }
                match other {
                    QuestionType::TrueFalse => {
                        answer = canonical_true_false(&answer)
                            .ok_or_else(|| QuestionDecodeError::InvalidTrueFalseAnswer(answer.clone()))?
                            .to_string();
                        QuestionKind::TrueFalse
                    }
                    QuestionType::FillInBlank => QuestionKind::FillInBlank,
                    _ => QuestionKind::ShortAnswer,
                }
            }
        };

        Ok(Question {
            kind,
            text: record.question,
            answer,
            explanation: record.explanation.filter(|e| !e.trim().is_empty()),
        })
    }
}

fn canonical_true_false(answer: &str) -> Option<&'static str> {
    let answer = answer.trim();
    if answer.eq_ignore_ascii_case("true") {
        Some("True")
    } else if answer.eq_ignore_ascii_case("false") {
        Some("False")
    } else {
        None
    }
}

impl From<Question> for QuestionRecord {
    fn from(question: Question) -> Self {
        let question_type = Some(question.question_type().label().to_string());
        let options = match question.kind {
            QuestionKind::MultipleChoice { options } => Some(options),
            _ => None,
        };

        QuestionRecord {
            question_type,
            question: question.text,
            options,
            answer: question.answer,
            explanation: question.explanation,
        }
    }
}
