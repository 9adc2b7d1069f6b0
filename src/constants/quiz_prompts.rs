// Instruction templates for quiz generation, one per quiz type.
// `{question_count}` and `{content}` are substituted by the prompt builder.

pub const MULTIPLE_CHOICE_PROMPT: &str = r#"Create a multiple-choice quiz with {question_count} questions based on the following content.
For each question, provide 4 options (A, B, C, D) with exactly one correct answer.
Respond with a JSON array only, using the following structure:
[
    {
        "question": "Question text",
        "options": [
            "Option A",
            "Option B",
            "Option C",
            "Option D"
        ],
        "answer": "The correct option letter (A, B, C, or D)",
        "explanation": "Brief explanation of the correct answer"
    }
]

Content:
{content}"#;

pub const TRUE_FALSE_PROMPT: &str = r#"Create a true/false quiz with {question_count} questions based on the following content.
Respond with a JSON array only, using the following structure:
[
    {
        "question": "Statement to judge",
        "answer": "True or False",
        "explanation": "Brief explanation of the correct answer"
    }
]

Content:
{content}"#;

pub const FILL_IN_BLANK_PROMPT: &str = r#"Create a fill-in-the-blanks quiz with {question_count} questions based on the following content.
Use _____ to mark the blank in each question.
Respond with a JSON array only, using the following structure:
[
    {
        "question": "Question text with _____",
        "answer": "The word or phrase that goes in the blank",
        "explanation": "Brief explanation of the correct answer"
    }
]

Content:
{content}"#;

pub const SHORT_ANSWER_PROMPT: &str = r#"Create a short answer quiz with {question_count} questions based on the following content.
Respond with a JSON array only, using the following structure:
[
    {
        "question": "Question text",
        "answer": "The correct answer",
        "explanation": "Brief explanation of the correct answer"
    }
]

Content:
{content}"#;

pub const MIXED_PROMPT: &str = r#"Create a mixed-type quiz with {question_count} questions based on the following content.
Combine multiple-choice, true/false, fill-in-the-blanks and short answer questions.
Every entry must carry a "question_type" field set to exactly one of
"Multiple Choice", "True/False", "Fill in the Blanks" or "Short Answer".
Respond with a JSON array only, using the following structure:
[
    {
        "question_type": "Multiple Choice",
        "question": "Question text",
        "options": ["Option A", "Option B", "Option C", "Option D"],
        "answer": "The correct option letter (A, B, C, or D)",
        "explanation": "Brief explanation of the correct answer"
    },
    {
        "question_type": "True/False",
        "question": "Statement to judge",
        "answer": "True or False",
        "explanation": "Brief explanation of the correct answer"
    },
    {
        "question_type": "Fill in the Blanks",
        "question": "Question text with _____",
        "answer": "The word or phrase that goes in the blank",
        "explanation": "Brief explanation of the correct answer"
    },
    {
        "question_type": "Short Answer",
        "question": "Question text",
        "answer": "The correct answer",
        "explanation": "Brief explanation of the correct answer"
    }
]

Content:
{content}"#;

pub const SYSTEM_PROMPT: &str = "You are a quiz author. You write accurate questions that are answerable from the supplied content alone, and you reply with nothing but the requested JSON array.";
