use serde::{Deserialize, Serialize};

use crate::description::check_text;
use crate::error::ValidationError;
use crate::question::Question;
use crate::transcript::numbered_line;

/// The user's reply to one question, paired with the question text it answers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Answer {
    #[serde(rename = "pregunta")]
    pub question_text: String,
    #[serde(rename = "respuesta")]
    pub answer_text: String,
}

impl Answer {
    /// Only non-empty, in-bounds text produces an answer. Continuation lines
    /// may not begin like a transcript question (`"2. "`).
    pub fn new(
        question: &Question,
        text: impl Into<String>,
        max_chars: usize,
    ) -> Result<Self, ValidationError> {
        let text = text.into();
        check_text("answer", &text, max_chars)?;
        if let Some(line) = numbered_line(&text) {
            return Err(ValidationError::NumberedLine {
                field: "answer",
                line,
            });
        }
        Ok(Self {
            question_text: question.text.clone(),
            answer_text: text,
        })
    }
}
