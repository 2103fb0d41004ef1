use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Default character limit for free-text input (description and answers).
pub const DEFAULT_MAX_CHARS: usize = 200;

/// Character count as the user perceives it (scalar values, not bytes).
pub fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// Characters still available before `max` is reached. Saturates at zero.
pub fn remaining_chars(text: &str, max: usize) -> usize {
    max.saturating_sub(char_len(text))
}

/// Shared bounds check for user-typed text.
pub fn check_text(field: &'static str, text: &str, max: usize) -> Result<(), ValidationError> {
    if text.trim().is_empty() {
        return Err(ValidationError::Empty { field });
    }
    let actual = char_len(text);
    if actual > max {
        return Err(ValidationError::TooLong { field, max, actual });
    }
    Ok(())
}

/// The user's free-text complaint ("motivo de consulta").
///
/// Non-empty after trimming and no longer than the configured limit.
/// The text is kept exactly as typed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SymptomDescription(String);

impl SymptomDescription {
    pub fn new(text: impl Into<String>, max_chars: usize) -> Result<Self, ValidationError> {
        let text = text.into();
        check_text("description", &text, max_chars)?;
        Ok(Self(text))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SymptomDescription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
