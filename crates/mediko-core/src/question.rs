use std::ops::Index;

use serde::{Deserialize, Serialize};

use crate::error::DriftError;

/// Number of follow-up questions asked per consultation.
pub const QUESTION_COUNT: usize = 7;

/// A single follow-up question. Wire name matches the generation schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    #[serde(rename = "pregunta")]
    pub text: String,
}

impl Question {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

/// Exactly [`QUESTION_COUNT`] questions in presentation order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct QuestionSet(Vec<Question>);

impl QuestionSet {
    /// Validate a freshly generated list. Rejects the wrong count and
    /// blank questions instead of passing them on to the consumer.
    pub fn from_generated(questions: Vec<Question>) -> Result<Self, DriftError> {
        if questions.len() != QUESTION_COUNT {
            return Err(DriftError::QuestionCount {
                expected: QUESTION_COUNT,
                actual: questions.len(),
            });
        }
        if let Some(index) = questions.iter().position(|q| q.text.trim().is_empty()) {
            return Err(DriftError::EmptyQuestion { index });
        }
        // Transcript blocks start with a single question line.
        if let Some(index) = questions.iter().position(|q| q.text.contains('\n')) {
            return Err(DriftError::MultilineQuestion { index });
        }
        Ok(Self(questions))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Question> {
        self.0.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Question> {
        self.0.iter()
    }

    pub fn last_index(&self) -> usize {
        self.0.len().saturating_sub(1)
    }
}

impl Index<usize> for QuestionSet {
    type Output = Question;

    fn index(&self, index: usize) -> &Question {
        &self.0[index]
    }
}

impl<'a> IntoIterator for &'a QuestionSet {
    type Item = &'a Question;
    type IntoIter = std::slice::Iter<'a, Question>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn questions(n: usize) -> Vec<Question> {
        (1..=n).map(|i| Question::new(format!("Pregunta {i}"))).collect()
    }

    #[test]
    fn accepts_exactly_seven() {
        let set = QuestionSet::from_generated(questions(7)).unwrap();
        assert_eq!(set.len(), 7);
        assert_eq!(set[0].text, "Pregunta 1");
        assert_eq!(set.last_index(), 6);
    }

    #[test]
    fn rejects_short_list() {
        let err = QuestionSet::from_generated(questions(5)).unwrap_err();
        assert_eq!(
            err,
            DriftError::QuestionCount {
                expected: 7,
                actual: 5
            }
        );
    }

    #[test]
    fn rejects_long_list() {
        assert!(QuestionSet::from_generated(questions(8)).is_err());
    }

    #[test]
    fn rejects_empty_list() {
        assert!(QuestionSet::from_generated(Vec::new()).is_err());
    }

    #[test]
    fn rejects_blank_question() {
        let mut qs = questions(7);
        qs[3].text = "  ".into();
        assert_eq!(
            QuestionSet::from_generated(qs).unwrap_err(),
            DriftError::EmptyQuestion { index: 3 }
        );
    }

    #[test]
    fn rejects_multiline_question() {
        let mut qs = questions(7);
        qs[0].text = "¿Desde cuándo?\n(aprox.)".into();
        assert_eq!(
            QuestionSet::from_generated(qs).unwrap_err(),
            DriftError::MultilineQuestion { index: 0 }
        );
    }

    #[test]
    fn question_uses_wire_name() {
        let q: Question = serde_json::from_str(r#"{"pregunta":"¿Desde cuándo?"}"#).unwrap();
        assert_eq!(q.text, "¿Desde cuándo?");
        let json = serde_json::to_string(&q).unwrap();
        assert!(json.contains("\"pregunta\""));
    }
}
