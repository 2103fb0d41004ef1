use thiserror::Error;

/// Caller-side input problems. Raised before any generation request is made.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field} must not be empty")]
    Empty { field: &'static str },

    #[error("{field} exceeds {max} characters (got {actual})")]
    TooLong {
        field: &'static str,
        max: usize,
        actual: usize,
    },

    #[error("terms and conditions must be accepted before continuing")]
    TermsNotAccepted,

    #[error("{field} line {line} starts like a numbered question")]
    NumberedLine { field: &'static str, line: usize },
}

/// A structurally valid generation response that breaks a count or range
/// invariant the schema alone cannot guarantee.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DriftError {
    #[error("expected {expected} questions, got {actual}")]
    QuestionCount { expected: usize, actual: usize },

    #[error("question {index} is empty")]
    EmptyQuestion { index: usize },

    #[error("question {index} spans several lines")]
    MultilineQuestion { index: usize },

    #[error("expected {expected} keywords, got {actual}")]
    KeywordCount { expected: usize, actual: usize },

    #[error("keyword {index} is empty")]
    EmptyKeyword { index: usize },

    #[error("urgency {0} is not an integer level between 1 and 5")]
    UrgencyOutOfRange(f64),

    #[error("{field} is empty")]
    EmptyField { field: &'static str },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TranscriptError {
    #[error("question/answer count mismatch: {questions} questions, {answers} answers")]
    LengthMismatch { questions: usize, answers: usize },

    #[error("question {index} spans several lines")]
    MultilineQuestion { index: usize },

    #[error("answer {index} line {line} starts like a numbered question")]
    NumberedAnswerLine { index: usize, line: usize },

    #[error("malformed transcript at line {line}: {reason}")]
    Malformed { line: usize, reason: String },
}
