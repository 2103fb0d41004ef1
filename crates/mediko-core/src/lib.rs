pub mod answer;
pub mod description;
pub mod error;
pub mod guidance;
pub mod question;
pub mod transcript;

pub use answer::Answer;
pub use description::{SymptomDescription, DEFAULT_MAX_CHARS};
pub use error::{DriftError, TranscriptError, ValidationError};
pub use guidance::{GuidanceResult, RawGuidance, Urgency, KEYWORD_COUNT};
pub use question::{Question, QuestionSet, QUESTION_COUNT};
pub use transcript::Transcript;
