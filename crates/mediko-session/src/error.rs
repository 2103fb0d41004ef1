use mediko_core::ValidationError;
use mediko_service::GenerationError;
use thiserror::Error;

use crate::phase::Phase;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Generation(#[from] GenerationError),

    #[error("cannot {action} while {phase}")]
    InvalidTransition { phase: Phase, action: &'static str },
}

impl SessionError {
    pub fn is_validation(&self) -> bool {
        matches!(self, SessionError::Validation(_))
    }

    pub fn is_generation(&self) -> bool {
        matches!(self, SessionError::Generation(_))
    }
}
