use std::fmt;

use serde::{Deserialize, Serialize};

/// Where a consultation currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum Phase {
    /// Waiting for a symptom description.
    Idle,
    /// Showing question `index` (0-based).
    Questioning { index: usize },
    /// Every question answered; guidance not yet generated.
    Reviewing,
    /// Guidance generated. Only a reset leaves this phase.
    Resolved,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Idle => "idle",
            Phase::Questioning { .. } => "questioning",
            Phase::Reviewing => "reviewing",
            Phase::Resolved => "resolved",
        }
    }

    pub fn question_index(&self) -> Option<usize> {
        match self {
            Phase::Questioning { index } => Some(*index),
            _ => None,
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Questioning { index } => write!(f, "questioning({index})"),
            other => f.write_str(other.as_str()),
        }
    }
}
