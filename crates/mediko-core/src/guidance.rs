use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::DriftError;

/// Number of diagnosis keywords returned with each guidance.
pub const KEYWORD_COUNT: usize = 3;

/// How soon the user should see a doctor. Discrete levels, not a score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum Urgency {
    NoVisit = 1,
    VisitOptional = 2,
    VisitNotUrgent = 3,
    VisitRequired = 4,
    VisitImmediately = 5,
}

impl Urgency {
    pub const ALL: &[Urgency] = &[
        Urgency::NoVisit,
        Urgency::VisitOptional,
        Urgency::VisitNotUrgent,
        Urgency::VisitRequired,
        Urgency::VisitImmediately,
    ];

    pub fn level(&self) -> u8 {
        *self as u8
    }

    pub fn from_level(level: u8) -> Option<Self> {
        match level {
            1 => Some(Urgency::NoVisit),
            2 => Some(Urgency::VisitOptional),
            3 => Some(Urgency::VisitNotUrgent),
            4 => Some(Urgency::VisitRequired),
            5 => Some(Urgency::VisitImmediately),
            _ => None,
        }
    }

    /// Models answer with a JSON number; accept `3` and `3.0` but not `3.5`.
    pub fn from_number(value: f64) -> Result<Self, DriftError> {
        if value.fract() != 0.0 || !(1.0..=5.0).contains(&value) {
            return Err(DriftError::UrgencyOutOfRange(value));
        }
        Self::from_level(value as u8).ok_or(DriftError::UrgencyOutOfRange(value))
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Urgency::NoVisit => "No necesitas ir al médico",
            Urgency::VisitOptional => "Tal vez debas ir al médico",
            Urgency::VisitNotUrgent => "Debes ir al médico, sin urgencia",
            Urgency::VisitRequired => "Debes ir al médico",
            Urgency::VisitImmediately => "Debes ir al médico de inmediato",
        }
    }
}

impl From<Urgency> for u8 {
    fn from(u: Urgency) -> u8 {
        u.level()
    }
}

impl TryFrom<u8> for Urgency {
    type Error = DriftError;

    fn try_from(level: u8) -> Result<Self, Self::Error> {
        Urgency::from_level(level).ok_or(DriftError::UrgencyOutOfRange(level as f64))
    }
}

impl fmt::Display for Urgency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/5", self.level())
    }
}

/// Guidance object exactly as the generation service returns it.
/// Nothing here is trusted until [`RawGuidance::validate`] passes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawGuidance {
    pub orientacion: String,
    pub urgencia: f64,
    #[serde(rename = "explicacionUrgencia")]
    pub explicacion_urgencia: String,
    pub palabrasclave: Vec<String>,
}

impl RawGuidance {
    pub fn validate(self) -> Result<GuidanceResult, DriftError> {
        if self.orientacion.trim().is_empty() {
            return Err(DriftError::EmptyField {
                field: "orientacion",
            });
        }
        if self.explicacion_urgencia.trim().is_empty() {
            return Err(DriftError::EmptyField {
                field: "explicacionUrgencia",
            });
        }
        let urgency = Urgency::from_number(self.urgencia)?;
        if self.palabrasclave.len() != KEYWORD_COUNT {
            return Err(DriftError::KeywordCount {
                expected: KEYWORD_COUNT,
                actual: self.palabrasclave.len(),
            });
        }
        if let Some(index) = self.palabrasclave.iter().position(|k| k.trim().is_empty()) {
            return Err(DriftError::EmptyKeyword { index });
        }
        Ok(GuidanceResult {
            guidance: self.orientacion,
            urgency,
            urgency_rationale: self.explicacion_urgencia,
            keywords: self.palabrasclave,
        })
    }
}

/// Validated guidance: non-empty texts, a discrete urgency level and
/// exactly [`KEYWORD_COUNT`] keywords.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuidanceResult {
    #[serde(rename = "orientacion")]
    pub guidance: String,
    #[serde(rename = "urgencia")]
    pub urgency: Urgency,
    #[serde(rename = "explicacionUrgencia")]
    pub urgency_rationale: String,
    #[serde(rename = "palabrasclave")]
    pub keywords: Vec<String>,
}
