use chrono::{DateTime, Utc};
use mediko_core::description::{check_text, remaining_chars};
use mediko_core::{
    Answer, GuidanceResult, Question, QuestionSet, SymptomDescription, Transcript,
    ValidationError, DEFAULT_MAX_CHARS,
};
use mediko_service::{GuidanceGenerator, QuestionGenerator};
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::SessionError;
use crate::phase::Phase;

/// Input bounds applied before anything reaches a generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionLimits {
    pub max_chars: usize,
}

impl Default for SessionLimits {
    fn default() -> Self {
        Self {
            max_chars: DEFAULT_MAX_CHARS,
        }
    }
}

/// One consultation: description, questions, answers and the final guidance.
///
/// Every transition either commits completely or leaves the session as it
/// was. Generator calls take `&mut self` across the await, so a session can
/// never have two requests in flight.
#[derive(Debug)]
pub struct Session {
    id: Uuid,
    started_at: DateTime<Utc>,
    resolved_at: Option<DateTime<Utc>>,
    limits: SessionLimits,
    phase: Phase,
    terms_accepted: bool,
    description: Option<SymptomDescription>,
    questions: Option<QuestionSet>,
    /// Committed answers for indices `0..answers.len()`.
    answers: Vec<Answer>,
    /// Last recorded text per index. Survives backward navigation so that
    /// moving forward again pre-fills the buffer.
    drafts: Vec<Option<String>>,
    buffer: String,
    guidance: Option<GuidanceResult>,
}

impl Session {
    pub fn new(limits: SessionLimits) -> Self {
        Self {
            id: Uuid::new_v4(),
            started_at: Utc::now(),
            resolved_at: None,
            limits,
            phase: Phase::Idle,
            terms_accepted: false,
            description: None,
            questions: None,
            answers: Vec::new(),
            drafts: Vec::new(),
            buffer: String::new(),
            guidance: None,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn resolved_at(&self) -> Option<DateTime<Utc>> {
        self.resolved_at
    }

    pub fn limits(&self) -> SessionLimits {
        self.limits
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn terms_accepted(&self) -> bool {
        self.terms_accepted
    }

    pub fn description(&self) -> Option<&SymptomDescription> {
        self.description.as_ref()
    }

    pub fn questions(&self) -> Option<&QuestionSet> {
        self.questions.as_ref()
    }

    pub fn answers(&self) -> &[Answer] {
        &self.answers
    }

    pub fn guidance(&self) -> Option<&GuidanceResult> {
        self.guidance.as_ref()
    }

    /// The in-progress answer text.
    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    pub fn remaining_chars(&self) -> usize {
        remaining_chars(&self.buffer, self.limits.max_chars)
    }

    pub fn current_question(&self) -> Option<&Question> {
        let index = self.phase.question_index()?;
        self.questions.as_ref()?.get(index)
    }

    /// Fraction of questions reached, for a progress bar.
    pub fn progress(&self) -> Option<f32> {
        let total = self.questions.as_ref()?.len() as f32;
        match self.phase {
            Phase::Idle => None,
            Phase::Questioning { index } => Some((index + 1) as f32 / total),
            Phase::Reviewing | Phase::Resolved => Some(1.0),
        }
    }

    pub fn transcript(&self) -> Transcript {
        Transcript::from_answers(&self.answers)
    }

    pub fn set_terms_accepted(&mut self, accepted: bool) -> Result<(), SessionError> {
        self.require(Phase::Idle, "change terms acceptance")?;
        self.terms_accepted = accepted;
        Ok(())
    }

    /// Replace the in-progress answer. Text over the limit is refused and the
    /// buffer keeps its previous content.
    pub fn set_buffer(&mut self, text: impl Into<String>) -> Result<(), SessionError> {
        if self.phase.question_index().is_none() {
            return Err(self.invalid("edit an answer"));
        }
        let text = text.into();
        let actual = text.chars().count();
        if actual > self.limits.max_chars {
            return Err(ValidationError::TooLong {
                field: "answer",
                max: self.limits.max_chars,
                actual,
            }
            .into());
        }
        self.buffer = text;
        Ok(())
    }

    /// `Idle → Questioning(0)`. Calls the question generator exactly once.
    pub async fn submit_description(
        &mut self,
        generator: &QuestionGenerator,
        text: &str,
    ) -> Result<&QuestionSet, SessionError> {
        self.require(Phase::Idle, "submit a description")?;
        if !self.terms_accepted {
            return Err(ValidationError::TermsNotAccepted.into());
        }
        let description = SymptomDescription::new(text, self.limits.max_chars)?;

        let questions = generator.generate(&description).await.map_err(|e| {
            warn!(session = %self.id, "question generation failed: {e}");
            e
        })?;

        self.drafts = vec![None; questions.len()];
        self.answers.clear();
        self.buffer.clear();
        self.description = Some(description);
        self.transition(Phase::Questioning { index: 0 });
        Ok(self.questions.insert(questions))
    }

    /// Record the buffer as the answer to the current question and move on.
    /// After the last question the session enters `Reviewing`.
    pub fn advance(&mut self) -> Result<Phase, SessionError> {
        let index = self
            .phase
            .question_index()
            .ok_or_else(|| self.invalid("answer a question"))?;
        let questions = self
            .questions
            .as_ref()
            .ok_or_else(|| self.invalid("answer a question"))?;

        let answer = Answer::new(&questions[index], self.buffer.as_str(), self.limits.max_chars)?;
        let last = questions.last_index();

        self.drafts[index] = Some(answer.answer_text.clone());
        self.answers.truncate(index);
        self.answers.push(answer);

        if index < last {
            self.buffer = self.drafts[index + 1].clone().unwrap_or_default();
            self.transition(Phase::Questioning { index: index + 1 });
        } else {
            self.buffer.clear();
            self.transition(Phase::Reviewing);
        }
        Ok(self.phase)
    }

    /// Step back one question, restoring its recorded answer into the buffer.
    /// Unsubmitted text in the buffer is dropped.
    pub fn back(&mut self) -> Result<Phase, SessionError> {
        let target = match self.phase {
            Phase::Questioning { index } if index > 0 => index - 1,
            Phase::Reviewing => self.answers.len().saturating_sub(1),
            _ => return Err(self.invalid("go back")),
        };

        self.answers.truncate(target + 1);
        self.buffer = self
            .answers
            .get(target)
            .map(|a| a.answer_text.clone())
            .unwrap_or_default();
        self.transition(Phase::Questioning { index: target });
        Ok(self.phase)
    }

    /// `Reviewing → Resolved`. Calls the guidance generator exactly once
    /// with the full transcript. On failure the session stays in `Reviewing`.
    pub async fn request_guidance(
        &mut self,
        generator: &GuidanceGenerator,
    ) -> Result<&GuidanceResult, SessionError> {
        self.require(Phase::Reviewing, "request guidance")?;
        let (Some(description), Some(questions)) = (&self.description, &self.questions) else {
            return Err(self.invalid("request guidance"));
        };
        if self.answers.len() != questions.len() {
            return Err(self.invalid("request guidance"));
        }
        // Same rule as forward navigation: the final answer must be non-empty.
        if let Some(last) = self.answers.last() {
            check_text("answer", &last.answer_text, self.limits.max_chars)?;
        }

        let transcript = self.transcript();
        let guidance = generator
            .generate(description, &transcript)
            .await
            .map_err(|e| {
                warn!(session = %self.id, "guidance generation failed: {e}");
                e
            })?;

        let resolved_at = Utc::now();
        self.resolved_at = Some(resolved_at);
        self.transition(Phase::Resolved);
        info!(
            session = %self.id,
            started_at = %self.started_at,
            %resolved_at,
            urgency = guidance.urgency.level(),
            "consultation resolved"
        );
        Ok(self.guidance.insert(guidance))
    }

    /// Discard everything and start a fresh consultation.
    pub fn reset(&mut self) {
        info!(session = %self.id, phase = %self.phase, "session reset");
        *self = Session::new(self.limits);
    }

    fn require(&self, expected: Phase, action: &'static str) -> Result<(), SessionError> {
        if self.phase == expected {
            Ok(())
        } else {
            Err(self.invalid(action))
        }
    }

    fn invalid(&self, action: &'static str) -> SessionError {
        warn!(session = %self.id, phase = %self.phase, action, "rejected transition");
        SessionError::InvalidTransition {
            phase: self.phase,
            action,
        }
    }

    fn transition(&mut self, to: Phase) {
        info!(
            session = %self.id,
            started_at = %self.started_at,
            from = %self.phase,
            %to,
            "phase transition"
        );
        self.phase = to;
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(SessionLimits::default())
    }
}
