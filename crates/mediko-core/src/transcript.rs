//! Question/answer history as sent to the guidance stage.
//!
//! Each pair renders as `"{n}. {question}\n{answer}\n"` with `n` starting at 1.
//! Questions are single-line; answers may span several lines as long as no
//! continuation line starts like a question number. [`QuestionSet`] and
//! [`Answer`] enforce both rules, so [`Transcript::from_answers`] always
//! parses back to the same pairs.
//!
//! [`QuestionSet`]: crate::QuestionSet

use std::fmt;

use serde::Serialize;

use crate::answer::Answer;
use crate::error::TranscriptError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Transcript(String);

impl Transcript {
    /// Render recorded answers in order.
    pub fn from_answers(answers: &[Answer]) -> Self {
        let mut out = String::new();
        for (i, answer) in answers.iter().enumerate() {
            push_block(&mut out, i + 1, &answer.question_text, &answer.answer_text);
        }
        Self(out)
    }

    /// Render parallel question and answer lists. Pairs that could not be
    /// parsed back unambiguously are refused.
    pub fn serialize<Q: AsRef<str>, A: AsRef<str>>(
        questions: &[Q],
        answers: &[A],
    ) -> Result<Self, TranscriptError> {
        if questions.len() != answers.len() {
            return Err(TranscriptError::LengthMismatch {
                questions: questions.len(),
                answers: answers.len(),
            });
        }
        let mut out = String::new();
        for (i, (q, a)) in questions.iter().zip(answers).enumerate() {
            if q.as_ref().contains('\n') {
                return Err(TranscriptError::MultilineQuestion { index: i });
            }
            if let Some(line) = numbered_line(a.as_ref()) {
                return Err(TranscriptError::NumberedAnswerLine { index: i, line });
            }
            push_block(&mut out, i + 1, q.as_ref(), a.as_ref());
        }
        Ok(Self(out))
    }

    /// Recover the ordered `(question, answer)` pairs.
    pub fn parse(&self) -> Result<Vec<(String, String)>, TranscriptError> {
        parse_str(&self.0)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Transcript {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn push_block(out: &mut String, n: usize, question: &str, answer: &str) {
    out.push_str(&format!("{n}. {question}\n{answer}\n"));
}

/// 1-based number of the first continuation line that begins with
/// `"<digits>. "`. The first line is exempt: the parser always reads it as
/// answer text.
pub(crate) fn numbered_line(text: &str) -> Option<usize> {
    text.split('\n')
        .enumerate()
        .skip(1)
        .find(|(_, line)| {
            let rest = line.trim_start_matches(|c: char| c.is_ascii_digit());
            rest.len() < line.len() && rest.starts_with(". ")
        })
        .map(|(i, _)| i + 1)
}

/// Parse a transcript produced by [`Transcript::serialize`].
pub fn parse_str(text: &str) -> Result<Vec<(String, String)>, TranscriptError> {
    if text.is_empty() {
        return Ok(Vec::new());
    }
    let body = text.strip_suffix('\n').ok_or_else(|| TranscriptError::Malformed {
        line: text.lines().count(),
        reason: "missing trailing newline".into(),
    })?;

    let lines: Vec<&str> = body.split('\n').collect();
    let mut pairs = Vec::new();
    let mut i = 0;
    let mut n = 1;

    while i < lines.len() {
        let prefix = format!("{n}. ");
        let question = lines[i]
            .strip_prefix(&prefix)
            .ok_or_else(|| TranscriptError::Malformed {
                line: i + 1,
                reason: format!("expected question {n}"),
            })?;
        i += 1;

        if i >= lines.len() {
            return Err(TranscriptError::Malformed {
                line: i,
                reason: format!("question {n} has no answer"),
            });
        }

        let mut answer = lines[i].to_string();
        i += 1;
        let next_prefix = format!("{}. ", n + 1);
        while i < lines.len() && !lines[i].starts_with(&next_prefix) {
            answer.push('\n');
            answer.push_str(lines[i]);
            i += 1;
        }

        pairs.push((question.to_string(), answer));
        n += 1;
    }

    Ok(pairs)
}
