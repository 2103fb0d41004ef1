use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::json;

use crate::{GenerationError, GenerationRequest, GenerationService};

enum Reply {
    Json(serde_json::Value),
    Fail(GenerationError),
}

/// A scripted generation service for tests.
///
/// Replies are consumed in order, one per call. Every request is recorded so
/// tests can assert on what was sent and how many times.
#[derive(Default)]
pub struct MockService {
    replies: Mutex<VecDeque<Reply>>,
    requests: Mutex<Vec<GenerationRequest>>,
    delay: Option<Duration>,
}

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl MockService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a successful JSON reply.
    pub fn reply(self, value: serde_json::Value) -> Self {
        lock(&self.replies).push_back(Reply::Json(value));
        self
    }

    /// Queue a failure.
    pub fn fail(self, err: GenerationError) -> Self {
        lock(&self.replies).push_back(Reply::Fail(err));
        self
    }

    /// Sleep this long before answering each call.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn requests(&self) -> Vec<GenerationRequest> {
        lock(&self.requests).clone()
    }

    pub fn call_count(&self) -> usize {
        lock(&self.requests).len()
    }
}

#[async_trait]
impl GenerationService for MockService {
    fn name(&self) -> &str {
        "mock"
    }

    async fn generate(
        &self,
        request: &GenerationRequest,
    ) -> Result<serde_json::Value, GenerationError> {
        lock(&self.requests).push(request.clone());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        match lock(&self.replies).pop_front() {
            Some(Reply::Json(value)) => Ok(value),
            Some(Reply::Fail(err)) => Err(err),
            None => Err(GenerationError::Transport(
                "mock: no scripted reply left".into(),
            )),
        }
    }
}

/// Wire-shaped question reply: `{ "preguntas": [{ "pregunta": .. }] }`.
pub fn questions_reply<S: AsRef<str>>(questions: &[S]) -> serde_json::Value {
    let items: Vec<_> = questions
        .iter()
        .map(|q| json!({ "pregunta": q.as_ref() }))
        .collect();
    json!({ "preguntas": items })
}

/// Wire-shaped guidance reply.
pub fn guidance_reply<S: AsRef<str>>(
    guidance: &str,
    urgency: u8,
    rationale: &str,
    keywords: &[S],
) -> serde_json::Value {
    let keywords: Vec<&str> = keywords.iter().map(|k| k.as_ref()).collect();
    json!({
        "orientacion": guidance,
        "urgencia": urgency,
        "explicacionUrgencia": rationale,
        "palabrasclave": keywords,
    })
}
