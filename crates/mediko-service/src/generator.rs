use std::sync::Arc;
use std::time::Duration;

use mediko_core::{
    GuidanceResult, Question, QuestionSet, RawGuidance, SymptomDescription, Transcript,
};
use mediko_prompts::{guidance_prompt, questions_prompt, StructuredPrompt};
use serde::Deserialize;
use tracing::{info, warn};

use crate::config::GeneratorConfig;
use crate::{GenerationError, GenerationRequest, GenerationService};

#[derive(Deserialize)]
struct QuestionsReply {
    preguntas: Vec<Question>,
}

/// Stage one: complaint in, seven follow-up questions out.
#[derive(Clone)]
pub struct QuestionGenerator {
    service: Arc<dyn GenerationService>,
    model: String,
    temperature: f32,
    timeout: Duration,
}

impl QuestionGenerator {
    pub fn new(service: Arc<dyn GenerationService>, config: &GeneratorConfig) -> Self {
        Self {
            service,
            model: config.model.clone(),
            temperature: config.question_temperature,
            timeout: config.timeout,
        }
    }

    pub async fn generate(
        &self,
        description: &SymptomDescription,
    ) -> Result<QuestionSet, GenerationError> {
        info!(
            service = self.service.name(),
            model = %self.model,
            "generating follow-up questions"
        );
        let request = self.request(questions_prompt(description));
        let value = call(self.service.as_ref(), &request, self.timeout).await?;

        let reply: QuestionsReply =
            serde_json::from_value(value).map_err(|e| GenerationError::Decode(e.to_string()))?;
        let set = QuestionSet::from_generated(reply.preguntas).map_err(|e| {
            warn!("question reply drifted: {e}");
            e
        })?;
        info!(count = set.len(), "follow-up questions ready");
        Ok(set)
    }

    fn request(&self, prompt: StructuredPrompt) -> GenerationRequest {
        GenerationRequest {
            model: self.model.clone(),
            temperature: self.temperature,
            prompt,
        }
    }
}

/// Stage two: complaint plus questionnaire in, structured guidance out.
#[derive(Clone)]
pub struct GuidanceGenerator {
    service: Arc<dyn GenerationService>,
    model: String,
    temperature: f32,
    timeout: Duration,
}

impl GuidanceGenerator {
    pub fn new(service: Arc<dyn GenerationService>, config: &GeneratorConfig) -> Self {
        Self {
            service,
            model: config.model.clone(),
            temperature: config.guidance_temperature,
            timeout: config.timeout,
        }
    }

    pub async fn generate(
        &self,
        description: &SymptomDescription,
        transcript: &Transcript,
    ) -> Result<GuidanceResult, GenerationError> {
        if transcript.is_empty() {
            return Err(GenerationError::InvalidRequest(
                "transcript must contain at least one answer".into(),
            ));
        }
        info!(
            service = self.service.name(),
            model = %self.model,
            transcript_len = transcript.as_str().len(),
            "generating guidance"
        );
        let request = self.request(guidance_prompt(description, transcript));
        let value = call(self.service.as_ref(), &request, self.timeout).await?;

        let raw: RawGuidance =
            serde_json::from_value(value).map_err(|e| GenerationError::Decode(e.to_string()))?;
        let guidance = raw.validate().map_err(|e| {
            warn!("guidance reply drifted: {e}");
            e
        })?;
        info!(urgency = guidance.urgency.level(), "guidance ready");
        Ok(guidance)
    }

    fn request(&self, prompt: StructuredPrompt) -> GenerationRequest {
        GenerationRequest {
            model: self.model.clone(),
            temperature: self.temperature,
            prompt,
        }
    }
}

/// Both stages, built from one service and one configuration.
#[derive(Clone)]
pub struct Generators {
    pub questions: QuestionGenerator,
    pub guidance: GuidanceGenerator,
}

impl Generators {
    pub fn new(service: Arc<dyn GenerationService>, config: &GeneratorConfig) -> Self {
        Self {
            questions: QuestionGenerator::new(service.clone(), config),
            guidance: GuidanceGenerator::new(service, config),
        }
    }
}

async fn call(
    service: &dyn GenerationService,
    request: &GenerationRequest,
    timeout: Duration,
) -> Result<serde_json::Value, GenerationError> {
    match tokio::time::timeout(timeout, service.generate(request)).await {
        Ok(result) => result,
        Err(_) => {
            warn!(service = service.name(), "generation timed out after {timeout:?}");
            Err(GenerationError::Timeout(timeout))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{guidance_reply, questions_reply, MockService};
    use mediko_core::{DriftError, Urgency};
    use serde_json::json;

    const SEVEN: [&str; 7] = [
        "¿Desde cuándo?",
        "¿Dónde duele?",
        "¿Qué intensidad?",
        "¿Fiebre?",
        "¿Náuseas?",
        "¿Medicamentos?",
        "¿Antecedentes?",
    ];

    fn desc() -> SymptomDescription {
        SymptomDescription::new("dolor de cabeza", 200).unwrap()
    }

    fn transcript() -> Transcript {
        Transcript::serialize(&["¿Desde cuándo?"], &["2 horas"]).unwrap()
    }

    fn questions_with(mock: MockService) -> (Arc<MockService>, QuestionGenerator) {
        let mock = Arc::new(mock);
        let gen = QuestionGenerator::new(mock.clone(), &GeneratorConfig::default());
        (mock, gen)
    }

    fn guidance_with(mock: MockService) -> (Arc<MockService>, GuidanceGenerator) {
        let mock = Arc::new(mock);
        let gen = GuidanceGenerator::new(mock.clone(), &GeneratorConfig::default());
        (mock, gen)
    }

    #[tokio::test]
    async fn returns_seven_questions() {
        let (mock, gen) = questions_with(MockService::new().reply(questions_reply(&SEVEN)));
        let set = gen.generate(&desc()).await.unwrap();
        assert_eq!(set.len(), 7);
        assert_eq!(set[1].text, "¿Dónde duele?");

        let sent = mock.requests();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].temperature, 1.0);
        assert_eq!(sent[0].prompt.user, "Motivo de consulta: dolor de cabeza");
    }

    #[tokio::test]
    async fn short_question_list_is_drift() {
        let (_, gen) = questions_with(MockService::new().reply(questions_reply(&SEVEN[..4])));
        let err = gen.generate(&desc()).await.unwrap_err();
        assert!(err.is_schema_drift());
        assert!(matches!(
            err,
            GenerationError::SchemaDrift(DriftError::QuestionCount { actual: 4, .. })
        ));
    }

    #[tokio::test]
    async fn multiline_question_is_drift() {
        let mut drifted = SEVEN;
        drifted[0] = "¿Desde cuándo?\n(aprox.)";
        let (_, gen) = questions_with(MockService::new().reply(questions_reply(&drifted)));
        assert!(matches!(
            gen.generate(&desc()).await.unwrap_err(),
            GenerationError::SchemaDrift(DriftError::MultilineQuestion { index: 0 })
        ));
    }

    #[tokio::test]
    async fn wrong_shape_is_decode_error() {
        let (_, gen) = questions_with(MockService::new().reply(json!({ "questions": [] })));
        let err = gen.generate(&desc()).await.unwrap_err();
        assert!(matches!(err, GenerationError::Decode(_)));
        assert!(!err.is_schema_drift());
    }

    #[tokio::test]
    async fn each_call_is_validated_independently() {
        let (mock, gen) = questions_with(
            MockService::new()
                .reply(questions_reply(&SEVEN))
                .reply(questions_reply(&SEVEN[..6])),
        );
        assert!(gen.generate(&desc()).await.is_ok());
        assert!(gen.generate(&desc()).await.unwrap_err().is_schema_drift());
        assert_eq!(mock.call_count(), 2);
    }

    #[tokio::test]
    async fn service_failure_propagates() {
        let (_, gen) = questions_with(MockService::new().fail(GenerationError::Status {
            status: 401,
            message: "invalid api key".into(),
        }));
        assert!(matches!(
            gen.generate(&desc()).await,
            Err(GenerationError::Status { status: 401, .. })
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn slow_service_times_out() {
        let mock = Arc::new(
            MockService::new()
                .reply(questions_reply(&SEVEN))
                .with_delay(Duration::from_secs(60)),
        );
        let gen = QuestionGenerator::new(mock, &GeneratorConfig::default());
        let err = gen.generate(&desc()).await.unwrap_err();
        assert!(matches!(err, GenerationError::Timeout(d) if d == Duration::from_secs(30)));
    }

    #[tokio::test]
    async fn returns_validated_guidance() {
        let (mock, gen) = guidance_with(
            MockService::new().reply(guidance_reply("Reposo 🛌", 2, "leve", &["a", "b", "c"])),
        );
        let g = gen.generate(&desc(), &transcript()).await.unwrap();
        assert_eq!(g.urgency, Urgency::VisitOptional);
        assert_eq!(g.keywords, vec!["a", "b", "c"]);

        let sent = &mock.requests()[0];
        assert_eq!(sent.temperature, 0.7);
        assert!(sent.prompt.user.contains("1. ¿Desde cuándo?\n2 horas\n"));
    }

    #[tokio::test]
    async fn guidance_drift_is_reported() {
        let (_, gen) = guidance_with(
            MockService::new()
                .reply(guidance_reply("x", 9, "y", &["a", "b", "c"]))
                .reply(guidance_reply("x", 3, "y", &["a", "b"])),
        );
        let err = gen.generate(&desc(), &transcript()).await.unwrap_err();
        assert!(matches!(
            err,
            GenerationError::SchemaDrift(DriftError::UrgencyOutOfRange(_))
        ));
        let err = gen.generate(&desc(), &transcript()).await.unwrap_err();
        assert!(matches!(
            err,
            GenerationError::SchemaDrift(DriftError::KeywordCount { actual: 2, .. })
        ));
    }

    #[tokio::test]
    async fn empty_transcript_never_reaches_service() {
        let (mock, gen) = guidance_with(MockService::new());
        let err = gen
            .generate(&desc(), &Transcript::from_answers(&[]))
            .await
            .unwrap_err();
        assert!(matches!(err, GenerationError::InvalidRequest(_)));
        assert_eq!(mock.call_count(), 0);
    }

    #[test]
    fn generators_share_config() {
        let mut config = GeneratorConfig::default();
        config.model = "gpt-x".into();
        let gens = Generators::new(Arc::new(MockService::new()), &config);
        assert_eq!(gens.questions.model, "gpt-x");
        assert_eq!(gens.guidance.temperature, 0.7);
    }

    #[test]
    fn both_stages_build_requests_from_their_own_settings() {
        let config = GeneratorConfig {
            model: "gpt-x".into(),
            question_temperature: 0.9,
            guidance_temperature: 0.3,
            ..GeneratorConfig::default()
        };
        let gens = Generators::new(Arc::new(MockService::new()), &config);

        let q = gens.questions.request(questions_prompt(&desc()));
        let g = gens.guidance.request(guidance_prompt(&desc(), &transcript()));
        assert_eq!((q.model.as_str(), q.temperature), ("gpt-x", 0.9));
        assert_eq!((g.model.as_str(), g.temperature), ("gpt-x", 0.3));
        assert_eq!(q.prompt.schema.name, "preguntas_de_consulta");
        assert_eq!(g.prompt.schema.name, "orientacion_medica");
    }
}
