//! OpenAiService against an in-process fake chat-completions server.
//!
//! Each test binds an axum server on 127.0.0.1:0 that records the request and
//! answers with a canned status and body.

use std::sync::{Arc, Mutex};

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::post;
use axum::{Json, Router};
use mediko_core::{SymptomDescription, Transcript, Urgency};
use mediko_service::mock::{guidance_reply, questions_reply};
use mediko_service::{
    GenerationError, GeneratorConfig, GuidanceGenerator, OpenAiService, QuestionGenerator,
};
use serde_json::{json, Value};
use tokio::net::TcpListener;

#[derive(Default)]
struct Recorded {
    bodies: Vec<Value>,
    auth: Vec<String>,
}

struct Fake {
    status: StatusCode,
    reply: Value,
    recorded: Mutex<Recorded>,
}

async fn completions(
    State(fake): State<Arc<Fake>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    {
        let mut rec = fake.recorded.lock().unwrap();
        rec.bodies.push(body);
        rec.auth.push(
            headers
                .get("authorization")
                .and_then(|v| v.to_str().ok())
                .unwrap_or_default()
                .to_string(),
        );
    }
    (fake.status, Json(fake.reply.clone()))
}

async fn spawn_fake(status: StatusCode, reply: Value) -> (String, Arc<Fake>) {
    let fake = Arc::new(Fake {
        status,
        reply,
        recorded: Mutex::new(Recorded::default()),
    });
    let app = Router::new()
        .route("/v1/chat/completions", post(completions))
        .with_state(fake.clone());
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (format!("http://{addr}/v1"), fake)
}

fn tool_call(name: &str, arguments: &Value) -> Value {
    json!({
        "id": "chatcmpl-test",
        "object": "chat.completion",
        "choices": [{
            "index": 0,
            "finish_reason": "stop",
            "message": {
                "role": "assistant",
                "content": null,
                "tool_calls": [{
                    "id": "call_0",
                    "type": "function",
                    "function": { "name": name, "arguments": arguments.to_string() }
                }]
            }
        }]
    })
}

fn config(base_url: &str) -> GeneratorConfig {
    GeneratorConfig {
        base_url: base_url.to_string(),
        model: "gpt-test".into(),
        ..GeneratorConfig::default()
    }
    .with_api_key("sk-test")
}

fn desc() -> SymptomDescription {
    SymptomDescription::new("dolor de cabeza", 200).unwrap()
}

const SEVEN: [&str; 7] = ["q1", "q2", "q3", "q4", "q5", "q6", "q7"];

#[tokio::test]
async fn questions_round_trip_over_http() {
    let reply = tool_call("preguntas_de_consulta", &questions_reply(&SEVEN));
    let (url, fake) = spawn_fake(StatusCode::OK, reply).await;
    let config = config(&url);
    let service = Arc::new(OpenAiService::new(&config).unwrap());
    let gen = QuestionGenerator::new(service, &config);

    let set = gen.generate(&desc()).await.unwrap();
    assert_eq!(set.len(), 7);
    assert_eq!(set[6].text, "q7");

    let rec = fake.recorded.lock().unwrap();
    assert_eq!(rec.auth, vec!["Bearer sk-test"]);
    let body = &rec.bodies[0];
    assert_eq!(body["model"], "gpt-test");
    assert_eq!(body["temperature"], 1.0);
    assert_eq!(body["messages"][1]["content"], "Motivo de consulta: dolor de cabeza");
    assert_eq!(body["tool_choice"]["function"]["name"], "preguntas_de_consulta");
}

#[tokio::test]
async fn guidance_round_trip_over_http() {
    let args = guidance_reply("Hidrátate 💧. Consulta en Mediko.", 3, "sin signos de alarma", &[
        "migraña",
        "tensión",
        "deshidratación",
    ]);
    let (url, fake) = spawn_fake(StatusCode::OK, tool_call("orientacion_medica", &args)).await;
    let config = config(&url);
    let service = Arc::new(OpenAiService::new(&config).unwrap());
    let gen = GuidanceGenerator::new(service, &config);

    let transcript = Transcript::serialize(&["¿Desde cuándo?"], &["2 horas"]).unwrap();
    let g = gen.generate(&desc(), &transcript).await.unwrap();
    assert_eq!(g.urgency, Urgency::VisitNotUrgent);
    assert_eq!(g.keywords[0], "migraña");

    let rec = fake.recorded.lock().unwrap();
    let temp = rec.bodies[0]["temperature"].as_f64().unwrap();
    assert!((temp - 0.7).abs() < 1e-6);
}

#[tokio::test]
async fn drifted_reply_over_http_is_rejected() {
    let reply = tool_call("preguntas_de_consulta", &questions_reply(&SEVEN[..3]));
    let (url, _) = spawn_fake(StatusCode::OK, reply).await;
    let config = config(&url);
    let gen = QuestionGenerator::new(Arc::new(OpenAiService::new(&config).unwrap()), &config);
    assert!(gen.generate(&desc()).await.unwrap_err().is_schema_drift());
}

#[tokio::test]
async fn non_2xx_surfaces_provider_message() {
    let reply = json!({ "error": { "message": "Incorrect API key provided", "type": "invalid_request_error" } });
    let (url, _) = spawn_fake(StatusCode::UNAUTHORIZED, reply).await;
    let config = config(&url);
    let gen = QuestionGenerator::new(Arc::new(OpenAiService::new(&config).unwrap()), &config);

    match gen.generate(&desc()).await.unwrap_err() {
        GenerationError::Status { status, message } => {
            assert_eq!(status, 401);
            assert_eq!(message, "Incorrect API key provided");
        }
        other => panic!("expected Status error, got {other:?}"),
    }
}

#[tokio::test]
async fn unreachable_server_is_transport_error() {
    // Bind then drop to get a port nobody listens on.
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let config = config(&format!("http://{addr}/v1"));
    let gen = QuestionGenerator::new(Arc::new(OpenAiService::new(&config).unwrap()), &config);
    assert!(matches!(
        gen.generate(&desc()).await,
        Err(GenerationError::Transport(_))
    ));
}
