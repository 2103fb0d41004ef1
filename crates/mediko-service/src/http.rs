use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::GeneratorConfig;
use crate::{GenerationError, GenerationRequest, GenerationService};

/// Client for an OpenAI-compatible chat-completions endpoint.
///
/// Structured output is requested through a single forced function call whose
/// parameters are the output schema; the call's arguments are the reply.
pub struct OpenAiService {
    base_url: String,
    client: Client,
    api_key: Option<String>,
    timeout: Duration,
}

impl OpenAiService {
    pub fn new(config: &GeneratorConfig) -> Result<Self, GenerationError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| GenerationError::Transport(format!("build client: {e}")))?;
        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            client,
            api_key: config.api_key.clone(),
            timeout: config.timeout,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    temperature: f32,
    messages: [ChatMessage<'a>; 2],
    tools: [Tool<'a>; 1],
    tool_choice: ToolChoice<'a>,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Serialize)]
struct Tool<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    function: FunctionDef<'a>,
}

#[derive(Serialize)]
struct FunctionDef<'a> {
    name: &'a str,
    description: &'a str,
    parameters: &'a serde_json::Value,
}

#[derive(Serialize)]
struct ToolChoice<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    function: FunctionName<'a>,
}

#[derive(Serialize)]
struct FunctionName<'a> {
    name: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    tool_calls: Option<Vec<ToolCall>>,
    #[serde(default)]
    refusal: Option<String>,
}

#[derive(Deserialize)]
struct ToolCall {
    function: FunctionCall,
}

#[derive(Deserialize)]
struct FunctionCall {
    name: String,
    arguments: String,
}

fn build_body(request: &GenerationRequest) -> ChatRequest<'_> {
    let prompt = &request.prompt;
    ChatRequest {
        model: &request.model,
        temperature: request.temperature,
        messages: [
            ChatMessage {
                role: "system",
                content: &prompt.system,
            },
            ChatMessage {
                role: "user",
                content: &prompt.user,
            },
        ],
        tools: [Tool {
            kind: "function",
            function: FunctionDef {
                name: prompt.schema.name,
                description: prompt.schema.description,
                parameters: &prompt.schema.parameters,
            },
        }],
        tool_choice: ToolChoice {
            kind: "function",
            function: FunctionName {
                name: prompt.schema.name,
            },
        },
    }
}

/// Pull the structured reply out of a chat completion.
fn extract_arguments(
    response: ChatResponse,
    expected_fn: &str,
) -> Result<serde_json::Value, GenerationError> {
    let message = response
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| GenerationError::Decode("response has no choices".into()))?
        .message;

    if let Some(refusal) = message.refusal {
        return Err(GenerationError::Decode(format!("model refused: {refusal}")));
    }

    let raw = match message
        .tool_calls
        .and_then(|calls| calls.into_iter().find(|c| c.function.name == expected_fn))
    {
        Some(call) => call.function.arguments,
        // Some compatible servers ignore tool_choice and answer in content.
        None => message.content.ok_or_else(|| {
            GenerationError::Decode(format!("no call to {expected_fn} in response"))
        })?,
    };

    serde_json::from_str(&raw).map_err(|e| GenerationError::Decode(format!("arguments: {e}")))
}

async fn parse_error_with_status(status: StatusCode, resp: reqwest::Response) -> GenerationError {
    let body = resp.text().await.unwrap_or_default();
    let message = serde_json::from_str::<serde_json::Value>(&body)
        .ok()
        .and_then(|v| v["error"]["message"].as_str().map(String::from))
        .unwrap_or(body);
    GenerationError::Status {
        status: status.as_u16(),
        message,
    }
}

#[async_trait]
impl GenerationService for OpenAiService {
    fn name(&self) -> &str {
        "openai"
    }

    async fn generate(
        &self,
        request: &GenerationRequest,
    ) -> Result<serde_json::Value, GenerationError> {
        let key = self
            .api_key
            .as_deref()
            .ok_or(GenerationError::MissingCredential)?;

        let body = build_body(request);
        debug!(
            schema = request.prompt.schema.name,
            prompt_bytes = request.prompt.system.len() + request.prompt.user.len(),
            "sending chat completion"
        );
        let resp = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    GenerationError::Timeout(self.timeout)
                } else {
                    GenerationError::Transport(e.to_string())
                }
            })?;

        let status = resp.status();
        if !status.is_success() {
            return Err(parse_error_with_status(status, resp).await);
        }

        let chat = resp
            .json::<ChatResponse>()
            .await
            .map_err(|e| GenerationError::Decode(format!("json decode: {e}")))?;
        let value = extract_arguments(chat, request.prompt.schema.name)?;
        debug!(schema = request.prompt.schema.name, "structured reply received");
        Ok(value)
    }
}
