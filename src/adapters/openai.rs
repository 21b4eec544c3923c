//! Chat-completions client that turns a finished draw into interpretation text.

use crate::config::toml_config::OpenAiConfig;
use crate::domain::model::{strip_code_fence, DrawnCardPayload};
use crate::domain::ports::Interpreter;
use crate::domain::spreads::SpreadKind;
use crate::utils::error::{Result, TarotError};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const EMPTY_REPLY: &str = "Unable to generate an interpretation.";

const SYSTEM_PROMPT: &str = "You are an experienced tarot reader. You read the Rider-Waite deck, \
take card orientation into account, and answer warmly and concretely.";

const REPLY_SHAPE: &str = r#"Reply with JSON only, in this shape:
{
  "fullMessage": "overall reading",
  "cards": [
    {"position": "position name", "cardName": "card name", "direction": "upright or reversed", "interpretation": "meaning in this position"}
  ],
  "conclusion": "short closing advice"
}"#;

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

impl ChatMessage {
    fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Clone)]
pub struct OpenAiInterpreter {
    http: Client,
    api_key: String,
    base_url: String,
    model: String,
    max_tokens: u32,
    temperature: f32,
}

impl OpenAiInterpreter {
    pub fn new(config: &OpenAiConfig) -> Result<Self> {
        let api_key = config.resolved_api_key()?;
        Self::with_api_key(config, api_key)
    }

    pub fn with_api_key(config: &OpenAiConfig, api_key: impl Into<String>) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent(concat!("sol-tarot/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            api_key: api_key.into(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            max_tokens: config.max_tokens,
            temperature: config.temperature,
        })
    }

    async fn complete(&self, prompt: String) -> Result<String> {
        let request = ChatRequest {
            model: self.model.clone(),
            messages: vec![ChatMessage::system(SYSTEM_PROMPT), ChatMessage::user(prompt)],
            max_tokens: self.max_tokens,
            temperature: self.temperature,
        };

        let url = format!("{}/chat/completions", self.base_url);
        tracing::debug!(%url, model = %self.model, "Requesting interpretation");

        let res = self
            .http
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        match res.status() {
            s if s.is_success() => {
                let body: ChatResponse = res.json().await?;
                Ok(match body.choices.into_iter().next() {
                    Some(choice) => normalize_reply(&choice.message.content),
                    None => {
                        tracing::warn!("Interpretation reply had no choices");
                        EMPTY_REPLY.to_string()
                    }
                })
            }
            StatusCode::UNAUTHORIZED => Err(TarotError::InvalidApiKey),
            StatusCode::TOO_MANY_REQUESTS => Err(TarotError::RateLimited),
            s => {
                let status = s.as_u16();
                let body = res.text().await.unwrap_or_default();
                Err(TarotError::HttpError { status, body })
            }
        }
    }
}

#[async_trait]
impl Interpreter for OpenAiInterpreter {
    async fn interpret(&self, cards: &[DrawnCardPayload], spread: SpreadKind) -> Result<String> {
        self.complete(build_prompt(cards, spread)).await
    }
}

pub(crate) fn build_prompt(cards: &[DrawnCardPayload], spread: SpreadKind) -> String {
    let mut prompt = spread.prompt_outline();
    prompt.push_str("\n\nThe cards drawn:\n");
    for card in cards {
        prompt.push_str(&format!(
            "{}: {} ({})\n",
            spread.position_name(card.position),
            card.card_name,
            card.direction()
        ));
    }
    prompt.push('\n');
    prompt.push_str(REPLY_SHAPE);
    prompt
}

/// Unwraps fenced JSON and compacts it; anything else is kept verbatim.
fn normalize_reply(content: &str) -> String {
    let body = strip_code_fence(content);
    match serde_json::from_str::<serde_json::Value>(body) {
        Ok(value) => value.to_string(),
        Err(_) => content.to_string(),
    }
}
