use crate::config::Config;
use crate::error::TranslateError;
use crate::rate_limit::RateLimiter;
use async_trait::async_trait;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;
use tracing::info;

static THINK_REGEX: OnceLock<Regex> = OnceLock::new();

/// Something that turns one chunk of markdown into its translation.
///
/// Each call is independent; implementations must not carry context between chunks.
#[async_trait]
pub trait Translator: Send + Sync {
    async fn translate(&self, chunk: &str) -> Result<String, TranslateError>;

    /// Name used in log lines
    fn name(&self) -> &str;
}

/// OpenAI Chat Completion request
#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<Message>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Message {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Message,
}

/// Build the system prompt for translation
pub fn build_system_prompt(target_language: &str) -> String {
    format!(
        "Help me to translate to {}. Please note don't change project name. \
         Please note don't leave any comments from you. Leave the format as is.",
        target_language
    )
}

/// Remove every `<think>...</think>` region from a model reply.
pub fn strip_think(text: &str) -> String {
    let regex = THINK_REGEX.get_or_init(|| Regex::new(r"(?s)<think>.*?</think>").unwrap());
    regex.replace_all(text, "").into_owned()
}

/// Translator backed by an OpenAI-compatible `/chat/completions` endpoint.
#[derive(Debug)]
pub struct ChatCompletionTranslator {
    client: reqwest::Client,
    url: String,
    api_key: String,
    model: String,
    system_prompt: String,
    limiter: RateLimiter,
}

impl ChatCompletionTranslator {
    pub fn from_config(config: &Config) -> Result<Self, TranslateError> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(TranslateError::Client)?;

        Ok(Self {
            client,
            url: config.chat_completions_url(),
            api_key: config.openai_api_key.clone(),
            model: config.openai_model.clone(),
            system_prompt: build_system_prompt(&config.target_language),
            limiter: RateLimiter::new(config.call_delay),
        })
    }

    async fn request(&self, chunk: &str) -> Result<String, TranslateError> {
        let request = ChatRequest {
            model: &self.model,
            messages: vec![
                Message {
                    role: "system".to_string(),
                    content: self.system_prompt.clone(),
                },
                Message {
                    role: "user".to_string(),
                    content: chunk.to_string(),
                },
            ],
        };

        info!("Calling {} with {} chars", self.model, chunk.chars().count());

        let response = self
            .client
            .post(&self.url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|e| format!("<failed to read body: {}>", e));
            return Err(TranslateError::Status { status, body });
        }

        let body = response.text().await?;
        let chat_response: ChatResponse = serde_json::from_str(&body)
            .map_err(|e| TranslateError::MalformedResponse(e.to_string()))?;

        let content = chat_response
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| {
                TranslateError::MalformedResponse("response contained no choices".to_string())
            })?;

        info!("Response received; stripping <think> block if present");
        Ok(strip_think(&content))
    }
}

#[async_trait]
impl Translator for ChatCompletionTranslator {
    async fn translate(&self, chunk: &str) -> Result<String, TranslateError> {
        let _permit = self.limiter.acquire().await;
        self.request(chunk).await
    }

    fn name(&self) -> &str {
        &self.model
    }
}
