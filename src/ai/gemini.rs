//! Gemini HTTP 提供方

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{debug, error};

use super::{AiGenerator, ChatReply, ChatTurn, GenerationOptions};
use crate::config::AiConfig;
use crate::errors::{Result, SchoolHubError};
use crate::models::conversations::entities::MessageRole;

pub const PROVIDER_NAME: &str = "gemini";

const API_KEY_HEADER: &str = "x-goog-api-key";

#[derive(Clone)]
pub struct GeminiGenerator {
    http: reqwest::Client,
    config: AiConfig,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest {
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    top_k: u32,
    top_p: f32,
    max_output_tokens: u32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    usage_metadata: Option<UsageMetadata>,
    model_version: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UsageMetadata {
    #[serde(default)]
    total_token_count: i64,
}

impl GenerateResponse {
    /// 拼接首个候选的全部文本片段
    fn text(&self) -> Option<String> {
        let content = self.candidates.first()?.content.as_ref()?;
        let text: String = content.parts.iter().map(|p| p.text.as_str()).collect();
        (!text.trim().is_empty()).then_some(text)
    }
}

fn text_content(role: Option<&str>, text: &str) -> Content {
    Content {
        role: role.map(str::to_string),
        parts: vec![Part {
            text: text.to_string(),
        }],
    }
}

impl GeminiGenerator {
    pub fn from_config(config: &AiConfig) -> Result<Self> {
        if config.api_key.trim().is_empty() {
            return Err(SchoolHubError::ai_provider_not_found(
                "Gemini API key is not configured",
            ));
        }

        let http = reqwest::Client::builder()
            .build()
            .map_err(|e| SchoolHubError::generation(format!("无法创建 HTTP 客户端: {e}")))?;

        Ok(Self {
            http,
            config: config.clone(),
        })
    }

    fn generation_config(&self, options: &GenerationOptions) -> GenerationConfig {
        GenerationConfig {
            temperature: options.temperature.unwrap_or(self.config.temperature),
            top_k: self.config.top_k,
            top_p: self.config.top_p,
            max_output_tokens: options.max_tokens.unwrap_or(self.config.max_output_tokens),
        }
    }

    fn model<'a>(&'a self, options: &'a GenerationOptions) -> &'a str {
        options.model.as_deref().unwrap_or(&self.config.model)
    }

    async fn send(&self, model: &str, request: &GenerateRequest) -> Result<GenerateResponse> {
        let url = format!(
            "{}/models/{}:generateContent",
            self.config.base_url.trim_end_matches('/'),
            model
        );

        let resp = self
            .http
            .post(&url)
            .header(API_KEY_HEADER, &self.config.api_key)
            .json(request)
            .send()
            .await
            .map_err(|e| {
                error!("Gemini request failed: {}", e);
                SchoolHubError::generation(format!("AI request failed: {e}"))
            })?;

        let status = resp.status();
        let body = resp
            .text()
            .await
            .map_err(|e| SchoolHubError::generation(format!("AI response read failed: {e}")))?;

        if !status.is_success() {
            error!("Gemini API error: {} - {}", status, body);
            return Err(SchoolHubError::generation(format!(
                "AI provider returned {status}"
            )));
        }

        serde_json::from_str(&body)
            .map_err(|e| SchoolHubError::generation(format!("AI response parse failed: {e}")))
    }
}

#[async_trait]
impl AiGenerator for GeminiGenerator {
    fn name(&self) -> &'static str {
        PROVIDER_NAME
    }

    async fn generate_text(&self, prompt: &str, options: &GenerationOptions) -> Result<String> {
        let request = GenerateRequest {
            contents: vec![text_content(Some("user"), prompt)],
            system_instruction: None,
            generation_config: self.generation_config(options),
        };

        let response = self.send(self.model(options), &request).await?;
        response
            .text()
            .ok_or_else(|| SchoolHubError::generation("AI returned an empty response"))
    }

    async fn chat(&self, messages: &[ChatTurn], options: &GenerationOptions) -> Result<ChatReply> {
        if messages.is_empty() {
            return Err(SchoolHubError::validation("Chat requires at least one message"));
        }

        // 系统消息合并为 system instruction，其余按 user / model 交替
        let system: Vec<&str> = messages
            .iter()
            .filter(|m| m.role == MessageRole::System)
            .map(|m| m.content.as_str())
            .collect();
        let contents = messages
            .iter()
            .filter(|m| m.role != MessageRole::System)
            .map(|m| {
                let role = if m.role == MessageRole::Assistant {
                    "model"
                } else {
                    "user"
                };
                text_content(Some(role), &m.content)
            })
            .collect();

        let request = GenerateRequest {
            contents,
            system_instruction: (!system.is_empty())
                .then(|| text_content(None, &system.join("\n"))),
            generation_config: self.generation_config(options),
        };

        let model = self.model(options);
        let started = Instant::now();
        let response = self.send(model, &request).await?;
        debug!(
            "Gemini chat completed in {} ms",
            started.elapsed().as_millis()
        );

        let content = response
            .text()
            .ok_or_else(|| SchoolHubError::generation("AI returned an empty response"))?;

        Ok(ChatReply {
            content,
            tokens_used: response
                .usage_metadata
                .as_ref()
                .map_or(0, |u| u.total_token_count),
            model: response
                .model_version
                .clone()
                .unwrap_or_else(|| model.to_string()),
        })
    }
}
