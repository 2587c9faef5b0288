//! AI 生成适配层
//!
//! 业务代码只依赖 `AiGenerator`，不接触提供方的请求格式。

pub mod disabled;
pub mod gemini;
pub mod register;

use async_trait::async_trait;
use serde_json::Value;

use crate::errors::{Result, SchoolHubError};
use crate::models::conversations::entities::MessageRole;

/// 结构化生成时追加在提示词末尾的约束
pub const JSON_ONLY_INSTRUCTION: &str = "IMPORTANT: Return ONLY valid JSON without any markdown formatting, code blocks, or additional text.";

/// 单次生成参数，未设置的项使用提供方配置
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GenerationOptions {
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
    pub model: Option<String>,
}

impl GenerationOptions {
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }
}

/// 对话历史中的一条消息
#[derive(Debug, Clone, PartialEq)]
pub struct ChatTurn {
    pub role: MessageRole,
    pub content: String,
}

/// 对话回复
#[derive(Debug, Clone, PartialEq)]
pub struct ChatReply {
    pub content: String,
    pub tokens_used: i64,
    pub model: String,
}

#[async_trait]
pub trait AiGenerator: Send + Sync {
    /// 提供方名称
    fn name(&self) -> &'static str;

    /// 自由文本生成
    async fn generate_text(&self, prompt: &str, options: &GenerationOptions) -> Result<String>;

    /// 结构化生成：要求只返回 JSON，去掉代码块标记后解析
    async fn generate_structured(&self, prompt: &str, options: &GenerationOptions) -> Result<Value> {
        let full_prompt = format!("{prompt}\n\n{JSON_ONLY_INSTRUCTION}");
        let text = self.generate_text(&full_prompt, options).await?;
        parse_structured(&text)
    }

    /// 多轮对话，最后一条为本次提问
    async fn chat(&self, messages: &[ChatTurn], options: &GenerationOptions) -> Result<ChatReply>;
}

/// 去掉首部 ```json / ``` 与尾部 ``` 标记
pub fn strip_code_fences(text: &str) -> &str {
    let mut cleaned = text.trim();
    if let Some(rest) = cleaned.strip_prefix("```json") {
        cleaned = rest;
    } else if let Some(rest) = cleaned.strip_prefix("```") {
        cleaned = rest;
    }
    if let Some(rest) = cleaned.strip_suffix("```") {
        cleaned = rest;
    }
    cleaned.trim()
}

/// 解析模型返回的 JSON 文本
pub fn parse_structured(text: &str) -> Result<Value> {
    serde_json::from_str(strip_code_fences(text)).map_err(|e| {
        tracing::warn!("AI returned malformed JSON: {}", e);
        SchoolHubError::generation(format!("AI returned malformed JSON: {e}"))
    })
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::sync::Mutex;

    /// 测试用生成器：按顺序返回预设回复并记录提示词
    pub(crate) struct ScriptedGenerator {
        replies: Mutex<Vec<Result<String>>>,
        pub prompts: Mutex<Vec<String>>,
        pub options: Mutex<Vec<GenerationOptions>>,
    }

    impl ScriptedGenerator {
        pub(crate) fn new(replies: Vec<Result<String>>) -> Self {
            Self {
                replies: Mutex::new(replies),
                prompts: Mutex::new(Vec::new()),
                options: Mutex::new(Vec::new()),
            }
        }

        pub(crate) fn replying(text: &str) -> Self {
            Self::new(vec![Ok(text.to_string())])
        }

        pub(crate) fn failing() -> Self {
            Self::new(vec![Err(SchoolHubError::generation("provider unavailable"))])
        }

        pub(crate) fn last_prompt(&self) -> String {
            self.prompts
                .lock()
                .expect("lock")
                .last()
                .cloned()
                .unwrap_or_default()
        }

        fn next_reply(&self, prompt: &str, options: &GenerationOptions) -> Result<String> {
            self.prompts.lock().expect("lock").push(prompt.to_string());
            self.options.lock().expect("lock").push(options.clone());
            let mut replies = self.replies.lock().expect("lock");
            if replies.is_empty() {
                Err(SchoolHubError::generation("no scripted reply left"))
            } else {
                replies.remove(0)
            }
        }
    }

    #[async_trait]
    impl AiGenerator for ScriptedGenerator {
        fn name(&self) -> &'static str {
            "scripted"
        }

        async fn generate_text(&self, prompt: &str, options: &GenerationOptions) -> Result<String> {
            self.next_reply(prompt, options)
        }

        async fn chat(&self, messages: &[ChatTurn], options: &GenerationOptions) -> Result<ChatReply> {
            let last = messages.last().map(|m| m.content.clone()).unwrap_or_default();
            let content = self.next_reply(&last, options)?;
            Ok(ChatReply {
                content,
                tokens_used: messages.len() as i64,
                model: "scripted-model".to_string(),
            })
        }
    }

    #[test]
    fn test_strip_code_fences() {
        assert_eq!(strip_code_fences("```json\n{\"a\":1}\n```"), "{\"a\":1}");
        assert_eq!(strip_code_fences("```\n[1,2]\n```"), "[1,2]");
        assert_eq!(strip_code_fences("  {\"a\":1}  "), "{\"a\":1}");
    }

    #[tokio::test]
    async fn test_structured_appends_instruction_and_parses() {
        let generator = ScriptedGenerator::replying("```json\n{\"quiz_title\":\"Cells\"}\n```");
        let value = generator
            .generate_structured("Make a quiz", &GenerationOptions::default())
            .await
            .expect("valid json");
        assert_eq!(value["quiz_title"], "Cells");
        assert!(generator.last_prompt().ends_with(JSON_ONLY_INSTRUCTION));
    }

    #[tokio::test]
    async fn test_structured_rejects_malformed_json() {
        let generator = ScriptedGenerator::replying("Sure! Here is your quiz: {oops");
        let err = generator
            .generate_structured("Make a quiz", &GenerationOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, SchoolHubError::Generation(_)));
    }
}
