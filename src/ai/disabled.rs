//! 未配置 AI 时使用的提供方：所有调用都返回生成错误

use async_trait::async_trait;

use super::{AiGenerator, ChatReply, ChatTurn, GenerationOptions};
use crate::errors::{Result, SchoolHubError};

pub const PROVIDER_NAME: &str = "disabled";

#[derive(Debug, Default, Clone, Copy)]
pub struct DisabledGenerator;

fn unavailable() -> SchoolHubError {
    SchoolHubError::generation("AI generation is not configured")
}

#[async_trait]
impl AiGenerator for DisabledGenerator {
    fn name(&self) -> &'static str {
        PROVIDER_NAME
    }

    async fn generate_text(&self, _prompt: &str, _options: &GenerationOptions) -> Result<String> {
        Err(unavailable())
    }

    async fn chat(&self, _messages: &[ChatTurn], _options: &GenerationOptions) -> Result<ChatReply> {
        Err(unavailable())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_every_call_fails_with_generation_error() {
        let generator = DisabledGenerator;
        let options = GenerationOptions::default();
        assert!(matches!(
            generator.generate_text("hi", &options).await,
            Err(SchoolHubError::Generation(_))
        ));
        assert!(matches!(
            generator.generate_structured("hi", &options).await,
            Err(SchoolHubError::Generation(_))
        ));
        assert!(matches!(
            generator.chat(&[], &options).await,
            Err(SchoolHubError::Generation(_))
        ));
    }
}
