use serde::Deserialize;
use ts_rs::TS;

use super::entities::{ConversationContext, ConversationThread, ConversationType};
use crate::models::common::{FieldError, FieldErrors};

// 创建会话请求，可附带首条消息
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/conversation.ts")]
pub struct CreateConversationRequest {
    #[serde(default)]
    pub conversation_type: ConversationType,
    #[serde(default)]
    pub context: ConversationContext,
    pub title: Option<String>,
    pub message: Option<String>,
}

// 发送消息请求
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/conversation.ts")]
pub struct SendMessageRequest {
    pub content: String,
    #[serde(default)]
    pub is_voice_input: bool,
    pub transcript_confidence: Option<f64>,
}

impl SendMessageRequest {
    pub fn validate(&self) -> Result<(), Vec<FieldError>> {
        let mut errors = FieldErrors::new();
        errors.check(
            !self.content.trim().is_empty(),
            "content",
            "Message content is required",
        );
        if let Some(confidence) = self.transcript_confidence {
            errors.check(
                (0.0..=1.0).contains(&confidence),
                "transcript_confidence",
                "Transcript confidence must be between 0 and 1",
            );
        }
        errors.into_result()
    }
}

// 会话列表查询参数
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/conversation.ts")]
pub struct ConversationQueryParams {
    pub page: Option<i64>,
    pub size: Option<i64>,
    pub conversation_type: Option<ConversationType>,
}

// 会话列表查询参数（用于存储层）
#[derive(Debug, Clone, Default)]
pub struct ConversationListQuery {
    pub page: Option<i64>,
    pub size: Option<i64>,
    pub user_id: i64,
    pub conversation_type: Option<ConversationType>,
}

// 待写入的会话
#[derive(Debug, Clone)]
pub struct NewConversation {
    pub user_id: i64,
    pub conversation_type: ConversationType,
    pub context: ConversationContext,
    pub title: String,
    pub thread: ConversationThread,
}
