use serde::Serialize;
use ts_rs::TS;

use super::entities::{Conversation, ConversationMessage};

// 发送消息后的结果
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/conversation.ts")]
pub struct SendMessageResponse {
    pub reply: ConversationMessage,
    pub conversation: Conversation,
}
