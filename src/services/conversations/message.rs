use std::time::Instant;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::{info, warn};

use super::{ConversationService, load_own_conversation};
use crate::ai::{ChatTurn, GenerationOptions};
use crate::models::ApiResponse;
use crate::models::conversations::entities::{
    Conversation, ConversationMessage, MessageMetadata, MessageRole,
};
use crate::models::conversations::requests::SendMessageRequest;
use crate::models::conversations::responses::SendMessageResponse;
use crate::services::current_user;
use crate::utils::{error_response, validation_response};

/// 完整历史加上本次提问
///
/// 相邻的同角色消息合并为一条（例如创建会话时未获回复的首条提问），保证角色交替。
fn chat_history(conversation: &Conversation, content: &str) -> Vec<ChatTurn> {
    let turns = conversation
        .thread
        .messages()
        .iter()
        .map(|m| (m.role, m.content.as_str()))
        .chain(std::iter::once((MessageRole::User, content)));

    let mut history: Vec<ChatTurn> = Vec::new();
    for (role, text) in turns {
        match history.last_mut() {
            Some(previous) if previous.role == role => {
                previous.content.push_str("\n\n");
                previous.content.push_str(text);
            }
            _ => history.push(ChatTurn {
                role,
                content: text.to_string(),
            }),
        }
    }
    history
}

/// 回复成功后才写入；失败时会话保持不变
pub async fn send_message(
    service: &ConversationService,
    request: &HttpRequest,
    id: i64,
    body: SendMessageRequest,
) -> ActixResult<HttpResponse> {
    let caller = current_user(request)?;
    if let Err(errors) = body.validate() {
        return Ok(validation_response(errors));
    }
    let storage = service.get_storage(request)?;
    let ai = service.get_ai(request)?;

    let mut conversation = match load_own_conversation(storage.as_ref(), &caller, id).await {
        Ok(conversation) => conversation,
        Err(response) => return Ok(response),
    };

    let asked_at = chrono::Utc::now();
    let started = Instant::now();
    let reply = match ai
        .chat(
            &chat_history(&conversation, &body.content),
            &GenerationOptions::default(),
        )
        .await
    {
        Ok(reply) => reply,
        Err(e) => {
            warn!("Chat reply failed for conversation {}: {}", id, e);
            return Ok(error_response(&e));
        }
    };
    let response_time_ms = started.elapsed().as_millis() as i64;

    let mut question = ConversationMessage::user(body.content, asked_at);
    question.is_voice_input = body.is_voice_input;
    question.transcript_confidence = body.transcript_confidence;
    conversation.add_message(question);

    let answer = ConversationMessage::assistant(
        reply.content,
        chrono::Utc::now(),
        MessageMetadata {
            tokens_used: reply.tokens_used,
            model: reply.model,
            response_time_ms,
        },
    );
    conversation.add_message(answer.clone());

    match storage.save_conversation(&conversation).await {
        Ok(saved) => {
            info!(
                "Conversation {} answered in {}ms ({} tokens)",
                saved.id, response_time_ms, reply.tokens_used
            );
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                SendMessageResponse {
                    reply: answer,
                    conversation: saved,
                },
                "Message sent",
            )))
        }
        Err(e) => Ok(error_response(&e)),
    }
}
