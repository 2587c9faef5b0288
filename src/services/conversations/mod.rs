pub mod create;
pub mod get;
pub mod list;
pub mod message;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use super::app_component;
use crate::ai::AiGenerator;
use crate::models::conversations::entities::Conversation;
use crate::models::conversations::requests::{
    ConversationQueryParams, CreateConversationRequest, SendMessageRequest,
};
use crate::models::users::entities::User;
use crate::models::{ApiResponse, ErrorCode};
use crate::storage::Storage;
use crate::utils::error_response;

pub struct ConversationService {
    storage: Option<Arc<dyn Storage>>,
    ai: Option<Arc<dyn AiGenerator>>,
}

impl ConversationService {
    pub fn new_lazy() -> Self {
        Self {
            storage: None,
            ai: None,
        }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> ActixResult<Arc<dyn Storage>> {
        match &self.storage {
            Some(storage) => Ok(storage.clone()),
            None => app_component::<dyn Storage>(request, "Storage"),
        }
    }

    pub(crate) fn get_ai(&self, request: &HttpRequest) -> ActixResult<Arc<dyn AiGenerator>> {
        match &self.ai {
            Some(ai) => Ok(ai.clone()),
            None => app_component::<dyn AiGenerator>(request, "AI generator"),
        }
    }

    pub async fn create_conversation(
        &self,
        request: &HttpRequest,
        body: CreateConversationRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_conversation(self, request, body).await
    }

    // 当前用户的会话
    pub async fn list_conversations(
        &self,
        request: &HttpRequest,
        query: ConversationQueryParams,
    ) -> ActixResult<HttpResponse> {
        list::list_conversations(self, request, query).await
    }

    pub async fn get_conversation(
        &self,
        request: &HttpRequest,
        id: i64,
    ) -> ActixResult<HttpResponse> {
        get::get_conversation(self, request, id).await
    }

    // 发送消息并获取 AI 回复
    pub async fn send_message(
        &self,
        request: &HttpRequest,
        id: i64,
        body: SendMessageRequest,
    ) -> ActixResult<HttpResponse> {
        message::send_message(self, request, id, body).await
    }
}

/// 只能访问自己的会话，别人的会话视为不存在
pub(crate) async fn load_own_conversation(
    storage: &dyn Storage,
    caller: &User,
    id: i64,
) -> Result<Conversation, HttpResponse> {
    match storage.get_conversation(id).await {
        Ok(Some(conversation)) if conversation.user_id == caller.id => Ok(conversation),
        Ok(_) => Err(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::ConversationNotFound,
            "Conversation not found",
        ))),
        Err(e) => Err(error_response(&e)),
    }
}
