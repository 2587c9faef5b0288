use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::ConversationService;
use crate::models::ApiResponse;
use crate::models::conversations::entities::{
    ConversationMessage, ConversationThread, DEFAULT_CONVERSATION_TITLE, derive_title,
};
use crate::models::conversations::requests::{CreateConversationRequest, NewConversation};
use crate::services::current_user;
use crate::utils::error_response;

/// 创建会话；首条消息只记录，不请求回复
pub async fn create_conversation(
    service: &ConversationService,
    request: &HttpRequest,
    body: CreateConversationRequest,
) -> ActixResult<HttpResponse> {
    let caller = current_user(request)?;
    let storage = service.get_storage(request)?;

    let first_message = body.message.filter(|m| !m.trim().is_empty());
    let title = match (body.title.filter(|t| !t.trim().is_empty()), &first_message) {
        (Some(title), _) => title.trim().to_string(),
        (None, Some(message)) => derive_title(message),
        (None, None) => DEFAULT_CONVERSATION_TITLE.to_string(),
    };
    let mut thread = ConversationThread::default();
    if let Some(message) = first_message {
        thread.add_message(ConversationMessage::user(message, chrono::Utc::now()));
    }

    let conversation = NewConversation {
        user_id: caller.id,
        conversation_type: body.conversation_type,
        context: body.context,
        title,
        thread,
    };
    match storage.create_conversation(conversation).await {
        Ok(conversation) => {
            info!("Conversation {} started by {}", conversation.id, caller.id);
            Ok(HttpResponse::Created().json(ApiResponse::success(
                conversation,
                "Conversation created",
            )))
        }
        Err(e) => Ok(error_response(&e)),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use actix_web::http::StatusCode;

    use super::*;
    use crate::models::users::entities::UserRole;
    use crate::services::tests::{authed_request, body_json};
    use crate::storage::Storage;
    use crate::storage::sea_orm_storage::{SeaOrmStorage, new_user};

    #[tokio::test]
    async fn test_first_message_titles_conversation() {
        let storage: Arc<dyn Storage> = Arc::new(SeaOrmStorage::in_memory().await.expect("db"));
        let teacher = storage
            .create_user(new_user("Tara", UserRole::Teacher, None))
            .await
            .expect("teacher");
        let request = authed_request(&teacher, storage, None, None);
        let service = ConversationService::new_lazy();

        let body = CreateConversationRequest {
            message: Some("Which students missed class this week?".into()),
            ..Default::default()
        };
        let response = create_conversation(&service, &request, body)
            .await
            .expect("handled");
        assert_eq!(response.status(), StatusCode::CREATED);
        let json = body_json(response).await;
        assert_eq!(json["data"]["title"], "Which students missed class this week?");
        assert_eq!(json["data"]["stats"]["total_messages"], 1);

        let response = create_conversation(&service, &request, Default::default())
            .await
            .expect("handled");
        let json = body_json(response).await;
        assert_eq!(json["data"]["title"], DEFAULT_CONVERSATION_TITLE);
        assert_eq!(json["data"]["messages"].as_array().map(Vec::len), Some(0));
    }
}
