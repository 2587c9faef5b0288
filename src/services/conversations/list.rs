use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::ConversationService;
use crate::models::ApiResponse;
use crate::models::conversations::requests::{ConversationListQuery, ConversationQueryParams};
use crate::services::current_user;
use crate::utils::error_response;

pub async fn list_conversations(
    service: &ConversationService,
    request: &HttpRequest,
    query: ConversationQueryParams,
) -> ActixResult<HttpResponse> {
    let caller = current_user(request)?;
    let storage = service.get_storage(request)?;

    let list_query = ConversationListQuery {
        page: query.page,
        size: query.size,
        user_id: caller.id,
        conversation_type: query.conversation_type,
    };
    match storage.list_conversations(list_query).await {
        Ok(page) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            page,
            "Conversations retrieved successfully",
        ))),
        Err(e) => Ok(error_response(&e)),
    }
}
