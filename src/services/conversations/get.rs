use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{ConversationService, load_own_conversation};
use crate::models::ApiResponse;
use crate::services::current_user;

pub async fn get_conversation(
    service: &ConversationService,
    request: &HttpRequest,
    id: i64,
) -> ActixResult<HttpResponse> {
    let caller = current_user(request)?;
    let storage = service.get_storage(request)?;

    match load_own_conversation(storage.as_ref(), &caller, id).await {
        Ok(conversation) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            conversation,
            "Conversation retrieved successfully",
        ))),
        Err(response) => Ok(response),
    }
}
