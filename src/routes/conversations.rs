use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::conversations::requests::{
    ConversationQueryParams, CreateConversationRequest, SendMessageRequest,
};
use crate::services::ConversationService;
use crate::utils::SafeIDI64;

static CONVERSATION_SERVICE: Lazy<ConversationService> =
    Lazy::new(ConversationService::new_lazy);

pub async fn create_conversation(
    req: HttpRequest,
    body: web::Json<CreateConversationRequest>,
) -> ActixResult<HttpResponse> {
    CONVERSATION_SERVICE
        .create_conversation(&req, body.into_inner())
        .await
}

pub async fn list_conversations(
    req: HttpRequest,
    query: web::Query<ConversationQueryParams>,
) -> ActixResult<HttpResponse> {
    CONVERSATION_SERVICE
        .list_conversations(&req, query.into_inner())
        .await
}

pub async fn get_conversation(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    CONVERSATION_SERVICE.get_conversation(&req, id.0).await
}

pub async fn send_message(
    req: HttpRequest,
    id: SafeIDI64,
    body: web::Json<SendMessageRequest>,
) -> ActixResult<HttpResponse> {
    CONVERSATION_SERVICE
        .send_message(&req, id.0, body.into_inner())
        .await
}

// 配置路由；会话只对本人可见
pub fn configure_conversation_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/conversations")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("")
                    .route(web::get().to(list_conversations))
                    .route(web::post().to(create_conversation)),
            )
            .route("/{id}", web::get().to(get_conversation))
            .route("/{id}/messages", web::post().to(send_message)),
    );
}
