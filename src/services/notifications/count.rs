use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::NotificationService;
use crate::models::ApiResponse;
use crate::models::notifications::responses::UnreadCountResponse;
use crate::services::current_user;
use crate::utils::error_response;

pub async fn get_unread_count(
    service: &NotificationService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let caller = current_user(request)?;
    let storage = service.get_storage(request)?;

    match storage
        .count_unread_notifications(caller.id, chrono::Utc::now().timestamp())
        .await
    {
        Ok(unread_count) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            UnreadCountResponse { unread_count },
            "Unread count retrieved successfully",
        ))),
        Err(e) => Ok(error_response(&e)),
    }
}
