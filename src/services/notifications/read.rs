use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{NotificationService, load_own_notification};
use crate::models::ApiResponse;
use crate::models::notifications::responses::MarkAllReadResponse;
use crate::services::current_user;
use crate::utils::error_response;

/// 标记已读；已读的通知直接返回成功
pub async fn mark_read(
    service: &NotificationService,
    request: &HttpRequest,
    id: i64,
) -> ActixResult<HttpResponse> {
    let caller = current_user(request)?;
    let storage = service.get_storage(request)?;
    let now = chrono::Utc::now().timestamp();

    let notification = match load_own_notification(storage.as_ref(), &caller, id, now).await {
        Ok(notification) => notification,
        Err(response) => return Ok(response),
    };
    if notification.is_read {
        return Ok(HttpResponse::Ok().json(ApiResponse::success_empty(
            "Notification already read",
        )));
    }

    match storage.mark_notification_read(id, now).await {
        Ok(_) => Ok(HttpResponse::Ok().json(ApiResponse::success_empty(
            "Notification marked as read",
        ))),
        Err(e) => Ok(error_response(&e)),
    }
}

pub async fn mark_all_read(
    service: &NotificationService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let caller = current_user(request)?;
    let storage = service.get_storage(request)?;

    match storage
        .mark_all_notifications_read(caller.id, chrono::Utc::now().timestamp())
        .await
    {
        Ok(marked_count) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            MarkAllReadResponse { marked_count },
            "All notifications marked as read",
        ))),
        Err(e) => Ok(error_response(&e)),
    }
}
