use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::debug;

use super::NotificationService;
use crate::models::ApiResponse;
use crate::models::notifications::requests::NotificationQueryParams;
use crate::services::current_user;
use crate::utils::error_response;

pub async fn list_notifications(
    service: &NotificationService,
    request: &HttpRequest,
    query: NotificationQueryParams,
) -> ActixResult<HttpResponse> {
    let caller = current_user(request)?;
    let storage = service.get_storage(request)?;
    let now = chrono::Utc::now().timestamp();

    // 列表前清理已过期通知
    match storage.purge_expired_notifications(caller.id, now).await {
        Ok(0) => {}
        Ok(purged) => debug!("Purged {} expired notifications for {}", purged, caller.id),
        Err(e) => return Ok(error_response(&e)),
    }

    match storage
        .list_notifications(
            caller.id,
            query.unread_only.unwrap_or(false),
            query.page,
            query.size,
            now,
        )
        .await
    {
        Ok(page) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            page,
            "Notifications retrieved successfully",
        ))),
        Err(e) => Ok(error_response(&e)),
    }
}
