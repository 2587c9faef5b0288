use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{NotificationService, load_own_notification};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::current_user;
use crate::utils::error_response;

pub async fn delete_notification(
    service: &NotificationService,
    request: &HttpRequest,
    id: i64,
) -> ActixResult<HttpResponse> {
    let caller = current_user(request)?;
    let storage = service.get_storage(request)?;
    let now = chrono::Utc::now().timestamp();

    if let Err(response) = load_own_notification(storage.as_ref(), &caller, id, now).await {
        return Ok(response);
    }
    match storage.delete_notification(id).await {
        Ok(true) => Ok(HttpResponse::Ok().json(ApiResponse::success_empty("Notification deleted"))),
        Ok(false) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::NotificationNotFound,
            "Notification not found",
        ))),
        Err(e) => Ok(error_response(&e)),
    }
}
