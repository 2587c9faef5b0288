use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::ClassService;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::current_user;
use crate::utils::error_response;

pub async fn delete_class(
    service: &ClassService,
    request: &HttpRequest,
    class_id: i64,
) -> ActixResult<HttpResponse> {
    let caller = current_user(request)?;
    let storage = service.get_storage(request)?;

    match storage.delete_class(class_id).await {
        Ok(true) => {
            info!("Class {} deleted by {}", class_id, caller.id);
            Ok(HttpResponse::Ok().json(ApiResponse::success_empty("Class deleted")))
        }
        Ok(false) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::ClassNotFound,
            "Class not found",
        ))),
        Err(e) => Ok(error_response(&e)),
    }
}
