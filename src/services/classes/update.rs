use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::ClassService;
use crate::errors::SchoolHubError;
use crate::models::classes::requests::UpdateClassRequest;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::current_user;
use crate::utils::{error_response, validation_response};

pub async fn update_class(
    service: &ClassService,
    request: &HttpRequest,
    class_id: i64,
    update_data: UpdateClassRequest,
) -> ActixResult<HttpResponse> {
    let caller = current_user(request)?;
    if let Err(errors) = update_data.validate() {
        return Ok(validation_response(errors));
    }
    let storage = service.get_storage(request)?;

    match storage.update_class(class_id, update_data).await {
        Ok(Some(class)) => {
            info!("Class {} updated by {}", class.id, caller.id);
            Ok(HttpResponse::Ok().json(ApiResponse::success(class, "Class updated")))
        }
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::ClassNotFound,
            "Class not found",
        ))),
        Err(SchoolHubError::Conflict(msg)) => Ok(HttpResponse::Conflict()
            .json(ApiResponse::error_empty(ErrorCode::ClassAlreadyExists, msg))),
        Err(e) => Ok(error_response(&e)),
    }
}
