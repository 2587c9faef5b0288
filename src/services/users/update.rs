use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::UserService;
use crate::errors::SchoolHubError;
use crate::models::users::requests::UpdateUserRequest;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::current_user;
use crate::utils::{error_response, validation_response};

pub async fn update_user(
    service: &UserService,
    request: &HttpRequest,
    user_id: i64,
    update_data: UpdateUserRequest,
) -> ActixResult<HttpResponse> {
    let caller = current_user(request)?;
    if let Err(errors) = update_data.validate() {
        return Ok(validation_response(errors));
    }
    let storage = service.get_storage(request)?;

    match storage.update_user(user_id, update_data).await {
        Ok(Some(user)) => {
            info!("User {} updated by {}", user.id, caller.id);
            Ok(HttpResponse::Ok().json(ApiResponse::success(user, "User updated")))
        }
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::UserNotFound,
            "User not found",
        ))),
        Err(SchoolHubError::Conflict(msg)) => Ok(HttpResponse::Conflict().json(
            ApiResponse::error_empty(ErrorCode::UserEmailAlreadyExists, msg),
        )),
        Err(e) => Ok(error_response(&e)),
    }
}
