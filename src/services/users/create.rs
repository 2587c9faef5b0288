use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::UserService;
use crate::errors::SchoolHubError;
use crate::models::users::requests::CreateUserRequest;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::current_user;
use crate::utils::{error_response, validation_response};

pub async fn create_user(
    service: &UserService,
    request: &HttpRequest,
    user_data: CreateUserRequest,
) -> ActixResult<HttpResponse> {
    let caller = current_user(request)?;
    if let Err(errors) = user_data.validate() {
        return Ok(validation_response(errors));
    }
    let storage = service.get_storage(request)?;

    if let Some(class_id) = user_data.class_id {
        match storage.get_class_by_id(class_id).await {
            Ok(Some(_)) => {}
            Ok(None) => {
                return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                    ErrorCode::ClassNotFound,
                    "Class not found",
                )));
            }
            Err(e) => return Ok(error_response(&e)),
        }
    }

    match storage.create_user(user_data).await {
        Ok(user) => {
            info!("User {} ({}) created by {}", user.id, user.role, caller.id);
            Ok(HttpResponse::Created().json(ApiResponse::success(user, "User created")))
        }
        Err(SchoolHubError::Conflict(msg)) => Ok(HttpResponse::Conflict().json(
            ApiResponse::error_empty(ErrorCode::UserEmailAlreadyExists, msg),
        )),
        Err(e) => Ok(error_response(&e)),
    }
}
