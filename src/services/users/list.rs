use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::UserService;
use crate::models::ApiResponse;
use crate::models::users::requests::{UserListQuery, UserQueryParams};
use crate::services::current_user;
use crate::utils::error_response;

pub async fn list_users(
    service: &UserService,
    request: &HttpRequest,
    query: UserQueryParams,
) -> ActixResult<HttpResponse> {
    current_user(request)?;
    let storage = service.get_storage(request)?;

    let list_query = UserListQuery {
        page: query.page,
        size: query.size,
        role: query.role,
        class_id: query.class_id,
        search: query.search,
    };

    match storage.list_users(list_query).await {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            response,
            "User list retrieved successfully",
        ))),
        Err(e) => Ok(error_response(&e)),
    }
}
