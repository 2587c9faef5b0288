use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::ClassService;
use crate::models::ApiResponse;
use crate::models::classes::requests::ClassQueryParams;
use crate::policy::select_visible_classes;
use crate::services::current_user;
use crate::utils::error_response;

pub async fn list_classes(
    service: &ClassService,
    request: &HttpRequest,
    query: ClassQueryParams,
) -> ActixResult<HttpResponse> {
    let caller = current_user(request)?;
    let storage = service.get_storage(request)?;

    match select_visible_classes(storage.as_ref(), &caller, &query, service.fallback()).await {
        Ok(response) => {
            if response.fallback_applied {
                info!(
                    "Teacher {} has no assigned classes, returning all active classes",
                    caller.id
                );
            }
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                response,
                "Class list retrieved successfully",
            )))
        }
        Err(e) => Ok(error_response(&e)),
    }
}
