use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::SubjectService;
use crate::models::ApiResponse;
use crate::services::current_user;
use crate::utils::error_response;

pub async fn list_subjects(
    service: &SubjectService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    current_user(request)?;
    let storage = service.get_storage(request)?;

    match storage.list_subjects().await {
        Ok(subjects) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            subjects,
            "Subject list retrieved successfully",
        ))),
        Err(e) => Ok(error_response(&e)),
    }
}
