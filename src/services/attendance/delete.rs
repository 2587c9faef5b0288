use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::AttendanceService;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::current_user;
use crate::utils::error_response;

pub async fn delete_attendance(
    service: &AttendanceService,
    request: &HttpRequest,
    id: i64,
) -> ActixResult<HttpResponse> {
    let caller = current_user(request)?;
    let storage = service.get_storage(request)?;

    match storage.delete_attendance(id).await {
        Ok(true) => {
            info!("Attendance {} deleted by {}", id, caller.id);
            Ok(HttpResponse::Ok().json(ApiResponse::success_empty("Attendance deleted")))
        }
        Ok(false) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::AttendanceNotFound,
            "Attendance record not found",
        ))),
        Err(e) => Ok(error_response(&e)),
    }
}
