use actix_web::HttpResponse;
use tracing::error;

use crate::errors::SchoolHubError;
use crate::models::common::FieldError;
use crate::models::{ApiResponse, ErrorCode};

/// 把领域错误映射为 HTTP 响应
///
/// 500 类错误只记录日志并返回通用消息，外部协作方（AI、文本提取）的失败除外。
pub fn error_response(err: &SchoolHubError) -> HttpResponse {
    let status = err.status_code();
    let code = match err {
        SchoolHubError::NotFound(_) => ErrorCode::NotFound,
        SchoolHubError::Validation(_) | SchoolHubError::DateParse(_) => ErrorCode::ValidationFailed,
        SchoolHubError::Authentication(_) => ErrorCode::Unauthorized,
        SchoolHubError::Authorization(_) => ErrorCode::Forbidden,
        SchoolHubError::Conflict(_) => ErrorCode::Conflict,
        SchoolHubError::Generation(_) => ErrorCode::GenerationFailed,
        SchoolHubError::Extraction(_) => ErrorCode::ExtractionFailed,
        _ => ErrorCode::InternalServerError,
    };
    if status.is_server_error() {
        error!("{}", err);
    }
    let message = if err.is_client_visible() {
        err.message().to_string()
    } else {
        "Internal server error".to_string()
    };
    HttpResponse::build(status).json(ApiResponse::<()>::error_empty(code, message))
}

/// 字段校验失败，逐项返回错误
pub fn validation_response(errors: Vec<FieldError>) -> HttpResponse {
    HttpResponse::BadRequest().json(ApiResponse::<Vec<FieldError>>::validation_failed(errors))
}
