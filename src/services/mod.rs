pub mod attendance;
pub mod classes;
pub mod conversations;
pub mod notifications;
pub mod performance;
pub mod quizzes;
pub mod resources;
pub mod subjects;
pub mod system;
pub mod users;

pub use attendance::AttendanceService;
pub use classes::ClassService;
pub use conversations::ConversationService;
pub use notifications::NotificationService;
pub use performance::PerformanceService;
pub use quizzes::QuizService;
pub use resources::ResourceService;
pub use subjects::SubjectService;
pub use system::SystemService;
pub use users::UserService;

use std::sync::Arc;

use actix_web::{
    HttpRequest, HttpResponse, Result as ActixResult, error::InternalError, http::StatusCode, web,
};
use tracing::error;

use crate::middlewares::RequireJWT;
use crate::models::users::entities::User;
use crate::models::{ApiResponse, ErrorCode};

fn envelope_error(status: StatusCode, code: ErrorCode, message: &'static str) -> actix_web::Error {
    InternalError::from_response(
        message,
        HttpResponse::build(status).json(ApiResponse::<()>::error_empty(code, message)),
    )
    .into()
}

/// 当前调用者（RequireJWT 已写入请求扩展）
pub(crate) fn current_user(request: &HttpRequest) -> ActixResult<User> {
    RequireJWT::extract_user_claims(request).ok_or_else(|| {
        envelope_error(
            StatusCode::UNAUTHORIZED,
            ErrorCode::Unauthorized,
            "Unauthorized: missing user",
        )
    })
}

/// 从 app_data 读取共享组件（存储、AI 生成器、文本提取器）
pub(crate) fn app_component<T: ?Sized + 'static>(
    request: &HttpRequest,
    what: &'static str,
) -> ActixResult<Arc<T>> {
    match request.app_data::<web::Data<Arc<T>>>() {
        Some(data) => Ok(data.get_ref().clone()),
        None => {
            error!("{} not found in app data", what);
            Err(envelope_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorCode::InternalServerError,
                "Internal server error",
            ))
        }
    }
}
