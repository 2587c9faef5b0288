use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::PerformanceService;
use super::aggregate::performance_stats;
use crate::models::ApiResponse;
use crate::models::performance::requests::PerformanceStatsParams;
use crate::policy::{self, EntityKind};
use crate::services::current_user;
use crate::utils::error_response;

pub async fn get_stats(
    service: &PerformanceService,
    request: &HttpRequest,
    query: PerformanceStatsParams,
) -> ActixResult<HttpResponse> {
    let caller = current_user(request)?;
    let storage = service.get_storage(request)?;

    // 学生忽略所有过滤条件，只看自己
    let student_id = policy::scoped_student_id(&caller, EntityKind::Performance, query.student_id);
    let class_id = policy::scoped_class_id(&caller, EntityKind::Performance, query.class_id);

    match storage.find_quiz_results(student_id, class_id, None).await {
        Ok(results) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            performance_stats(&results),
            "Performance stats retrieved",
        ))),
        Err(e) => Ok(error_response(&e)),
    }
}
