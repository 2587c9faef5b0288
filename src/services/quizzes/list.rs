use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::QuizService;
use crate::models::ApiResponse;
use crate::models::quizzes::requests::{QuizResultListQuery, QuizResultQueryParams};
use crate::policy::{self, EntityKind};
use crate::services::current_user;
use crate::utils::error_response;

/// 日期边界换算为 UTC Unix 秒（闭区间）
pub(crate) fn day_bounds(
    start: Option<chrono::NaiveDate>,
    end: Option<chrono::NaiveDate>,
) -> (Option<i64>, Option<i64>) {
    let from = start
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc().timestamp());
    let to = end
        .and_then(|d| d.and_hms_opt(23, 59, 59))
        .map(|dt| dt.and_utc().timestamp());
    (from, to)
}

pub async fn list_quiz_results(
    service: &QuizService,
    request: &HttpRequest,
    query: QuizResultQueryParams,
) -> ActixResult<HttpResponse> {
    let caller = current_user(request)?;
    let storage = service.get_storage(request)?;

    let (attempted_from, attempted_to) = day_bounds(query.start_date, query.end_date);
    let list_query = QuizResultListQuery {
        page: query.page,
        size: query.size,
        student_id: policy::scoped_student_id(&caller, EntityKind::Performance, query.student_id),
        class_id: None,
        subject: query.subject,
        attempted_from,
        attempted_to,
    };

    match storage.list_quiz_results(list_query).await {
        Ok(results) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            results,
            "Quiz results retrieved",
        ))),
        Err(e) => Ok(error_response(&e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_day_bounds_cover_whole_days() {
        let day = chrono::NaiveDate::from_ymd_opt(2026, 10, 18).expect("valid date");
        let (from, to) = day_bounds(Some(day), Some(day));
        let (from, to) = (from.expect("start"), to.expect("end"));
        assert_eq!(to - from, 86_399);
        assert_eq!(day_bounds(None, None), (None, None));
    }
}
