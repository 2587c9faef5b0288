use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::AttendanceService;
use super::aggregate::{class_stats, student_status_counts};
use crate::models::ApiResponse;
use crate::models::attendance::requests::{
    AttendanceRangeQuery, AttendanceStatsParams, resolve_date_range,
};
use crate::models::attendance::responses::AttendanceStatsResponse;
use crate::models::common::FieldError;
use crate::policy::{self, EntityKind};
use crate::services::current_user;
use crate::utils::{error_response, validation_response};

pub async fn get_stats(
    service: &AttendanceService,
    request: &HttpRequest,
    query: AttendanceStatsParams,
) -> ActixResult<HttpResponse> {
    let caller = current_user(request)?;
    let (start_date, end_date) =
        match resolve_date_range(query.start_date, query.end_date, chrono::Utc::now().date_naive())
        {
            Ok(range) => range,
            Err(errors) => return Ok(validation_response(errors)),
        };
    let storage = service.get_storage(request)?;

    let student_id = policy::scoped_student_id(&caller, EntityKind::Attendance, query.student_id);
    let class_id = policy::scoped_class_id(&caller, EntityKind::Attendance, query.class_id);

    let stats = if let Some(student_id) = student_id {
        let range = AttendanceRangeQuery {
            class_id,
            start_date,
            end_date,
        };
        storage
            .attendance_in_range(range)
            .await
            .map(|records| AttendanceStatsResponse::Student {
                student_id,
                start_date,
                end_date,
                counts: student_status_counts(&records, student_id),
            })
    } else if let Some(class_id) = class_id {
        let range = AttendanceRangeQuery {
            class_id: Some(class_id),
            start_date,
            end_date,
        };
        storage
            .attendance_summaries_in_range(range)
            .await
            .map(|summaries| {
                let stats = class_stats(&summaries);
                AttendanceStatsResponse::Class {
                    class_id,
                    start_date,
                    end_date,
                    total_days: stats.total_days,
                    avg_present: stats.avg_present,
                    avg_absent: stats.avg_absent,
                }
            })
    } else {
        return Ok(validation_response(vec![FieldError {
            field: "student_id".to_string(),
            message: "Either student_id or class_id is required".to_string(),
        }]));
    };

    match stats {
        Ok(stats) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            stats,
            "Attendance stats retrieved",
        ))),
        Err(e) => Ok(error_response(&e)),
    }
}

#[cfg(test)]
mod tests {
    use actix_web::http::StatusCode;

    use super::*;
    use crate::services::attendance::mark::mark_attendance;
    use crate::services::attendance::mark::tests::{fixture, mark_body};
    use crate::services::tests::{authed_request, body_json};

    fn range(student_id: Option<i64>, class_id: Option<i64>) -> AttendanceStatsParams {
        AttendanceStatsParams {
            student_id,
            class_id,
            start_date: chrono::NaiveDate::from_ymd_opt(2026, 10, 1),
            end_date: chrono::NaiveDate::from_ymd_opt(2026, 10, 31),
        }
    }

    #[tokio::test]
    async fn test_student_and_class_stats() {
        let f = fixture().await;
        let teacher = authed_request(&f.teacher, f.storage.clone(), None, None);
        let service = AttendanceService::new_lazy();
        for date in ["2026-10-05", "2026-10-06"] {
            mark_attendance(&service, &teacher, mark_body(&f, date))
                .await
                .expect("handled");
        }

        // 学生传入他人 ID 时仍只统计自己
        let student = authed_request(&f.students[1], f.storage.clone(), None, None);
        let response = get_stats(&service, &student, range(Some(f.students[0].id), None))
            .await
            .expect("handled");
        let json = body_json(response).await;
        assert_eq!(json["data"]["scope"], "student");
        assert_eq!(json["data"]["student_id"], f.students[1].id);
        assert_eq!(json["data"]["counts"][0]["status"], "absent");
        assert_eq!(json["data"]["counts"][0]["count"], 2);

        let response = get_stats(&service, &teacher, range(None, Some(f.class_id)))
            .await
            .expect("handled");
        let json = body_json(response).await;
        assert_eq!(json["data"]["scope"], "class");
        assert_eq!(json["data"]["total_days"], 2);
        assert_eq!(json["data"]["avg_present"], 1.0);
        assert_eq!(json["data"]["avg_absent"], 1.0);
    }

    #[tokio::test]
    async fn test_staff_must_name_student_or_class() {
        let f = fixture().await;
        let teacher = authed_request(&f.teacher, f.storage.clone(), None, None);
        let response = get_stats(&AttendanceService::new_lazy(), &teacher, range(None, None))
            .await
            .expect("handled");
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_inverted_range_rejected() {
        let f = fixture().await;
        let teacher = authed_request(&f.teacher, f.storage.clone(), None, None);
        let mut params = range(None, Some(f.class_id));
        params.start_date = chrono::NaiveDate::from_ymd_opt(2026, 11, 1);
        let response = get_stats(&AttendanceService::new_lazy(), &teacher, params)
            .await
            .expect("handled");
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
