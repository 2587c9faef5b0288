use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::AttendanceService;
use crate::errors::{Result, SchoolHubError};
use crate::models::attendance::entities::{AttendanceRecord, AttendanceSheet, AttendanceEntry, Session};
use crate::models::attendance::requests::{
    BulkMarkAttendanceRequest, MarkAttendanceRequest, NewAttendance,
};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::current_user;
use crate::storage::Storage;
use crate::utils::{error_response, validation_response};

struct MarkTarget {
    date: chrono::NaiveDate,
    class_id: i64,
    subject_id: Option<i64>,
    session: Session,
    notes: Option<String>,
}

fn created_response(result: Result<AttendanceRecord>, marked_by: i64) -> HttpResponse {
    match result {
        Ok(record) => {
            info!(
                "Attendance {} marked for class {} on {} ({}) by {}",
                record.id, record.class_id, record.date, record.session, marked_by
            );
            HttpResponse::Created().json(ApiResponse::success(record, "Attendance marked"))
        }
        // 同一班级、日期、时段只允许一条记录
        Err(SchoolHubError::Conflict(msg)) => HttpResponse::Conflict().json(
            ApiResponse::error_empty(ErrorCode::AttendanceAlreadyMarked, msg),
        ),
        Err(e) => error_response(&e),
    }
}

async fn class_exists(storage: &dyn Storage, class_id: i64) -> std::result::Result<(), HttpResponse> {
    match storage.get_class_by_id(class_id).await {
        Ok(Some(_)) => Ok(()),
        Ok(None) => Err(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::ClassNotFound,
            "Class not found",
        ))),
        Err(e) => Err(error_response(&e)),
    }
}

async fn insert(
    storage: &dyn Storage,
    target: MarkTarget,
    entries: Vec<AttendanceEntry>,
    marked_by: i64,
) -> Result<AttendanceRecord> {
    storage
        .create_attendance(NewAttendance {
            date: target.date,
            class_id: target.class_id,
            subject_id: target.subject_id,
            session: target.session,
            sheet: AttendanceSheet::from_entries(entries),
            marked_by,
            notes: target.notes,
        })
        .await
}

pub async fn mark_attendance(
    service: &AttendanceService,
    request: &HttpRequest,
    body: MarkAttendanceRequest,
) -> ActixResult<HttpResponse> {
    let caller = current_user(request)?;
    if let Err(errors) = body.validate() {
        return Ok(validation_response(errors));
    }
    let storage = service.get_storage(request)?;
    if let Err(resp) = class_exists(storage.as_ref(), body.class_id).await {
        return Ok(resp);
    }

    let now = chrono::Utc::now();
    let entries = body
        .entries
        .into_iter()
        .map(|e| e.into_entry(now))
        .collect();
    let target = MarkTarget {
        date: body.date,
        class_id: body.class_id,
        subject_id: body.subject_id,
        session: body.session,
        notes: body.notes,
    };
    let result = insert(storage.as_ref(), target, entries, caller.id).await;
    Ok(created_response(result, caller.id))
}

pub async fn bulk_mark_attendance(
    service: &AttendanceService,
    request: &HttpRequest,
    body: BulkMarkAttendanceRequest,
) -> ActixResult<HttpResponse> {
    let caller = current_user(request)?;
    if let Err(errors) = body.validate() {
        return Ok(validation_response(errors));
    }
    let storage = service.get_storage(request)?;
    if let Err(resp) = class_exists(storage.as_ref(), body.class_id).await {
        return Ok(resp);
    }

    let roster: Vec<i64> = match storage.list_class_students(body.class_id).await {
        Ok(students) => students.into_iter().map(|s| s.id).collect(),
        Err(e) => return Ok(error_response(&e)),
    };
    if roster.is_empty() {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::BadRequest,
            "Class has no active students",
        )));
    }

    let target = MarkTarget {
        date: body.date,
        class_id: body.class_id,
        subject_id: body.subject_id,
        session: body.session,
        notes: body.notes.clone(),
    };
    let entries = body.expand(&roster, chrono::Utc::now());
    let result = insert(storage.as_ref(), target, entries, caller.id).await;
    Ok(created_response(result, caller.id))
}

#[cfg(test)]
pub(crate) mod tests {
    use std::sync::Arc;

    use actix_web::http::StatusCode;

    use super::*;
    use crate::models::users::entities::{User, UserRole};
    use crate::services::tests::{authed_request, body_json};
    use crate::storage::sea_orm_storage::{SeaOrmStorage, new_class, new_user};

    pub(crate) struct Fixture {
        pub storage: Arc<dyn Storage>,
        pub teacher: User,
        pub management: User,
        pub students: Vec<User>,
        pub class_id: i64,
    }

    pub(crate) async fn fixture() -> Fixture {
        let storage: Arc<dyn Storage> = Arc::new(SeaOrmStorage::in_memory().await.expect("db"));
        let class = storage.create_class(new_class("9", "B")).await.expect("class");
        let teacher = storage
            .create_user(new_user("Sen", UserRole::Teacher, None))
            .await
            .expect("teacher");
        let management = storage
            .create_user(new_user("Principal", UserRole::Management, None))
            .await
            .expect("management");
        let mut students = Vec::new();
        for name in ["Dev", "Esha", "Farah"] {
            students.push(
                storage
                    .create_user(new_user(name, UserRole::Student, Some(class.id)))
                    .await
                    .expect("student"),
            );
        }
        Fixture {
            storage,
            teacher,
            management,
            students,
            class_id: class.id,
        }
    }

    pub(crate) fn mark_body(f: &Fixture, date: &str) -> MarkAttendanceRequest {
        serde_json::from_str(&format!(
            r#"{{"date":"{date}","class_id":{},"entries":[
                {{"student_id":{},"status":"present"}},
                {{"student_id":{},"status":"absent"}}]}}"#,
            f.class_id, f.students[0].id, f.students[1].id
        ))
        .expect("valid request")
    }

    #[tokio::test]
    async fn test_second_mark_for_same_session_conflicts() {
        let f = fixture().await;
        let request = authed_request(&f.teacher, f.storage.clone(), None, None);
        let service = AttendanceService::new_lazy();

        let first = mark_attendance(&service, &request, mark_body(&f, "2026-10-12"))
            .await
            .expect("handled");
        assert_eq!(first.status(), StatusCode::CREATED);
        let json = body_json(first).await;
        assert_eq!(json["data"]["summary"]["present"], 1);
        assert_eq!(json["data"]["summary"]["absent"], 1);

        let second = mark_attendance(&service, &request, mark_body(&f, "2026-10-12"))
            .await
            .expect("handled");
        assert_eq!(second.status(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_bulk_mark_covers_roster() {
        let f = fixture().await;
        let request = authed_request(&f.teacher, f.storage.clone(), None, None);
        let body: BulkMarkAttendanceRequest = serde_json::from_str(&format!(
            r#"{{"date":"2026-10-13","class_id":{},"session":"morning","default_status":"present",
                "exceptions":[{{"student_id":{},"status":"late"}}]}}"#,
            f.class_id, f.students[2].id
        ))
        .expect("valid request");
        let response = bulk_mark_attendance(&AttendanceService::new_lazy(), &request, body)
            .await
            .expect("handled");
        assert_eq!(response.status(), StatusCode::CREATED);
        let json = body_json(response).await;
        assert_eq!(json["data"]["summary"]["total_students"], 3);
        assert_eq!(json["data"]["summary"]["present"], 2);
        assert_eq!(json["data"]["summary"]["late"], 1);
    }

    #[tokio::test]
    async fn test_unknown_class_not_found() {
        let f = fixture().await;
        let request = authed_request(&f.teacher, f.storage.clone(), None, None);
        let mut body = mark_body(&f, "2026-10-14");
        body.class_id = 999;
        let response = mark_attendance(&AttendanceService::new_lazy(), &request, body)
            .await
            .expect("handled");
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
