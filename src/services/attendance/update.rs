use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{AttendanceService, load_attendance};
use crate::models::attendance::requests::UpdateAttendanceEntriesRequest;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::current_user;
use crate::utils::{error_response, validation_response};

// 整体替换条目，已锁定的记录不可修改
pub async fn update_entries(
    service: &AttendanceService,
    request: &HttpRequest,
    id: i64,
    body: UpdateAttendanceEntriesRequest,
) -> ActixResult<HttpResponse> {
    let caller = current_user(request)?;
    if let Err(errors) = body.validate() {
        return Ok(validation_response(errors));
    }
    let storage = service.get_storage(request)?;
    let mut record = match load_attendance(storage.as_ref(), id).await {
        Ok(record) => record,
        Err(resp) => return Ok(resp),
    };

    if record.is_locked {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::AttendanceLocked,
            "Attendance record is locked",
        )));
    }

    let now = chrono::Utc::now();
    record
        .sheet
        .replace_entries(body.entries.into_iter().map(|e| e.into_entry(now)).collect());
    if body.notes.is_some() {
        record.notes = body.notes;
    }

    match storage.save_attendance(&record).await {
        Ok(saved) => {
            info!("Attendance {} entries updated by {}", saved.id, caller.id);
            Ok(HttpResponse::Ok().json(ApiResponse::success(saved, "Attendance updated")))
        }
        Err(e) => Ok(error_response(&e)),
    }
}

pub async fn set_locked(
    service: &AttendanceService,
    request: &HttpRequest,
    id: i64,
    locked: bool,
) -> ActixResult<HttpResponse> {
    let caller = current_user(request)?;
    let storage = service.get_storage(request)?;
    let mut record = match load_attendance(storage.as_ref(), id).await {
        Ok(record) => record,
        Err(resp) => return Ok(resp),
    };

    record.is_locked = locked;
    match storage.save_attendance(&record).await {
        Ok(saved) => {
            info!(
                "Attendance {} {} by {}",
                saved.id,
                if locked { "locked" } else { "unlocked" },
                caller.id
            );
            let message = if locked {
                "Attendance locked"
            } else {
                "Attendance unlocked"
            };
            Ok(HttpResponse::Ok().json(ApiResponse::success(saved, message)))
        }
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

    fn replacement(student_id: i64) -> UpdateAttendanceEntriesRequest {
        serde_json::from_str(&format!(
            r#"{{"entries":[{{"student_id":{student_id},"status":"excused"}}],"notes":"Sports day"}}"#
        ))
        .expect("valid request")
    }

    #[tokio::test]
    async fn test_locked_record_rejects_updates_until_unlocked() {
        let f = fixture().await;
        let request = authed_request(&f.teacher, f.storage.clone(), None, None);
        let service = AttendanceService::new_lazy();
        let created = mark_attendance(&service, &request, mark_body(&f, "2026-10-15"))
            .await
            .expect("handled");
        let id = body_json(created).await["data"]["id"]
            .as_i64()
            .expect("record id");

        let updated = update_entries(&service, &request, id, replacement(f.students[0].id))
            .await
            .expect("handled");
        let json = body_json(updated).await;
        assert_eq!(json["data"]["summary"]["total_students"], 1);
        assert_eq!(json["data"]["summary"]["excused"], 1);
        assert_eq!(json["data"]["notes"], "Sports day");

        set_locked(&service, &request, id, true).await.expect("handled");
        let rejected = update_entries(&service, &request, id, replacement(f.students[1].id))
            .await
            .expect("handled");
        assert_eq!(rejected.status(), StatusCode::BAD_REQUEST);

        let admin = authed_request(&f.management, f.storage.clone(), None, None);
        set_locked(&service, &admin, id, false).await.expect("handled");
        let accepted = update_entries(&service, &request, id, replacement(f.students[1].id))
            .await
            .expect("handled");
        assert_eq!(accepted.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_missing_record_not_found() {
        let f = fixture().await;
        let request = authed_request(&f.teacher, f.storage.clone(), None, None);
        let response = set_locked(&AttendanceService::new_lazy(), &request, 404, true)
            .await
            .expect("handled");
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
