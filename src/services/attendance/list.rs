use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{AttendanceService, load_attendance};
use crate::models::attendance::entities::AttendanceRecord;
use crate::models::attendance::requests::{AttendanceListQuery, AttendanceQueryParams};
use crate::models::common::pagination::page_window;
use crate::models::users::entities::User;
use crate::models::{ApiResponse, ErrorCode, PaginatedResponse, PaginationInfo};
use crate::policy::{self, EntityKind, ReadScope};
use crate::services::current_user;
use crate::utils::error_response;

/// 学生视角：只保留包含本人的记录，条目收窄到本人
fn narrow_for_student(records: Vec<AttendanceRecord>, student_id: i64) -> Vec<AttendanceRecord> {
    records
        .into_iter()
        .filter(|r| r.sheet.entry_for(student_id).is_some())
        .map(|mut r| {
            r.sheet = r.sheet.narrowed_to(student_id);
            r
        })
        .collect()
}

fn own_records_only(caller: &User) -> bool {
    policy::read_scope(caller.role, EntityKind::Attendance) == ReadScope::OwnRecords
}

pub async fn list_attendance(
    service: &AttendanceService,
    request: &HttpRequest,
    query: AttendanceQueryParams,
) -> ActixResult<HttpResponse> {
    let caller = current_user(request)?;
    let storage = service.get_storage(request)?;

    let own_only = own_records_only(&caller);
    let class_id = if own_only {
        // 学生只查本班的记录
        match caller.class_id {
            Some(class_id) => Some(class_id),
            None => {
                let (page, size) = page_window(query.page, query.size);
                let empty: PaginatedResponse<AttendanceRecord> = PaginatedResponse {
                    items: Vec::new(),
                    pagination: PaginationInfo::from_counts(page, size, 0, 0),
                };
                return Ok(HttpResponse::Ok().json(ApiResponse::success(
                    empty,
                    "Attendance retrieved",
                )));
            }
        }
    } else {
        query.class_id
    };

    let list_query = AttendanceListQuery {
        page: query.page,
        size: query.size,
        class_id,
        session: query.session,
        start_date: query.start_date,
        end_date: query.end_date,
    };

    match storage.list_attendance(list_query).await {
        Ok(mut page) => {
            if own_only {
                page.items = narrow_for_student(page.items, caller.id);
            }
            Ok(HttpResponse::Ok().json(ApiResponse::success(page, "Attendance retrieved")))
        }
        Err(e) => Ok(error_response(&e)),
    }
}

pub async fn get_attendance(
    service: &AttendanceService,
    request: &HttpRequest,
    id: i64,
) -> ActixResult<HttpResponse> {
    let caller = current_user(request)?;
    let storage = service.get_storage(request)?;
    let mut record = match load_attendance(storage.as_ref(), id).await {
        Ok(record) => record,
        Err(resp) => return Ok(resp),
    };

    if own_records_only(&caller) {
        if record.sheet.entry_for(caller.id).is_none() {
            return Ok(HttpResponse::Forbidden().json(ApiResponse::error_empty(
                ErrorCode::Forbidden,
                "You can only view your own attendance",
            )));
        }
        record.sheet = record.sheet.narrowed_to(caller.id);
    }

    Ok(HttpResponse::Ok().json(ApiResponse::success(record, "Attendance retrieved")))
}

#[cfg(test)]
mod tests {
    use actix_web::http::StatusCode;

    use super::*;
    use crate::services::attendance::mark::mark_attendance;
    use crate::services::attendance::mark::tests::{fixture, mark_body};
    use crate::services::tests::{authed_request, body_json};

    #[tokio::test]
    async fn test_student_sees_only_own_entries() {
        let f = fixture().await;
        let teacher = authed_request(&f.teacher, f.storage.clone(), None, None);
        let service = AttendanceService::new_lazy();
        let created = mark_attendance(&service, &teacher, mark_body(&f, "2026-10-16"))
            .await
            .expect("handled");
        let id = body_json(created).await["data"]["id"]
            .as_i64()
            .expect("record id");

        let student = authed_request(&f.students[1], f.storage.clone(), None, None);
        let listed = list_attendance(&service, &student, AttendanceQueryParams::default())
            .await
            .expect("handled");
        let json = body_json(listed).await;
        let items = json["data"]["items"].as_array().expect("items");
        assert_eq!(items.len(), 1);
        assert_eq!(items[0]["entries"].as_array().map(Vec::len), Some(1));
        assert_eq!(items[0]["entries"][0]["status"], "absent");

        let got = get_attendance(&service, &student, id).await.expect("handled");
        assert_eq!(got.status(), StatusCode::OK);

        // 未被记录的学生
        let absent_from_sheet = authed_request(&f.students[2], f.storage.clone(), None, None);
        let listed = list_attendance(
            &service,
            &absent_from_sheet,
            AttendanceQueryParams::default(),
        )
        .await
        .expect("handled");
        let json = body_json(listed).await;
        assert_eq!(json["data"]["items"].as_array().map(Vec::len), Some(0));
        let denied = get_attendance(&service, &absent_from_sheet, id)
            .await
            .expect("handled");
        assert_eq!(denied.status(), StatusCode::FORBIDDEN);
    }
}
