use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::PerformanceService;
use super::aggregate::assign_ranks;
use crate::errors::SchoolHubError;
use crate::models::performance::requests::{
    CreatePerformanceRecordRequest, NewPerformanceRecord, PerformanceRecordListQuery,
    PerformanceRecordQueryParams,
};
use crate::models::users::entities::UserRole;
use crate::models::{ApiResponse, ErrorCode};
use crate::policy::{self, EntityKind};
use crate::services::current_user;
use crate::utils::{error_response, validation_response};

pub async fn create_record(
    service: &PerformanceService,
    request: &HttpRequest,
    body: CreatePerformanceRecordRequest,
) -> ActixResult<HttpResponse> {
    let caller = current_user(request)?;
    if let Err(errors) = body.validate() {
        return Ok(validation_response(errors));
    }
    let storage = service.get_storage(request)?;

    match storage.get_user_by_id(body.student_id).await {
        Ok(Some(user)) if user.role == UserRole::Student => {}
        Ok(Some(_)) => {
            return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
                ErrorCode::BadRequest,
                "Performance records can only be created for students",
            )));
        }
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::UserNotFound,
                "Student not found",
            )));
        }
        Err(e) => return Ok(error_response(&e)),
    }
    match storage.get_class_by_id(body.class_id).await {
        Ok(Some(_)) => {}
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::ClassNotFound,
                "Class not found",
            )));
        }
        Err(e) => return Ok(error_response(&e)),
    }
    match storage.get_subject_by_id(body.subject_id).await {
        Ok(Some(_)) => {}
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::SubjectNotFound,
                "Subject not found",
            )));
        }
        Err(e) => return Ok(error_response(&e)),
    }

    let record = NewPerformanceRecord {
        student_id: body.student_id,
        class_id: body.class_id,
        subject_id: body.subject_id,
        academic_year: body.academic_year,
        term: body.term,
        teacher_remarks: body.teacher_remarks,
    };
    match storage.create_performance_record(record).await {
        Ok(record) => {
            info!(
                "Performance record {} created by {} for student {}",
                record.id, caller.id, record.student_id
            );
            Ok(HttpResponse::Created().json(ApiResponse::success(
                record,
                "Performance record created",
            )))
        }
        Err(SchoolHubError::Conflict(msg)) => Ok(HttpResponse::Conflict().json(
            ApiResponse::error_empty(ErrorCode::PerformanceRecordAlreadyExists, msg),
        )),
        Err(e) => Ok(error_response(&e)),
    }
}

pub async fn get_record(
    service: &PerformanceService,
    request: &HttpRequest,
    id: i64,
) -> ActixResult<HttpResponse> {
    let caller = current_user(request)?;
    let storage = service.get_storage(request)?;

    match storage.get_performance_record(id).await {
        Ok(Some(record)) => {
            if !policy::can_read_student_record(&caller, EntityKind::Performance, record.student_id)
            {
                return Ok(HttpResponse::Forbidden().json(ApiResponse::error_empty(
                    ErrorCode::Forbidden,
                    "You can only view your own performance records",
                )));
            }
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                record,
                "Performance record retrieved",
            )))
        }
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::PerformanceRecordNotFound,
            "Performance record not found",
        ))),
        Err(e) => Ok(error_response(&e)),
    }
}

pub async fn list_records(
    service: &PerformanceService,
    request: &HttpRequest,
    query: PerformanceRecordQueryParams,
) -> ActixResult<HttpResponse> {
    let caller = current_user(request)?;
    let storage = service.get_storage(request)?;

    let list_query = PerformanceRecordListQuery {
        student_id: policy::scoped_student_id(&caller, EntityKind::Performance, query.student_id),
        class_id: policy::scoped_class_id(&caller, EntityKind::Performance, query.class_id),
        subject_id: query.subject_id,
        academic_year: query.academic_year,
        term: query.term,
    };
    let ranked = list_query.is_ranking_scope();

    match storage.list_performance_records(list_query).await {
        Ok(mut records) => {
            if ranked {
                assign_ranks(&mut records);
            }
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                records,
                "Performance records retrieved",
            )))
        }
        Err(e) => Ok(error_response(&e)),
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::sync::Arc;

    use actix_web::http::StatusCode;

    use super::*;
    use crate::models::performance::entities::Term;
    use crate::models::subjects::requests::CreateSubjectRequest;
    use crate::models::users::entities::User;
    use crate::services::tests::{authed_request, body_json};
    use crate::storage::Storage;
    use crate::storage::sea_orm_storage::{SeaOrmStorage, new_class, new_user};

    pub(crate) struct Fixture {
        pub storage: Arc<dyn Storage>,
        pub teacher: User,
        pub students: Vec<User>,
        pub class_id: i64,
        pub subject_id: i64,
    }

    pub(crate) async fn fixture() -> Fixture {
        let storage: Arc<dyn Storage> = Arc::new(SeaOrmStorage::in_memory().await.expect("db"));
        let class = storage.create_class(new_class("10", "A")).await.expect("class");
        let subject = storage
            .create_subject(CreateSubjectRequest {
                name: "Mathematics".into(),
                code: "MATH".into(),
                description: None,
                subject_type: Default::default(),
                max_marks: 100,
                passing_marks: 33,
            })
            .await
            .expect("subject");
        let teacher = storage
            .create_user(new_user("Rao", UserRole::Teacher, None))
            .await
            .expect("teacher");
        let mut students = Vec::new();
        for name in ["Anu", "Bala", "Chitra"] {
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
            students,
            class_id: class.id,
            subject_id: subject.id,
        }
    }

    pub(crate) fn create_body(f: &Fixture, student_id: i64) -> CreatePerformanceRecordRequest {
        CreatePerformanceRecordRequest {
            student_id,
            class_id: f.class_id,
            subject_id: f.subject_id,
            academic_year: "2026-2027".into(),
            term: Term::Term1,
            teacher_remarks: None,
        }
    }

    #[tokio::test]
    async fn test_duplicate_term_record_conflicts() {
        let f = fixture().await;
        let request = authed_request(&f.teacher, f.storage.clone(), None, None);
        let service = PerformanceService::new_lazy();

        let first = create_record(&service, &request, create_body(&f, f.students[0].id))
            .await
            .expect("handled");
        assert_eq!(first.status(), StatusCode::CREATED);
        let second = create_record(&service, &request, create_body(&f, f.students[0].id))
            .await
            .expect("handled");
        assert_eq!(second.status(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_record_for_teacher_rejected() {
        let f = fixture().await;
        let request = authed_request(&f.teacher, f.storage.clone(), None, None);
        let response = create_record(
            &PerformanceService::new_lazy(),
            &request,
            create_body(&f, f.teacher.id),
        )
        .await
        .expect("handled");
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_student_cannot_read_other_record() {
        let f = fixture().await;
        let teacher_request = authed_request(&f.teacher, f.storage.clone(), None, None);
        let service = PerformanceService::new_lazy();
        let created = create_record(&service, &teacher_request, create_body(&f, f.students[0].id))
            .await
            .expect("handled");
        let id = body_json(created).await["data"]["id"]
            .as_i64()
            .expect("record id");

        let other = authed_request(&f.students[1], f.storage.clone(), None, None);
        let denied = get_record(&service, &other, id).await.expect("handled");
        assert_eq!(denied.status(), StatusCode::FORBIDDEN);

        let owner = authed_request(&f.students[0], f.storage.clone(), None, None);
        let allowed = get_record(&service, &owner, id).await.expect("handled");
        assert_eq!(allowed.status(), StatusCode::OK);
    }
}
