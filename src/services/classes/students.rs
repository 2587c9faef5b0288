use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::ClassService;
use crate::models::classes::requests::AddStudentRequest;
use crate::models::classes::responses::ClassStudentsResponse;
use crate::models::users::entities::UserRole;
use crate::models::users::requests::UpdateUserRequest;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::current_user;
use crate::utils::error_response;

fn class_not_found() -> HttpResponse {
    HttpResponse::NotFound().json(ApiResponse::error_empty(
        ErrorCode::ClassNotFound,
        "Class not found",
    ))
}

pub async fn list_students(
    service: &ClassService,
    request: &HttpRequest,
    class_id: i64,
) -> ActixResult<HttpResponse> {
    current_user(request)?;
    let storage = service.get_storage(request)?;

    match storage.get_class_by_id(class_id).await {
        Ok(Some(_)) => {}
        Ok(None) => return Ok(class_not_found()),
        Err(e) => return Ok(error_response(&e)),
    }
    match storage.list_class_students(class_id).await {
        Ok(items) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            ClassStudentsResponse { class_id, items },
            "Class students retrieved successfully",
        ))),
        Err(e) => Ok(error_response(&e)),
    }
}

/// 学生转入班级；班级人数不能超过 max_strength
pub async fn add_student(
    service: &ClassService,
    request: &HttpRequest,
    class_id: i64,
    body: AddStudentRequest,
) -> ActixResult<HttpResponse> {
    let caller = current_user(request)?;
    let storage = service.get_storage(request)?;

    let class = match storage.get_class_by_id(class_id).await {
        Ok(Some(class)) => class,
        Ok(None) => return Ok(class_not_found()),
        Err(e) => return Ok(error_response(&e)),
    };
    match storage.get_user_by_id(body.student_id).await {
        Ok(Some(user)) if user.role == UserRole::Student => {
            if user.class_id == Some(class_id) {
                return Ok(HttpResponse::Conflict().json(ApiResponse::error_empty(
                    ErrorCode::Conflict,
                    "Student already belongs to this class",
                )));
            }
        }
        Ok(Some(_)) => {
            return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
                ErrorCode::BadRequest,
                "Only students can be added to a class",
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
    match storage.list_class_students(class_id).await {
        Ok(students) if students.len() >= class.max_strength.max(0) as usize => {
            return Ok(HttpResponse::Conflict().json(ApiResponse::error_empty(
                ErrorCode::Conflict,
                "Class is at full strength",
            )));
        }
        Ok(_) => {}
        Err(e) => return Ok(error_response(&e)),
    }

    let update = UpdateUserRequest {
        name: None,
        email: None,
        role: None,
        class_id: Some(class_id),
        roll_number: None,
        is_active: None,
    };
    match storage.update_user(body.student_id, update).await {
        Ok(Some(student)) => {
            info!(
                "Student {} added to class {} by {}",
                student.id, class_id, caller.id
            );
            Ok(HttpResponse::Ok().json(ApiResponse::success(student, "Student added to class")))
        }
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::UserNotFound,
            "Student not found",
        ))),
        Err(e) => Ok(error_response(&e)),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use actix_web::http::StatusCode;

    use super::*;
    use crate::models::classes::requests::UpdateClassRequest;
    use crate::services::tests::{authed_request, body_json};
    use crate::storage::Storage;
    use crate::storage::sea_orm_storage::{SeaOrmStorage, new_class, new_user};

    #[tokio::test]
    async fn test_add_student_respects_role_and_capacity() {
        let storage: Arc<dyn Storage> = Arc::new(SeaOrmStorage::in_memory().await.expect("db"));
        let class = storage.create_class(new_class("5", "A")).await.expect("class");
        storage
            .update_class(
                class.id,
                UpdateClassRequest {
                    max_strength: Some(1),
                    ..Default::default()
                },
            )
            .await
            .expect("update");
        let teacher = storage
            .create_user(new_user("Iyer", UserRole::Teacher, None))
            .await
            .expect("teacher");
        let first = storage
            .create_user(new_user("Gita", UserRole::Student, None))
            .await
            .expect("student");
        let second = storage
            .create_user(new_user("Hari", UserRole::Student, None))
            .await
            .expect("student");
        let request = authed_request(&teacher, storage.clone(), None, None);
        let service = ClassService::new_lazy();

        let response = add_student(
            &service,
            &request,
            class.id,
            AddStudentRequest {
                student_id: teacher.id,
            },
        )
        .await
        .expect("handled");
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = add_student(
            &service,
            &request,
            class.id,
            AddStudentRequest {
                student_id: first.id,
            },
        )
        .await
        .expect("handled");
        assert_eq!(response.status(), StatusCode::OK);

        let response = add_student(
            &service,
            &request,
            class.id,
            AddStudentRequest {
                student_id: second.id,
            },
        )
        .await
        .expect("handled");
        assert_eq!(response.status(), StatusCode::CONFLICT);

        let response = list_students(&service, &request, class.id)
            .await
            .expect("handled");
        let json = body_json(response).await;
        assert_eq!(json["data"]["items"].as_array().map(Vec::len), Some(1));
        assert_eq!(json["data"]["items"][0]["name"], "Gita");
    }
}
