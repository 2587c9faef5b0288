use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::UserService;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::current_user;
use crate::utils::error_response;

pub async fn get_user(
    service: &UserService,
    request: &HttpRequest,
    user_id: i64,
) -> ActixResult<HttpResponse> {
    current_user(request)?;
    let storage = service.get_storage(request)?;

    match storage.get_user_by_id(user_id).await {
        Ok(Some(user)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            user,
            "User information retrieved successfully",
        ))),
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::UserNotFound,
            "User not found",
        ))),
        Err(e) => Ok(error_response(&e)),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use actix_web::http::StatusCode;

    use super::*;
    use crate::models::users::entities::UserRole;
    use crate::services::tests::{authed_request, body_json};
    use crate::storage::Storage;
    use crate::storage::sea_orm_storage::{SeaOrmStorage, new_user};

    #[tokio::test]
    async fn test_get_existing_and_missing_user() {
        let storage: Arc<dyn Storage> = Arc::new(SeaOrmStorage::in_memory().await.expect("db"));
        let teacher = storage
            .create_user(new_user("Mira", UserRole::Teacher, None))
            .await
            .expect("teacher");
        let student = storage
            .create_user(new_user("Nikhil", UserRole::Student, None))
            .await
            .expect("student");
        let request = authed_request(&teacher, storage, None, None);
        let service = UserService::new_lazy();

        let found = get_user(&service, &request, student.id).await.expect("handled");
        assert_eq!(found.status(), StatusCode::OK);
        let json = body_json(found).await;
        assert_eq!(json["data"]["email"], "nikhil@school.test");

        let missing = get_user(&service, &request, student.id + 50)
            .await
            .expect("handled");
        assert_eq!(missing.status(), StatusCode::NOT_FOUND);
    }
}
