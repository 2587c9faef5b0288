use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::ClassService;
use crate::errors::SchoolHubError;
use crate::models::classes::requests::CreateClassRequest;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::current_user;
use crate::utils::{error_response, validation_response};

pub async fn create_class(
    service: &ClassService,
    request: &HttpRequest,
    class_data: CreateClassRequest,
) -> ActixResult<HttpResponse> {
    let caller = current_user(request)?;
    let class_data = class_data.normalize(chrono::Utc::now().date_naive());
    if let Err(errors) = class_data.validate() {
        return Ok(validation_response(errors));
    }
    let storage = service.get_storage(request)?;

    match storage.create_class(class_data).await {
        Ok(class) => {
            info!("Class {} ({}) created by {}", class.id, class.name, caller.id);
            Ok(HttpResponse::Created().json(ApiResponse::success(class, "Class created")))
        }
        Err(SchoolHubError::Conflict(msg)) => Ok(HttpResponse::Conflict()
            .json(ApiResponse::error_empty(ErrorCode::ClassAlreadyExists, msg))),
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

    fn body(raw: &str) -> CreateClassRequest {
        serde_json::from_str(raw).expect("valid request")
    }

    #[tokio::test]
    async fn test_create_applies_defaults_and_rejects_duplicates() {
        let storage: Arc<dyn Storage> = Arc::new(SeaOrmStorage::in_memory().await.expect("db"));
        let admin = storage
            .create_user(new_user("Rao", UserRole::Management, None))
            .await
            .expect("admin");
        let request = authed_request(&admin, storage, None, None);
        let service = ClassService::new_lazy();

        let response = create_class(&service, &request, body(r#"{"grade":"7","section":"c"}"#))
            .await
            .expect("handled");
        assert_eq!(response.status(), StatusCode::CREATED);
        let json = body_json(response).await;
        assert_eq!(json["data"]["section"], "C");
        assert_eq!(json["data"]["name"], "Class 7-C");
        assert_eq!(json["data"]["max_strength"], 50);

        let academic_year = json["data"]["academic_year"].as_str().expect("year");
        let duplicate = format!(
            r#"{{"grade":"7","section":"C","academic_year":"{academic_year}"}}"#
        );
        let response = create_class(&service, &request, body(&duplicate))
            .await
            .expect("handled");
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_blank_grade_rejected() {
        let storage: Arc<dyn Storage> = Arc::new(SeaOrmStorage::in_memory().await.expect("db"));
        let admin = storage
            .create_user(new_user("Rao", UserRole::Management, None))
            .await
            .expect("admin");
        let request = authed_request(&admin, storage, None, None);
        let response = create_class(
            &ClassService::new_lazy(),
            &request,
            body(r#"{"grade":" ","section":"A"}"#),
        )
        .await
        .expect("handled");
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
