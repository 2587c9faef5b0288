use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::SubjectService;
use crate::errors::SchoolHubError;
use crate::models::subjects::requests::CreateSubjectRequest;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::current_user;
use crate::utils::{error_response, validation_response};

pub async fn create_subject(
    service: &SubjectService,
    request: &HttpRequest,
    body: CreateSubjectRequest,
) -> ActixResult<HttpResponse> {
    let caller = current_user(request)?;
    if let Err(errors) = body.validate() {
        return Ok(validation_response(errors));
    }
    let storage = service.get_storage(request)?;

    match storage.create_subject(body).await {
        Ok(subject) => {
            info!("Subject {} created by {}", subject.code, caller.id);
            Ok(HttpResponse::Created().json(ApiResponse::success(subject, "Subject created")))
        }
        Err(SchoolHubError::Conflict(msg)) => Ok(HttpResponse::Conflict()
            .json(ApiResponse::error_empty(ErrorCode::SubjectAlreadyExists, msg))),
        Err(e) => Ok(error_response(&e)),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use actix_web::http::StatusCode;

    use super::*;
    use crate::models::users::entities::UserRole;
    use crate::services::subjects::list::list_subjects;
    use crate::services::tests::{authed_request, body_json};
    use crate::storage::Storage;
    use crate::storage::sea_orm_storage::{SeaOrmStorage, new_user};

    fn body(raw: &str) -> CreateSubjectRequest {
        serde_json::from_str(raw).expect("valid request")
    }

    #[tokio::test]
    async fn test_codes_are_unique_case_insensitively() {
        let storage: Arc<dyn Storage> = Arc::new(SeaOrmStorage::in_memory().await.expect("db"));
        let admin = storage
            .create_user(new_user("Rao", UserRole::Management, None))
            .await
            .expect("admin");
        let request = authed_request(&admin, storage, None, None);
        let service = SubjectService::new_lazy();

        let created = create_subject(&service, &request, body(r#"{"name":"Biology","code":"bio"}"#))
            .await
            .expect("handled");
        assert_eq!(created.status(), StatusCode::CREATED);
        let json = body_json(created).await;
        assert_eq!(json["data"]["code"], "BIO");

        let duplicate = create_subject(&service, &request, body(r#"{"name":"Bio II","code":"BIO"}"#))
            .await
            .expect("handled");
        assert_eq!(duplicate.status(), StatusCode::CONFLICT);

        let listed = list_subjects(&service, &request).await.expect("handled");
        let json = body_json(listed).await;
        assert_eq!(json["data"].as_array().map(Vec::len), Some(1));
    }
}
