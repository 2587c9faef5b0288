use std::path::Path;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::{info, warn};

use super::{ResourceService, load_resource};
use crate::models::{ApiResponse, ErrorCode};
use crate::policy;
use crate::services::current_user;
use crate::utils::error_response;

/// 只有上传者或管理层可以删除；同时删除上传的文件
pub async fn delete_resource(
    service: &ResourceService,
    request: &HttpRequest,
    id: i64,
) -> ActixResult<HttpResponse> {
    let caller = current_user(request)?;
    let storage = service.get_storage(request)?;

    let resource = match load_resource(storage.as_ref(), id).await {
        Ok(resource) => resource,
        Err(response) => return Ok(response),
    };
    if !policy::can_delete_resource(&caller, resource.owner_id) {
        return Ok(HttpResponse::Forbidden().json(ApiResponse::error_empty(
            ErrorCode::ResourcePermissionDenied,
            "Not authorized to delete this resource",
        )));
    }

    match storage.delete_resource(id).await {
        Ok(true) => {}
        Ok(false) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::ResourceNotFound,
                "Resource not found",
            )));
        }
        Err(e) => return Ok(error_response(&e)),
    }
    if let Some(path) = resource.file_path.as_deref()
        && Path::new(path).exists()
        && let Err(e) = std::fs::remove_file(path)
    {
        warn!("Failed to remove file {} of resource {}: {}", path, id, e);
    }

    info!("Resource {} deleted by {}", id, caller.id);
    Ok(HttpResponse::Ok().json(ApiResponse::success_empty("Resource deleted successfully")))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use actix_web::http::StatusCode;

    use super::*;
    use crate::models::resources::requests::NewResource;
    use crate::models::users::entities::UserRole;
    use crate::services::tests::authed_request;
    use crate::storage::Storage;
    use crate::storage::sea_orm_storage::{SeaOrmStorage, new_user};

    #[tokio::test]
    async fn test_only_owner_or_management_may_delete() {
        let storage: Arc<dyn Storage> = Arc::new(SeaOrmStorage::in_memory().await.expect("db"));
        let owner = storage
            .create_user(new_user("Bhavna", UserRole::Teacher, None))
            .await
            .expect("teacher");
        let colleague = storage
            .create_user(new_user("Chetan", UserRole::Teacher, None))
            .await
            .expect("teacher");
        let principal = storage
            .create_user(new_user("Deepa", UserRole::Management, None))
            .await
            .expect("management");
        let resource = storage
            .create_resource(NewResource {
                owner_id: owner.id,
                subject: "History".into(),
                title: "Maurya empire".into(),
                file_path: Some("/nonexistent/schoolhub/maurya.pdf".into()),
                ..Default::default()
            })
            .await
            .expect("resource");
        let service = ResourceService::new_lazy();

        let request = authed_request(&colleague, storage.clone(), None, None);
        let denied = delete_resource(&service, &request, resource.id)
            .await
            .expect("handled");
        assert_eq!(denied.status(), StatusCode::FORBIDDEN);

        let request = authed_request(&principal, storage.clone(), None, None);
        let deleted = delete_resource(&service, &request, resource.id)
            .await
            .expect("handled");
        assert_eq!(deleted.status(), StatusCode::OK);
        assert!(storage
            .get_resource_by_id(resource.id)
            .await
            .expect("query")
            .is_none());
    }
}
