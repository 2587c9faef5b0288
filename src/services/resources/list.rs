use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{ResourceService, load_resource};
use crate::models::ApiResponse;
use crate::models::resources::requests::{ResourceListQuery, ResourceQueryParams};
use crate::policy;
use crate::services::current_user;
use crate::utils::error_response;

pub async fn list_resources(
    service: &ResourceService,
    request: &HttpRequest,
    query: ResourceQueryParams,
) -> ActixResult<HttpResponse> {
    let caller = current_user(request)?;
    let storage = service.get_storage(request)?;

    let list_query = ResourceListQuery {
        page: query.page,
        size: query.size,
        owner_id: policy::scoped_owner_id(&caller, query.owner_id),
        subject: query.subject,
        resource_type: query.resource_type,
        class_id: query.class_id,
    };
    match storage.list_resources(list_query).await {
        Ok(page) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            page,
            "Resources retrieved successfully",
        ))),
        Err(e) => Ok(error_response(&e)),
    }
}

pub async fn get_resource(
    service: &ResourceService,
    request: &HttpRequest,
    id: i64,
) -> ActixResult<HttpResponse> {
    current_user(request)?;
    let storage = service.get_storage(request)?;

    match load_resource(storage.as_ref(), id).await {
        Ok(resource) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            resource,
            "Resource retrieved successfully",
        ))),
        Err(response) => Ok(response),
    }
}
