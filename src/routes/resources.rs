use actix_multipart::Multipart;
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::resources::requests::{
    GenerateLessonPlanRequest, GenerateQuizRequest, ResourceQueryParams,
};
use crate::models::users::entities::UserRole;
use crate::services::ResourceService;
use crate::utils::SafeIDI64;

static RESOURCE_SERVICE: Lazy<ResourceService> = Lazy::new(ResourceService::new_lazy);

pub async fn upload_resource(req: HttpRequest, payload: Multipart) -> ActixResult<HttpResponse> {
    RESOURCE_SERVICE.upload_resource(&req, payload).await
}

pub async fn list_resources(
    req: HttpRequest,
    query: web::Query<ResourceQueryParams>,
) -> ActixResult<HttpResponse> {
    RESOURCE_SERVICE
        .list_resources(&req, query.into_inner())
        .await
}

pub async fn get_resource(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    RESOURCE_SERVICE.get_resource(&req, id.0).await
}

// 请求体可省略，缺省参数见 GenerateQuizRequest
pub async fn generate_quiz(
    req: HttpRequest,
    id: SafeIDI64,
    body: Option<web::Json<GenerateQuizRequest>>,
) -> ActixResult<HttpResponse> {
    let body = body.map(web::Json::into_inner).unwrap_or_default();
    RESOURCE_SERVICE.generate_quiz(&req, id.0, body).await
}

pub async fn generate_lesson_plan(
    req: HttpRequest,
    id: SafeIDI64,
    body: Option<web::Json<GenerateLessonPlanRequest>>,
) -> ActixResult<HttpResponse> {
    let body = body.map(web::Json::into_inner).unwrap_or_default();
    RESOURCE_SERVICE
        .generate_lesson_plan(&req, id.0, body)
        .await
}

pub async fn delete_resource(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    RESOURCE_SERVICE.delete_resource(&req, id.0).await
}

// 配置路由
pub fn configure_resource_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/resources")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("")
                    .route(web::get().to(list_resources))
                    .route(
                        web::post()
                            .to(upload_resource)
                            .wrap(middlewares::RequireRole::new_any(UserRole::staff_roles())),
                    ),
            )
            .service(
                web::resource("/{id}")
                    .route(web::get().to(get_resource))
                    .route(
                        web::delete()
                            .to(delete_resource)
                            .wrap(middlewares::RequireRole::new_any(UserRole::staff_roles())),
                    ),
            )
            .route(
                "/{id}/generate-quiz",
                web::post()
                    .to(generate_quiz)
                    .wrap(middlewares::RequireRole::new_any(UserRole::staff_roles())),
            )
            .route(
                "/{id}/generate-lesson-plan",
                web::post()
                    .to(generate_lesson_plan)
                    .wrap(middlewares::RequireRole::new_any(UserRole::staff_roles())),
            ),
    );
}
