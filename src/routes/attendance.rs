use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::attendance::requests::{
    AttendanceQueryParams, AttendanceStatsParams, BulkMarkAttendanceRequest,
    MarkAttendanceRequest, UpdateAttendanceEntriesRequest,
};
use crate::models::users::entities::UserRole;
use crate::services::AttendanceService;
use crate::utils::SafeIDI64;

// 懒加载的全局 AttendanceService 实例
static ATTENDANCE_SERVICE: Lazy<AttendanceService> = Lazy::new(AttendanceService::new_lazy);

pub async fn mark_attendance(
    req: HttpRequest,
    body: web::Json<MarkAttendanceRequest>,
) -> ActixResult<HttpResponse> {
    ATTENDANCE_SERVICE
        .mark_attendance(&req, body.into_inner())
        .await
}

pub async fn bulk_mark_attendance(
    req: HttpRequest,
    body: web::Json<BulkMarkAttendanceRequest>,
) -> ActixResult<HttpResponse> {
    ATTENDANCE_SERVICE
        .bulk_mark_attendance(&req, body.into_inner())
        .await
}

pub async fn list_attendance(
    req: HttpRequest,
    query: web::Query<AttendanceQueryParams>,
) -> ActixResult<HttpResponse> {
    ATTENDANCE_SERVICE
        .list_attendance(&req, query.into_inner())
        .await
}

pub async fn get_stats(
    req: HttpRequest,
    query: web::Query<AttendanceStatsParams>,
) -> ActixResult<HttpResponse> {
    ATTENDANCE_SERVICE.get_stats(&req, query.into_inner()).await
}

pub async fn get_attendance(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    ATTENDANCE_SERVICE.get_attendance(&req, id.0).await
}

pub async fn update_entries(
    req: HttpRequest,
    id: SafeIDI64,
    body: web::Json<UpdateAttendanceEntriesRequest>,
) -> ActixResult<HttpResponse> {
    ATTENDANCE_SERVICE
        .update_entries(&req, id.0, body.into_inner())
        .await
}

pub async fn lock_attendance(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    ATTENDANCE_SERVICE.set_locked(&req, id.0, true).await
}

pub async fn unlock_attendance(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    ATTENDANCE_SERVICE.set_locked(&req, id.0, false).await
}

pub async fn delete_attendance(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    ATTENDANCE_SERVICE.delete_attendance(&req, id.0).await
}

// 配置路由；静态路径需在 /{id} 之前注册
pub fn configure_attendance_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/attendance")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("")
                    .route(web::get().to(list_attendance))
                    .route(
                        web::post()
                            .to(mark_attendance)
                            .wrap(middlewares::RequireRole::new_any(UserRole::staff_roles())),
                    ),
            )
            .route(
                "/bulk",
                web::post()
                    .to(bulk_mark_attendance)
                    .wrap(middlewares::RequireRole::new_any(UserRole::staff_roles())),
            )
            .route("/stats", web::get().to(get_stats))
            .service(
                web::resource("/{id}")
                    .route(web::get().to(get_attendance))
                    .route(
                        web::delete()
                            .to(delete_attendance)
                            .wrap(middlewares::RequireRole::new_any(UserRole::management_roles())),
                    ),
            )
            .route(
                "/{id}/entries",
                web::put()
                    .to(update_entries)
                    .wrap(middlewares::RequireRole::new_any(UserRole::staff_roles())),
            )
            .route(
                "/{id}/lock",
                web::post()
                    .to(lock_attendance)
                    .wrap(middlewares::RequireRole::new_any(UserRole::staff_roles())),
            )
            .route(
                "/{id}/unlock",
                web::post()
                    .to(unlock_attendance)
                    .wrap(middlewares::RequireRole::new_any(UserRole::management_roles())),
            ),
    );
}

#[cfg(test)]
mod tests {
    use actix_web::http::StatusCode;
    use actix_web::{App, test, web};

    use super::configure_attendance_routes;
    use crate::routes::tests::{bearer, directory};

    #[actix_web::test]
    async fn test_guards_on_attendance_routes() {
        let dir = directory().await;
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(dir.storage.clone()))
                .configure(configure_attendance_routes),
        )
        .await;

        let anonymous = test::TestRequest::get()
            .uri("/api/v1/attendance")
            .to_request();
        assert_eq!(
            test::call_service(&app, anonymous).await.status(),
            StatusCode::UNAUTHORIZED
        );

        let forged = test::TestRequest::get()
            .uri("/api/v1/attendance")
            .insert_header(("Authorization", "Bearer not-a-token"))
            .to_request();
        assert_eq!(
            test::call_service(&app, forged).await.status(),
            StatusCode::UNAUTHORIZED
        );

        let inactive = test::TestRequest::get()
            .uri("/api/v1/attendance")
            .insert_header(bearer(&dir.retired))
            .to_request();
        assert_eq!(
            test::call_service(&app, inactive).await.status(),
            StatusCode::UNAUTHORIZED
        );

        let student_marks = test::TestRequest::post()
            .uri("/api/v1/attendance")
            .insert_header(bearer(&dir.student))
            .set_json(serde_json::json!({"date": "2026-10-15", "class_id": 1, "entries": []}))
            .to_request();
        assert_eq!(
            test::call_service(&app, student_marks).await.status(),
            StatusCode::FORBIDDEN
        );

        let teacher_unlocks = test::TestRequest::post()
            .uri("/api/v1/attendance/1/unlock")
            .insert_header(bearer(&dir.teacher))
            .to_request();
        assert_eq!(
            test::call_service(&app, teacher_unlocks).await.status(),
            StatusCode::FORBIDDEN
        );

        let student_lists = test::TestRequest::get()
            .uri("/api/v1/attendance")
            .insert_header(bearer(&dir.student))
            .to_request();
        assert_eq!(
            test::call_service(&app, student_lists).await.status(),
            StatusCode::OK
        );
    }
}
