use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::performance::requests::{
    AddAssessmentRequest, AiQueryRequest, CreatePerformanceRecordRequest,
    PerformanceRecordQueryParams, PerformanceStatsParams,
};
use crate::models::quizzes::requests::{QuizResultQueryParams, SubmitQuizRequest};
use crate::models::users::entities::UserRole;
use crate::services::{PerformanceService, QuizService};
use crate::utils::SafeIDI64;

static QUIZ_SERVICE: Lazy<QuizService> = Lazy::new(QuizService::new_lazy);
static PERFORMANCE_SERVICE: Lazy<PerformanceService> = Lazy::new(PerformanceService::new_lazy);

pub async fn submit_quiz(
    req: HttpRequest,
    body: web::Json<SubmitQuizRequest>,
) -> ActixResult<HttpResponse> {
    QUIZ_SERVICE.submit_quiz(&req, body.into_inner()).await
}

pub async fn list_quiz_results(
    req: HttpRequest,
    query: web::Query<QuizResultQueryParams>,
) -> ActixResult<HttpResponse> {
    QUIZ_SERVICE
        .list_quiz_results(&req, query.into_inner())
        .await
}

pub async fn get_stats(
    req: HttpRequest,
    query: web::Query<PerformanceStatsParams>,
) -> ActixResult<HttpResponse> {
    PERFORMANCE_SERVICE.get_stats(&req, query.into_inner()).await
}

pub async fn create_record(
    req: HttpRequest,
    body: web::Json<CreatePerformanceRecordRequest>,
) -> ActixResult<HttpResponse> {
    PERFORMANCE_SERVICE
        .create_record(&req, body.into_inner())
        .await
}

pub async fn list_records(
    req: HttpRequest,
    query: web::Query<PerformanceRecordQueryParams>,
) -> ActixResult<HttpResponse> {
    PERFORMANCE_SERVICE
        .list_records(&req, query.into_inner())
        .await
}

pub async fn get_record(req: HttpRequest, record_id: SafeIDI64) -> ActixResult<HttpResponse> {
    PERFORMANCE_SERVICE.get_record(&req, record_id.0).await
}

pub async fn add_assessment(
    req: HttpRequest,
    record_id: SafeIDI64,
    body: web::Json<AddAssessmentRequest>,
) -> ActixResult<HttpResponse> {
    PERFORMANCE_SERVICE
        .add_assessment(&req, record_id.0, body.into_inner())
        .await
}

pub async fn remove_assessment(
    req: HttpRequest,
    record_id: SafeIDI64,
    path: web::Path<(i64, usize)>,
) -> ActixResult<HttpResponse> {
    let (_, index) = path.into_inner();
    PERFORMANCE_SERVICE
        .remove_assessment(&req, record_id.0, index)
        .await
}

pub async fn ai_query(
    req: HttpRequest,
    body: web::Json<AiQueryRequest>,
) -> ActixResult<HttpResponse> {
    PERFORMANCE_SERVICE.ai_query(&req, body.into_inner()).await
}

// 配置路由
pub fn configure_performance_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/performance")
            .wrap(middlewares::RequireJWT)
            .route("", web::get().to(list_quiz_results))
            .route(
                "/submit-quiz",
                web::post()
                    .to(submit_quiz)
                    .wrap(middlewares::RequireRole::new(&UserRole::Student)),
            )
            .route("/stats", web::get().to(get_stats))
            .route(
                "/ai-query",
                web::post()
                    .to(ai_query)
                    .wrap(middlewares::RequireRole::new_any(UserRole::staff_roles())),
            )
            .service(
                web::resource("/records")
                    .route(web::get().to(list_records))
                    .route(
                        web::post()
                            .to(create_record)
                            .wrap(middlewares::RequireRole::new_any(UserRole::staff_roles())),
                    ),
            )
            .route("/records/{id}", web::get().to(get_record))
            .route(
                "/records/{id}/assessments",
                web::post()
                    .to(add_assessment)
                    .wrap(middlewares::RequireRole::new_any(UserRole::staff_roles())),
            )
            .route(
                "/records/{id}/assessments/{index}",
                web::delete()
                    .to(remove_assessment)
                    .wrap(middlewares::RequireRole::new_any(UserRole::staff_roles())),
            ),
    );
}
