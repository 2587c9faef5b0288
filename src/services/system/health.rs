use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};

use super::SystemService;
use crate::models::ApiResponse;
use crate::models::AppStartTime;
use crate::models::system::responses::HealthResponse;

pub async fn health(_service: &SystemService, request: &HttpRequest) -> ActixResult<HttpResponse> {
    let now = chrono::Utc::now();
    let uptime_seconds = request
        .app_data::<web::Data<AppStartTime>>()
        .map(|start| {
            now.signed_duration_since(start.start_datetime)
                .num_seconds()
                .max(0)
        })
        .unwrap_or(0);

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        HealthResponse {
            status: "ok".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            uptime_seconds,
            timestamp: now,
        },
        "Service is healthy",
    )))
}
