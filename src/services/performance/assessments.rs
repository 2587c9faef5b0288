use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::PerformanceService;
use crate::models::performance::entities::PerformanceRecord;
use crate::models::performance::requests::AddAssessmentRequest;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::current_user;
use crate::storage::Storage;
use crate::utils::{error_response, validation_response};

async fn load_record(storage: &dyn Storage, id: i64) -> Result<PerformanceRecord, HttpResponse> {
    match storage.get_performance_record(id).await {
        Ok(Some(record)) => Ok(record),
        Ok(None) => Err(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::PerformanceRecordNotFound,
            "Performance record not found",
        ))),
        Err(e) => Err(error_response(&e)),
    }
}

pub async fn add_assessment(
    service: &PerformanceService,
    request: &HttpRequest,
    id: i64,
    body: AddAssessmentRequest,
) -> ActixResult<HttpResponse> {
    let caller = current_user(request)?;
    if let Err(errors) = body.validate() {
        return Ok(validation_response(errors));
    }
    let storage = service.get_storage(request)?;
    let mut record = match load_record(storage.as_ref(), id).await {
        Ok(record) => record,
        Err(resp) => return Ok(resp),
    };

    record
        .book
        .add_assessment(body.into_assessment(chrono::Utc::now().date_naive()));

    match storage.save_performance_record(&record).await {
        Ok(saved) => {
            info!("Assessment added to record {} by {}", saved.id, caller.id);
            Ok(HttpResponse::Ok().json(ApiResponse::success(saved, "Assessment added")))
        }
        Err(e) => Ok(error_response(&e)),
    }
}

pub async fn remove_assessment(
    service: &PerformanceService,
    request: &HttpRequest,
    id: i64,
    index: usize,
) -> ActixResult<HttpResponse> {
    let caller = current_user(request)?;
    let storage = service.get_storage(request)?;
    let mut record = match load_record(storage.as_ref(), id).await {
        Ok(record) => record,
        Err(resp) => return Ok(resp),
    };

    if record.book.remove_assessment(index).is_none() {
        return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::AssessmentNotFound,
            "Assessment not found",
        )));
    }

    match storage.save_performance_record(&record).await {
        Ok(saved) => {
            info!(
                "Assessment {} removed from record {} by {}",
                index, saved.id, caller.id
            );
            Ok(HttpResponse::Ok().json(ApiResponse::success(saved, "Assessment removed")))
        }
        Err(e) => Ok(error_response(&e)),
    }
}

#[cfg(test)]
mod tests {
    use actix_web::http::StatusCode;

    use super::*;
    use crate::models::performance::entities::AssessmentType;
    use crate::services::performance::records::create_record;
    use crate::services::performance::records::tests::{create_body, fixture};
    use crate::services::tests::{authed_request, body_json};

    fn add_body(max: f64, obtained: f64) -> AddAssessmentRequest {
        AddAssessmentRequest {
            assessment_type: AssessmentType::UnitTest,
            title: "Unit test 1".into(),
            max_marks: max,
            obtained_marks: obtained,
            date: None,
            feedback: None,
        }
    }

    #[tokio::test]
    async fn test_aggregate_follows_add_and_remove() {
        let f = fixture().await;
        let request = authed_request(&f.teacher, f.storage.clone(), None, None);
        let service = PerformanceService::new_lazy();
        let created = create_record(&service, &request, create_body(&f, f.students[0].id))
            .await
            .expect("handled");
        let id = body_json(created).await["data"]["id"]
            .as_i64()
            .expect("record id");

        add_assessment(&service, &request, id, add_body(50.0, 45.0))
            .await
            .expect("handled");
        let response = add_assessment(&service, &request, id, add_body(50.0, 25.0))
            .await
            .expect("handled");
        let json = body_json(response).await;
        assert_eq!(json["data"]["aggregate"]["percentage"], 70);
        assert_eq!(json["data"]["aggregate"]["grade"], "B+");

        let response = remove_assessment(&service, &request, id, 1)
            .await
            .expect("handled");
        let json = body_json(response).await;
        assert_eq!(json["data"]["aggregate"]["percentage"], 90);
        assert_eq!(json["data"]["assessments"].as_array().map(Vec::len), Some(1));

        let missing = remove_assessment(&service, &request, id, 4)
            .await
            .expect("handled");
        assert_eq!(missing.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_obtained_above_max_rejected() {
        let f = fixture().await;
        let request = authed_request(&f.teacher, f.storage.clone(), None, None);
        let response = add_assessment(
            &PerformanceService::new_lazy(),
            &request,
            1,
            add_body(20.0, 25.0),
        )
        .await
        .expect("handled");
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
