use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::PerformanceService;
use crate::ai::GenerationOptions;
use crate::errors::Result;
use crate::models::ApiResponse;
use crate::models::attendance::requests::AttendanceRangeQuery;
use crate::models::performance::requests::AiQueryRequest;
use crate::models::performance::responses::AiQueryResponse;
use crate::services::attendance::aggregate::student_status_counts;
use crate::services::current_user;
use crate::storage::Storage;
use crate::utils::{error_response, validation_response};

/// 上下文中列出的最近测验数
const CONTEXT_QUIZ_LIMIT: u64 = 10;
const QUERY_TEMPERATURE: f32 = 0.7;

/// 组装学生或班级的数据摘要
pub(crate) async fn build_context(storage: &dyn Storage, body: &AiQueryRequest) -> Result<String> {
    if let Some(student_id) = body.student_id {
        let student = storage.get_user_by_id(student_id).await?;
        let (name, class) = match &student {
            Some(s) => (
                s.name.clone(),
                s.class_id.map_or_else(|| "N/A".to_string(), |c| c.to_string()),
            ),
            None => ("Unknown".to_string(), "N/A".to_string()),
        };

        let quizzes = storage
            .find_quiz_results(Some(student_id), None, Some(CONTEXT_QUIZ_LIMIT))
            .await?;
        let quiz_lines = quizzes
            .iter()
            .map(|q| {
                format!(
                    "- {}: {}/{} ({}%) on {}",
                    q.subject,
                    q.score,
                    q.total_marks,
                    q.percentage,
                    q.attempted_at.format("%a %b %d %Y")
                )
            })
            .collect::<Vec<_>>()
            .join("\n");

        // 全部历史考勤（1970-01-01 起）
        let records = storage
            .attendance_in_range(AttendanceRangeQuery {
                class_id: None,
                start_date: chrono::NaiveDate::default(),
                end_date: chrono::Utc::now().date_naive(),
            })
            .await?;
        let attendance_lines = student_status_counts(&records, student_id)
            .iter()
            .map(|c| format!("- {}: {} days", c.status.as_str(), c.count))
            .collect::<Vec<_>>()
            .join("\n");

        return Ok(format!(
            "Student: {name} (Class: {class})\n\n\
             Recent Quiz Performance:\n{quiz_lines}\n\n\
             Attendance Summary:\n{attendance_lines}"
        ));
    }

    if let Some(class_id) = body.class_id {
        let students = storage.list_class_students(class_id).await?;
        return Ok(format!(
            "Class {} has {} students.",
            class_id,
            students.len()
        ));
    }

    Ok(String::new())
}

pub fn query_prompt(context: &str, query: &str) -> String {
    format!(
        "You are an educational AI assistant helping teachers analyze student data.\n\n\
         Context:\n{context}\n\n\
         Teacher's Question: {query}\n\n\
         Provide a helpful, concise response based on the data. If specific data isn't available, mention that."
    )
}

pub async fn ai_query(
    service: &PerformanceService,
    request: &HttpRequest,
    body: AiQueryRequest,
) -> ActixResult<HttpResponse> {
    let caller = current_user(request)?;
    if let Err(errors) = body.validate() {
        return Ok(validation_response(errors));
    }
    let storage = service.get_storage(request)?;
    let ai = service.get_ai(request)?;

    let context = match build_context(storage.as_ref(), &body).await {
        Ok(context) => context,
        Err(e) => return Ok(error_response(&e)),
    };

    let options = GenerationOptions::default().with_temperature(QUERY_TEMPERATURE);
    match ai
        .generate_text(&query_prompt(&context, body.query.trim()), &options)
        .await
    {
        Ok(response) => {
            info!("AI query answered for {}", caller.id);
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                AiQueryResponse {
                    response,
                    context_used: context,
                },
                "Query answered",
            )))
        }
        Err(e) => Ok(error_response(&e)),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use actix_web::http::StatusCode;

    use super::*;
    use crate::ai::AiGenerator;
    use crate::ai::tests::ScriptedGenerator;
    use crate::services::performance::records::tests::fixture;
    use crate::services::tests::{authed_request, body_json};
    use crate::storage::sea_orm_storage::new_result;

    fn query(student_id: Option<i64>, class_id: Option<i64>) -> AiQueryRequest {
        AiQueryRequest {
            query: "How are they doing?".into(),
            student_id,
            class_id,
        }
    }

    #[tokio::test]
    async fn test_student_context_lists_quizzes() {
        let f = fixture().await;
        f.storage
            .create_quiz_result(new_result(f.students[0].id, "Physics", 7))
            .await
            .expect("result");
        let context = build_context(f.storage.as_ref(), &query(Some(f.students[0].id), None))
            .await
            .expect("context");
        assert!(context.starts_with("Student: Anu (Class: "));
        assert!(context.contains("- Physics: 7/10 (70%)"));
    }

    #[tokio::test]
    async fn test_class_context_counts_students() {
        let f = fixture().await;
        let context = build_context(f.storage.as_ref(), &query(None, Some(f.class_id)))
            .await
            .expect("context");
        assert_eq!(context, format!("Class {} has 3 students.", f.class_id));
    }

    #[tokio::test]
    async fn test_reply_and_temperature() {
        let f = fixture().await;
        let scripted = Arc::new(ScriptedGenerator::replying("Class is on track."));
        let ai: Arc<dyn AiGenerator> = scripted.clone();
        let request = authed_request(&f.teacher, f.storage.clone(), Some(ai), None);
        let response = ai_query(
            &PerformanceService::new_lazy(),
            &request,
            query(None, Some(f.class_id)),
        )
        .await
        .expect("handled");
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["data"]["response"], "Class is on track.");
        let options = scripted.options.lock().expect("lock");
        assert_eq!(options[0].temperature, Some(QUERY_TEMPERATURE));
    }

    #[tokio::test]
    async fn test_generation_failure_is_server_error() {
        let f = fixture().await;
        let ai: Arc<dyn AiGenerator> = Arc::new(ScriptedGenerator::failing());
        let request = authed_request(&f.teacher, f.storage.clone(), Some(ai), None);
        let response = ai_query(&PerformanceService::new_lazy(), &request, query(None, None))
            .await
            .expect("handled");
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let json = body_json(response).await;
        assert_eq!(json["message"], "provider unavailable");
    }
}
