//! 根据资料全文生成测验与教案

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{ResourceService, load_resource};
use crate::ai::GenerationOptions;
use crate::errors::SchoolHubError;
use crate::models::resources::entities::{GeneratedQuiz, Resource, ResourceType};
use crate::models::resources::requests::{
    GenerateLessonPlanRequest, GenerateQuizRequest, NewResource,
};
use crate::models::resources::responses::{LessonPlanResponse, QuizGenerationResponse};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::current_user;
use crate::storage::Storage;
use crate::utils::error_response;

/// 提示词中最多使用的资料字符数
pub const CONTENT_CHAR_LIMIT: usize = 8000;
const GENERATION_TEMPERATURE: f32 = 0.7;

fn content_excerpt(text: &str) -> String {
    text.chars().take(CONTENT_CHAR_LIMIT).collect()
}

pub fn quiz_prompt(excerpt: &str, body: &GenerateQuizRequest) -> String {
    format!(
        r#"Based on the following educational content, generate {} multiple choice questions with {} difficulty level.

Content:
{}

Please generate a JSON response with the following structure:
{{
  "quiz_title": "Quiz on [Topic]",
  "questions": [
    {{
      "id": 1,
      "question": "Question text",
      "options": ["A) Option 1", "B) Option 2", "C) Option 3", "D) Option 4"],
      "correct_answer": "A",
      "explanation": "Brief explanation"
    }}
  ]
}}"#,
        body.num_questions, body.difficulty, excerpt
    )
}

pub fn lesson_plan_prompt(excerpt: &str, subject: &str, body: &GenerateLessonPlanRequest) -> String {
    format!(
        r#"Based on the following curriculum content, create a detailed lesson plan for {grade} grade students with a duration of {duration}.

Content:
{excerpt}

Please create a comprehensive lesson plan in JSON format with:
{{
  "title": "Lesson title",
  "subject": "{subject}",
  "grade_level": "{grade}",
  "duration": "{duration}",
  "learning_objectives": ["objective 1", "objective 2"],
  "materials_needed": ["material 1", "material 2"],
  "lesson_outline": [
    {{
      "phase": "Introduction",
      "duration": "5 minutes",
      "activities": ["Activity description"],
      "teacher_notes": "Notes for teacher"
    }}
  ],
  "assessment_methods": ["method 1", "method 2"],
  "homework": "Homework assignment description"
}}"#,
        grade = body.grade_level,
        duration = body.duration,
    )
}

/// 读取资料与全文；没有全文时无法生成
async fn load_source(
    storage: &dyn Storage,
    id: i64,
) -> Result<(Resource, String), HttpResponse> {
    let resource = load_resource(storage, id).await?;
    match storage.get_resource_text(id).await {
        Ok(Some(text)) if !text.trim().is_empty() => Ok((resource, text)),
        Ok(_) => Err(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::ResourceTextMissing,
            "No text content available to generate from",
        ))),
        Err(e) => Err(error_response(&e)),
    }
}

pub async fn generate_quiz(
    service: &ResourceService,
    request: &HttpRequest,
    id: i64,
    body: GenerateQuizRequest,
) -> ActixResult<HttpResponse> {
    let caller = current_user(request)?;
    let storage = service.get_storage(request)?;
    let ai = service.get_ai(request)?;

    let (resource, text) = match load_source(storage.as_ref(), id).await {
        Ok(source) => source,
        Err(response) => return Ok(response),
    };

    let options = GenerationOptions::default().with_temperature(GENERATION_TEMPERATURE);
    let generated = match ai
        .generate_structured(&quiz_prompt(&content_excerpt(&text), &body), &options)
        .await
    {
        Ok(value) => value,
        Err(e) => return Ok(error_response(&e)),
    };
    let quiz: GeneratedQuiz = match serde_json::from_value(generated.clone()) {
        Ok(quiz) => quiz,
        Err(e) => {
            return Ok(error_response(&SchoolHubError::generation(format!(
                "Generated quiz has an unexpected shape: {e}"
            ))));
        }
    };

    if let Err(e) = storage
        .set_resource_generated_content(resource.id, generated.to_string())
        .await
    {
        return Ok(error_response(&e));
    }
    info!(
        "Quiz with {} questions generated from resource {} by {}",
        quiz.questions.len(),
        resource.id,
        caller.id
    );
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        QuizGenerationResponse {
            resource_id: resource.id,
            subject: resource.subject,
            quiz,
        },
        "Quiz generated",
    )))
}

/// 教案保存为调用者名下新的 lesson-plan 资料
pub async fn generate_lesson_plan(
    service: &ResourceService,
    request: &HttpRequest,
    id: i64,
    body: GenerateLessonPlanRequest,
) -> ActixResult<HttpResponse> {
    let caller = current_user(request)?;
    let storage = service.get_storage(request)?;
    let ai = service.get_ai(request)?;

    let (source, text) = match load_source(storage.as_ref(), id).await {
        Ok(source) => source,
        Err(response) => return Ok(response),
    };

    let options = GenerationOptions::default().with_temperature(GENERATION_TEMPERATURE);
    let prompt = lesson_plan_prompt(&content_excerpt(&text), &source.subject, &body);
    let lesson_plan = match ai.generate_structured(&prompt, &options).await {
        Ok(value) => value,
        Err(e) => return Ok(error_response(&e)),
    };
    let plan_title = lesson_plan
        .get("title")
        .and_then(|t| t.as_str())
        .unwrap_or(&source.title);

    let plan = NewResource {
        owner_id: caller.id,
        subject: source.subject.clone(),
        title: format!("Lesson Plan: {plan_title}"),
        resource_type: ResourceType::LessonPlan,
        class_id: source.class_id,
        generated_content: Some(lesson_plan.to_string()),
        ..Default::default()
    };
    match storage.create_resource(plan).await {
        Ok(resource) => {
            info!(
                "Lesson plan {} generated from resource {} by {}",
                resource.id, source.id, caller.id
            );
            Ok(HttpResponse::Created().json(ApiResponse::success(
                LessonPlanResponse {
                    resource,
                    lesson_plan,
                },
                "Lesson plan generated",
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
    use crate::models::users::entities::{User, UserRole};
    use crate::services::tests::{authed_request, body_json};
    use crate::storage::sea_orm_storage::{SeaOrmStorage, new_user};

    const QUIZ_REPLY: &str = r#"```json
{"quiz_title":"Quiz on Cells","questions":[{"id":1,"question":"Basic unit of life?","options":["A) Cell","B) Atom"],"correct_answer":"A","explanation":"Cells make up organisms"}]}
```"#;

    async fn setup(text: Option<String>) -> (Arc<dyn Storage>, User, i64) {
        let storage: Arc<dyn Storage> = Arc::new(SeaOrmStorage::in_memory().await.expect("db"));
        let teacher = storage
            .create_user(new_user("Anand", UserRole::Teacher, None))
            .await
            .expect("teacher");
        let resource = storage
            .create_resource(NewResource {
                owner_id: teacher.id,
                subject: "Biology".into(),
                title: "Cells".into(),
                class_id: Some(3),
                extracted_text: text,
                ..Default::default()
            })
            .await
            .expect("resource");
        (storage, teacher, resource.id)
    }

    #[tokio::test]
    async fn test_quiz_uses_excerpt_and_stores_content() {
        let long_text = format!("{}{}", "a".repeat(CONTENT_CHAR_LIMIT), "TAIL");
        let (storage, teacher, id) = setup(Some(long_text)).await;
        let generator = Arc::new(ScriptedGenerator::replying(QUIZ_REPLY));
        let ai: Arc<dyn AiGenerator> = generator.clone();
        let request = authed_request(&teacher, storage.clone(), Some(ai), None);

        let response = generate_quiz(
            &ResourceService::new_lazy(),
            &request,
            id,
            GenerateQuizRequest::default(),
        )
        .await
        .expect("handled");
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["data"]["subject"], "Biology");
        assert_eq!(json["data"]["quiz"]["quiz_title"], "Quiz on Cells");

        let prompt = generator.last_prompt();
        assert!(prompt.contains("generate 5 multiple choice questions with medium difficulty"));
        assert!(!prompt.contains("TAIL"));

        let stored = storage
            .get_resource_by_id(id)
            .await
            .expect("query")
            .expect("resource");
        let content = stored.generated_content.expect("generated content");
        assert_eq!(content["questions"][0]["correct_answer"], "A");
    }

    #[tokio::test]
    async fn test_missing_text_and_bad_shape() {
        let (storage, teacher, id) = setup(None).await;
        let ai: Arc<dyn AiGenerator> = Arc::new(ScriptedGenerator::replying(QUIZ_REPLY));
        let request = authed_request(&teacher, storage, Some(ai), None);
        let response = generate_quiz(
            &ResourceService::new_lazy(),
            &request,
            id,
            GenerateQuizRequest::default(),
        )
        .await
        .expect("handled");
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let (storage, teacher, id) = setup(Some("Cells".into())).await;
        let ai: Arc<dyn AiGenerator> = Arc::new(ScriptedGenerator::replying(r#"{"title":"x"}"#));
        let request = authed_request(&teacher, storage, Some(ai), None);
        let response = generate_quiz(
            &ResourceService::new_lazy(),
            &request,
            id,
            GenerateQuizRequest::default(),
        )
        .await
        .expect("handled");
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_lesson_plan_saved_as_new_resource() {
        let (storage, teacher, id) = setup(Some("Mitochondria produce energy.".into())).await;
        let generator = Arc::new(ScriptedGenerator::replying(
            r#"{"title":"Energy in cells","learning_objectives":["Explain respiration"]}"#,
        ));
        let ai: Arc<dyn AiGenerator> = generator.clone();
        let request = authed_request(&teacher, storage, Some(ai), None);

        let response = generate_lesson_plan(
            &ResourceService::new_lazy(),
            &request,
            id,
            GenerateLessonPlanRequest::default(),
        )
        .await
        .expect("handled");
        assert_eq!(response.status(), StatusCode::CREATED);
        let json = body_json(response).await;
        assert_eq!(json["data"]["resource"]["title"], "Lesson Plan: Energy in cells");
        assert_eq!(json["data"]["resource"]["resource_type"], "lesson-plan");
        assert_eq!(json["data"]["resource"]["class_id"], 3);
        assert_eq!(json["data"]["lesson_plan"]["learning_objectives"][0], "Explain respiration");
        assert!(generator.last_prompt().contains("for 10th grade students with a duration of 45 minutes"));
    }

    #[tokio::test]
    async fn test_generation_failure_surfaces_message() {
        let (storage, teacher, id) = setup(Some("Cells".into())).await;
        let ai: Arc<dyn AiGenerator> = Arc::new(ScriptedGenerator::failing());
        let request = authed_request(&teacher, storage, Some(ai), None);
        let response = generate_lesson_plan(
            &ResourceService::new_lazy(),
            &request,
            id,
            GenerateLessonPlanRequest::default(),
        )
        .await
        .expect("handled");
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let json = body_json(response).await;
        assert_eq!(json["message"], "provider unavailable");
    }
}
