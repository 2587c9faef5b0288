use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::QuizService;
use super::grading::{generate_feedback, grade_quiz};
use crate::models::ApiResponse;
use crate::models::quizzes::requests::{NewQuizResult, SubmitQuizRequest};
use crate::services::current_user;
use crate::utils::{error_response, validation_response};

pub async fn submit_quiz(
    service: &QuizService,
    request: &HttpRequest,
    body: SubmitQuizRequest,
) -> ActixResult<HttpResponse> {
    let caller = current_user(request)?;
    if let Err(errors) = body.validate() {
        return Ok(validation_response(errors));
    }
    let storage = service.get_storage(request)?;
    let ai = service.get_ai(request)?;

    let graded = grade_quiz(&body.questions, &body.answers);
    let ai_feedback = generate_feedback(ai.as_ref(), &graded, body.topic()).await;

    let result = NewQuizResult {
        student_id: caller.id,
        class_id: caller.class_id,
        resource_id: body.resource_id,
        quiz_topic: body.quiz_topic,
        subject: body.subject,
        score: graded.score,
        total_marks: graded.total_marks,
        percentage: graded.percentage,
        answers: graded.answers,
        ai_feedback,
    };

    match storage.create_quiz_result(result).await {
        Ok(saved) => {
            info!(
                "Student {} scored {}/{} on {}",
                caller.id, saved.score, saved.total_marks, saved.subject
            );
            Ok(HttpResponse::Created().json(ApiResponse::success(saved, "Quiz submitted")))
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
    use crate::models::quizzes::requests::QuizResultListQuery;
    use crate::models::users::entities::UserRole;
    use crate::services::quizzes::grading::FALLBACK_ENCOURAGEMENT;
    use crate::services::tests::{authed_request, body_json};
    use crate::storage::Storage;
    use crate::storage::sea_orm_storage::{SeaOrmStorage, new_user};

    fn submission(json: &str) -> SubmitQuizRequest {
        serde_json::from_str(json).expect("valid submission")
    }

    #[tokio::test]
    async fn test_submit_persists_graded_result() {
        let storage: Arc<dyn Storage> = Arc::new(SeaOrmStorage::in_memory().await.expect("db"));
        let student = storage
            .create_user(new_user("Asha", UserRole::Student, None))
            .await
            .expect("student");
        let ai: Arc<dyn AiGenerator> = Arc::new(ScriptedGenerator::failing());
        let request = authed_request(&student, storage.clone(), Some(ai), None);

        let body = submission(
            r#"{"subject":"Science","quiz_topic":"Matter","questions":[
                {"id":1,"question":"Q1","correct_answer":"A"},
                {"id":2,"question":"Q2","correct_answer":"B"},
                {"id":3,"question":"Q3","correct_answer":"C"}],
              "answers":[
                {"question_id":1,"student_answer":"A"},
                {"question_id":2,"student_answer":"C"},
                {"question_id":7,"student_answer":"C"}]}"#,
        );
        let response = submit_quiz(&QuizService::new_lazy(), &request, body)
            .await
            .expect("handled");
        assert_eq!(response.status(), StatusCode::CREATED);
        let json = body_json(response).await;
        assert_eq!(json["data"]["score"], 1);
        assert_eq!(json["data"]["total_marks"], 3);
        assert_eq!(json["data"]["percentage"], 33);
        assert_eq!(json["data"]["ai_feedback"], FALLBACK_ENCOURAGEMENT);

        let stored = storage
            .list_quiz_results(QuizResultListQuery {
                student_id: Some(student.id),
                ..Default::default()
            })
            .await
            .expect("list");
        assert_eq!(stored.items.len(), 1);
        assert_eq!(stored.items[0].answers.len(), 2);
    }

    #[tokio::test]
    async fn test_empty_question_set_rejected() {
        let storage: Arc<dyn Storage> = Arc::new(SeaOrmStorage::in_memory().await.expect("db"));
        let student = storage
            .create_user(new_user("Ravi", UserRole::Student, None))
            .await
            .expect("student");
        let ai: Arc<dyn AiGenerator> = Arc::new(ScriptedGenerator::replying("unused"));
        let request = authed_request(&student, storage, Some(ai), None);

        let body = submission(r#"{"subject":"Science","questions":[],"answers":[]}"#);
        let response = submit_quiz(&QuizService::new_lazy(), &request, body)
            .await
            .expect("handled");
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
