pub mod grading;
pub mod list;
pub mod submit;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use super::app_component;
use crate::ai::AiGenerator;
use crate::models::quizzes::requests::{QuizResultQueryParams, SubmitQuizRequest};
use crate::storage::Storage;

pub struct QuizService {
    storage: Option<Arc<dyn Storage>>,
    ai: Option<Arc<dyn AiGenerator>>,
}

impl QuizService {
    pub fn new_lazy() -> Self {
        Self {
            storage: None,
            ai: None,
        }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> ActixResult<Arc<dyn Storage>> {
        match &self.storage {
            Some(storage) => Ok(storage.clone()),
            None => app_component::<dyn Storage>(request, "Storage"),
        }
    }

    pub(crate) fn get_ai(&self, request: &HttpRequest) -> ActixResult<Arc<dyn AiGenerator>> {
        match &self.ai {
            Some(ai) => Ok(ai.clone()),
            None => app_component::<dyn AiGenerator>(request, "AI generator"),
        }
    }

    // 学生提交测验
    pub async fn submit_quiz(
        &self,
        request: &HttpRequest,
        body: SubmitQuizRequest,
    ) -> ActixResult<HttpResponse> {
        submit::submit_quiz(self, request, body).await
    }

    // 测验成绩列表
    pub async fn list_quiz_results(
        &self,
        request: &HttpRequest,
        query: QuizResultQueryParams,
    ) -> ActixResult<HttpResponse> {
        list::list_quiz_results(self, request, query).await
    }
}
