pub mod aggregate;
pub mod ai_query;
pub mod assessments;
pub mod records;
pub mod stats;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use super::app_component;
use crate::ai::AiGenerator;
use crate::models::performance::requests::{
    AddAssessmentRequest, AiQueryRequest, CreatePerformanceRecordRequest,
    PerformanceRecordQueryParams, PerformanceStatsParams,
};
use crate::storage::Storage;

pub struct PerformanceService {
    storage: Option<Arc<dyn Storage>>,
    ai: Option<Arc<dyn AiGenerator>>,
}

impl PerformanceService {
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

    // 测验成绩统计
    pub async fn get_stats(
        &self,
        request: &HttpRequest,
        query: PerformanceStatsParams,
    ) -> ActixResult<HttpResponse> {
        stats::get_stats(self, request, query).await
    }

    // 创建学期成绩记录
    pub async fn create_record(
        &self,
        request: &HttpRequest,
        body: CreatePerformanceRecordRequest,
    ) -> ActixResult<HttpResponse> {
        records::create_record(self, request, body).await
    }

    pub async fn get_record(&self, request: &HttpRequest, id: i64) -> ActixResult<HttpResponse> {
        records::get_record(self, request, id).await
    }

    // 学期成绩列表，限定到同班同科同学期时附带排名
    pub async fn list_records(
        &self,
        request: &HttpRequest,
        query: PerformanceRecordQueryParams,
    ) -> ActixResult<HttpResponse> {
        records::list_records(self, request, query).await
    }

    pub async fn add_assessment(
        &self,
        request: &HttpRequest,
        id: i64,
        body: AddAssessmentRequest,
    ) -> ActixResult<HttpResponse> {
        assessments::add_assessment(self, request, id, body).await
    }

    pub async fn remove_assessment(
        &self,
        request: &HttpRequest,
        id: i64,
        index: usize,
    ) -> ActixResult<HttpResponse> {
        assessments::remove_assessment(self, request, id, index).await
    }

    // 教职工用自然语言询问学生或班级情况
    pub async fn ai_query(
        &self,
        request: &HttpRequest,
        body: AiQueryRequest,
    ) -> ActixResult<HttpResponse> {
        ai_query::ai_query(self, request, body).await
    }
}
