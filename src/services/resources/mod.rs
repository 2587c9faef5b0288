pub mod delete;
pub mod generate;
pub mod list;
pub mod upload;

use actix_multipart::Multipart;
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use super::app_component;
use crate::ai::AiGenerator;
use crate::config::{AppConfig, UploadConfig};
use crate::extraction::TextExtractor;
use crate::models::resources::entities::Resource;
use crate::models::resources::requests::{
    GenerateLessonPlanRequest, GenerateQuizRequest, ResourceQueryParams,
};
use crate::models::{ApiResponse, ErrorCode};
use crate::storage::Storage;
use crate::utils::error_response;

pub struct ResourceService {
    storage: Option<Arc<dyn Storage>>,
}

impl ResourceService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> ActixResult<Arc<dyn Storage>> {
        match &self.storage {
            Some(storage) => Ok(storage.clone()),
            None => app_component::<dyn Storage>(request, "Storage"),
        }
    }

    pub(crate) fn get_ai(&self, request: &HttpRequest) -> ActixResult<Arc<dyn AiGenerator>> {
        app_component::<dyn AiGenerator>(request, "AI generator")
    }

    pub(crate) fn get_extractor(
        &self,
        request: &HttpRequest,
    ) -> ActixResult<Arc<dyn TextExtractor>> {
        app_component::<dyn TextExtractor>(request, "Text extractor")
    }

    pub(crate) fn upload_config(&self) -> UploadConfig {
        AppConfig::get().upload.clone()
    }

    // 上传课程资料
    pub async fn upload_resource(
        &self,
        request: &HttpRequest,
        payload: Multipart,
    ) -> ActixResult<HttpResponse> {
        upload::upload_resource(self, request, payload).await
    }

    pub async fn list_resources(
        &self,
        request: &HttpRequest,
        query: ResourceQueryParams,
    ) -> ActixResult<HttpResponse> {
        list::list_resources(self, request, query).await
    }

    pub async fn get_resource(&self, request: &HttpRequest, id: i64) -> ActixResult<HttpResponse> {
        list::get_resource(self, request, id).await
    }

    // 根据资料生成测验
    pub async fn generate_quiz(
        &self,
        request: &HttpRequest,
        id: i64,
        body: GenerateQuizRequest,
    ) -> ActixResult<HttpResponse> {
        generate::generate_quiz(self, request, id, body).await
    }

    // 根据资料生成教案
    pub async fn generate_lesson_plan(
        &self,
        request: &HttpRequest,
        id: i64,
        body: GenerateLessonPlanRequest,
    ) -> ActixResult<HttpResponse> {
        generate::generate_lesson_plan(self, request, id, body).await
    }

    pub async fn delete_resource(
        &self,
        request: &HttpRequest,
        id: i64,
    ) -> ActixResult<HttpResponse> {
        delete::delete_resource(self, request, id).await
    }
}

pub(crate) async fn load_resource(storage: &dyn Storage, id: i64) -> Result<Resource, HttpResponse> {
    match storage.get_resource_by_id(id).await {
        Ok(Some(resource)) => Ok(resource),
        Ok(None) => Err(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::ResourceNotFound,
            "Resource not found",
        ))),
        Err(e) => Err(error_response(&e)),
    }
}
