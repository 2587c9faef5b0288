pub mod create;
pub mod delete;
pub mod get;
pub mod list;
pub mod students;
pub mod update;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use super::app_component;
use crate::config::AppConfig;
use crate::models::classes::requests::{
    AddStudentRequest, ClassQueryParams, CreateClassRequest, UpdateClassRequest,
};
use crate::policy::EmptyClassFallback;
use crate::storage::Storage;

pub struct ClassService {
    storage: Option<Arc<dyn Storage>>,
    fallback: Option<EmptyClassFallback>,
}

impl ClassService {
    pub fn new_lazy() -> Self {
        Self {
            storage: None,
            fallback: None,
        }
    }

    #[cfg(test)]
    pub(crate) fn with_fallback(fallback: EmptyClassFallback) -> Self {
        Self {
            storage: None,
            fallback: Some(fallback),
        }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> ActixResult<Arc<dyn Storage>> {
        match &self.storage {
            Some(storage) => Ok(storage.clone()),
            None => app_component::<dyn Storage>(request, "Storage"),
        }
    }

    /// 教师无班级时的回退策略，默认读取配置
    pub(crate) fn fallback(&self) -> EmptyClassFallback {
        self.fallback
            .unwrap_or_else(|| EmptyClassFallback::from(&AppConfig::get().policy))
    }

    // 获取班级列表
    pub async fn list_classes(
        &self,
        request: &HttpRequest,
        query: ClassQueryParams,
    ) -> ActixResult<HttpResponse> {
        list::list_classes(self, request, query).await
    }

    pub async fn create_class(
        &self,
        request: &HttpRequest,
        class_data: CreateClassRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_class(self, request, class_data).await
    }

    // 根据班级 ID 获取班级信息
    pub async fn get_class(&self, request: &HttpRequest, class_id: i64) -> ActixResult<HttpResponse> {
        get::get_class(self, request, class_id).await
    }

    // 更新班级信息
    pub async fn update_class(
        &self,
        request: &HttpRequest,
        class_id: i64,
        update_data: UpdateClassRequest,
    ) -> ActixResult<HttpResponse> {
        update::update_class(self, request, class_id, update_data).await
    }

    // 根据班级 ID 删除班级
    pub async fn delete_class(
        &self,
        request: &HttpRequest,
        class_id: i64,
    ) -> ActixResult<HttpResponse> {
        delete::delete_class(self, request, class_id).await
    }

    // 班级的在读学生
    pub async fn list_students(
        &self,
        request: &HttpRequest,
        class_id: i64,
    ) -> ActixResult<HttpResponse> {
        students::list_students(self, request, class_id).await
    }

    // 把学生加入班级
    pub async fn add_student(
        &self,
        request: &HttpRequest,
        class_id: i64,
        body: AddStudentRequest,
    ) -> ActixResult<HttpResponse> {
        students::add_student(self, request, class_id, body).await
    }
}
