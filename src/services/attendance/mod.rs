pub mod aggregate;
pub mod delete;
pub mod list;
pub mod mark;
pub mod stats;
pub mod update;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use super::app_component;
use crate::models::attendance::entities::AttendanceRecord;
use crate::models::attendance::requests::{
    AttendanceQueryParams, AttendanceStatsParams, BulkMarkAttendanceRequest,
    MarkAttendanceRequest, UpdateAttendanceEntriesRequest,
};
use crate::models::{ApiResponse, ErrorCode};
use crate::storage::Storage;
use crate::utils::error_response;

pub struct AttendanceService {
    storage: Option<Arc<dyn Storage>>,
}

impl AttendanceService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> ActixResult<Arc<dyn Storage>> {
        match &self.storage {
            Some(storage) => Ok(storage.clone()),
            None => app_component::<dyn Storage>(request, "Storage"),
        }
    }

    // 记录考勤
    pub async fn mark_attendance(
        &self,
        request: &HttpRequest,
        body: MarkAttendanceRequest,
    ) -> ActixResult<HttpResponse> {
        mark::mark_attendance(self, request, body).await
    }

    // 全班批量记录
    pub async fn bulk_mark_attendance(
        &self,
        request: &HttpRequest,
        body: BulkMarkAttendanceRequest,
    ) -> ActixResult<HttpResponse> {
        mark::bulk_mark_attendance(self, request, body).await
    }

    pub async fn update_entries(
        &self,
        request: &HttpRequest,
        id: i64,
        body: UpdateAttendanceEntriesRequest,
    ) -> ActixResult<HttpResponse> {
        update::update_entries(self, request, id, body).await
    }

    pub async fn set_locked(
        &self,
        request: &HttpRequest,
        id: i64,
        locked: bool,
    ) -> ActixResult<HttpResponse> {
        update::set_locked(self, request, id, locked).await
    }

    pub async fn delete_attendance(
        &self,
        request: &HttpRequest,
        id: i64,
    ) -> ActixResult<HttpResponse> {
        delete::delete_attendance(self, request, id).await
    }

    pub async fn list_attendance(
        &self,
        request: &HttpRequest,
        query: AttendanceQueryParams,
    ) -> ActixResult<HttpResponse> {
        list::list_attendance(self, request, query).await
    }

    pub async fn get_attendance(&self, request: &HttpRequest, id: i64) -> ActixResult<HttpResponse> {
        list::get_attendance(self, request, id).await
    }

    // 学生或班级的出勤统计
    pub async fn get_stats(
        &self,
        request: &HttpRequest,
        query: AttendanceStatsParams,
    ) -> ActixResult<HttpResponse> {
        stats::get_stats(self, request, query).await
    }
}

/// 读取考勤记录，不存在时返回 404 响应
pub(crate) async fn load_attendance(
    storage: &dyn Storage,
    id: i64,
) -> Result<AttendanceRecord, HttpResponse> {
    match storage.get_attendance(id).await {
        Ok(Some(record)) => Ok(record),
        Ok(None) => Err(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::AttendanceNotFound,
            "Attendance record not found",
        ))),
        Err(e) => Err(error_response(&e)),
    }
}
