pub mod count;
pub mod create;
pub mod delete;
pub mod list;
pub mod read;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use super::app_component;
use crate::models::notifications::entities::Notification;
use crate::models::notifications::requests::{CreateNotificationRequest, NotificationQueryParams};
use crate::models::users::entities::User;
use crate::models::{ApiResponse, ErrorCode};
use crate::storage::Storage;
use crate::utils::error_response;

pub struct NotificationService {
    storage: Option<Arc<dyn Storage>>,
}

impl NotificationService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> ActixResult<Arc<dyn Storage>> {
        match &self.storage {
            Some(storage) => Ok(storage.clone()),
            None => app_component::<dyn Storage>(request, "Storage"),
        }
    }

    // 当前用户的通知列表
    pub async fn list_notifications(
        &self,
        request: &HttpRequest,
        query: NotificationQueryParams,
    ) -> ActixResult<HttpResponse> {
        list::list_notifications(self, request, query).await
    }

    // 未读数量
    pub async fn get_unread_count(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        count::get_unread_count(self, request).await
    }

    pub async fn mark_read(&self, request: &HttpRequest, id: i64) -> ActixResult<HttpResponse> {
        read::mark_read(self, request, id).await
    }

    pub async fn mark_all_read(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        read::mark_all_read(self, request).await
    }

    pub async fn delete_notification(
        &self,
        request: &HttpRequest,
        id: i64,
    ) -> ActixResult<HttpResponse> {
        delete::delete_notification(self, request, id).await
    }

    // 教职工发送通知
    pub async fn create_notifications(
        &self,
        request: &HttpRequest,
        body: CreateNotificationRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_notifications(self, request, body).await
    }
}

/// 读取调用者自己的未过期通知；别人的通知同样视为不存在
pub(crate) async fn load_own_notification(
    storage: &dyn Storage,
    caller: &User,
    id: i64,
    now: i64,
) -> Result<Notification, HttpResponse> {
    match storage.get_notification(id, now).await {
        Ok(Some(notification)) if notification.recipient_id == caller.id => Ok(notification),
        Ok(_) => Err(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::NotificationNotFound,
            "Notification not found",
        ))),
        Err(e) => Err(error_response(&e)),
    }
}
