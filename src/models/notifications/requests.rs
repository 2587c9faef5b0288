use serde::Deserialize;
use ts_rs::TS;

use super::entities::{NotificationPriority, NotificationType, RelatedEntity};
use crate::models::common::{FieldError, FieldErrors};

// 通知列表查询参数
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/notification.ts")]
pub struct NotificationQueryParams {
    pub page: Option<i64>,
    pub size: Option<i64>,
    pub unread_only: Option<bool>,
}

// 创建通知请求（可一次发送给多人）
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/notification.ts")]
pub struct CreateNotificationRequest {
    pub recipient_ids: Vec<i64>,
    pub notification_type: NotificationType,
    pub title: String,
    pub message: String,
    #[serde(default)]
    pub priority: NotificationPriority,
    pub related: Option<RelatedEntity>,
    pub expires_at: Option<chrono::DateTime<chrono::Utc>>,
}

impl CreateNotificationRequest {
    pub fn validate(&self) -> Result<(), Vec<FieldError>> {
        let mut errors = FieldErrors::new();
        errors.check(
            !self.recipient_ids.is_empty(),
            "recipient_ids",
            "At least one recipient is required",
        );
        errors.check(!self.title.trim().is_empty(), "title", "Title is required");
        errors.check(
            !self.message.trim().is_empty(),
            "message",
            "Message is required",
        );
        errors.into_result()
    }

    /// 展开为每个接收者一条；多于一人时生成共享的 bulk_id
    pub fn into_new_notifications(self, sender_id: i64) -> Vec<NewNotification> {
        let mut recipients = self.recipient_ids;
        recipients.sort_unstable();
        recipients.dedup();
        let bulk_id = (recipients.len() > 1).then(|| uuid::Uuid::new_v4().to_string());
        recipients
            .into_iter()
            .map(|recipient_id| NewNotification {
                recipient_id,
                notification_type: self.notification_type,
                title: self.title.clone(),
                message: self.message.clone(),
                priority: self.priority,
                related: self.related.clone(),
                sender_id: Some(sender_id),
                bulk_id: bulk_id.clone(),
                expires_at: self.expires_at,
            })
            .collect()
    }
}

// 待写入的通知
#[derive(Debug, Clone)]
pub struct NewNotification {
    pub recipient_id: i64,
    pub notification_type: NotificationType,
    pub title: String,
    pub message: String,
    pub priority: NotificationPriority,
    pub related: Option<RelatedEntity>,
    pub sender_id: Option<i64>,
    pub bulk_id: Option<String>,
    pub expires_at: Option<chrono::DateTime<chrono::Utc>>,
}
