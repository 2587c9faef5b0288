//! 通知存储操作
//!
//! 过期通知不参与任何读取。

use super::{SeaOrmStorage, fetch_paginated};
use crate::entity::notifications::{ActiveModel, Column, Entity as Notifications};
use crate::errors::{Result, SchoolHubError};
use crate::models::{
    PaginatedResponse,
    notifications::{entities::Notification, requests::NewNotification},
};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    Set, TransactionTrait,
};

/// 未过期：没有过期时间或过期时间晚于当前
fn not_expired(now: i64) -> Condition {
    Condition::any()
        .add(Column::ExpiresAt.is_null())
        .add(Column::ExpiresAt.gt(now))
}

impl SeaOrmStorage {
    /// 批量创建通知（同一事务）
    pub async fn create_notifications_impl(
        &self,
        notifications: Vec<NewNotification>,
    ) -> Result<Vec<Notification>> {
        let now = chrono::Utc::now().timestamp();

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("开启事务失败: {e}")))?;

        let mut created = Vec::with_capacity(notifications.len());
        for req in notifications {
            let (related_model, related_id) = match req.related {
                Some(related) => (Some(related.model), Some(related.id)),
                None => (None, None),
            };

            let model = ActiveModel {
                recipient_id: Set(req.recipient_id),
                notification_type: Set(req.notification_type.as_str().to_string()),
                title: Set(req.title),
                message: Set(req.message),
                priority: Set(req.priority.as_str().to_string()),
                related_model: Set(related_model),
                related_id: Set(related_id),
                sender_id: Set(req.sender_id),
                is_read: Set(false),
                read_at: Set(None),
                bulk_id: Set(req.bulk_id),
                expires_at: Set(req.expires_at.map(|t| t.timestamp())),
                created_at: Set(now),
                ..Default::default()
            };

            let result = model
                .insert(&txn)
                .await
                .map_err(|e| SchoolHubError::database_operation(format!("创建通知失败: {e}")))?;
            created.push(result.into_notification());
        }

        txn.commit()
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(created)
    }

    /// 通过 ID 获取未过期通知
    pub async fn get_notification_impl(&self, id: i64, now: i64) -> Result<Option<Notification>> {
        let result = Notifications::find_by_id(id)
            .filter(not_expired(now))
            .one(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("查询通知失败: {e}")))?;

        Ok(result.map(|m| m.into_notification()))
    }

    /// 分页列出接收人的通知（最新在前）
    pub async fn list_notifications_impl(
        &self,
        recipient_id: i64,
        unread_only: bool,
        page: Option<i64>,
        size: Option<i64>,
        now: i64,
    ) -> Result<PaginatedResponse<Notification>> {
        let mut select = Notifications::find()
            .filter(Column::RecipientId.eq(recipient_id))
            .filter(not_expired(now));

        if unread_only {
            select = select.filter(Column::IsRead.eq(false));
        }

        select = select
            .order_by_desc(Column::CreatedAt)
            .order_by_desc(Column::Id);

        fetch_paginated(&self.db, select, page, size, "通知", |m| {
            m.into_notification()
        })
        .await
    }

    /// 未读数量
    pub async fn count_unread_notifications_impl(&self, recipient_id: i64, now: i64) -> Result<i64> {
        let count = Notifications::find()
            .filter(Column::RecipientId.eq(recipient_id))
            .filter(Column::IsRead.eq(false))
            .filter(not_expired(now))
            .count(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("统计未读通知失败: {e}")))?;

        Ok(count as i64)
    }

    /// 标记单条已读
    pub async fn mark_notification_read_impl(&self, id: i64, now: i64) -> Result<bool> {
        let result = Notifications::update_many()
            .col_expr(Column::IsRead, Expr::value(true))
            .col_expr(Column::ReadAt, Expr::value(now))
            .filter(Column::Id.eq(id))
            .filter(Column::IsRead.eq(false))
            .filter(not_expired(now))
            .exec(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("标记通知已读失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    /// 全部标记已读，返回标记数量
    pub async fn mark_all_notifications_read_impl(&self, recipient_id: i64, now: i64) -> Result<i64> {
        let result = Notifications::update_many()
            .col_expr(Column::IsRead, Expr::value(true))
            .col_expr(Column::ReadAt, Expr::value(now))
            .filter(Column::RecipientId.eq(recipient_id))
            .filter(Column::IsRead.eq(false))
            .filter(not_expired(now))
            .exec(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("批量标记已读失败: {e}")))?;

        Ok(result.rows_affected as i64)
    }

    /// 删除通知
    pub async fn delete_notification_impl(&self, id: i64) -> Result<bool> {
        let result = Notifications::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("删除通知失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    /// 清理接收人已过期的通知
    pub async fn purge_expired_notifications_impl(&self, recipient_id: i64, now: i64) -> Result<u64> {
        let result = Notifications::delete_many()
            .filter(Column::RecipientId.eq(recipient_id))
            .filter(Column::ExpiresAt.lte(now))
            .exec(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("清理过期通知失败: {e}")))?;

        Ok(result.rows_affected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::notifications::entities::{NotificationPriority, NotificationType};
    use crate::models::users::entities::UserRole;
    use crate::storage::Storage;
    use crate::storage::sea_orm_storage::users::tests::new_user;

    fn notice(recipient_id: i64, expires_at: Option<i64>) -> NewNotification {
        NewNotification {
            recipient_id,
            notification_type: NotificationType::Announcement,
            title: "Sports day".to_string(),
            message: "Friday".to_string(),
            priority: NotificationPriority::Medium,
            related: None,
            sender_id: None,
            bulk_id: None,
            expires_at: expires_at.and_then(|ts| chrono::DateTime::from_timestamp(ts, 0)),
        }
    }

    #[tokio::test]
    async fn test_expired_excluded_and_purged() {
        let storage = SeaOrmStorage::in_memory().await.expect("storage");
        let user = storage
            .create_user(new_user("Parent Proxy", UserRole::Student, None))
            .await
            .expect("user");
        let now = 1_800_000_000;

        let created = storage
            .create_notifications(vec![
                notice(user.id, None),
                notice(user.id, Some(now + 3600)),
                notice(user.id, Some(now - 1)),
            ])
            .await
            .expect("insert");
        assert_eq!(created.len(), 3);

        assert_eq!(
            storage
                .count_unread_notifications(user.id, now)
                .await
                .expect("count"),
            2
        );
        assert!(
            storage
                .get_notification(created[2].id, now)
                .await
                .expect("query")
                .is_none()
        );

        assert_eq!(
            storage
                .purge_expired_notifications(user.id, now)
                .await
                .expect("purge"),
            1
        );

        assert!(
            storage
                .mark_notification_read(created[0].id, now)
                .await
                .expect("mark")
        );
        // 已读的不再计数
        assert!(
            !storage
                .mark_notification_read(created[0].id, now)
                .await
                .expect("mark")
        );
        assert_eq!(
            storage
                .mark_all_notifications_read(user.id, now)
                .await
                .expect("mark all"),
            1
        );

        let unread = storage
            .list_notifications(user.id, true, None, None, now)
            .await
            .expect("list");
        assert!(unread.items.is_empty());
    }
}
