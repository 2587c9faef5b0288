//! 通知实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "notifications")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub recipient_id: i64,
    pub notification_type: String,
    pub title: String,
    #[sea_orm(column_type = "Text")]
    pub message: String,
    pub priority: String,
    pub related_model: Option<String>,
    pub related_id: Option<i64>,
    pub sender_id: Option<i64>,
    pub is_read: bool,
    pub read_at: Option<i64>,
    pub bulk_id: Option<String>,
    pub expires_at: Option<i64>,
    pub created_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::RecipientId",
        to = "super::users::Column::Id"
    )]
    Recipient,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Recipient.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_notification(self) -> crate::models::notifications::entities::Notification {
        use crate::models::notifications::entities::{
            Notification, NotificationPriority, NotificationType, RelatedEntity,
        };

        let related = match (self.related_model, self.related_id) {
            (Some(model), Some(id)) => Some(RelatedEntity { model, id }),
            _ => None,
        };

        Notification {
            id: self.id,
            recipient_id: self.recipient_id,
            notification_type: self
                .notification_type
                .parse::<NotificationType>()
                .unwrap_or(NotificationType::System),
            title: self.title,
            message: self.message,
            priority: self
                .priority
                .parse::<NotificationPriority>()
                .unwrap_or_default(),
            related,
            sender_id: self.sender_id,
            is_read: self.is_read,
            read_at: self.read_at.map(super::to_datetime),
            bulk_id: self.bulk_id,
            expires_at: self.expires_at.map(super::to_datetime),
            created_at: super::to_datetime(self.created_at),
        }
    }
}
