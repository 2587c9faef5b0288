//! AI 会话实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "ai_conversations")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub user_id: i64,
    pub conversation_type: String,
    pub context_class_id: Option<i64>,
    pub context_subject_id: Option<i64>,
    pub context_student_id: Option<i64>,
    pub title: String,
    // JSON: 消息列表
    #[sea_orm(column_type = "Text")]
    pub messages: String,
    pub total_messages: i64,
    pub total_tokens_used: i64,
    pub voice_queries: i64,
    pub is_active: bool,
    pub last_activity: i64,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id"
    )]
    User,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_conversation(self) -> crate::models::conversations::entities::Conversation {
        use crate::models::conversations::entities::{
            Conversation, ConversationContext, ConversationStats, ConversationThread,
            ConversationType,
        };

        Conversation {
            id: self.id,
            user_id: self.user_id,
            conversation_type: self
                .conversation_type
                .parse::<ConversationType>()
                .unwrap_or_default(),
            context: ConversationContext {
                class_id: self.context_class_id,
                subject_id: self.context_subject_id,
                student_id: self.context_student_id,
            },
            title: self.title,
            thread: ConversationThread::restore(
                super::from_json_column(&self.messages),
                ConversationStats {
                    total_messages: self.total_messages,
                    total_tokens_used: self.total_tokens_used,
                    voice_queries: self.voice_queries,
                },
            ),
            is_active: self.is_active,
            last_activity: super::to_datetime(self.last_activity),
            created_at: super::to_datetime(self.created_at),
            updated_at: super::to_datetime(self.updated_at),
        }
    }
}
