//! AI 会话存储操作

use super::{SeaOrmStorage, fetch_paginated};
use crate::entity::ai_conversations::{ActiveModel, Column, Entity as Conversations};
use crate::errors::{Result, SchoolHubError};
use crate::models::{
    PaginatedResponse,
    conversations::{
        entities::{Conversation, ConversationThread},
        requests::{ConversationListQuery, NewConversation},
    },
};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};

/// 消息列表与计数一起写入
fn apply_thread(model: &mut ActiveModel, thread: &ConversationThread) -> Result<()> {
    let stats = thread.stats();
    model.messages = Set(serde_json::to_string(thread.messages())?);
    model.total_messages = Set(stats.total_messages);
    model.total_tokens_used = Set(stats.total_tokens_used);
    model.voice_queries = Set(stats.voice_queries);
    Ok(())
}

impl SeaOrmStorage {
    /// 创建会话
    pub async fn create_conversation_impl(&self, req: NewConversation) -> Result<Conversation> {
        let now = chrono::Utc::now().timestamp();
        let last_activity = req
            .thread
            .messages()
            .last()
            .map_or(now, |m| m.timestamp.timestamp());

        let mut model = ActiveModel {
            user_id: Set(req.user_id),
            conversation_type: Set(req.conversation_type.as_str().to_string()),
            context_class_id: Set(req.context.class_id),
            context_subject_id: Set(req.context.subject_id),
            context_student_id: Set(req.context.student_id),
            title: Set(req.title),
            is_active: Set(true),
            last_activity: Set(last_activity),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };
        apply_thread(&mut model, &req.thread)?;

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("创建会话失败: {e}")))?;

        Ok(result.into_conversation())
    }

    /// 通过 ID 获取会话
    pub async fn get_conversation_impl(&self, id: i64) -> Result<Option<Conversation>> {
        let result = Conversations::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("查询会话失败: {e}")))?;

        Ok(result.map(|m| m.into_conversation()))
    }

    /// 分页列出用户的会话（最近活动在前）
    pub async fn list_conversations_impl(
        &self,
        query: ConversationListQuery,
    ) -> Result<PaginatedResponse<Conversation>> {
        let mut select = Conversations::find()
            .filter(Column::UserId.eq(query.user_id))
            .filter(Column::IsActive.eq(true));

        if let Some(conversation_type) = query.conversation_type {
            select = select.filter(Column::ConversationType.eq(conversation_type.as_str()));
        }

        select = select
            .order_by_desc(Column::LastActivity)
            .order_by_desc(Column::Id);

        fetch_paginated(&self.db, select, query.page, query.size, "会话", |m| {
            m.into_conversation()
        })
        .await
    }

    /// 保存消息、计数、标题与最后活动时间（后写覆盖）
    pub async fn save_conversation_impl(&self, conversation: &Conversation) -> Result<Conversation> {
        let now = chrono::Utc::now().timestamp();

        let mut model = ActiveModel {
            id: Set(conversation.id),
            title: Set(conversation.title.clone()),
            is_active: Set(conversation.is_active),
            last_activity: Set(conversation.last_activity.timestamp()),
            updated_at: Set(now),
            ..Default::default()
        };
        apply_thread(&mut model, &conversation.thread)?;

        let result = model
            .update(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("保存会话失败: {e}")))?;

        Ok(result.into_conversation())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::conversations::entities::{
        ConversationContext, ConversationMessage, ConversationType, DEFAULT_CONVERSATION_TITLE,
        MessageMetadata,
    };
    use crate::models::users::entities::UserRole;
    use crate::storage::Storage;
    use crate::storage::sea_orm_storage::users::tests::new_user;

    #[tokio::test]
    async fn test_saved_thread_keeps_counters_and_title() {
        let storage = SeaOrmStorage::in_memory().await.expect("storage");
        let user = storage
            .create_user(new_user("Principal", UserRole::Management, None))
            .await
            .expect("user");

        let mut conversation = storage
            .create_conversation(NewConversation {
                user_id: user.id,
                conversation_type: ConversationType::General,
                context: ConversationContext::default(),
                title: DEFAULT_CONVERSATION_TITLE.to_string(),
                thread: ConversationThread::default(),
            })
            .await
            .expect("create");

        let now = chrono::Utc::now();
        conversation.add_message(ConversationMessage::user("Attendance today?".into(), now));
        conversation.add_message(ConversationMessage::assistant(
            "Most students are present.".into(),
            now,
            MessageMetadata {
                tokens_used: 12,
                model: "test-model".into(),
                response_time_ms: 40,
            },
        ));
        storage
            .save_conversation(&conversation)
            .await
            .expect("save");

        let reloaded = storage
            .get_conversation(conversation.id)
            .await
            .expect("query")
            .expect("exists");
        assert_eq!(reloaded.title, "Attendance today?");
        assert_eq!(reloaded.thread.stats().total_messages, 2);
        assert_eq!(reloaded.thread.stats().total_tokens_used, 12);
        assert_eq!(reloaded.thread.messages().len(), 2);

        let listed = storage
            .list_conversations(ConversationListQuery {
                page: None,
                size: None,
                user_id: user.id,
                conversation_type: None,
            })
            .await
            .expect("list");
        assert_eq!(listed.items.len(), 1);
    }
}
