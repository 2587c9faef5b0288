//! 课程资料存储操作

use super::{SeaOrmStorage, fetch_paginated};
use crate::entity::resources::{ActiveModel, Column, Entity as Resources};
use crate::errors::{Result, SchoolHubError};
use crate::models::{
    PaginatedResponse,
    resources::{
        entities::Resource,
        requests::{NewResource, ResourceListQuery},
    },
};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};

impl SeaOrmStorage {
    /// 创建资料
    pub async fn create_resource_impl(&self, req: NewResource) -> Result<Resource> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            owner_id: Set(req.owner_id),
            subject: Set(req.subject),
            title: Set(req.title),
            description: Set(req.description),
            resource_type: Set(req.resource_type.to_string()),
            class_id: Set(req.class_id),
            file_path: Set(req.file_path),
            file_name: Set(req.file_name),
            file_size: Set(req.file_size),
            mime_type: Set(req.mime_type),
            extracted_text: Set(req.extracted_text),
            generated_content: Set(req.generated_content),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("创建资料失败: {e}")))?;

        Ok(result.into_resource())
    }

    /// 通过 ID 获取资料
    pub async fn get_resource_by_id_impl(&self, id: i64) -> Result<Option<Resource>> {
        let result = Resources::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("查询资料失败: {e}")))?;

        Ok(result.map(|m| m.into_resource()))
    }

    /// 读取资料的提取文本（仅生成操作使用）
    pub async fn get_resource_text_impl(&self, id: i64) -> Result<Option<String>> {
        let result = Resources::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("查询资料文本失败: {e}")))?;

        Ok(result
            .and_then(|m| m.extracted_text)
            .filter(|text| !text.trim().is_empty()))
    }

    /// 分页列出资料
    pub async fn list_resources_impl(
        &self,
        query: ResourceListQuery,
    ) -> Result<PaginatedResponse<Resource>> {
        let mut select = Resources::find();

        if let Some(owner_id) = query.owner_id {
            select = select.filter(Column::OwnerId.eq(owner_id));
        }

        if let Some(ref subject) = query.subject
            && !subject.trim().is_empty()
        {
            select = select.filter(Column::Subject.eq(subject.trim()));
        }

        if let Some(resource_type) = query.resource_type {
            select = select.filter(Column::ResourceType.eq(resource_type.as_str()));
        }

        if let Some(class_id) = query.class_id {
            select = select.filter(Column::ClassId.eq(class_id));
        }

        select = select
            .order_by_desc(Column::CreatedAt)
            .order_by_desc(Column::Id);

        fetch_paginated(&self.db, select, query.page, query.size, "资料", |m| {
            m.into_resource()
        })
        .await
    }

    /// 保存生成内容（JSON 文本）
    pub async fn set_resource_generated_content_impl(
        &self,
        id: i64,
        content: String,
    ) -> Result<bool> {
        let now = chrono::Utc::now().timestamp();

        let result = Resources::update_many()
            .col_expr(
                Column::GeneratedContent,
                sea_orm::sea_query::Expr::value(content),
            )
            .col_expr(Column::UpdatedAt, sea_orm::sea_query::Expr::value(now))
            .filter(Column::Id.eq(id))
            .exec(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("保存生成内容失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    /// 删除资料记录
    pub async fn delete_resource_impl(&self, id: i64) -> Result<bool> {
        let result = Resources::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("删除资料失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }
}
