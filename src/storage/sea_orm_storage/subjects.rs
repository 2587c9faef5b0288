//! 科目存储操作

use super::SeaOrmStorage;
use crate::entity::subjects::{ActiveModel, Column, Entity as Subjects};
use crate::errors::{Result, SchoolHubError, map_write_error};
use crate::models::subjects::{entities::Subject, requests::CreateSubjectRequest};
use sea_orm::{ActiveModelTrait, EntityTrait, QueryOrder, Set};

impl SeaOrmStorage {
    /// 创建科目（代码统一大写）
    pub async fn create_subject_impl(&self, req: CreateSubjectRequest) -> Result<Subject> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            name: Set(req.name.trim().to_string()),
            code: Set(req.code.trim().to_uppercase()),
            description: Set(req.description),
            subject_type: Set(req.subject_type.to_string()),
            max_marks: Set(req.max_marks),
            passing_marks: Set(req.passing_marks),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| map_write_error(e, "创建科目失败", "Subject code already exists"))?;

        Ok(result.into_subject())
    }

    /// 通过 ID 获取科目
    pub async fn get_subject_by_id_impl(&self, id: i64) -> Result<Option<Subject>> {
        let result = Subjects::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("查询科目失败: {e}")))?;

        Ok(result.map(|m| m.into_subject()))
    }

    /// 列出全部科目
    pub async fn list_subjects_impl(&self) -> Result<Vec<Subject>> {
        let subjects = Subjects::find()
            .order_by_asc(Column::Code)
            .all(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("查询科目列表失败: {e}")))?;

        Ok(subjects.into_iter().map(|m| m.into_subject()).collect())
    }
}
