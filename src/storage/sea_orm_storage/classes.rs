//! 班级存储操作

use super::SeaOrmStorage;
use crate::entity::classes::{ActiveModel, Column, Entity as Classes};
use crate::errors::{Result, SchoolHubError, map_write_error};
use crate::models::classes::{
    entities::{Class, normalize_schedule},
    requests::{ClassListQuery, CreateClassRequest, UpdateClassRequest},
};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};

/// 默认班级容量
const DEFAULT_MAX_STRENGTH: i32 = 50;

const DUPLICATE_CLASS: &str = "Class already exists for this grade, section and academic year";

impl SeaOrmStorage {
    /// 创建班级（请求需已 normalize）
    pub async fn create_class_impl(&self, req: CreateClassRequest) -> Result<Class> {
        let now = chrono::Utc::now().timestamp();

        let name = req
            .name
            .unwrap_or_else(|| format!("Class {}-{}", req.grade, req.section));
        let academic_year = req.academic_year.ok_or_else(|| {
            SchoolHubError::validation("academic_year must be set before calling create_class")
        })?;

        let model = ActiveModel {
            name: Set(name),
            grade: Set(req.grade),
            section: Set(req.section),
            academic_year: Set(academic_year),
            class_teacher_id: Set(req.class_teacher_id),
            subject_teachers: Set(serde_json::to_string(
                &req.subject_teachers.unwrap_or_default(),
            )?),
            schedule: Set(serde_json::to_string(&normalize_schedule(
                req.schedule.unwrap_or_default(),
            ))?),
            room_number: Set(req.room_number),
            max_strength: Set(req.max_strength.unwrap_or(DEFAULT_MAX_STRENGTH)),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| map_write_error(e, "创建班级失败", DUPLICATE_CLASS))?;

        Ok(result.into_class())
    }

    /// 通过 ID 获取班级
    pub async fn get_class_by_id_impl(&self, class_id: i64) -> Result<Option<Class>> {
        let result = Classes::find_by_id(class_id)
            .one(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("查询班级失败: {e}")))?;

        Ok(result.map(|m| m.into_class()))
    }

    /// 按条件列出班级（年级、班别排序）
    pub async fn list_classes_impl(&self, query: ClassListQuery) -> Result<Vec<Class>> {
        let mut select = Classes::find();

        if let Some(grade) = query.grade {
            select = select.filter(Column::Grade.eq(grade));
        }

        if let Some(section) = query.section {
            select = select.filter(Column::Section.eq(section));
        }

        if let Some(year) = query.academic_year {
            select = select.filter(Column::AcademicYear.eq(year));
        }

        if let Some(is_active) = query.is_active {
            select = select.filter(Column::IsActive.eq(is_active));
        }

        let classes = select
            .order_by_asc(Column::Grade)
            .order_by_asc(Column::Section)
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("查询班级列表失败: {e}")))?;

        Ok(classes.into_iter().map(|m| m.into_class()).collect())
    }

    /// 更新班级信息
    pub async fn update_class_impl(
        &self,
        class_id: i64,
        update: UpdateClassRequest,
    ) -> Result<Option<Class>> {
        // 先检查班级是否存在
        let existing = self.get_class_by_id_impl(class_id).await?;
        if existing.is_none() {
            return Ok(None);
        }

        let now = chrono::Utc::now().timestamp();

        let mut model = ActiveModel {
            id: Set(class_id),
            updated_at: Set(now),
            ..Default::default()
        };

        if let Some(name) = update.name {
            model.name = Set(name);
        }

        if let Some(grade) = update.grade {
            model.grade = Set(grade.trim().to_string());
        }

        if let Some(section) = update.section {
            model.section = Set(section.trim().to_uppercase());
        }

        if let Some(year) = update.academic_year {
            model.academic_year = Set(year);
        }

        if let Some(teacher_id) = update.class_teacher_id {
            model.class_teacher_id = Set(Some(teacher_id));
        }

        if let Some(subject_teachers) = update.subject_teachers {
            model.subject_teachers = Set(serde_json::to_string(&subject_teachers)?);
        }

        if let Some(schedule) = update.schedule {
            model.schedule = Set(serde_json::to_string(&normalize_schedule(schedule))?);
        }

        if let Some(room) = update.room_number {
            model.room_number = Set(Some(room));
        }

        if let Some(max) = update.max_strength {
            model.max_strength = Set(max);
        }

        if let Some(is_active) = update.is_active {
            model.is_active = Set(is_active);
        }

        model
            .update(&self.db)
            .await
            .map_err(|e| map_write_error(e, "更新班级失败", DUPLICATE_CLASS))?;

        self.get_class_by_id_impl(class_id).await
    }

    /// 删除班级
    pub async fn delete_class_impl(&self, class_id: i64) -> Result<bool> {
        let result = Classes::delete_by_id(class_id)
            .exec(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("删除班级失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::storage::Storage;

    pub(crate) fn new_class(grade: &str, section: &str) -> CreateClassRequest {
        CreateClassRequest {
            name: None,
            grade: grade.to_string(),
            section: section.to_string(),
            academic_year: Some("2026-2027".to_string()),
            class_teacher_id: None,
            subject_teachers: None,
            schedule: None,
            room_number: None,
            max_strength: None,
        }
    }

    #[tokio::test]
    async fn test_duplicate_class_triple_is_conflict() {
        let storage = SeaOrmStorage::in_memory().await.expect("storage");
        let class = storage
            .create_class(new_class("10", "A"))
            .await
            .expect("first insert");
        assert_eq!(class.name, "Class 10-A");
        assert_eq!(class.max_strength, DEFAULT_MAX_STRENGTH);

        let err = storage
            .create_class(new_class("10", "A"))
            .await
            .unwrap_err();
        assert!(matches!(err, SchoolHubError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_update_into_existing_triple_is_conflict() {
        let storage = SeaOrmStorage::in_memory().await.expect("storage");
        storage
            .create_class(new_class("10", "A"))
            .await
            .expect("insert");
        let other = storage
            .create_class(new_class("10", "B"))
            .await
            .expect("insert");

        let err = storage
            .update_class(
                other.id,
                UpdateClassRequest {
                    section: Some("a".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, SchoolHubError::Conflict(_)));

        let missing = storage
            .update_class(9999, UpdateClassRequest::default())
            .await
            .expect("update");
        assert!(missing.is_none());
    }
}
