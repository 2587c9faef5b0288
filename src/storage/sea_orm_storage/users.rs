//! 用户目录存储操作

use super::{SeaOrmStorage, fetch_paginated};
use crate::entity::users::{ActiveModel, Column, Entity as Users};
use crate::errors::{Result, SchoolHubError, map_write_error};
use crate::models::{
    PaginatedResponse,
    users::{
        entities::{User, UserRole},
        requests::{CreateUserRequest, UpdateUserRequest, UserListQuery},
    },
};
use crate::utils::escape_like_pattern;
use sea_orm::sea_query::LikeExpr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    Set,
};

impl SeaOrmStorage {
    /// 创建用户
    pub async fn create_user_impl(&self, req: CreateUserRequest) -> Result<User> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            name: Set(req.name.trim().to_string()),
            email: Set(req.email.trim().to_lowercase()),
            role: Set(req.role.to_string()),
            class_id: Set(req.class_id),
            roll_number: Set(req.roll_number),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| map_write_error(e, "创建用户失败", "Email already registered"))?;

        Ok(result.into_user())
    }

    /// 通过 ID 获取用户
    pub async fn get_user_by_id_impl(&self, id: i64) -> Result<Option<User>> {
        let result = Users::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("查询用户失败: {e}")))?;

        Ok(result.map(|m| m.into_user()))
    }

    /// 分页列出用户
    pub async fn list_users_impl(&self, query: UserListQuery) -> Result<PaginatedResponse<User>> {
        let mut select = Users::find();

        // 搜索条件
        if let Some(ref search) = query.search
            && !search.trim().is_empty()
        {
            let pattern = format!("%{}%", escape_like_pattern(search.trim()));
            select = select.filter(
                Condition::any()
                    .add(Column::Name.like(LikeExpr::new(pattern.clone()).escape('\\')))
                    .add(Column::Email.like(LikeExpr::new(pattern).escape('\\'))),
            );
        }

        // 角色筛选
        if let Some(role) = query.role {
            select = select.filter(Column::Role.eq(role.to_string()));
        }

        // 班级筛选
        if let Some(class_id) = query.class_id {
            select = select.filter(Column::ClassId.eq(class_id));
        }

        select = select.order_by_asc(Column::Name).order_by_asc(Column::Id);

        fetch_paginated(&self.db, select, query.page, query.size, "用户", |m| {
            m.into_user()
        })
        .await
    }

    /// 班级学生名册（按学号、姓名排序）
    pub async fn list_class_students_impl(&self, class_id: i64) -> Result<Vec<User>> {
        let students = Users::find()
            .filter(Column::ClassId.eq(class_id))
            .filter(Column::Role.eq(UserRole::STUDENT))
            .filter(Column::IsActive.eq(true))
            .order_by_asc(Column::RollNumber)
            .order_by_asc(Column::Name)
            .all(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("查询班级学生失败: {e}")))?;

        Ok(students.into_iter().map(|m| m.into_user()).collect())
    }

    /// 更新用户信息
    pub async fn update_user_impl(
        &self,
        id: i64,
        update: UpdateUserRequest,
    ) -> Result<Option<User>> {
        // 先检查用户是否存在
        let existing = self.get_user_by_id_impl(id).await?;
        if existing.is_none() {
            return Ok(None);
        }

        let now = chrono::Utc::now().timestamp();

        let mut model = ActiveModel {
            id: Set(id),
            updated_at: Set(now),
            ..Default::default()
        };

        if let Some(name) = update.name {
            model.name = Set(name.trim().to_string());
        }

        if let Some(email) = update.email {
            model.email = Set(email.trim().to_lowercase());
        }

        if let Some(role) = update.role {
            model.role = Set(role.to_string());
        }

        if let Some(class_id) = update.class_id {
            model.class_id = Set(Some(class_id));
        }

        if let Some(roll_number) = update.roll_number {
            model.roll_number = Set(Some(roll_number));
        }

        if let Some(is_active) = update.is_active {
            model.is_active = Set(is_active);
        }

        model
            .update(&self.db)
            .await
            .map_err(|e| map_write_error(e, "更新用户失败", "Email already registered"))?;

        self.get_user_by_id_impl(id).await
    }

    /// 删除用户
    pub async fn delete_user_impl(&self, id: i64) -> Result<bool> {
        let result = Users::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("删除用户失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    /// 统计用户数量
    pub async fn count_users_impl(&self) -> Result<u64> {
        Users::find()
            .count(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("统计用户数量失败: {e}")))
    }
}
