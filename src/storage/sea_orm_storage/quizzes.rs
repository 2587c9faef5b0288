//! 测验成绩存储操作

use super::{SeaOrmStorage, fetch_paginated};
use crate::entity::quiz_results::{ActiveModel, Column, Entity as QuizResults};
use crate::errors::{Result, SchoolHubError};
use crate::models::{
    PaginatedResponse,
    quizzes::{
        entities::QuizResult,
        requests::{NewQuizResult, QuizResultListQuery},
    },
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, QuerySelect, Select, Set,
};

/// 按学生 / 班级过滤，最新在前
fn scoped_select(student_id: Option<i64>, class_id: Option<i64>) -> Select<QuizResults> {
    let mut select = QuizResults::find();

    if let Some(student_id) = student_id {
        select = select.filter(Column::StudentId.eq(student_id));
    }

    if let Some(class_id) = class_id {
        select = select.filter(Column::ClassId.eq(class_id));
    }

    select
        .order_by_desc(Column::AttemptedAt)
        .order_by_desc(Column::Id)
}

impl SeaOrmStorage {
    /// 写入一次测验成绩
    pub async fn create_quiz_result_impl(&self, req: NewQuizResult) -> Result<QuizResult> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            student_id: Set(req.student_id),
            class_id: Set(req.class_id),
            resource_id: Set(req.resource_id),
            quiz_topic: Set(req.quiz_topic),
            subject: Set(req.subject),
            score: Set(i64::from(req.score)),
            total_marks: Set(i64::from(req.total_marks)),
            percentage: Set(req.percentage),
            answers: Set(serde_json::to_string(&req.answers)?),
            ai_feedback: Set(req.ai_feedback),
            attempted_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("保存测验成绩失败: {e}")))?;

        Ok(result.into_quiz_result())
    }

    /// 分页列出测验成绩
    pub async fn list_quiz_results_impl(
        &self,
        query: QuizResultListQuery,
    ) -> Result<PaginatedResponse<QuizResult>> {
        let mut select = scoped_select(query.student_id, query.class_id);

        if let Some(ref subject) = query.subject
            && !subject.trim().is_empty()
        {
            select = select.filter(Column::Subject.eq(subject.trim()));
        }

        if let Some(from) = query.attempted_from {
            select = select.filter(Column::AttemptedAt.gte(from));
        }

        if let Some(to) = query.attempted_to {
            select = select.filter(Column::AttemptedAt.lte(to));
        }

        fetch_paginated(&self.db, select, query.page, query.size, "测验成绩", |m| {
            m.into_quiz_result()
        })
        .await
    }

    /// 聚合用：按学生 / 班级取测验成绩，最新在前
    pub async fn find_quiz_results_impl(
        &self,
        student_id: Option<i64>,
        class_id: Option<i64>,
        limit: Option<u64>,
    ) -> Result<Vec<QuizResult>> {
        let results = scoped_select(student_id, class_id)
            .limit(limit)
            .all(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("查询测验成绩失败: {e}")))?;

        Ok(results.into_iter().map(|m| m.into_quiz_result()).collect())
    }
}
