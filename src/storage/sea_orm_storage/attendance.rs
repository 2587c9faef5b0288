//! 考勤存储操作

use super::{SeaOrmStorage, fetch_paginated};
use crate::entity::attendances::{ActiveModel, Column, DATE_FORMAT, Entity as Attendances};
use crate::errors::{Result, SchoolHubError, map_write_error};
use crate::models::{
    PaginatedResponse,
    attendance::{
        entities::{AttendanceRecord, AttendanceSheet, AttendanceSummary},
        requests::{AttendanceListQuery, AttendanceRangeQuery, NewAttendance},
    },
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Select, Set,
};

const DUPLICATE_ATTENDANCE: &str =
    "Attendance already marked for this class, date and session";

fn date_key(date: chrono::NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// 条目与汇总列一起写入
fn apply_sheet(model: &mut ActiveModel, sheet: &AttendanceSheet) -> Result<()> {
    let summary = sheet.summary();
    model.entries = Set(serde_json::to_string(sheet.entries())?);
    model.total_students = Set(i64::from(summary.total_students));
    model.present = Set(i64::from(summary.present));
    model.absent = Set(i64::from(summary.absent));
    model.late = Set(i64::from(summary.late));
    model.excused = Set(i64::from(summary.excused));
    model.half_day = Set(i64::from(summary.half_day));
    Ok(())
}

fn range_select(query: &AttendanceRangeQuery) -> Select<Attendances> {
    let mut select = Attendances::find()
        .filter(Column::Date.gte(date_key(query.start_date)))
        .filter(Column::Date.lte(date_key(query.end_date)));

    if let Some(class_id) = query.class_id {
        select = select.filter(Column::ClassId.eq(class_id));
    }

    select.order_by_asc(Column::Date).order_by_asc(Column::Id)
}

impl SeaOrmStorage {
    /// 写入考勤记录，(date, class, session) 重复时返回冲突
    pub async fn create_attendance_impl(&self, req: NewAttendance) -> Result<AttendanceRecord> {
        let now = chrono::Utc::now().timestamp();

        let mut model = ActiveModel {
            date: Set(date_key(req.date)),
            class_id: Set(req.class_id),
            subject_id: Set(req.subject_id),
            session: Set(req.session.to_string()),
            marked_by: Set(req.marked_by),
            is_locked: Set(false),
            notes: Set(req.notes),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };
        apply_sheet(&mut model, &req.sheet)?;

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| map_write_error(e, "保存考勤失败", DUPLICATE_ATTENDANCE))?;

        Ok(result.into_attendance_record())
    }

    /// 通过 ID 获取考勤记录
    pub async fn get_attendance_impl(&self, id: i64) -> Result<Option<AttendanceRecord>> {
        let result = Attendances::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("查询考勤失败: {e}")))?;

        Ok(result.map(|m| m.into_attendance_record()))
    }

    /// 分页列出考勤记录（日期倒序）
    pub async fn list_attendance_impl(
        &self,
        query: AttendanceListQuery,
    ) -> Result<PaginatedResponse<AttendanceRecord>> {
        let mut select = Attendances::find();

        if let Some(class_id) = query.class_id {
            select = select.filter(Column::ClassId.eq(class_id));
        }

        if let Some(session) = query.session {
            select = select.filter(Column::Session.eq(session.as_str()));
        }

        if let Some(start) = query.start_date {
            select = select.filter(Column::Date.gte(date_key(start)));
        }

        if let Some(end) = query.end_date {
            select = select.filter(Column::Date.lte(date_key(end)));
        }

        select = select.order_by_desc(Column::Date).order_by_desc(Column::Id);

        fetch_paginated(&self.db, select, query.page, query.size, "考勤", |m| {
            m.into_attendance_record()
        })
        .await
    }

    /// 区间内的完整考勤记录（学生统计用）
    pub async fn attendance_in_range_impl(
        &self,
        query: AttendanceRangeQuery,
    ) -> Result<Vec<AttendanceRecord>> {
        let records = range_select(&query)
            .all(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("查询考勤区间失败: {e}")))?;

        Ok(records
            .into_iter()
            .map(|m| m.into_attendance_record())
            .collect())
    }

    /// 区间内的汇总列（班级统计用，不解析条目）
    pub async fn attendance_summaries_in_range_impl(
        &self,
        query: AttendanceRangeQuery,
    ) -> Result<Vec<AttendanceSummary>> {
        let records = range_select(&query)
            .all(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("查询考勤汇总失败: {e}")))?;

        Ok(records.iter().map(|m| m.stored_summary()).collect())
    }

    /// 保存条目、汇总、锁定状态与备注
    pub async fn save_attendance_impl(&self, record: &AttendanceRecord) -> Result<AttendanceRecord> {
        let now = chrono::Utc::now().timestamp();

        let mut model = ActiveModel {
            id: Set(record.id),
            is_locked: Set(record.is_locked),
            notes: Set(record.notes.clone()),
            updated_at: Set(now),
            ..Default::default()
        };
        apply_sheet(&mut model, &record.sheet)?;

        let result = model
            .update(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("保存考勤失败: {e}")))?;

        Ok(result.into_attendance_record())
    }

    /// 删除考勤记录
    pub async fn delete_attendance_impl(&self, id: i64) -> Result<bool> {
        let result = Attendances::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("删除考勤失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }
}
