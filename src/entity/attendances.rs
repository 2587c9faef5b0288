//! 考勤实体
//!
//! (date, class_id, session) 上有唯一索引；汇总列随条目一起写入。

use sea_orm::entity::prelude::*;

/// 日期以 YYYY-MM-DD 文本存储，字典序即日期序
pub const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "attendances")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub date: String,
    pub class_id: i64,
    pub subject_id: Option<i64>,
    pub session: String,
    // JSON: 考勤条目
    #[sea_orm(column_type = "Text")]
    pub entries: String,
    pub total_students: i64,
    pub present: i64,
    pub absent: i64,
    pub late: i64,
    pub excused: i64,
    pub half_day: i64,
    pub marked_by: i64,
    pub is_locked: bool,
    #[sea_orm(column_type = "Text", nullable)]
    pub notes: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::classes::Entity",
        from = "Column::ClassId",
        to = "super::classes::Column::Id"
    )]
    Class,
}

impl Related<super::classes::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Class.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_attendance_record(self) -> crate::models::attendance::entities::AttendanceRecord {
        use crate::models::attendance::entities::{AttendanceRecord, AttendanceSheet, Session};

        AttendanceRecord {
            id: self.id,
            date: chrono::NaiveDate::parse_from_str(&self.date, DATE_FORMAT).unwrap_or_default(),
            class_id: self.class_id,
            subject_id: self.subject_id,
            session: self.session.parse::<Session>().unwrap_or_default(),
            sheet: AttendanceSheet::from_entries(super::from_json_column(&self.entries)),
            marked_by: self.marked_by,
            is_locked: self.is_locked,
            notes: self.notes,
            created_at: super::to_datetime(self.created_at),
            updated_at: super::to_datetime(self.updated_at),
        }
    }

    /// 班级统计直接使用保存的汇总列
    pub fn stored_summary(&self) -> crate::models::attendance::entities::AttendanceSummary {
        crate::models::attendance::entities::AttendanceSummary {
            total_students: self.total_students as i32,
            present: self.present as i32,
            absent: self.absent as i32,
            late: self.late as i32,
            excused: self.excused as i32,
            half_day: self.half_day as i32,
        }
    }
}
