use std::collections::HashSet;

use serde::Deserialize;
use ts_rs::TS;

use super::entities::{
    AttendanceEntry, AttendanceMethod, AttendanceSheet, AttendanceStatus, Session,
};
use crate::models::common::{FieldError, FieldErrors};

/// 统计默认区间：截至今天的最近 30 天
pub const DEFAULT_STATS_WINDOW_DAYS: i64 = 30;

// 单个学生的考勤输入
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/attendance.ts")]
pub struct AttendanceEntryInput {
    pub student_id: i64,
    pub status: AttendanceStatus,
    #[serde(default)]
    pub method: AttendanceMethod,
    pub confidence_score: Option<f64>,
    pub arrival_time: Option<chrono::NaiveTime>,
    pub remarks: Option<String>,
}

impl AttendanceEntryInput {
    pub fn into_entry(self, marked_at: chrono::DateTime<chrono::Utc>) -> AttendanceEntry {
        AttendanceEntry {
            student_id: self.student_id,
            status: self.status,
            marked_at,
            method: self.method,
            confidence_score: self.confidence_score,
            arrival_time: self.arrival_time,
            remarks: self.remarks,
        }
    }
}

/// 校验条目：学生不重复，置信度在 [0, 1]
fn check_entries(errors: &mut FieldErrors, field: &str, entries: &[AttendanceEntryInput]) {
    let mut seen = HashSet::new();
    if entries.iter().any(|e| !seen.insert(e.student_id)) {
        errors.push(field, "Each student may appear only once");
    }
    if entries
        .iter()
        .filter_map(|e| e.confidence_score)
        .any(|c| !(0.0..=1.0).contains(&c))
    {
        errors.push(field, "Confidence score must be between 0 and 1");
    }
}

// 记录考勤请求
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/attendance.ts")]
pub struct MarkAttendanceRequest {
    pub date: chrono::NaiveDate,
    pub class_id: i64,
    pub subject_id: Option<i64>,
    #[serde(default)]
    pub session: Session,
    pub entries: Vec<AttendanceEntryInput>,
    pub notes: Option<String>,
}

impl MarkAttendanceRequest {
    pub fn validate(&self) -> Result<(), Vec<FieldError>> {
        let mut errors = FieldErrors::new();
        check_entries(&mut errors, "entries", &self.entries);
        errors.into_result()
    }
}

// 批量记录考勤：全班默认状态，例外单独列出
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/attendance.ts")]
pub struct BulkMarkAttendanceRequest {
    pub date: chrono::NaiveDate,
    pub class_id: i64,
    pub subject_id: Option<i64>,
    #[serde(default)]
    pub session: Session,
    pub default_status: AttendanceStatus,
    #[serde(default)]
    pub exceptions: Vec<AttendanceEntryInput>,
    pub notes: Option<String>,
}

impl BulkMarkAttendanceRequest {
    pub fn validate(&self) -> Result<(), Vec<FieldError>> {
        let mut errors = FieldErrors::new();
        check_entries(&mut errors, "exceptions", &self.exceptions);
        errors.into_result()
    }

    /// 按班级学生名单展开为条目；不在名单中的例外被忽略
    pub fn expand(
        self,
        roster: &[i64],
        marked_at: chrono::DateTime<chrono::Utc>,
    ) -> Vec<AttendanceEntry> {
        let mut exceptions = self.exceptions;
        roster
            .iter()
            .map(|&student_id| {
                match exceptions.iter().position(|e| e.student_id == student_id) {
                    Some(pos) => exceptions.swap_remove(pos).into_entry(marked_at),
                    None => AttendanceEntry {
                        student_id,
                        status: self.default_status,
                        marked_at,
                        method: AttendanceMethod::Manual,
                        confidence_score: None,
                        arrival_time: None,
                        remarks: None,
                    },
                }
            })
            .collect()
    }
}

// 更新考勤条目（整体替换）
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/attendance.ts")]
pub struct UpdateAttendanceEntriesRequest {
    pub entries: Vec<AttendanceEntryInput>,
    pub notes: Option<String>,
}

impl UpdateAttendanceEntriesRequest {
    pub fn validate(&self) -> Result<(), Vec<FieldError>> {
        let mut errors = FieldErrors::new();
        check_entries(&mut errors, "entries", &self.entries);
        errors.into_result()
    }
}

// 考勤列表查询参数（来自HTTP请求）
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/attendance.ts")]
pub struct AttendanceQueryParams {
    pub page: Option<i64>,
    pub size: Option<i64>,
    pub class_id: Option<i64>,
    pub session: Option<Session>,
    pub start_date: Option<chrono::NaiveDate>,
    pub end_date: Option<chrono::NaiveDate>,
}

// 考勤统计查询参数
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/attendance.ts")]
pub struct AttendanceStatsParams {
    pub student_id: Option<i64>,
    pub class_id: Option<i64>,
    pub start_date: Option<chrono::NaiveDate>,
    pub end_date: Option<chrono::NaiveDate>,
}

/// 解析统计区间（闭区间）；缺省为截至今天的最近 30 天
pub fn resolve_date_range(
    start: Option<chrono::NaiveDate>,
    end: Option<chrono::NaiveDate>,
    today: chrono::NaiveDate,
) -> Result<(chrono::NaiveDate, chrono::NaiveDate), Vec<FieldError>> {
    let end = end.unwrap_or(today);
    let start = start.unwrap_or(end - chrono::Duration::days(DEFAULT_STATS_WINDOW_DAYS));
    let mut errors = FieldErrors::new();
    errors.check(
        start <= end,
        "start_date",
        "Start date must not be after end date",
    );
    errors.into_result().map(|_| (start, end))
}

// 考勤查询参数（用于存储层）
#[derive(Debug, Clone, Default)]
pub struct AttendanceListQuery {
    pub page: Option<i64>,
    pub size: Option<i64>,
    pub class_id: Option<i64>,
    pub session: Option<Session>,
    pub start_date: Option<chrono::NaiveDate>,
    pub end_date: Option<chrono::NaiveDate>,
}

// 区间读取（统计用，不分页）
#[derive(Debug, Clone)]
pub struct AttendanceRangeQuery {
    pub class_id: Option<i64>,
    pub start_date: chrono::NaiveDate,
    pub end_date: chrono::NaiveDate,
}

// 待写入的考勤记录
#[derive(Debug, Clone)]
pub struct NewAttendance {
    pub date: chrono::NaiveDate,
    pub class_id: i64,
    pub subject_id: Option<i64>,
    pub session: Session,
    pub sheet: AttendanceSheet,
    pub marked_by: i64,
    pub notes: Option<String>,
}
