use serde::Serialize;
use ts_rs::TS;

use super::entities::AttendanceStatus;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/attendance.ts")]
pub struct StatusCount {
    pub status: AttendanceStatus,
    pub count: i64,
}

// 班级考勤统计，基于记录中保存的汇总
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/attendance.ts")]
pub struct ClassAttendanceStats {
    pub total_days: i64,
    pub avg_present: f64,
    pub avg_absent: f64,
}

// 考勤统计
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[serde(tag = "scope", rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/attendance.ts")]
pub enum AttendanceStatsResponse {
    Student {
        student_id: i64,
        start_date: chrono::NaiveDate,
        end_date: chrono::NaiveDate,
        counts: Vec<StatusCount>,
    },
    Class {
        class_id: i64,
        start_date: chrono::NaiveDate,
        end_date: chrono::NaiveDate,
        total_days: i64,
        avg_present: f64,
        avg_absent: f64,
    },
}
