//! 考勤统计

use crate::models::attendance::entities::{AttendanceRecord, AttendanceStatus, AttendanceSummary};
use crate::models::attendance::responses::{ClassAttendanceStats, StatusCount};
use crate::services::performance::aggregate::round2;

/// 某个学生在各记录中的出勤状态计数，只列出出现过的状态，按状态声明顺序
pub fn student_status_counts(records: &[AttendanceRecord], student_id: i64) -> Vec<StatusCount> {
    let mut counts = [0i64; AttendanceStatus::ALL.len()];
    for entry in records
        .iter()
        .flat_map(|r| r.sheet.entries())
        .filter(|e| e.student_id == student_id)
    {
        if let Some(slot) = AttendanceStatus::ALL.iter().position(|s| *s == entry.status) {
            counts[slot] += 1;
        }
    }
    AttendanceStatus::ALL
        .iter()
        .zip(counts)
        .filter(|(_, count)| *count > 0)
        .map(|(status, count)| StatusCount {
            status: *status,
            count,
        })
        .collect()
}

/// 班级统计，直接使用记录中保存的汇总
pub fn class_stats(summaries: &[AttendanceSummary]) -> ClassAttendanceStats {
    if summaries.is_empty() {
        return ClassAttendanceStats {
            total_days: 0,
            avg_present: 0.0,
            avg_absent: 0.0,
        };
    }
    let days = summaries.len() as f64;
    let present: i64 = summaries.iter().map(|s| i64::from(s.present)).sum();
    let absent: i64 = summaries.iter().map(|s| i64::from(s.absent)).sum();
    ClassAttendanceStats {
        total_days: summaries.len() as i64,
        avg_present: round2(present as f64 / days),
        avg_absent: round2(absent as f64 / days),
    }
}
