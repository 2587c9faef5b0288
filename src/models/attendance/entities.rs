use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 出勤状态，声明顺序即统计输出顺序
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, TS)]
#[serde(rename_all = "kebab-case")]
#[ts(export, export_to = "../frontend/src/types/generated/attendance.ts")]
pub enum AttendanceStatus {
    Present,
    Absent,
    Late,
    Excused,
    HalfDay,
}

impl AttendanceStatus {
    pub const ALL: [AttendanceStatus; 5] = [
        AttendanceStatus::Present,
        AttendanceStatus::Absent,
        AttendanceStatus::Late,
        AttendanceStatus::Excused,
        AttendanceStatus::HalfDay,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AttendanceStatus::Present => "present",
            AttendanceStatus::Absent => "absent",
            AttendanceStatus::Late => "late",
            AttendanceStatus::Excused => "excused",
            AttendanceStatus::HalfDay => "half-day",
        }
    }
}

// 记录方式
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default, TS)]
#[serde(rename_all = "kebab-case")]
#[ts(export, export_to = "../frontend/src/types/generated/attendance.ts")]
pub enum AttendanceMethod {
    FaceRecognition,
    #[default]
    Manual,
    QrCode,
}

// 考勤时段
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/attendance.ts")]
pub enum Session {
    #[serde(rename = "morning")]
    Morning,
    #[serde(rename = "afternoon")]
    Afternoon,
    #[default]
    #[serde(rename = "full-day")]
    FullDay,
    #[serde(rename = "period-1")]
    Period1,
    #[serde(rename = "period-2")]
    Period2,
    #[serde(rename = "period-3")]
    Period3,
    #[serde(rename = "period-4")]
    Period4,
    #[serde(rename = "period-5")]
    Period5,
    #[serde(rename = "period-6")]
    Period6,
    #[serde(rename = "period-7")]
    Period7,
    #[serde(rename = "period-8")]
    Period8,
}

impl Session {
    pub fn as_str(&self) -> &'static str {
        match self {
            Session::Morning => "morning",
            Session::Afternoon => "afternoon",
            Session::FullDay => "full-day",
            Session::Period1 => "period-1",
            Session::Period2 => "period-2",
            Session::Period3 => "period-3",
            Session::Period4 => "period-4",
            Session::Period5 => "period-5",
            Session::Period6 => "period-6",
            Session::Period7 => "period-7",
            Session::Period8 => "period-8",
        }
    }
}

impl std::fmt::Display for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Session {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "morning" => Ok(Session::Morning),
            "afternoon" => Ok(Session::Afternoon),
            "full-day" => Ok(Session::FullDay),
            "period-1" => Ok(Session::Period1),
            "period-2" => Ok(Session::Period2),
            "period-3" => Ok(Session::Period3),
            "period-4" => Ok(Session::Period4),
            "period-5" => Ok(Session::Period5),
            "period-6" => Ok(Session::Period6),
            "period-7" => Ok(Session::Period7),
            "period-8" => Ok(Session::Period8),
            _ => Err(format!("Invalid session: {s}")),
        }
    }
}

// 单个学生的出勤条目
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/attendance.ts")]
pub struct AttendanceEntry {
    pub student_id: i64,
    pub status: AttendanceStatus,
    pub marked_at: chrono::DateTime<chrono::Utc>,
    #[serde(default)]
    pub method: AttendanceMethod,
    // [0, 1]
    pub confidence_score: Option<f64>,
    pub arrival_time: Option<chrono::NaiveTime>,
    pub remarks: Option<String>,
}

// 出勤汇总
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/attendance.ts")]
pub struct AttendanceSummary {
    pub total_students: i32,
    pub present: i32,
    pub absent: i32,
    pub late: i32,
    pub excused: i32,
    pub half_day: i32,
}

impl AttendanceSummary {
    fn scan(entries: &[AttendanceEntry]) -> Self {
        let count = |status: AttendanceStatus| {
            entries.iter().filter(|e| e.status == status).count() as i32
        };
        Self {
            total_students: entries.len() as i32,
            present: count(AttendanceStatus::Present),
            absent: count(AttendanceStatus::Absent),
            late: count(AttendanceStatus::Late),
            excused: count(AttendanceStatus::Excused),
            half_day: count(AttendanceStatus::HalfDay),
        }
    }
}

/// 出勤条目与汇总
///
/// 每次修改条目都会重新统计汇总，两者一同写入存储。
#[derive(Debug, Clone, Default, PartialEq, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/attendance.ts")]
pub struct AttendanceSheet {
    entries: Vec<AttendanceEntry>,
    summary: AttendanceSummary,
}

impl AttendanceSheet {
    pub fn from_entries(entries: Vec<AttendanceEntry>) -> Self {
        let summary = AttendanceSummary::scan(&entries);
        Self { entries, summary }
    }

    pub fn entries(&self) -> &[AttendanceEntry] {
        &self.entries
    }

    pub fn summary(&self) -> &AttendanceSummary {
        &self.summary
    }

    pub fn entry_for(&self, student_id: i64) -> Option<&AttendanceEntry> {
        self.entries.iter().find(|e| e.student_id == student_id)
    }

    pub fn replace_entries(&mut self, entries: Vec<AttendanceEntry>) {
        self.entries = entries;
        self.summary = AttendanceSummary::scan(&self.entries);
    }

    /// 已有该学生的条目时替换，否则追加
    pub fn upsert_entry(&mut self, entry: AttendanceEntry) {
        match self
            .entries
            .iter_mut()
            .find(|e| e.student_id == entry.student_id)
        {
            Some(existing) => *existing = entry,
            None => self.entries.push(entry),
        }
        self.summary = AttendanceSummary::scan(&self.entries);
    }

    /// 只保留某个学生的条目（学生查看自己的考勤）
    pub fn narrowed_to(&self, student_id: i64) -> Self {
        Self::from_entries(
            self.entries
                .iter()
                .filter(|e| e.student_id == student_id)
                .cloned()
                .collect(),
        )
    }
}

// 考勤记录：每个 (日期, 班级, 时段) 一条
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/attendance.ts")]
pub struct AttendanceRecord {
    pub id: i64,
    pub date: chrono::NaiveDate,
    pub class_id: i64,
    pub subject_id: Option<i64>,
    pub session: Session,
    #[serde(flatten)]
    pub sheet: AttendanceSheet,
    pub marked_by: i64,
    pub is_locked: bool,
    pub notes: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}
