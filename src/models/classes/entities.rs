use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 科目与任课教师
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/class.ts")]
pub struct SubjectTeacher {
    pub subject_id: i64,
    pub teacher_id: i64,
}

// 上课日
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export, export_to = "../frontend/src/types/generated/class.ts")]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
}

// 课节
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/class.ts")]
pub struct Period {
    pub period_number: i32,
    pub start_time: String,
    pub end_time: String,
    pub subject_id: Option<i64>,
    pub teacher_id: Option<i64>,
}

// 某一天的课表
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/class.ts")]
pub struct DaySchedule {
    pub day: Weekday,
    pub periods: Vec<Period>,
}

/// 课表按星期排序，课节按节次排序
pub fn normalize_schedule(mut schedule: Vec<DaySchedule>) -> Vec<DaySchedule> {
    schedule.sort_by_key(|d| d.day);
    for day in &mut schedule {
        day.periods.sort_by_key(|p| p.period_number);
    }
    schedule
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/class.ts")]
pub struct Class {
    // 班级ID
    pub id: i64,
    // 班级名称
    pub name: String,
    pub grade: String,
    // 班别（大写）
    pub section: String,
    // 学年，格式 YYYY-YYYY
    pub academic_year: String,
    // 班主任
    pub class_teacher_id: Option<i64>,
    pub subject_teachers: Vec<SubjectTeacher>,
    pub schedule: Vec<DaySchedule>,
    pub room_number: Option<String>,
    pub max_strength: i32,
    pub is_active: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl Class {
    /// 教师是否执教本班：班主任、任课教师或课表中的授课教师
    pub fn is_taught_by(&self, teacher_id: i64) -> bool {
        self.class_teacher_id == Some(teacher_id)
            || self
                .subject_teachers
                .iter()
                .any(|st| st.teacher_id == teacher_id)
            || self
                .schedule
                .iter()
                .flat_map(|day| day.periods.iter())
                .any(|p| p.teacher_id == Some(teacher_id))
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn sample_class(id: i64, name: &str, section: &str) -> Class {
        Class {
            id,
            name: name.to_string(),
            grade: "10".to_string(),
            section: section.to_string(),
            academic_year: "2025-2026".to_string(),
            class_teacher_id: None,
            subject_teachers: vec![],
            schedule: vec![],
            room_number: None,
            max_strength: 40,
            is_active: true,
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        }
    }

    #[test]
    fn test_taught_by_class_teacher() {
        let mut class = sample_class(1, "Class 10-A", "A");
        class.class_teacher_id = Some(7);
        assert!(class.is_taught_by(7));
        assert!(!class.is_taught_by(8));
    }

    #[test]
    fn test_taught_by_subject_or_period_teacher() {
        let mut class = sample_class(1, "Class 10-A", "A");
        class.subject_teachers.push(SubjectTeacher {
            subject_id: 3,
            teacher_id: 11,
        });
        class.schedule.push(DaySchedule {
            day: Weekday::Friday,
            periods: vec![Period {
                period_number: 2,
                start_time: "09:00".into(),
                end_time: "09:45".into(),
                subject_id: Some(4),
                teacher_id: Some(12),
            }],
        });
        assert!(class.is_taught_by(11));
        assert!(class.is_taught_by(12));
        assert!(!class.is_taught_by(13));
    }

    #[test]
    fn test_normalize_schedule_orders_days_and_periods() {
        let period = |n| Period {
            period_number: n,
            start_time: String::new(),
            end_time: String::new(),
            subject_id: None,
            teacher_id: None,
        };
        let schedule = normalize_schedule(vec![
            DaySchedule {
                day: Weekday::Wednesday,
                periods: vec![period(3), period(1)],
            },
            DaySchedule {
                day: Weekday::Monday,
                periods: vec![],
            },
        ]);
        assert_eq!(schedule[0].day, Weekday::Monday);
        let numbers: Vec<i32> = schedule[1].periods.iter().map(|p| p.period_number).collect();
        assert_eq!(numbers, vec![1, 3]);
    }
}
