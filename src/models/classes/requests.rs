use chrono::Datelike;
use serde::Deserialize;
use ts_rs::TS;

use super::entities::{DaySchedule, SubjectTeacher};
use crate::models::common::{FieldError, FieldErrors};
use crate::utils::validate::validate_academic_year;

// 班级查询参数（来自HTTP请求）
#[derive(Debug, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/class.ts")]
pub struct ClassQueryParams {
    pub grade: Option<String>,
    pub section: Option<String>,
    pub academic_year: Option<String>,
    pub is_active: Option<bool>,
    /// 教师跨班业务（如考勤）需要完整班级列表时传 true
    pub all: Option<bool>,
}

// 创建班级请求
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/class.ts")]
pub struct CreateClassRequest {
    // 不填写时使用 "Class {grade}-{section}"
    pub name: Option<String>,
    pub grade: String,
    pub section: String,
    // 不填写时使用当前学年
    pub academic_year: Option<String>,
    pub class_teacher_id: Option<i64>,
    pub subject_teachers: Option<Vec<SubjectTeacher>>,
    pub schedule: Option<Vec<DaySchedule>>,
    pub room_number: Option<String>,
    pub max_strength: Option<i32>,
}

impl CreateClassRequest {
    /// 补全默认值：班别大写、默认名称、默认学年
    pub fn normalize(mut self, today: chrono::NaiveDate) -> Self {
        self.grade = self.grade.trim().to_string();
        self.section = self.section.trim().to_uppercase();
        if self
            .name
            .as_ref()
            .is_none_or(|name| name.trim().is_empty())
        {
            self.name = Some(format!("Class {}-{}", self.grade, self.section));
        }
        if self.academic_year.is_none() {
            self.academic_year = Some(current_academic_year(today));
        }
        self
    }

    pub fn validate(&self) -> Result<(), Vec<FieldError>> {
        let mut errors = FieldErrors::new();
        errors.check(!self.grade.trim().is_empty(), "grade", "Grade is required");
        errors.check(
            !self.section.trim().is_empty(),
            "section",
            "Section is required",
        );
        if let Some(year) = &self.academic_year
            && let Err(msg) = validate_academic_year(year)
        {
            errors.push("academic_year", msg);
        }
        if let Some(max) = self.max_strength {
            errors.check(max > 0, "max_strength", "Max strength must be positive");
        }
        errors.into_result()
    }
}

/// 学年从当前年份开始，例如 2026 年返回 "2026-2027"
pub fn current_academic_year(today: chrono::NaiveDate) -> String {
    format!("{}-{}", today.year(), today.year() + 1)
}

// 更新班级请求
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/class.ts")]
pub struct UpdateClassRequest {
    pub name: Option<String>,
    pub grade: Option<String>,
    pub section: Option<String>,
    pub academic_year: Option<String>,
    pub class_teacher_id: Option<i64>,
    pub subject_teachers: Option<Vec<SubjectTeacher>>,
    pub schedule: Option<Vec<DaySchedule>>,
    pub room_number: Option<String>,
    pub max_strength: Option<i32>,
    pub is_active: Option<bool>,
}

impl UpdateClassRequest {
    pub fn validate(&self) -> Result<(), Vec<FieldError>> {
        let mut errors = FieldErrors::new();
        if let Some(grade) = &self.grade {
            errors.check(!grade.trim().is_empty(), "grade", "Grade must not be empty");
        }
        if let Some(section) = &self.section {
            errors.check(
                !section.trim().is_empty(),
                "section",
                "Section must not be empty",
            );
        }
        if let Some(year) = &self.academic_year
            && let Err(msg) = validate_academic_year(year)
        {
            errors.push("academic_year", msg);
        }
        if let Some(max) = self.max_strength {
            errors.check(max > 0, "max_strength", "Max strength must be positive");
        }
        errors.into_result()
    }
}

// 添加学生到班级
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/class.ts")]
pub struct AddStudentRequest {
    pub student_id: i64,
}

// 班级列表查询参数（用于存储层）
#[derive(Debug, Clone, Default)]
pub struct ClassListQuery {
    pub grade: Option<String>,
    pub section: Option<String>,
    pub academic_year: Option<String>,
    pub is_active: Option<bool>,
}

impl From<&ClassQueryParams> for ClassListQuery {
    fn from(params: &ClassQueryParams) -> Self {
        Self {
            grade: params.grade.clone(),
            section: params.section.as_ref().map(|s| s.trim().to_uppercase()),
            academic_year: params.academic_year.clone(),
            is_active: params.is_active,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> chrono::NaiveDate {
        chrono::NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    #[test]
    fn test_normalize_fills_defaults() {
        let req: CreateClassRequest =
            serde_json::from_str(r#"{"grade":"10","section":" b "}"#).expect("valid request");
        let req = req.normalize(date(2026, 10, 18));
        assert_eq!(req.section, "B");
        assert_eq!(req.name.as_deref(), Some("Class 10-B"));
        assert_eq!(req.academic_year.as_deref(), Some("2026-2027"));
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_invalid_academic_year_rejected() {
        let req: CreateClassRequest = serde_json::from_str(
            r#"{"grade":"10","section":"A","academic_year":"2026"}"#,
        )
        .expect("valid request");
        let errors = req.normalize(date(2026, 1, 1)).validate().unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "academic_year");
    }

    #[test]
    fn test_explicit_name_kept() {
        let req: CreateClassRequest =
            serde_json::from_str(r#"{"name":"Science Stream","grade":"11","section":"a"}"#)
                .expect("valid request");
        let req = req.normalize(date(2026, 1, 1));
        assert_eq!(req.name.as_deref(), Some("Science Stream"));
    }
}
