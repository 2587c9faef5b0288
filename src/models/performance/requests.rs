use serde::Deserialize;
use ts_rs::TS;

use super::entities::{AssessmentResult, AssessmentType, Term};
use crate::models::common::{FieldError, FieldErrors};
use crate::utils::validate::validate_academic_year;

// 创建学期成绩记录请求
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/performance.ts")]
pub struct CreatePerformanceRecordRequest {
    pub student_id: i64,
    pub class_id: i64,
    pub subject_id: i64,
    pub academic_year: String,
    pub term: Term,
    pub teacher_remarks: Option<String>,
}

impl CreatePerformanceRecordRequest {
    pub fn validate(&self) -> Result<(), Vec<FieldError>> {
        let mut errors = FieldErrors::new();
        if let Err(msg) = validate_academic_year(&self.academic_year) {
            errors.push("academic_year", msg);
        }
        errors.into_result()
    }
}

// 追加考核请求
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/performance.ts")]
pub struct AddAssessmentRequest {
    pub assessment_type: AssessmentType,
    pub title: String,
    pub max_marks: f64,
    pub obtained_marks: f64,
    // 默认当天
    pub date: Option<chrono::NaiveDate>,
    pub feedback: Option<String>,
}

impl AddAssessmentRequest {
    pub fn validate(&self) -> Result<(), Vec<FieldError>> {
        let mut errors = FieldErrors::new();
        errors.check(!self.title.trim().is_empty(), "title", "Title is required");
        errors.check(
            self.max_marks.is_finite() && self.max_marks > 0.0,
            "max_marks",
            "Max marks must be positive",
        );
        errors.check(
            self.obtained_marks.is_finite()
                && self.obtained_marks >= 0.0
                && self.obtained_marks <= self.max_marks,
            "obtained_marks",
            "Obtained marks must be between 0 and max marks",
        );
        errors.into_result()
    }

    pub fn into_assessment(self, today: chrono::NaiveDate) -> AssessmentResult {
        AssessmentResult::new(
            self.assessment_type,
            self.title.trim().to_string(),
            self.max_marks,
            self.obtained_marks,
            self.date.unwrap_or(today),
            self.feedback,
        )
    }
}

// 学期成绩查询参数（来自HTTP请求）
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/performance.ts")]
pub struct PerformanceRecordQueryParams {
    pub student_id: Option<i64>,
    pub class_id: Option<i64>,
    pub subject_id: Option<i64>,
    pub academic_year: Option<String>,
    pub term: Option<Term>,
}

// 学期成绩查询参数（用于存储层）
#[derive(Debug, Clone, Default)]
pub struct PerformanceRecordListQuery {
    pub student_id: Option<i64>,
    pub class_id: Option<i64>,
    pub subject_id: Option<i64>,
    pub academic_year: Option<String>,
    pub term: Option<Term>,
}

impl PerformanceRecordListQuery {
    /// 列表是否限定到同一班级、科目、学年与学期（此时计算排名）
    pub fn is_ranking_scope(&self) -> bool {
        self.class_id.is_some()
            && self.subject_id.is_some()
            && self.academic_year.is_some()
            && self.term.is_some()
    }
}

// 待写入的学期成绩记录
#[derive(Debug, Clone)]
pub struct NewPerformanceRecord {
    pub student_id: i64,
    pub class_id: i64,
    pub subject_id: i64,
    pub academic_year: String,
    pub term: Term,
    pub teacher_remarks: Option<String>,
}

// 统计查询参数
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/performance.ts")]
pub struct PerformanceStatsParams {
    pub student_id: Option<i64>,
    pub class_id: Option<i64>,
}

// AI 成绩查询请求
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/performance.ts")]
pub struct AiQueryRequest {
    pub query: String,
    pub student_id: Option<i64>,
    pub class_id: Option<i64>,
}

impl AiQueryRequest {
    pub fn validate(&self) -> Result<(), Vec<FieldError>> {
        let mut errors = FieldErrors::new();
        errors.check(!self.query.trim().is_empty(), "query", "Query is required");
        errors.into_result()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn add_request(max: f64, obtained: f64) -> AddAssessmentRequest {
        AddAssessmentRequest {
            assessment_type: AssessmentType::Quiz,
            title: "Weekly quiz".into(),
            max_marks: max,
            obtained_marks: obtained,
            date: None,
            feedback: None,
        }
    }

    #[test]
    fn test_obtained_marks_bounds() {
        assert!(add_request(20.0, 20.0).validate().is_ok());
        assert!(add_request(20.0, 0.0).validate().is_ok());
        assert!(add_request(20.0, 21.0).validate().is_err());
        assert!(add_request(20.0, -1.0).validate().is_err());
        assert!(add_request(0.0, 0.0).validate().is_err());
    }

    #[test]
    fn test_assessment_defaults_to_today() {
        let today = chrono::NaiveDate::from_ymd_opt(2026, 10, 18).expect("valid date");
        let assessment = add_request(20.0, 15.0).into_assessment(today);
        assert_eq!(assessment.date, today);
        assert_eq!(assessment.percentage, 75);
    }

    #[test]
    fn test_ranking_scope_needs_all_keys() {
        let mut query = PerformanceRecordListQuery {
            class_id: Some(1),
            subject_id: Some(2),
            academic_year: Some("2026-2027".into()),
            ..Default::default()
        };
        assert!(!query.is_ranking_scope());
        query.term = Some(Term::Annual);
        assert!(query.is_ranking_scope());
    }
}
