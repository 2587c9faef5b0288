use serde::Deserialize;
use ts_rs::TS;

use super::entities::SubjectType;
use crate::models::common::{FieldError, FieldErrors};

// 创建科目请求
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/subject.ts")]
pub struct CreateSubjectRequest {
    pub name: String,
    pub code: String,
    pub description: Option<String>,
    #[serde(default)]
    pub subject_type: SubjectType,
    #[serde(default = "default_max_marks")]
    pub max_marks: i32,
    #[serde(default = "default_passing_marks")]
    pub passing_marks: i32,
}

fn default_max_marks() -> i32 {
    100
}

fn default_passing_marks() -> i32 {
    33
}

impl CreateSubjectRequest {
    pub fn validate(&self) -> Result<(), Vec<FieldError>> {
        let mut errors = FieldErrors::new();
        errors.check(!self.name.trim().is_empty(), "name", "Name is required");
        errors.check(!self.code.trim().is_empty(), "code", "Code is required");
        errors.check(self.max_marks > 0, "max_marks", "Max marks must be positive");
        errors.check(
            (0..=self.max_marks).contains(&self.passing_marks),
            "passing_marks",
            "Passing marks must be between 0 and max marks",
        );
        errors.into_result()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_applied() {
        let req: CreateSubjectRequest =
            serde_json::from_str(r#"{"name":"Physics","code":"phy"}"#).expect("valid request");
        assert_eq!(req.subject_type, SubjectType::Theory);
        assert_eq!(req.max_marks, 100);
        assert_eq!(req.passing_marks, 33);
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_passing_marks_above_max_rejected() {
        let req: CreateSubjectRequest = serde_json::from_str(
            r#"{"name":"Physics","code":"PHY","max_marks":50,"passing_marks":60}"#,
        )
        .expect("valid request");
        let errors = req.validate().unwrap_err();
        assert_eq!(errors[0].field, "passing_marks");
    }
}
