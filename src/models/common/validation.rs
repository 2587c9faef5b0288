use serde::Serialize;
use ts_rs::TS;

use crate::errors::SchoolHubError;

/// 单个字段的校验错误
#[derive(Debug, Clone, PartialEq, Serialize, serde::Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/api.ts")]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

/// 字段校验错误收集器
#[derive(Debug, Default)]
pub struct FieldErrors {
    errors: Vec<FieldError>,
}

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(FieldError {
            field: field.into(),
            message: message.into(),
        });
    }

    /// 条件不满足时记录错误
    pub fn check(&mut self, ok: bool, field: &str, message: &str) {
        if !ok {
            self.push(field, message);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn into_result(self) -> Result<(), Vec<FieldError>> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(self.errors)
        }
    }
}

impl From<Vec<FieldError>> for SchoolHubError {
    fn from(errors: Vec<FieldError>) -> Self {
        SchoolHubError::validation(
            errors
                .iter()
                .map(|e| format!("{}: {}", e.field, e.message))
                .collect::<Vec<_>>()
                .join("; "),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collects_in_order() {
        let mut errors = FieldErrors::new();
        errors.check(true, "name", "required");
        errors.check(false, "subject", "Subject is required");
        errors.push("questions", "At least one question is required");

        let list = errors.into_result().unwrap_err();
        assert_eq!(list.len(), 2);
        assert_eq!(list[0].field, "subject");
        assert_eq!(list[1].field, "questions");

        let err: SchoolHubError = list.into();
        assert_eq!(
            err.message(),
            "subject: Subject is required; questions: At least one question is required"
        );
    }

    #[test]
    fn test_empty_is_ok() {
        assert!(FieldErrors::new().into_result().is_ok());
    }
}
