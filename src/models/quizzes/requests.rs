use std::collections::HashSet;

use serde::Deserialize;
use ts_rs::TS;

use super::entities::{AnswerDetail, QuizQuestion, SubmittedAnswer};
use crate::models::common::{FieldError, FieldErrors};

// 提交测验请求
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/quiz.ts")]
pub struct SubmitQuizRequest {
    pub resource_id: Option<i64>,
    pub quiz_topic: Option<String>,
    pub subject: String,
    #[serde(default)]
    pub answers: Vec<SubmittedAnswer>,
    #[serde(default)]
    pub questions: Vec<QuizQuestion>,
}

impl SubmitQuizRequest {
    pub fn validate(&self) -> Result<(), Vec<FieldError>> {
        let mut errors = FieldErrors::new();
        errors.check(
            !self.subject.trim().is_empty(),
            "subject",
            "Subject is required",
        );
        errors.check(
            !self.questions.is_empty(),
            "questions",
            "At least one question is required",
        );
        let mut seen = HashSet::new();
        if self.questions.iter().any(|q| !seen.insert(&q.id)) {
            errors.push("questions", "Question ids must be unique");
        }
        errors.into_result()
    }

    /// 反馈中使用的主题：优先测验主题，否则科目
    pub fn topic(&self) -> &str {
        self.quiz_topic
            .as_deref()
            .filter(|t| !t.trim().is_empty())
            .unwrap_or(&self.subject)
    }
}

// 成绩列表查询参数（来自HTTP请求）
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/quiz.ts")]
pub struct QuizResultQueryParams {
    pub page: Option<i64>,
    pub size: Option<i64>,
    pub student_id: Option<i64>,
    pub subject: Option<String>,
    pub start_date: Option<chrono::NaiveDate>,
    pub end_date: Option<chrono::NaiveDate>,
}

// 成绩列表查询参数（用于存储层）
#[derive(Debug, Clone, Default)]
pub struct QuizResultListQuery {
    pub page: Option<i64>,
    pub size: Option<i64>,
    pub student_id: Option<i64>,
    pub class_id: Option<i64>,
    pub subject: Option<String>,
    // 闭区间，Unix 秒
    pub attempted_from: Option<i64>,
    pub attempted_to: Option<i64>,
}

// 待写入的测验成绩
#[derive(Debug, Clone)]
pub struct NewQuizResult {
    pub student_id: i64,
    pub class_id: Option<i64>,
    pub resource_id: Option<i64>,
    pub quiz_topic: Option<String>,
    pub subject: String,
    pub score: i32,
    pub total_marks: i32,
    pub percentage: i64,
    pub answers: Vec<AnswerDetail>,
    pub ai_feedback: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(json: &str) -> SubmitQuizRequest {
        serde_json::from_str(json).expect("valid request")
    }

    #[test]
    fn test_empty_questions_rejected() {
        let errors = request(r#"{"subject":"Math","answers":[],"questions":[]}"#)
            .validate()
            .unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "questions");
    }

    #[test]
    fn test_duplicate_question_ids_rejected() {
        let req = request(
            r#"{"subject":"Math","questions":[
                {"id":1,"question":"a","correct_answer":"A"},
                {"id":1,"question":"b","correct_answer":"B"}]}"#,
        );
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_numeric_and_text_ids_are_distinct() {
        let req = request(
            r#"{"subject":"Math","questions":[
                {"id":1,"question":"a","correct_answer":"A"},
                {"id":"1","question":"b","correct_answer":"B"}]}"#,
        );
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_topic_falls_back_to_subject() {
        let req = request(r#"{"subject":"Biology","quiz_topic":"  "}"#);
        assert_eq!(req.topic(), "Biology");
        let req = request(r#"{"subject":"Biology","quiz_topic":"Cells"}"#);
        assert_eq!(req.topic(), "Cells");
    }
}
