use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// 题目 ID：可以是数字或字符串，严格比较（1 与 "1" 不相等）
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(untagged)]
#[ts(export, export_to = "../frontend/src/types/generated/quiz.ts")]
pub enum QuestionId {
    Number(i64),
    Text(String),
}

impl std::fmt::Display for QuestionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            QuestionId::Number(n) => write!(f, "{n}"),
            QuestionId::Text(s) => f.write_str(s),
        }
    }
}

// 测验题目（随提交一并上传）
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/quiz.ts")]
pub struct QuizQuestion {
    pub id: QuestionId,
    pub question: String,
    pub correct_answer: String,
    #[serde(default)]
    pub options: Option<Vec<String>>,
    #[serde(default)]
    pub explanation: Option<String>,
}

// 学生作答
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/quiz.ts")]
pub struct SubmittedAnswer {
    pub question_id: QuestionId,
    pub student_answer: String,
}

// 单题批改明细
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/quiz.ts")]
pub struct AnswerDetail {
    pub question_id: QuestionId,
    pub question: String,
    pub student_answer: String,
    pub correct_answer: String,
    pub is_correct: bool,
}

// 测验成绩记录
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/quiz.ts")]
pub struct QuizResult {
    pub id: i64,
    pub student_id: i64,
    // 提交时学生所在班级
    pub class_id: Option<i64>,
    pub resource_id: Option<i64>,
    pub quiz_topic: Option<String>,
    pub subject: String,
    pub score: i32,
    pub total_marks: i32,
    pub percentage: i64,
    pub answers: Vec<AnswerDetail>,
    pub ai_feedback: String,
    pub attempted_at: chrono::DateTime<chrono::Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_question_id_strict_equality() {
        let number: QuestionId = serde_json::from_str("1").expect("number id");
        let text: QuestionId = serde_json::from_str(r#""1""#).expect("text id");
        assert_eq!(number, QuestionId::Number(1));
        assert_eq!(text, QuestionId::Text("1".to_string()));
        assert_ne!(number, text);
    }

    #[test]
    fn test_question_id_serializes_back_to_original_shape() {
        assert_eq!(
            serde_json::to_string(&QuestionId::Number(7)).expect("serialize"),
            "7"
        );
        assert_eq!(
            serde_json::to_string(&QuestionId::Text("q7".into())).expect("serialize"),
            r#""q7""#
        );
    }
}
