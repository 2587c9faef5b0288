use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 科目类型
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export, export_to = "../frontend/src/types/generated/subject.ts")]
pub enum SubjectType {
    #[default]
    Theory,
    Practical,
    Both,
}

impl std::fmt::Display for SubjectType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SubjectType::Theory => write!(f, "theory"),
            SubjectType::Practical => write!(f, "practical"),
            SubjectType::Both => write!(f, "both"),
        }
    }
}

impl std::str::FromStr for SubjectType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "theory" => Ok(SubjectType::Theory),
            "practical" => Ok(SubjectType::Practical),
            "both" => Ok(SubjectType::Both),
            _ => Err(format!("Invalid subject type: {s}")),
        }
    }
}

// 科目实体
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/subject.ts")]
pub struct Subject {
    pub id: i64,
    pub name: String,
    // 科目代码（唯一，大写）
    pub code: String,
    pub description: Option<String>,
    pub subject_type: SubjectType,
    pub max_marks: i32,
    pub passing_marks: i32,
    pub is_active: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}
