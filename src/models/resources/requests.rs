use serde::Deserialize;
use ts_rs::TS;

use super::entities::ResourceType;

// 资料查询参数（来自HTTP请求）
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/resource.ts")]
pub struct ResourceQueryParams {
    pub page: Option<i64>,
    pub size: Option<i64>,
    pub subject: Option<String>,
    #[serde(rename = "type")]
    pub resource_type: Option<ResourceType>,
    pub class_id: Option<i64>,
    pub owner_id: Option<i64>,
}

// 资料列表查询参数（用于存储层）
#[derive(Debug, Clone, Default)]
pub struct ResourceListQuery {
    pub page: Option<i64>,
    pub size: Option<i64>,
    pub owner_id: Option<i64>,
    pub subject: Option<String>,
    pub resource_type: Option<ResourceType>,
    pub class_id: Option<i64>,
}

// 新建资料（上传或生成教案后写入）
#[derive(Debug, Clone, Default)]
pub struct NewResource {
    pub owner_id: i64,
    pub subject: String,
    pub title: String,
    pub description: Option<String>,
    pub resource_type: ResourceType,
    pub class_id: Option<i64>,
    pub file_path: Option<String>,
    pub file_name: Option<String>,
    pub file_size: Option<i64>,
    pub mime_type: Option<String>,
    pub extracted_text: Option<String>,
    pub generated_content: Option<String>,
}

// 生成测验请求
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/resource.ts")]
pub struct GenerateQuizRequest {
    #[serde(default = "default_num_questions")]
    pub num_questions: u32,
    #[serde(default = "default_difficulty")]
    pub difficulty: String,
}

impl Default for GenerateQuizRequest {
    fn default() -> Self {
        Self {
            num_questions: default_num_questions(),
            difficulty: default_difficulty(),
        }
    }
}

fn default_num_questions() -> u32 {
    5
}

fn default_difficulty() -> String {
    "medium".to_string()
}

// 生成教案请求
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/resource.ts")]
pub struct GenerateLessonPlanRequest {
    #[serde(default = "default_duration")]
    pub duration: String,
    #[serde(default = "default_grade_level")]
    pub grade_level: String,
}

impl Default for GenerateLessonPlanRequest {
    fn default() -> Self {
        Self {
            duration: default_duration(),
            grade_level: default_grade_level(),
        }
    }
}

fn default_duration() -> String {
    "45 minutes".to_string()
}

fn default_grade_level() -> String {
    "10th".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generation_defaults() {
        let quiz: GenerateQuizRequest = serde_json::from_str("{}").expect("valid request");
        assert_eq!(quiz.num_questions, 5);
        assert_eq!(quiz.difficulty, "medium");

        let plan: GenerateLessonPlanRequest = serde_json::from_str("{}").expect("valid request");
        assert_eq!(plan.duration, "45 minutes");
        assert_eq!(plan.grade_level, "10th");
    }
}
