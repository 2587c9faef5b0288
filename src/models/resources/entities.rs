use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 课程资料类型
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default, TS)]
#[serde(rename_all = "kebab-case")]
#[ts(export, export_to = "../frontend/src/types/generated/resource.ts")]
pub enum ResourceType {
    Pdf,
    Document,
    Video,
    Link,
    LessonPlan,
    Syllabus,
    Notes,
    Presentation,
    #[default]
    Curriculum,
}

impl ResourceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceType::Pdf => "pdf",
            ResourceType::Document => "document",
            ResourceType::Video => "video",
            ResourceType::Link => "link",
            ResourceType::LessonPlan => "lesson-plan",
            ResourceType::Syllabus => "syllabus",
            ResourceType::Notes => "notes",
            ResourceType::Presentation => "presentation",
            ResourceType::Curriculum => "curriculum",
        }
    }
}

impl std::fmt::Display for ResourceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ResourceType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pdf" => Ok(ResourceType::Pdf),
            "document" => Ok(ResourceType::Document),
            "video" => Ok(ResourceType::Video),
            "link" => Ok(ResourceType::Link),
            "lesson-plan" => Ok(ResourceType::LessonPlan),
            "syllabus" => Ok(ResourceType::Syllabus),
            "notes" => Ok(ResourceType::Notes),
            "presentation" => Ok(ResourceType::Presentation),
            "curriculum" => Ok(ResourceType::Curriculum),
            _ => Err(format!("Invalid resource type: {s}")),
        }
    }
}

// 课程资料
//
// 提取出的全文较大，不随列表与详情返回，只在 AI 生成时单独读取。
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/resource.ts")]
pub struct Resource {
    pub id: i64,
    // 上传教师
    pub owner_id: i64,
    pub subject: String,
    pub title: String,
    pub description: Option<String>,
    pub resource_type: ResourceType,
    pub class_id: Option<i64>,
    #[serde(skip_serializing, default)]
    #[ts(skip)]
    pub file_path: Option<String>,
    pub file_name: Option<String>,
    pub file_size: Option<i64>,
    pub mime_type: Option<String>,
    pub has_extracted_text: bool,
    // AI 生成内容（测验或教案 JSON）
    #[ts(type = "any")]
    pub generated_content: Option<serde_json::Value>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

// AI 生成的测验题
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/resource.ts")]
pub struct GeneratedQuestion {
    #[ts(type = "number | string")]
    pub id: serde_json::Value,
    pub question: String,
    #[serde(default)]
    pub options: Vec<String>,
    pub correct_answer: String,
    pub explanation: Option<String>,
}

// AI 生成的测验
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/resource.ts")]
pub struct GeneratedQuiz {
    pub quiz_title: String,
    pub questions: Vec<GeneratedQuestion>,
}
