use serde::Serialize;
use ts_rs::TS;

use super::entities::{GeneratedQuiz, Resource};

// 测验生成结果
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/resource.ts")]
pub struct QuizGenerationResponse {
    pub resource_id: i64,
    pub subject: String,
    pub quiz: GeneratedQuiz,
}

// 教案生成结果：保存为新的 lesson-plan 资料
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/resource.ts")]
pub struct LessonPlanResponse {
    pub resource: Resource,
    #[ts(type = "any")]
    pub lesson_plan: serde_json::Value,
}
