use serde::Serialize;
use ts_rs::TS;

// 总体统计
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/performance.ts")]
pub struct OverallStats {
    pub total_quizzes: i64,
    pub average_percentage: f64,
    pub total_score: i64,
    pub total_possible: i64,
}

// 按科目统计
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/performance.ts")]
pub struct SubjectStats {
    pub subject: String,
    pub attempts: i64,
    pub average_percentage: f64,
    pub max_percentage: i64,
    pub min_percentage: i64,
}

// 近期趋势
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/performance.ts")]
pub struct TrendPoint {
    pub subject: String,
    pub percentage: i64,
    pub date: chrono::DateTime<chrono::Utc>,
    pub topic: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/performance.ts")]
pub struct PerformanceStatsResponse {
    pub overall: OverallStats,
    pub by_subject: Vec<SubjectStats>,
    pub recent_trend: Vec<TrendPoint>,
}

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/performance.ts")]
pub struct AiQueryResponse {
    pub response: String,
    pub context_used: String,
}
