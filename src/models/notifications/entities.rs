use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 通知类型
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, TS)]
#[serde(rename_all = "kebab-case")]
#[ts(export, export_to = "../frontend/src/types/generated/notification.ts")]
pub enum NotificationType {
    AttendanceMarked,
    AttendanceAbsent,
    QuizAssigned,
    QuizResult,
    PerformanceUpdate,
    ResourceUploaded,
    LessonPlanShared,
    Announcement,
    Reminder,
    System,
}

impl NotificationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationType::AttendanceMarked => "attendance-marked",
            NotificationType::AttendanceAbsent => "attendance-absent",
            NotificationType::QuizAssigned => "quiz-assigned",
            NotificationType::QuizResult => "quiz-result",
            NotificationType::PerformanceUpdate => "performance-update",
            NotificationType::ResourceUploaded => "resource-uploaded",
            NotificationType::LessonPlanShared => "lesson-plan-shared",
            NotificationType::Announcement => "announcement",
            NotificationType::Reminder => "reminder",
            NotificationType::System => "system",
        }
    }
}

impl std::str::FromStr for NotificationType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        serde_json::from_value(serde_json::Value::String(s.to_string()))
            .map_err(|_| format!("Invalid notification type: {s}"))
    }
}

// 优先级
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export, export_to = "../frontend/src/types/generated/notification.ts")]
pub enum NotificationPriority {
    Low,
    #[default]
    Medium,
    High,
    Urgent,
}

impl NotificationPriority {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationPriority::Low => "low",
            NotificationPriority::Medium => "medium",
            NotificationPriority::High => "high",
            NotificationPriority::Urgent => "urgent",
        }
    }
}

impl std::str::FromStr for NotificationPriority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(NotificationPriority::Low),
            "medium" => Ok(NotificationPriority::Medium),
            "high" => Ok(NotificationPriority::High),
            "urgent" => Ok(NotificationPriority::Urgent),
            _ => Err(format!("Invalid notification priority: {s}")),
        }
    }
}

// 关联实体
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/notification.ts")]
pub struct RelatedEntity {
    // 例如 "attendance"、"performance"、"resource"
    pub model: String,
    pub id: i64,
}

// 通知
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/notification.ts")]
pub struct Notification {
    pub id: i64,
    pub recipient_id: i64,
    pub notification_type: NotificationType,
    pub title: String,
    pub message: String,
    pub priority: NotificationPriority,
    pub related: Option<RelatedEntity>,
    pub sender_id: Option<i64>,
    pub is_read: bool,
    pub read_at: Option<chrono::DateTime<chrono::Utc>>,
    // 批量发送时共享
    pub bulk_id: Option<String>,
    pub expires_at: Option<chrono::DateTime<chrono::Utc>>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_parses_kebab_case() {
        assert_eq!(
            "lesson-plan-shared".parse::<NotificationType>(),
            Ok(NotificationType::LessonPlanShared)
        );
        assert_eq!(NotificationType::QuizResult.as_str(), "quiz-result");
        assert!("quiz_result".parse::<NotificationType>().is_err());
    }
}
