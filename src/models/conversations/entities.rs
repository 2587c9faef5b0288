use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// 未命名会话的默认标题
pub const DEFAULT_CONVERSATION_TITLE: &str = "New Conversation";

const TITLE_MAX_CHARS: usize = 50;

// 会话类型
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default, TS)]
#[serde(rename_all = "kebab-case")]
#[ts(export, export_to = "../frontend/src/types/generated/conversation.ts")]
pub enum ConversationType {
    #[default]
    General,
    AttendanceQuery,
    PerformanceQuery,
    QuizGeneration,
    LessonPlan,
    StudentHelp,
}

impl ConversationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConversationType::General => "general",
            ConversationType::AttendanceQuery => "attendance-query",
            ConversationType::PerformanceQuery => "performance-query",
            ConversationType::QuizGeneration => "quiz-generation",
            ConversationType::LessonPlan => "lesson-plan",
            ConversationType::StudentHelp => "student-help",
        }
    }
}

impl std::str::FromStr for ConversationType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "general" => Ok(ConversationType::General),
            "attendance-query" => Ok(ConversationType::AttendanceQuery),
            "performance-query" => Ok(ConversationType::PerformanceQuery),
            "quiz-generation" => Ok(ConversationType::QuizGeneration),
            "lesson-plan" => Ok(ConversationType::LessonPlan),
            "student-help" => Ok(ConversationType::StudentHelp),
            _ => Err(format!("Invalid conversation type: {s}")),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export, export_to = "../frontend/src/types/generated/conversation.ts")]
pub enum MessageRole {
    User,
    Assistant,
    System,
}

// 回复元数据
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/conversation.ts")]
pub struct MessageMetadata {
    pub tokens_used: i64,
    pub model: String,
    pub response_time_ms: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/conversation.ts")]
pub struct ConversationMessage {
    pub role: MessageRole,
    pub content: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
    #[serde(default)]
    pub is_voice_input: bool,
    pub transcript_confidence: Option<f64>,
    pub metadata: Option<MessageMetadata>,
}

impl ConversationMessage {
    pub fn user(content: String, timestamp: chrono::DateTime<chrono::Utc>) -> Self {
        Self {
            role: MessageRole::User,
            content,
            timestamp,
            is_voice_input: false,
            transcript_confidence: None,
            metadata: None,
        }
    }

    pub fn assistant(
        content: String,
        timestamp: chrono::DateTime<chrono::Utc>,
        metadata: MessageMetadata,
    ) -> Self {
        Self {
            role: MessageRole::Assistant,
            content,
            timestamp,
            is_voice_input: false,
            transcript_confidence: None,
            metadata: Some(metadata),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/conversation.ts")]
pub struct ConversationStats {
    pub total_messages: i64,
    pub total_tokens_used: i64,
    pub voice_queries: i64,
}

/// 消息列表与计数
///
/// 计数按每条追加的消息递增，不做全量重算。
#[derive(Debug, Clone, Default, PartialEq, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/conversation.ts")]
pub struct ConversationThread {
    messages: Vec<ConversationMessage>,
    stats: ConversationStats,
}

impl ConversationThread {
    /// 从存储恢复
    pub fn restore(messages: Vec<ConversationMessage>, stats: ConversationStats) -> Self {
        Self { messages, stats }
    }

    pub fn messages(&self) -> &[ConversationMessage] {
        &self.messages
    }

    pub fn stats(&self) -> &ConversationStats {
        &self.stats
    }

    pub fn first_user_message(&self) -> Option<&ConversationMessage> {
        self.messages.iter().find(|m| m.role == MessageRole::User)
    }

    pub fn add_message(&mut self, message: ConversationMessage) {
        self.stats.total_messages += 1;
        if message.is_voice_input {
            self.stats.voice_queries += 1;
        }
        if let Some(meta) = &message.metadata {
            self.stats.total_tokens_used += meta.tokens_used;
        }
        self.messages.push(message);
    }
}

/// 由首条用户消息生成标题：前 50 个字符，超出时追加 "..."
pub fn derive_title(content: &str) -> String {
    let mut chars = content.chars();
    let head: String = chars.by_ref().take(TITLE_MAX_CHARS).collect();
    if chars.next().is_some() {
        format!("{head}...")
    } else {
        head
    }
}

// 会话上下文
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/conversation.ts")]
pub struct ConversationContext {
    pub class_id: Option<i64>,
    pub subject_id: Option<i64>,
    pub student_id: Option<i64>,
}

// AI 会话
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/conversation.ts")]
pub struct Conversation {
    pub id: i64,
    pub user_id: i64,
    pub conversation_type: ConversationType,
    pub context: ConversationContext,
    pub title: String,
    #[serde(flatten)]
    pub thread: ConversationThread,
    pub is_active: bool,
    pub last_activity: chrono::DateTime<chrono::Utc>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl Conversation {
    /// 追加消息并刷新最后活动时间；仍为默认标题时用首条用户消息命名
    pub fn add_message(&mut self, message: ConversationMessage) {
        self.last_activity = message.timestamp;
        let names_conversation = message.role == MessageRole::User
            && self.thread.first_user_message().is_none()
            && self.title == DEFAULT_CONVERSATION_TITLE;
        if names_conversation {
            self.title = derive_title(&message.content);
        }
        self.thread.add_message(message);
    }
}
