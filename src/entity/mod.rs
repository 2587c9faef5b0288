//! SeaORM 实体定义
//!
//! 这些实体用于数据库操作，与 models 模块中的业务实体分离。
//! Storage 层使用这些实体进行 CRUD 操作，然后转换为 models 中的业务实体。
//! 嵌入列表（评估、考勤条目、会话消息等）以 JSON 文本存储。

pub mod prelude;

pub mod ai_conversations;
pub mod attendances;
pub mod classes;
pub mod notifications;
pub mod performances;
pub mod quiz_results;
pub mod resources;
pub mod subjects;
pub mod users;

use chrono::{DateTime, Utc};

/// Unix 秒转为 UTC 时间
pub(crate) fn to_datetime(ts: i64) -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp(ts, 0).unwrap_or_default()
}

/// JSON 文本列解析，损坏时回落为默认值
pub(crate) fn from_json_column<T: serde::de::DeserializeOwned + Default>(raw: &str) -> T {
    serde_json::from_str(raw).unwrap_or_else(|e| {
        tracing::warn!("Failed to decode JSON column: {}", e);
        T::default()
    })
}
