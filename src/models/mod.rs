//! 数据模型定义
//!
//! 按业务域划分：`entities` 为业务实体，`requests` 为请求参数，`responses` 为响应结构。

pub mod attendance;
pub mod classes;
pub mod common;
pub mod conversations;
pub mod notifications;
pub mod performance;
pub mod quizzes;
pub mod resources;
pub mod subjects;
pub mod system;
pub mod users;

pub use common::error_code::ErrorCode;
pub use common::pagination::{PaginatedResponse, PaginationInfo, PaginationQuery};
pub use common::response::ApiResponse;

/// 程序启动时间
#[derive(Debug, Clone)]
pub struct AppStartTime {
    pub start_datetime: chrono::DateTime<chrono::Utc>,
}
