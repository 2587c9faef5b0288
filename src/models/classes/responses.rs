use super::entities::Class;
use crate::models::users::entities::User;
use serde::Serialize;
use ts_rs::TS;

// 班级列表响应
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/class.ts")]
pub struct ClassListResponse {
    pub items: Vec<Class>,
    /// 教师没有被分配班级时返回了全部在用班级
    pub fallback_applied: bool,
}

// 班级学生列表响应
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/class.ts")]
pub struct ClassStudentsResponse {
    pub class_id: i64,
    pub items: Vec<User>,
}
