use serde::Deserialize;
use ts_rs::TS;

use super::entities::UserRole;
use crate::models::common::{FieldError, FieldErrors};
use crate::utils::validate::validate_email;

// 用户查询参数（来自HTTP请求）
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/user.ts")]
pub struct UserQueryParams {
    pub page: Option<i64>,
    pub size: Option<i64>,
    pub role: Option<UserRole>,
    pub class_id: Option<i64>,
    pub search: Option<String>,
}

// 创建用户请求
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/user.ts")]
pub struct CreateUserRequest {
    pub name: String,
    pub email: String,
    pub role: UserRole,
    pub class_id: Option<i64>,
    pub roll_number: Option<String>,
}

impl CreateUserRequest {
    pub fn validate(&self) -> Result<(), Vec<FieldError>> {
        let mut errors = FieldErrors::new();
        errors.check(!self.name.trim().is_empty(), "name", "Name is required");
        if let Err(msg) = validate_email(&self.email) {
            errors.push("email", msg);
        }
        errors.check(
            self.class_id.is_none() || self.role == UserRole::Student,
            "class_id",
            "Only students can be assigned to a class",
        );
        errors.into_result()
    }
}

// 更新用户请求
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/user.ts")]
pub struct UpdateUserRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub role: Option<UserRole>,
    pub class_id: Option<i64>,
    pub roll_number: Option<String>,
    pub is_active: Option<bool>,
}

impl UpdateUserRequest {
    pub fn validate(&self) -> Result<(), Vec<FieldError>> {
        let mut errors = FieldErrors::new();
        if let Some(name) = &self.name {
            errors.check(!name.trim().is_empty(), "name", "Name must not be empty");
        }
        if let Some(email) = &self.email
            && let Err(msg) = validate_email(email)
        {
            errors.push("email", msg);
        }
        errors.into_result()
    }
}

// 用户列表查询参数（用于存储层）
#[derive(Debug, Clone, Default)]
pub struct UserListQuery {
    pub page: Option<i64>,
    pub size: Option<i64>,
    pub role: Option<UserRole>,
    pub class_id: Option<i64>,
    pub search: Option<String>,
}
