use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 用户角色
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/user.ts")]
pub enum UserRole {
    Student,    // 学生
    Teacher,    // 教师
    Management, // 学校管理层
}

impl UserRole {
    pub const STUDENT: &'static str = "student";
    pub const TEACHER: &'static str = "teacher";
    pub const MANAGEMENT: &'static str = "management";

    pub fn management_roles() -> &'static [&'static UserRole] {
        &[&Self::Management]
    }
    /// 教职工：教师与管理层
    pub fn staff_roles() -> &'static [&'static UserRole] {
        &[&Self::Teacher, &Self::Management]
    }
    pub fn student_roles() -> &'static [&'static UserRole] {
        &[&Self::Student]
    }
    pub fn all_roles() -> &'static [&'static UserRole] {
        &[&Self::Student, &Self::Teacher, &Self::Management]
    }

    pub fn is_staff(&self) -> bool {
        matches!(self, UserRole::Teacher | UserRole::Management)
    }
}

impl<'de> Deserialize<'de> for UserRole {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse::<UserRole>().map_err(|_| {
            serde::de::Error::custom(format!(
                "无效的用户角色: '{s}'. 支持的角色: student, teacher, management"
            ))
        })
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UserRole::Student => write!(f, "{}", UserRole::STUDENT),
            UserRole::Teacher => write!(f, "{}", UserRole::TEACHER),
            UserRole::Management => write!(f, "{}", UserRole::MANAGEMENT),
        }
    }
}

impl std::str::FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            UserRole::STUDENT => Ok(UserRole::Student),
            UserRole::TEACHER => Ok(UserRole::Teacher),
            UserRole::MANAGEMENT => Ok(UserRole::Management),
            _ => Err(format!("Invalid user role: {s}")),
        }
    }
}

// 用户目录记录
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/user.ts")]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub role: UserRole,
    // 学生所在班级
    pub class_id: Option<i64>,
    pub roll_number: Option<String>,
    pub is_active: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl User {
    // 生成访问令牌
    pub fn generate_access_token(&self) -> Result<String, jsonwebtoken::errors::Error> {
        crate::utils::jwt::JwtUtils::generate_access_token(self.id, &self.role.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_round_trip_through_strings() {
        for role in UserRole::all_roles() {
            let parsed: UserRole = role.to_string().parse().expect("known role");
            assert_eq!(&parsed, *role);
        }
        assert!("admin".parse::<UserRole>().is_err());
    }

    #[test]
    fn test_role_deserialize_rejects_unknown() {
        let ok: UserRole = serde_json::from_str(r#""management""#).expect("valid role");
        assert_eq!(ok, UserRole::Management);
        assert!(serde_json::from_str::<UserRole>(r#""principal""#).is_err());
    }

    #[test]
    fn test_staff_roles() {
        assert!(UserRole::Teacher.is_staff());
        assert!(UserRole::Management.is_staff());
        assert!(!UserRole::Student.is_staff());
    }
}
