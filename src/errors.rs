//! 统一错误处理模块
//!
//! 使用宏自动生成错误类型，支持错误代码和类型名称。

use std::fmt;

use actix_web::http::StatusCode;

/// 定义错误类型的宏
///
/// 自动生成：
/// - enum 定义
/// - code() 方法 - 返回错误代码
/// - error_type() 方法 - 返回错误类型名称
/// - message() 方法 - 返回错误详情
/// - 便捷构造函数
macro_rules! define_schoolhub_errors {
    ($(
        $variant:ident($code:literal, $type_name:literal)
    ),* $(,)?) => {
        #[derive(Debug, Clone)]
        pub enum SchoolHubError {
            $($variant(String),)*
        }

        impl SchoolHubError {
            /// 获取错误代码
            pub fn code(&self) -> &'static str {
                match self {
                    $(SchoolHubError::$variant(_) => $code,)*
                }
            }

            /// 获取错误类型名称
            pub fn error_type(&self) -> &'static str {
                match self {
                    $(SchoolHubError::$variant(_) => $type_name,)*
                }
            }

            /// 获取错误详情
            pub fn message(&self) -> &str {
                match self {
                    $(SchoolHubError::$variant(msg) => msg,)*
                }
            }
        }

        // 生成便捷构造函数
        paste::paste! {
            impl SchoolHubError {
                $(
                    pub fn [<$variant:snake>]<T: Into<String>>(msg: T) -> Self {
                        SchoolHubError::$variant(msg.into())
                    }
                )*
            }
        }
    };
}

define_schoolhub_errors! {
    AiProviderNotFound("E001", "AI Provider Not Found"),
    DatabaseConfig("E003", "Database Configuration Error"),
    DatabaseConnection("E004", "Database Connection Error"),
    DatabaseOperation("E005", "Database Operation Error"),
    FileOperation("E006", "File Operation Error"),
    Validation("E007", "Validation Error"),
    NotFound("E008", "Resource Not Found"),
    Serialization("E009", "Serialization Error"),
    DateParse("E011", "Date Parse Error"),
    Authentication("E012", "Authentication Error"),
    Authorization("E013", "Authorization Error"),
    Conflict("E014", "Conflict Error"),
    Generation("E015", "Generation Error"),
    Extraction("E016", "Extraction Error"),
}

impl SchoolHubError {
    /// 格式化为彩色输出（用于开发环境）
    #[cfg(debug_assertions)]
    pub fn format_colored(&self) -> String {
        format!(
            "\x1b[1;31m[ERROR]\x1b[0m \x1b[33m{}\x1b[0m \x1b[31m{}\x1b[0m\n  {}",
            self.code(),
            self.error_type(),
            self.message()
        )
    }

    /// 格式化为简洁输出
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }

    /// 对应的 HTTP 状态码
    pub fn status_code(&self) -> StatusCode {
        match self {
            SchoolHubError::NotFound(_) => StatusCode::NOT_FOUND,
            SchoolHubError::Validation(_) | SchoolHubError::DateParse(_) => {
                StatusCode::BAD_REQUEST
            }
            SchoolHubError::Authentication(_) => StatusCode::UNAUTHORIZED,
            SchoolHubError::Authorization(_) => StatusCode::FORBIDDEN,
            SchoolHubError::Conflict(_) => StatusCode::CONFLICT,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// 是否可以把错误详情返回给客户端
    ///
    /// 外部协作方（AI、文本提取）的失败原样返回，其余服务端错误只记录日志。
    pub fn is_client_visible(&self) -> bool {
        !matches!(
            self.status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        ) || matches!(
            self,
            SchoolHubError::Generation(_) | SchoolHubError::Extraction(_)
        )
    }
}

impl fmt::Display for SchoolHubError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for SchoolHubError {}

// 为常见的错误类型实现 From trait
impl From<sea_orm::DbErr> for SchoolHubError {
    fn from(err: sea_orm::DbErr) -> Self {
        match err.sql_err() {
            Some(sea_orm::SqlErr::UniqueConstraintViolation(detail)) => {
                SchoolHubError::Conflict(detail)
            }
            _ => SchoolHubError::DatabaseOperation(err.to_string()),
        }
    }
}

impl From<std::io::Error> for SchoolHubError {
    fn from(err: std::io::Error) -> Self {
        SchoolHubError::FileOperation(err.to_string())
    }
}

impl From<serde_json::Error> for SchoolHubError {
    fn from(err: serde_json::Error) -> Self {
        SchoolHubError::Serialization(err.to_string())
    }
}

impl From<chrono::ParseError> for SchoolHubError {
    fn from(err: chrono::ParseError) -> Self {
        SchoolHubError::DateParse(err.to_string())
    }
}

/// 把数据库写入错误映射为业务错误：唯一约束冲突单独识别
pub fn map_write_error(err: sea_orm::DbErr, context: &str, conflict_message: &str) -> SchoolHubError {
    if matches!(
        err.sql_err(),
        Some(sea_orm::SqlErr::UniqueConstraintViolation(_))
    ) {
        SchoolHubError::conflict(conflict_message)
    } else {
        SchoolHubError::database_operation(format!("{context}: {err}"))
    }
}

pub type Result<T> = std::result::Result<T, SchoolHubError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(SchoolHubError::ai_provider_not_found("test").code(), "E001");
        assert_eq!(SchoolHubError::database_config("test").code(), "E003");
        assert_eq!(SchoolHubError::validation("test").code(), "E007");
        assert_eq!(SchoolHubError::authentication("test").code(), "E012");
        assert_eq!(SchoolHubError::conflict("test").code(), "E014");
    }

    #[test]
    fn test_error_types() {
        assert_eq!(
            SchoolHubError::generation("test").error_type(),
            "Generation Error"
        );
        assert_eq!(
            SchoolHubError::validation("test").error_type(),
            "Validation Error"
        );
    }

    #[test]
    fn test_error_message() {
        let err = SchoolHubError::validation("Invalid input");
        assert_eq!(err.message(), "Invalid input");
    }

    #[test]
    fn test_format_simple() {
        let err = SchoolHubError::validation("Invalid URL");
        let formatted = err.format_simple();
        assert!(formatted.contains("Validation Error"));
        assert!(formatted.contains("Invalid URL"));
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(
            SchoolHubError::not_found("x").status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            SchoolHubError::conflict("x").status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            SchoolHubError::authorization("x").status_code(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            SchoolHubError::generation("x").status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_client_visibility() {
        assert!(SchoolHubError::generation("quota").is_client_visible());
        assert!(SchoolHubError::extraction("bad pdf").is_client_visible());
        assert!(SchoolHubError::validation("field").is_client_visible());
        assert!(!SchoolHubError::database_operation("secret").is_client_visible());
    }

    #[test]
    fn test_db_error_maps_to_database_operation() {
        let err: SchoolHubError = sea_orm::DbErr::Custom("boom".into()).into();
        assert_eq!(err.code(), "E005");
    }
}
