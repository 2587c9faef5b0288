use config::{Config, ConfigBuilder, ConfigError, Environment, File, builder::DefaultState};
use std::sync::OnceLock;

use super::AppConfig;

static APP_CONFIG: OnceLock<AppConfig> = OnceLock::new();

/// 内置默认值，没有配置文件时也能启动
fn with_defaults(
    builder: ConfigBuilder<DefaultState>,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    builder
        .set_default("app.system_name", "SchoolHub")?
        .set_default("app.environment", "development")?
        .set_default("app.log_level", "info")?
        .set_default("server.host", "127.0.0.1")?
        .set_default("server.port", 8080)?
        .set_default("server.unix_socket_path", "")?
        .set_default("server.workers", 0)?
        .set_default("server.max_workers", 16)?
        .set_default("server.timeouts.client_request", 30000)?
        .set_default("server.timeouts.client_disconnect", 5000)?
        .set_default("server.timeouts.keep_alive", 75)?
        .set_default("server.limits.max_payload_size", 52_428_800)?
        .set_default("jwt.secret", "change-me-in-production")?
        .set_default("jwt.access_token_expiry", 60 * 24)?
        .set_default("database.url", "schoolhub.db")?
        .set_default("database.pool_size", 8)?
        .set_default("database.timeout", 30)?
        .set_default("cors.allowed_origins", Vec::<String>::new())?
        .set_default("cors.allowed_methods", Vec::<String>::new())?
        .set_default("cors.allowed_headers", Vec::<String>::new())?
        .set_default("cors.max_age", 3600)?
        .set_default("upload.dir", "uploads")?
        .set_default("upload.max_size", 10_485_760)?
        .set_default("upload.allowed_types", vec![".pdf", ".txt", ".md"])?
        .set_default("ai.provider", "gemini")?
        .set_default("ai.api_key", "")?
        .set_default(
            "ai.base_url",
            "https://generativelanguage.googleapis.com/v1beta",
        )?
        .set_default("ai.model", "gemini-1.5-flash")?
        .set_default("ai.temperature", 0.7)?
        .set_default("ai.top_k", 40)?
        .set_default("ai.top_p", 0.95)?
        .set_default("ai.max_output_tokens", 2048)?
        .set_default("policy.teacher_empty_class_fallback", true)
}

impl AppConfig {
    /// 加载配置
    pub fn load() -> Result<Self, ConfigError> {
        let mut builder = with_defaults(Config::builder())?
            // 首先加载默认配置文件
            .add_source(File::with_name("config").required(false))
            // 然后根据环境加载特定配置文件
            .add_source(
                File::with_name(&format!(
                    "config.{}",
                    std::env::var("APP_ENV").unwrap_or_else(|_| "development".into())
                ))
                .required(false),
            )
            // 最后加载环境变量覆盖
            .add_source(
                Environment::with_prefix("SCHOOLHUB")
                    .separator("__")
                    .try_parsing(true),
            );

        // 支持从环境变量加载
        builder = builder
            .set_override_option("app.environment", std::env::var("APP_ENV").ok())?
            .set_override_option("app.log_level", std::env::var("RUST_LOG").ok())?
            .set_override_option("server.host", std::env::var("SERVER_HOST").ok())?
            .set_override_option("server.port", std::env::var("SERVER_PORT").ok())?
            .set_override_option("server.unix_socket_path", std::env::var("UNIX_SOCKET").ok())?
            .set_override_option("server.workers", std::env::var("CPU_COUNT").ok())?
            .set_override_option("jwt.secret", std::env::var("JWT_SECRET").ok())?
            .set_override_option("database.url", std::env::var("DATABASE_URL").ok())?
            .set_override_option("upload.dir", std::env::var("UPLOAD_DIR").ok())?
            .set_override_option("ai.provider", std::env::var("AI_PROVIDER").ok())?
            .set_override_option("ai.api_key", std::env::var("GEMINI_API_KEY").ok())?
            .set_override_option("ai.model", std::env::var("GEMINI_MODEL").ok())?;

        let config = builder.build()?;
        let mut app_config: AppConfig = config.try_deserialize()?;

        // 处理工作线程数
        if app_config.server.workers == 0 {
            app_config.server.workers = num_cpus::get().min(app_config.server.max_workers);
        }

        Ok(app_config)
    }

    /// 获取全局配置实例
    pub fn get() -> &'static AppConfig {
        APP_CONFIG.get_or_init(|| {
            Self::load().unwrap_or_else(|e| {
                eprintln!("Failed to load configuration: {e}");
                std::process::exit(1);
            })
        })
    }

    /// 初始化配置 (在应用启动时调用)
    pub fn init() -> Result<(), ConfigError> {
        let config = Self::load()?;
        APP_CONFIG
            .set(config)
            .map_err(|_| ConfigError::Message("Configuration already initialized".to_string()))?;
        Ok(())
    }

    /// 检查是否为生产环境
    pub fn is_production(&self) -> bool {
        self.app.environment == "production"
    }

    /// 检查是否为开发环境
    pub fn is_development(&self) -> bool {
        self.app.environment == "development"
    }

    /// 获取服务器绑定地址
    pub fn server_bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// 获取 Unix 套接字路径 (如果配置了)
    #[cfg(unix)]
    pub fn unix_socket_path(&self) -> Option<&str> {
        if self.server.unix_socket_path.is_empty() {
            None
        } else {
            Some(&self.server.unix_socket_path)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_deserialize() {
        let config: AppConfig = with_defaults(Config::builder())
            .and_then(|b| b.build())
            .and_then(|c| c.try_deserialize())
            .expect("defaults should form a complete config");

        assert_eq!(config.ai.provider, "gemini");
        assert_eq!(config.ai.top_k, 40);
        assert!(config.policy.teacher_empty_class_fallback);
        assert!(config.upload.allowed_types.contains(&".pdf".to_string()));
    }
}
