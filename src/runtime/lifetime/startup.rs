use crate::ai::AiGenerator;
use crate::ai::register::{create_ai_generator, debug_ai_provider_registry, register_builtin_providers};
use crate::config::AppConfig;
use crate::extraction::{DocumentExtractor, TextExtractor};
use crate::models::users::entities::UserRole;
use crate::models::users::requests::CreateUserRequest;
use crate::storage::Storage;
use std::io;
use std::sync::Arc;
use tracing::{debug, info, warn};

const DEFAULT_ADMIN_EMAIL: &str = "admin@schoolhub.local";

pub struct StartupContext {
    pub storage: Arc<dyn Storage>,
    pub ai: Arc<dyn AiGenerator>,
    pub extractor: Arc<dyn TextExtractor>,
}

/// 用户目录为空时创建默认管理层账号
///
/// 开发环境下额外打印一个访问令牌，方便首次调用接口。
async fn seed_management(storage: &Arc<dyn Storage>) {
    match storage.count_users().await {
        Ok(count) if count > 0 => {
            debug!(
                "Directory already has {} user(s), skipping management seed",
                count
            );
            return;
        }
        Ok(_) => {
            info!("No users found in directory, creating default management account...");
        }
        Err(e) => {
            warn!("Failed to count users: {}, skipping management seed", e);
            return;
        }
    }

    let email = std::env::var("ADMIN_EMAIL").unwrap_or_else(|_| DEFAULT_ADMIN_EMAIL.to_string());
    let admin_request = CreateUserRequest {
        name: "Administrator".to_string(),
        email,
        role: UserRole::Management,
        class_id: None,
        roll_number: None,
    };

    let user = match storage.create_user(admin_request).await {
        Ok(user) => user,
        Err(e) => {
            warn!("Failed to create management account: {}", e);
            return;
        }
    };
    info!(
        "Default management account created (ID: {}, email: {})",
        user.id, user.email
    );

    if AppConfig::get().is_development() {
        match user.generate_access_token() {
            Ok(token) => {
                warn!("==========================================================");
                warn!("  DEVELOPMENT BOOTSTRAP TOKEN (management)");
                warn!("  {}", token);
                warn!("==========================================================");
            }
            Err(e) => warn!("Failed to generate bootstrap token: {}", e),
        }
    }
}

/// 准备服务器启动的上下文：存储、AI 生成器与文本提取器
pub async fn prepare_server_startup() -> io::Result<StartupContext> {
    rustls::crypto::ring::default_provider()
        .install_default()
        .map_err(|_| io::Error::other("Failed to install rustls crypto provider"))?;

    register_builtin_providers();
    if cfg!(debug_assertions) {
        debug_ai_provider_registry();
    }

    let storage = crate::storage::create_storage()
        .await
        .map_err(|e| io::Error::other(format!("Failed to create storage backend: {e}")))?;
    warn!("Storage backend initialized and migrations completed");

    seed_management(&storage).await;

    let ai = create_ai_generator(&AppConfig::get().ai);
    let extractor: Arc<dyn TextExtractor> = Arc::new(DocumentExtractor);

    Ok(StartupContext {
        storage,
        ai,
        extractor,
    })
}
