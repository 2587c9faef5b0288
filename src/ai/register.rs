//! AI 提供方注册表

use crate::ai::{AiGenerator, disabled, gemini};
use crate::config::AiConfig;
use crate::errors::{Result, SchoolHubError};
use once_cell::sync::Lazy;
use std::{
    collections::HashMap,
    sync::{Arc, PoisonError, RwLock},
};
use tracing::{debug, warn};

pub type AiGeneratorConstructor =
    Arc<dyn Fn(&AiConfig) -> Result<Arc<dyn AiGenerator>> + Send + Sync>;

static AI_PROVIDER_REGISTRY: Lazy<RwLock<HashMap<String, AiGeneratorConstructor>>> =
    Lazy::new(|| RwLock::new(HashMap::new()));

pub fn register_ai_provider<S: Into<String>>(name: S, constructor: AiGeneratorConstructor) {
    let name = name.into();
    let mut registry = AI_PROVIDER_REGISTRY
        .write()
        .unwrap_or_else(PoisonError::into_inner);
    registry.insert(name, constructor);
}

pub fn get_ai_provider(name: &str) -> Option<AiGeneratorConstructor> {
    AI_PROVIDER_REGISTRY
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .get(name)
        .cloned()
}

/// 注册内置提供方
pub fn register_builtin_providers() {
    register_ai_provider(
        gemini::PROVIDER_NAME,
        Arc::new(|config: &AiConfig| {
            let generator: Arc<dyn AiGenerator> =
                Arc::new(gemini::GeminiGenerator::from_config(config)?);
            Ok(generator)
        }),
    );
    register_ai_provider(
        disabled::PROVIDER_NAME,
        Arc::new(|_: &AiConfig| {
            let generator: Arc<dyn AiGenerator> = Arc::new(disabled::DisabledGenerator);
            Ok(generator)
        }),
    );
}

pub fn debug_ai_provider_registry() {
    let registry = AI_PROVIDER_REGISTRY
        .read()
        .unwrap_or_else(PoisonError::into_inner);
    if registry.is_empty() {
        debug!("No AI providers registered.");
    } else {
        debug!("Registered AI providers:");
        for key in registry.keys() {
            debug!(" - {}", key);
        }
    }
}

fn build(name: &str, config: &AiConfig) -> Result<Arc<dyn AiGenerator>> {
    let constructor = get_ai_provider(name).ok_or_else(|| {
        SchoolHubError::ai_provider_not_found(format!("AI provider '{name}' not found in registry"))
    })?;
    constructor(config)
}

/// 按配置创建生成器，失败时回退为 disabled
pub fn create_ai_generator(config: &AiConfig) -> Arc<dyn AiGenerator> {
    match build(&config.provider, config) {
        Ok(generator) => {
            warn!("AI provider '{}' initialized", generator.name());
            generator
        }
        Err(e) => {
            warn!(
                "Failed to create AI provider '{}': {}, falling back to '{}'",
                config.provider,
                e,
                disabled::PROVIDER_NAME
            );
            Arc::new(disabled::DisabledGenerator)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(provider: &str, api_key: &str) -> AiConfig {
        AiConfig {
            provider: provider.to_string(),
            api_key: api_key.to_string(),
            base_url: "http://localhost:9".to_string(),
            model: "test-model".to_string(),
            temperature: 0.7,
            top_k: 40,
            top_p: 0.95,
            max_output_tokens: 2048,
        }
    }

    #[test]
    fn test_configured_provider_selected() {
        register_builtin_providers();
        let generator = create_ai_generator(&config("gemini", "key"));
        assert_eq!(generator.name(), gemini::PROVIDER_NAME);
    }

    #[test]
    fn test_unknown_or_unconfigured_provider_falls_back() {
        register_builtin_providers();
        assert_eq!(
            create_ai_generator(&config("openai", "key")).name(),
            disabled::PROVIDER_NAME
        );
        assert_eq!(
            create_ai_generator(&config("gemini", "")).name(),
            disabled::PROVIDER_NAME
        );
    }
}
