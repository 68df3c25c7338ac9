use crate::config::{Provider, ProviderConfig};
use crate::core::error::GlowError;
use crate::providers::{LLMProvider, openai_compatible::OpenAICompatibleProvider};
use std::collections::HashMap;

type ProviderCreator =
    Box<dyn Fn(&ProviderConfig, String) -> Result<Box<dyn LLMProvider>, GlowError> + Send + Sync>;

pub struct ProviderFactory {
    creators: HashMap<Provider, ProviderCreator>,
}

impl ProviderFactory {
    pub fn new() -> Self {
        let mut creators = HashMap::new();

        creators.insert(Provider::OpenAI, openai_style(Provider::OpenAI, None));
        creators.insert(Provider::DeepSeek, openai_style(Provider::DeepSeek, None));

        let mut openrouter_headers = HashMap::new();
        openrouter_headers.insert("X-Title".to_string(), "glowchat".to_string());
        creators.insert(
            Provider::OpenRouter,
            openai_style(Provider::OpenRouter, Some(openrouter_headers)),
        );

        Self { creators }
    }

    pub fn create(
        &self,
        provider: &Provider,
        config: &ProviderConfig,
    ) -> Result<Box<dyn LLMProvider>, GlowError> {
        let api_key = resolve_api_key(provider, config, |name| std::env::var(name).ok())?;
        self.creators
            .get(provider)
            .ok_or_else(|| GlowError::Config(format!("Provider not found: {:?}", provider)))
            .and_then(|creator| creator(config, api_key))
    }
}

fn openai_style(
    provider: Provider,
    extra_headers: Option<HashMap<String, String>>,
) -> ProviderCreator {
    Box::new(
        move |config: &ProviderConfig, api_key: String| -> Result<Box<dyn LLMProvider>, GlowError> {
            let base_url = config
                .base_url
                .clone()
                .unwrap_or_else(|| provider.default_base_url().to_string());
            let client = OpenAICompatibleProvider::new(
                provider.as_str(),
                base_url,
                api_key,
                extra_headers.clone(),
            )?;
            Ok(Box::new(client))
        },
    )
}

/// Config key first, then the provider's environment variable.
fn resolve_api_key(
    provider: &Provider,
    config: &ProviderConfig,
    env: impl Fn(&str) -> Option<String>,
) -> Result<String, GlowError> {
    config
        .api_key
        .clone()
        .or_else(|| env(provider.api_key_env()))
        .map(|key| key.trim().to_string())
        .filter(|key| !key.is_empty())
        .ok_or_else(|| {
            GlowError::Config(format!(
                "No API key for {}: set providers.{}.api_key or {}",
                provider.as_str(),
                provider.as_str(),
                provider.api_key_env()
            ))
        })
}
