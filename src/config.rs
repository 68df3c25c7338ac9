use crate::core::error::GlowError;
use crate::history::DEFAULT_HISTORY_LIMIT;
use crate::providers::CompletionParams;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    OpenAI,
    OpenRouter,
    DeepSeek,
}

impl Provider {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "openai" => Some(Provider::OpenAI),
            "openrouter" => Some(Provider::OpenRouter),
            "deepseek" => Some(Provider::DeepSeek),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::OpenAI => "openai",
            Provider::OpenRouter => "openrouter",
            Provider::DeepSeek => "deepseek",
        }
    }

    pub fn default_base_url(&self) -> &'static str {
        match self {
            Provider::OpenAI => "https://api.openai.com/v1",
            Provider::OpenRouter => "https://openrouter.ai/api/v1",
            Provider::DeepSeek => "https://api.deepseek.com/v1",
        }
    }

    pub fn default_model(&self) -> &'static str {
        match self {
            Provider::OpenAI => "gpt-4",
            Provider::OpenRouter => "openai/gpt-4",
            Provider::DeepSeek => "deepseek-chat",
        }
    }

    /// Environment variable consulted when the config has no key.
    pub fn api_key_env(&self) -> &'static str {
        match self {
            Provider::OpenAI => "OPENAI_API_KEY",
            Provider::OpenRouter => "OPENROUTER_API_KEY",
            Provider::DeepSeek => "DEEPSEEK_API_KEY",
        }
    }
}

impl Default for Provider {
    fn default() -> Self {
        Provider::OpenAI
    }
}

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub model: Option<String>,
}

fn default_catalog_path() -> PathBuf {
    PathBuf::from("products.json")
}

fn default_history_limit() -> usize {
    DEFAULT_HISTORY_LIMIT
}

fn default_routine_params() -> CompletionParams {
    CompletionParams::ROUTINE
}

fn default_question_params() -> CompletionParams {
    CompletionParams::QUESTION
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub active_provider: Option<Provider>,
    #[serde(default)]
    pub providers: HashMap<Provider, ProviderConfig>,
    #[serde(default = "default_catalog_path")]
    pub catalog_path: PathBuf,
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,
    #[serde(default = "default_routine_params")]
    pub routine: CompletionParams,
    #[serde(default = "default_question_params")]
    pub question: CompletionParams,
    /// Replaces the built-in topic keywords when non-empty.
    #[serde(default)]
    pub topic_keywords: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            active_provider: None,
            providers: HashMap::new(),
            catalog_path: default_catalog_path(),
            history_limit: default_history_limit(),
            routine: default_routine_params(),
            question: default_question_params(),
            topic_keywords: Vec::new(),
        }
    }
}

impl Config {
    fn config_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".glowchat")
    }

    pub fn config_path() -> PathBuf {
        Self::config_dir().join("config.yaml")
    }

    /// Loads the user config, writing a default file on first run.
    pub fn load() -> Result<Config, GlowError> {
        Self::load_from(&Self::config_path())
    }

    pub fn load_from(path: &Path) -> Result<Config, GlowError> {
        if path.exists() {
            let contents = fs::read_to_string(path)?;
            let config = serde_yml::from_str::<Config>(&contents)
                .map_err(|e| GlowError::Config(format!("Parse {}: {}", path.display(), e)))?;
            tracing::debug!(path = %path.display(), "config loaded");
            return Ok(config);
        }

        let config = Config::default();
        if let Err(e) = config.save_to(path) {
            tracing::warn!(path = %path.display(), error = %e, "could not write default config");
        }
        Ok(config)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), GlowError> {
        if let Some(parent) = path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        let yaml_content = serde_yml::to_string(self)?;
        fs::write(path, yaml_content)?;
        Ok(())
    }

    pub fn provider_config(&self, provider: Provider) -> ProviderConfig {
        self.providers.get(&provider).cloned().unwrap_or_default()
    }
}
