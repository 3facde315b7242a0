use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::constants::{api, env, history, retry, sampling};
use crate::context::{ConversationStore, PromptTemplate};
use crate::error::DeepChatError;
use crate::llm::{AzureInferenceClient, ChatParams, RetryPolicy};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub template: PromptTemplate,
    #[serde(default)]
    pub llm: LlmSettings,
    #[serde(default)]
    pub sampling: SamplingSettings,
    #[serde(default)]
    pub history: HistorySettings,
    #[serde(default)]
    pub retry: RetrySettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmSettings {
    /// Deployment URL without `/v1/chat/completions`.
    pub endpoint: Option<String>,
    /// Env var consulted when `endpoint` is unset.
    pub endpoint_env: String,
    pub api_key_env: String,
    pub api_version: String,
    pub model: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SamplingSettings {
    pub temperature: f32,
    pub top_p: f32,
    pub max_tokens: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HistorySettings {
    pub enabled: bool,
    pub path: PathBuf,
    pub max_history: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrySettings {
    pub max_attempts: u32,
    pub min_delay_secs: u64,
    pub max_delay_secs: u64,
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            endpoint: None,
            endpoint_env: env::ENDPOINT.to_string(),
            api_key_env: env::API_KEY.to_string(),
            api_version: api::API_VERSION.to_string(),
            model: None,
        }
    }
}

impl Default for SamplingSettings {
    fn default() -> Self {
        Self {
            temperature: sampling::TEMPERATURE,
            top_p: sampling::TOP_P,
            max_tokens: sampling::MAX_TOKENS,
        }
    }
}

impl Default for HistorySettings {
    fn default() -> Self {
        Self {
            enabled: true,
            path: PathBuf::from(history::FILE_NAME),
            max_history: history::MAX_HISTORY,
        }
    }
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self {
            max_attempts: retry::MAX_ATTEMPTS,
            min_delay_secs: retry::MIN_DELAY_SECS,
            max_delay_secs: retry::MAX_DELAY_SECS,
        }
    }
}

impl Settings {
    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("deepchat")
            .join("config.toml")
    }

    /// Load from the default location, falling back to defaults.
    pub fn load() -> Self {
        Self::load_from(&Self::config_path())
    }

    pub fn load_from(path: &Path) -> Self {
        if path.exists() {
            match std::fs::read_to_string(path) {
                Ok(content) => match toml::from_str(&content) {
                    Ok(config) => return config,
                    Err(e) => tracing::warn!("Ignoring invalid config {}: {}", path.display(), e),
                },
                Err(e) => tracing::warn!("Could not read config {}: {}", path.display(), e),
            }
        }
        Self::default()
    }

    pub fn save_to(&self, path: &Path) -> Result<(), DeepChatError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| DeepChatError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Get the API key from the environment variable specified in settings.
    /// An empty value counts as missing.
    pub fn api_key(&self) -> Option<String> {
        std::env::var(&self.llm.api_key_env)
            .ok()
            .filter(|k| !k.trim().is_empty())
    }

    /// The configured endpoint, else the one in the endpoint env var.
    pub fn endpoint(&self) -> Option<String> {
        self.llm
            .endpoint
            .clone()
            .or_else(|| std::env::var(&self.llm.endpoint_env).ok())
            .filter(|e| !e.trim().is_empty())
    }

    pub fn chat_params(&self) -> ChatParams {
        ChatParams {
            temperature: self.sampling.temperature,
            top_p: self.sampling.top_p,
            max_tokens: self.sampling.max_tokens,
        }
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.retry.max_attempts.max(1),
            min_delay: Duration::from_secs(self.retry.min_delay_secs),
            max_delay: Duration::from_secs(self.retry.max_delay_secs),
        }
    }

    /// Build the inference client. Fails before any network traffic when the
    /// credential or endpoint is missing.
    pub fn build_llm_client(&self) -> Result<AzureInferenceClient, DeepChatError> {
        let api_key = self.api_key().ok_or_else(|| {
            DeepChatError::Config(format!(
                "no API key found; set {} to the key shown for your deployment in the Azure AI portal",
                self.llm.api_key_env
            ))
        })?;
        let endpoint = self.endpoint().ok_or_else(|| {
            DeepChatError::Config(format!(
                "no endpoint configured; set {} or llm.endpoint in {}",
                self.llm.endpoint_env,
                Self::config_path().display()
            ))
        })?;

        let mut client =
            AzureInferenceClient::new(endpoint, api_key).with_api_version(&self.llm.api_version);
        if let Some(ref model) = self.llm.model {
            client = client.with_model(model);
        }
        Ok(client)
    }

    /// Open the conversation store these settings describe.
    pub fn build_store(&self) -> Result<ConversationStore, DeepChatError> {
        if self.history.enabled {
            ConversationStore::open(&self.history.path, self.history.max_history)
        } else {
            ConversationStore::in_memory(self.history.max_history)
        }
    }
}
