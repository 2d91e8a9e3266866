use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Environment variable naming an optional YAML config file.
pub const CONFIG_PATH_ENV: &str = "SOLSCRIBE_CONFIG";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SummarizerConfig {
    #[serde(default)]
    pub provider: ProviderConfig,

    #[serde(default)]
    pub chain: ChainConfig,

    #[serde(default)]
    pub lookup: LookupConfig,

    #[serde(default)]
    pub global: GlobalSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderConfig {
    #[serde(default = "default_model")]
    pub model: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>, // If not provided, use OPENAI_API_KEY env var

    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>, // For custom endpoints
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChainConfig {
    #[serde(default = "default_network")]
    pub network: String,

    /// Overrides the Infura URL derived from `network` and `infura_api_key`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rpc_url: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub infura_api_key: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LookupConfig {
    #[serde(default = "default_etherscan_url")]
    pub base_url: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlobalSettings {
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,

    #[serde(default = "default_retry_attempts")]
    pub retry_attempts: u32,
}

fn default_model() -> String {
    "gpt-4o-mini".to_string()
}
fn default_network() -> String {
    "Sepolia".to_string()
}
fn default_etherscan_url() -> String {
    "https://api-sepolia.etherscan.io/api".to_string()
}
fn default_temperature() -> f32 {
    0.2
}
fn default_max_tokens() -> u32 {
    1500
}
fn default_timeout_seconds() -> u64 {
    30
}
fn default_retry_attempts() -> u32 {
    3
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            api_key: None,
            base_url: None,
        }
    }
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            network: default_network(),
            rpc_url: None,
            infura_api_key: None,
        }
    }
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            base_url: default_etherscan_url(),
            api_key: None,
        }
    }
}

impl Default for GlobalSettings {
    fn default() -> Self {
        Self {
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            timeout_seconds: default_timeout_seconds(),
            retry_attempts: default_retry_attempts(),
        }
    }
}

impl ChainConfig {
    pub fn endpoint(&self) -> String {
        match &self.rpc_url {
            Some(url) => url.clone(),
            None => format!(
                "https://{}.infura.io/v3/{}",
                self.network.to_lowercase(),
                self.infura_api_key.as_deref().unwrap_or_default()
            ),
        }
    }
}

impl GlobalSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

impl SummarizerConfig {
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Self = serde_yaml::from_str(&content)
            .with_context(|| format!("Invalid config file: {}", path.display()))?;
        Ok(config)
    }

    /// Defaults, then the file named by `SOLSCRIBE_CONFIG` if set, then
    /// environment overrides.
    pub fn load() -> Result<Self> {
        let mut config = match std::env::var(CONFIG_PATH_ENV) {
            Ok(path) if !path.is_empty() => Self::from_yaml_file(path)?,
            _ => Self::default(),
        };
        config.apply_env_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Missing keys are not an error here; they surface later as
    /// authentication failures from the respective service.
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|value| !value.is_empty());

        if let Some(key) = var("OPENAI_API_KEY") {
            self.provider.api_key = Some(key);
        }
        if let Some(key) = var("INFURA_API_KEY") {
            self.chain.infura_api_key = Some(key);
        }
        if let Some(key) = var("ETHERSCAN_API_KEY") {
            self.lookup.api_key = Some(key);
        }
        if let Some(model) = var("SOLSCRIBE_MODEL") {
            self.provider.model = model;
        }
        if let Some(url) = var("SOLSCRIBE_OPENAI_BASE_URL") {
            self.provider.base_url = Some(url);
        }
        if let Some(url) = var("SOLSCRIBE_RPC_URL") {
            self.chain.rpc_url = Some(url);
        }
        if let Some(url) = var("SOLSCRIBE_ETHERSCAN_URL") {
            self.lookup.base_url = url;
        }
        if let Some(timeout) = var("SOLSCRIBE_TIMEOUT_SECONDS") {
            if let Ok(t) = timeout.parse::<u64>() {
                self.global.timeout_seconds = t;
            }
        }
    }

    pub fn save_yaml(&self, path: impl AsRef<Path>) -> Result<()> {
        let content = serde_yaml::to_string(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

pub const EXAMPLE_CONFIG: &str = r#"
# solscribe configuration

provider:
  model: gpt-4o-mini
  # api_key: sk-...  # Optional, defaults to OPENAI_API_KEY env var
  # base_url: https://api.openai.com/v1

chain:
  network: Sepolia
  # rpc_url: https://sepolia.infura.io/v3/<key>  # Optional, derived from INFURA_API_KEY

lookup:
  base_url: https://api-sepolia.etherscan.io/api
  # api_key: ...  # Optional, defaults to ETHERSCAN_API_KEY env var

global:
  temperature: 0.2
  max_tokens: 1500
  timeout_seconds: 30
  retry_attempts: 3
"#;
