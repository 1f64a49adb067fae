use serde::{Deserialize, Serialize};

/// Configuration for the assistant
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Config {
    /// Mistral API key
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Model override; the provider default is used when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

/// Log-safe view of the configuration, no secrets
#[derive(Debug, Clone)]
pub struct ConfigSummary {
    pub api_key_configured: bool,
    pub model: Option<String>,
}

impl Config {
    pub fn get_safe_summary(&self) -> ConfigSummary {
        ConfigSummary {
            api_key_configured: self.api_key.as_ref().is_some_and(|k| !k.is_empty()),
            model: self.model.clone(),
        }
    }
}
