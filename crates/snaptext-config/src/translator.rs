use std::env;

use serde::{Deserialize, Serialize};

fn default_enabled() -> bool {
    true
}

fn default_endpoint() -> String {
    "https://translate.googleapis.com/translate_a/single".to_string()
}

fn default_target_lang() -> String {
    "zh-CN".to_string()
}

fn default_timeout_secs() -> u64 {
    5
}

#[derive(Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct TranslatorConfig {
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    /// Source language is always auto-detected; only the target is configurable.
    #[serde(default = "default_target_lang")]
    pub target_lang: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl TranslatorConfig {
    pub fn new() -> Self {
        let endpoint = env::var("SNAPTEXT_TRANSLATE_ENDPOINT").unwrap_or_else(|_| default_endpoint());
        let target_lang =
            env::var("SNAPTEXT_TRANSLATE_TARGET").unwrap_or_else(|_| default_target_lang());
        let timeout_secs = env::var("SNAPTEXT_TRANSLATE_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or_else(default_timeout_secs);

        Self {
            enabled: default_enabled(),
            endpoint,
            target_lang,
            timeout_secs,
        }
    }
}

impl Default for TranslatorConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            endpoint: default_endpoint(),
            target_lang: default_target_lang(),
            timeout_secs: default_timeout_secs(),
        }
    }
}
