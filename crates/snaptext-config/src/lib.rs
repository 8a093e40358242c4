use std::env;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use self::capture::CaptureConfig;
use self::engine::EngineConfig;
use self::translator::TranslatorConfig;

pub mod capture;
pub mod engine;
pub mod translator;

#[derive(Serialize, Deserialize)]
pub struct Config {
    pub engine: EngineConfig,
    pub translator: TranslatorConfig,
    pub capture: CaptureConfig,

    /// Hotkey poll interval for the blocking watcher loop
    pub hotkey_poll_ms: u64,
    /// Where saved captures land when no explicit path is given
    pub save_dir: PathBuf,
}

impl Config {
    pub fn new() -> Self {
        let hotkey_poll_ms = env::var("SNAPTEXT_HOTKEY_POLL_MS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(50);

        let save_dir = env::var("SNAPTEXT_SAVE_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("."));

        Config {
            engine: EngineConfig::new(),
            translator: TranslatorConfig::new(),
            capture: CaptureConfig::default(),

            hotkey_poll_ms,
            save_dir,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}
