use std::env;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

fn default_temp_dir() -> PathBuf {
    env::temp_dir().join("snaptext")
}

/// Paths for the out-of-process recognition engine. `exe_path` unset means the
/// engine stays unavailable and every submit degrades to an inline failure.
#[derive(Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct EngineConfig {
    pub exe_path: Option<PathBuf>,
    /// Working directory the engine is started in, usually next to its models.
    pub lib_dir: Option<PathBuf>,
    #[serde(default = "default_temp_dir")]
    pub temp_dir: PathBuf,
}

impl EngineConfig {
    pub fn new() -> Self {
        let exe_path = env::var("SNAPTEXT_ENGINE_EXE").ok().map(PathBuf::from);
        let lib_dir = env::var("SNAPTEXT_ENGINE_LIBS").ok().map(PathBuf::from);
        let temp_dir = env::var("SNAPTEXT_TEMP_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| default_temp_dir());

        Self {
            exe_path,
            lib_dir,
            temp_dir,
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            exe_path: None,
            lib_dir: None,
            temp_dir: default_temp_dir(),
        }
    }
}
