use serde::{Deserialize, Serialize};

fn default_min_selection_px() -> u32 {
    5
}

fn default_scrim_opacity() -> f32 {
    0.4
}

#[derive(Serialize, Deserialize, Clone, Copy)]
#[serde(default)]
pub struct CaptureConfig {
    /// Selections narrower or shorter than this are treated as slips and reset.
    #[serde(default = "default_min_selection_px")]
    pub min_selection_px: u32,
    /// Darkness of the dimming layer over the frozen snapshot.
    #[serde(default = "default_scrim_opacity")]
    pub scrim_opacity: f32,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            min_selection_px: default_min_selection_px(),
            scrim_opacity: default_scrim_opacity(),
        }
    }
}
