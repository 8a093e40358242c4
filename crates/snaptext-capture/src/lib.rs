mod hotkey;
mod image_ops;
mod overlay;
mod snapshot;

pub use hotkey::HotkeyManager;
pub use image_ops::crop;
pub use overlay::{CaptureOverlay, PointerOutcome};
pub use snapshot::{PrimaryScreen, ScreenSource};
