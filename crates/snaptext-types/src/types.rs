use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// Owned RGBA8 pixel buffer. Plain data; cropping and encoding live elsewhere.
#[derive(Clone, PartialEq, Eq)]
pub struct ImageBuffer {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

impl ImageBuffer {
    pub fn new(width: u32, height: u32, data: Vec<u8>) -> Self {
        Self {
            width,
            height,
            data,
        }
    }
}

impl fmt::Debug for ImageBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageBuffer")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("bytes", &self.data.len())
            .finish()
    }
}

/// Normalized rectangle in overlay-local pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Region {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Primary,
    Secondary,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerPhase {
    Down,
    Moved,
    Up,
}

/// Raw pointer input forwarded by the UI shell, overlay-local coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PointerInput {
    pub phase: PointerPhase,
    pub button: PointerButton,
    pub x: i32,
    pub y: i32,
}

/// Normalized result of one engine callback. Exactly one is emitted per submitted capture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecognitionOutcome {
    /// Substantive recognized text, newline-joined.
    Text(String),
    /// Block collection empty or no usable `text` fields.
    NoText,
    /// Too short and no alphanumeric/CJK content; suppressed as noise.
    Noise,
    /// Engine unavailable or response unparseable; human-readable detail.
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TranslationOutcome {
    Done(String),
    Failed(u16),
    NetworkError(String),
}

/// Everything that may mutate session state funnels through this event type
/// into the single session loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    /// Global hotkey fired.
    Trigger,
    /// Pointer input on the capture overlay.
    Pointer(PointerInput),
    /// Escape on the capture overlay.
    CancelCapture,
    /// Engine callback, correlated by capture sequence number.
    Recognition {
        seq: u64,
        outcome: RecognitionOutcome,
    },
    /// Translation task completion, correlated by capture sequence number.
    Translated {
        seq: u64,
        outcome: TranslationOutcome,
    },
    TranslateRequested,
    CopyImageRequested,
    SaveImageRequested(PathBuf),
    /// Escape on the result window or an intercepted window-close request.
    DismissRequested,
}

/// Text shown in the result view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionText {
    /// Dimmed hint shown while there is no content.
    Hint(String),
    /// Actual content, editable by the user.
    Body(String),
}

/// Ordered display updates applied by the UI shell. The session loop is the
/// only producer; the shell never mutates state on its own.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisplayCommand {
    ShowOverlay { snapshot: Arc<ImageBuffer> },
    /// Active selection to spotlight, `None` to clear it.
    OverlaySelection { rect: Option<Region> },
    /// Drop the overlay frame so the next paint is fully transparent.
    ClearOverlay,
    /// Force the transparent frame to actually render before hiding.
    FlushOverlay,
    HideOverlay,
    ShowSession { preview: Arc<ImageBuffer> },
    SessionText(SessionText),
    ClearSession,
    HideSession,
}
