use std::sync::Arc;

use anyhow::Result;
use snaptext_types::{
    DisplayCommand, ImageBuffer, PointerButton, PointerInput, PointerPhase, Region,
};

use crate::image_ops::crop;
use crate::snapshot::ScreenSource;

/// What a pointer transition produced: display updates to apply in order, and
/// possibly a finished capture to hand to the result pipeline.
#[derive(Debug, Default)]
pub struct PointerOutcome {
    pub commands: Vec<DisplayCommand>,
    pub capture: Option<ImageBuffer>,
}

/// Selection state machine for the full-screen capture surface.
///
/// Owns the frozen snapshot while the overlay is up and turns pointer input
/// into `DisplayCommand`s. It never touches a window itself; the UI shell
/// applies the commands in the order they are emitted, which is what makes
/// the transparent-frame-before-hide sequence reliable.
pub struct CaptureOverlay {
    min_selection: u32,
    snapshot: Option<Arc<ImageBuffer>>,
    start: Option<(i32, i32)>,
    end: Option<(i32, i32)>,
    is_selecting: bool,
}

impl CaptureOverlay {
    pub fn new(min_selection: u32) -> Self {
        Self {
            min_selection,
            snapshot: None,
            start: None,
            end: None,
            is_selecting: false,
        }
    }

    /// Begin a capture: reset selection state, grab a fresh snapshot, then
    /// show the surface. The grab happens before `ShowOverlay` goes out so the
    /// first paint already shows the new frame, never a stale one.
    pub fn start_capture(&mut self, source: &mut dyn ScreenSource) -> Result<Vec<DisplayCommand>> {
        self.start = None;
        self.end = None;
        self.is_selecting = false;
        self.snapshot = None;

        let snapshot = Arc::new(source.grab()?);
        self.snapshot = Some(snapshot.clone());

        Ok(vec![DisplayCommand::ShowOverlay { snapshot }])
    }

    pub fn pointer(&mut self, input: PointerInput) -> PointerOutcome {
        // Without a snapshot the surface is hidden; stray input means nothing.
        if self.snapshot.is_none() {
            return PointerOutcome::default();
        }

        match (input.phase, input.button) {
            (PointerPhase::Down, PointerButton::Secondary) => PointerOutcome {
                commands: self.close_and_clear(),
                capture: None,
            },
            (PointerPhase::Down, PointerButton::Primary) => {
                self.start = Some((input.x, input.y));
                self.end = Some((input.x, input.y));
                self.is_selecting = true;
                PointerOutcome {
                    commands: vec![DisplayCommand::OverlaySelection {
                        rect: self.normalized_selection(),
                    }],
                    capture: None,
                }
            }
            (PointerPhase::Moved, _) => {
                if !self.is_selecting {
                    return PointerOutcome::default();
                }
                self.end = Some((input.x, input.y));
                PointerOutcome {
                    commands: vec![DisplayCommand::OverlaySelection {
                        rect: self.normalized_selection(),
                    }],
                    capture: None,
                }
            }
            (PointerPhase::Up, PointerButton::Primary) => {
                if !self.is_selecting {
                    return PointerOutcome::default();
                }
                self.finish_selection()
            }
            (PointerPhase::Up, PointerButton::Secondary) => PointerOutcome::default(),
        }
    }

    /// Escape on the overlay: discard everything, emit no capture.
    pub fn cancel(&mut self) -> Vec<DisplayCommand> {
        if self.snapshot.is_none() {
            return Vec::new();
        }
        self.close_and_clear()
    }

    /// Lifecycle teardown: drop the snapshot without any display traffic.
    /// Only the lifecycle module calls this.
    pub fn release_snapshot(&mut self) {
        self.snapshot = None;
        self.start = None;
        self.end = None;
        self.is_selecting = false;
    }

    pub fn has_snapshot(&self) -> bool {
        self.snapshot.is_some()
    }

    fn finish_selection(&mut self) -> PointerOutcome {
        let rect = match self.normalized_selection() {
            Some(rect) => rect,
            None => return PointerOutcome::default(),
        };

        if rect.width < self.min_selection || rect.height < self.min_selection {
            // Treated as a slip: reset the selection, keep the overlay open.
            self.start = None;
            self.end = None;
            self.is_selecting = false;
            return PointerOutcome {
                commands: vec![DisplayCommand::OverlaySelection { rect: None }],
                capture: None,
            };
        }

        let snapshot = match self.snapshot.clone() {
            Some(snapshot) => snapshot,
            None => return PointerOutcome::default(),
        };

        match crop(&snapshot, rect) {
            Ok(capture) => {
                // Crop first: close_and_clear drops the snapshot, and the full
                // frame and the cropped result must not both stay alive after.
                drop(snapshot);
                PointerOutcome {
                    commands: self.close_and_clear(),
                    capture: Some(capture),
                }
            }
            Err(e) => {
                tracing::error!("failed to crop selection: {e}");
                self.start = None;
                self.end = None;
                self.is_selecting = false;
                PointerOutcome {
                    commands: vec![DisplayCommand::OverlaySelection { rect: None }],
                    capture: None,
                }
            }
        }
    }

    /// Release the snapshot, then render one transparent frame and flush it
    /// before the window hides. Hiding while the last presented frame still
    /// shows the snapshot lets the compositor re-show that stale frame on the
    /// next capture.
    fn close_and_clear(&mut self) -> Vec<DisplayCommand> {
        self.snapshot = None;
        self.start = None;
        self.end = None;
        self.is_selecting = false;

        vec![
            DisplayCommand::ClearOverlay,
            DisplayCommand::FlushOverlay,
            DisplayCommand::HideOverlay,
        ]
    }

    fn normalized_selection(&self) -> Option<Region> {
        let (start, end) = (self.start?, self.end?);
        Some(normalize(start, end))
    }
}

fn normalize(a: (i32, i32), b: (i32, i32)) -> Region {
    let ax = a.0.max(0) as u32;
    let ay = a.1.max(0) as u32;
    let bx = b.0.max(0) as u32;
    let by = b.1.max(0) as u32;

    let x = ax.min(bx);
    let y = ay.min(by);
    Region {
        x,
        y,
        width: ax.max(bx) - x,
        height: ay.max(by) - y,
    }
}
