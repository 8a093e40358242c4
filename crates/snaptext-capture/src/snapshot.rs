use anyhow::{Context, Result};
use snaptext_types::ImageBuffer;
use xcap::Monitor;

/// Source of full-screen snapshots. The overlay takes one per capture and
/// holds it until `close_and_clear`.
pub trait ScreenSource: Send {
    fn grab(&mut self) -> Result<ImageBuffer>;
}

/// Grabs the primary monitor.
pub struct PrimaryScreen;

impl ScreenSource for PrimaryScreen {
    fn grab(&mut self) -> Result<ImageBuffer> {
        let monitors = Monitor::all().context("Failed to get monitors")?;
        let monitor = monitors.first().context("No monitor found")?;

        let image = monitor.capture_image().context("Failed to capture screen")?;
        Ok(ImageBuffer::new(
            image.width(),
            image.height(),
            image.into_raw(),
        ))
    }
}
