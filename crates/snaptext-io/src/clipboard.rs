use std::borrow::Cow;

use anyhow::Result;
use arboard::{Clipboard, ImageData};
use snaptext_types::ImageBuffer;

/// Clipboard writes, only ever invoked from the session loop.
pub trait ClipboardSink: Send + Sync {
    fn set_text(&mut self, text: &str) -> Result<()>;
    fn set_image(&mut self, image: &ImageBuffer) -> Result<()>;
}

pub struct SystemClipboard {
    clipboard: Clipboard,
}

impl SystemClipboard {
    pub fn new() -> Result<Self> {
        Ok(Self {
            clipboard: Clipboard::new()?,
        })
    }
}

impl ClipboardSink for SystemClipboard {
    fn set_text(&mut self, text: &str) -> Result<()> {
        self.clipboard.set_text(text.to_string())?;
        Ok(())
    }

    fn set_image(&mut self, image: &ImageBuffer) -> Result<()> {
        self.clipboard.set_image(ImageData {
            width: image.width as usize,
            height: image.height as usize,
            bytes: Cow::Borrowed(&image.data),
        })?;
        Ok(())
    }
}

/// Stand-in when the system clipboard cannot be opened; writes are dropped.
pub struct NullClipboard;

impl ClipboardSink for NullClipboard {
    fn set_text(&mut self, _text: &str) -> Result<()> {
        Ok(())
    }

    fn set_image(&mut self, _image: &ImageBuffer) -> Result<()> {
        Ok(())
    }
}
