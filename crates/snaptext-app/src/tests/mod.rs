//! Session-level tests driving the event loop over channels with every
//! external seam (screen, engine, clipboard, translator) faked.

mod session_tests;

use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::Result;
use kanal::AsyncReceiver;
use snaptext_capture::ScreenSource;
use snaptext_engine::Dispatch;
use snaptext_io::clipboard::ClipboardSink;
use snaptext_translator::{TranslateError, Translator};
use snaptext_types::{DisplayCommand, ImageBuffer};
use tokio::time::timeout;

pub(crate) fn gradient(width: u32, height: u32) -> ImageBuffer {
    let mut data = Vec::with_capacity((width * height * 4) as usize);
    for y in 0..height {
        for x in 0..width {
            data.extend_from_slice(&[
                (x % 256) as u8,
                (y % 256) as u8,
                ((x + y) % 256) as u8,
                255,
            ]);
        }
    }
    ImageBuffer::new(width, height, data)
}

pub(crate) struct TestScreen {
    pub frame: ImageBuffer,
}

impl ScreenSource for TestScreen {
    fn grab(&mut self) -> Result<ImageBuffer> {
        Ok(self.frame.clone())
    }
}

#[derive(Clone, Default)]
pub(crate) struct RecordingClipboard {
    pub texts: Arc<Mutex<Vec<String>>>,
    pub images: Arc<Mutex<Vec<(u32, u32)>>>,
}

impl ClipboardSink for RecordingClipboard {
    fn set_text(&mut self, text: &str) -> Result<()> {
        self.texts.lock().unwrap().push(text.to_string());
        Ok(())
    }

    fn set_image(&mut self, image: &ImageBuffer) -> Result<()> {
        self.images.lock().unwrap().push((image.width, image.height));
        Ok(())
    }
}

#[derive(Clone, Default)]
pub(crate) struct RecordingDispatcher {
    pub submitted: Arc<Mutex<Vec<(u64, u32, u32)>>>,
}

#[async_trait::async_trait]
impl Dispatch for RecordingDispatcher {
    async fn submit(&self, image: Arc<ImageBuffer>, seq: u64) {
        self.submitted
            .lock()
            .unwrap()
            .push((seq, image.width, image.height));
    }
}

/// Succeeds with a marker string so tests can see what was requested.
pub(crate) struct EchoTranslator;

#[async_trait::async_trait]
impl Translator for EchoTranslator {
    async fn translate(&self, text: &str, _from: &str, to: &str) -> Result<String, TranslateError> {
        Ok(format!("<{text}:{to}>"))
    }
}

pub(crate) struct FailingTranslator(pub u16);

#[async_trait::async_trait]
impl Translator for FailingTranslator {
    async fn translate(
        &self,
        _text: &str,
        _from: &str,
        _to: &str,
    ) -> Result<String, TranslateError> {
        Err(TranslateError::Http(self.0))
    }
}

pub(crate) async fn next_command(rx: &AsyncReceiver<DisplayCommand>) -> DisplayCommand {
    timeout(Duration::from_secs(2), rx.recv())
        .await
        .expect("timed out waiting for display command")
        .expect("display channel closed")
}
