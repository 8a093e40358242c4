use std::path::Path;
use std::sync::Arc;

use kanal::AsyncSender;
use snaptext_config::translator::TranslatorConfig;
use snaptext_engine::Dispatch;
use snaptext_io::clipboard::ClipboardSink;
use snaptext_translator::{TranslateError, Translator};
use snaptext_types::{
    AppEvent, DisplayCommand, ImageBuffer, RecognitionOutcome, SessionText, TranslationOutcome,
};

pub const HINT_RECOGNIZING: &str = "Recognizing…";
pub const HINT_NO_TEXT: &str = "No text detected";
pub const HINT_NOISE: &str = "No text recognized (noise filtered)";

const TRANSLATING_MARKER: &str = "--- translating ---";
const TRANSLATION_SEPARATOR: &str = "=== Translation ===";

/// Single owner of what is currently shown: the captured image and the
/// recognized text. Every mutation happens on the session loop; background
/// work only reports back through the event channel.
pub struct ResultController {
    image: Option<Arc<ImageBuffer>>,
    text: Option<String>,
    seq: u64,
    display_tx: AsyncSender<DisplayCommand>,
    event_tx: AsyncSender<AppEvent>,
    clipboard: Box<dyn ClipboardSink>,
    dispatcher: Arc<dyn Dispatch>,
    translator: Option<Arc<dyn Translator>>,
    translator_config: TranslatorConfig,
}

impl ResultController {
    pub fn new(
        display_tx: AsyncSender<DisplayCommand>,
        event_tx: AsyncSender<AppEvent>,
        clipboard: Box<dyn ClipboardSink>,
        dispatcher: Arc<dyn Dispatch>,
        translator: Option<Arc<dyn Translator>>,
        translator_config: TranslatorConfig,
    ) -> Self {
        Self {
            image: None,
            text: None,
            seq: 0,
            display_tx,
            event_tx,
            clipboard,
            dispatcher,
            translator,
            translator_config,
        }
    }

    /// Take ownership of a fresh capture: show the preview, reset the text to
    /// the recognizing placeholder, then hand the buffer to the engine under a
    /// new sequence number. Anything still in flight for the previous capture
    /// is stale from here on.
    pub async fn process_capture(&mut self, capture: ImageBuffer) {
        self.seq += 1;
        let image = Arc::new(capture);
        self.image = Some(image.clone());
        self.text = None;

        let _ = self
            .display_tx
            .send(DisplayCommand::ShowSession {
                preview: image.clone(),
            })
            .await;
        self.show_hint(HINT_RECOGNIZING).await;

        self.dispatcher.submit(image, self.seq).await;
    }

    pub async fn on_recognition(&mut self, seq: u64, outcome: RecognitionOutcome) {
        if seq != self.seq {
            tracing::debug!("discarding stale recognition result (seq {seq}, current {})", self.seq);
            return;
        }

        match outcome {
            RecognitionOutcome::Text(text) => {
                self.text = Some(text.clone());

                // Deliberate convenience: substantive results land on the
                // clipboard without an extra click.
                if let Err(e) = self.clipboard.set_text(&text) {
                    tracing::warn!("clipboard write failed: {e:#}");
                }

                self.show_body(text).await;
            }
            RecognitionOutcome::NoText => {
                self.text = None;
                self.show_hint(HINT_NO_TEXT).await;
            }
            RecognitionOutcome::Noise => {
                self.text = None;
                self.show_hint(HINT_NOISE).await;
            }
            RecognitionOutcome::Failed(message) => {
                self.text = None;
                self.show_body(message).await;
            }
        }
    }

    /// Kick off a translation of the displayed text on its own task. No-op
    /// without substantive text or with translation disabled.
    pub async fn translate(&mut self) {
        let Some(text) = self.text.clone() else {
            return;
        };
        if !self.translator_config.enabled {
            return;
        }
        let Some(translator) = self.translator.clone() else {
            return;
        };

        self.show_body(format!("{text}\n\n{TRANSLATING_MARKER}")).await;

        let seq = self.seq;
        let target = self.translator_config.target_lang.clone();
        let event_tx = self.event_tx.clone();
        tokio::spawn(async move {
            let outcome = match translator.translate(&text, "auto", &target).await {
                Ok(translated) => TranslationOutcome::Done(translated),
                Err(TranslateError::Http(status)) => TranslationOutcome::Failed(status),
                Err(e) => TranslationOutcome::NetworkError(e.to_string()),
            };
            if let Err(e) = event_tx.send(AppEvent::Translated { seq, outcome }).await {
                tracing::error!("failed to deliver translation result: {e}");
            }
        });
    }

    pub async fn on_translated(&mut self, seq: u64, outcome: TranslationOutcome) {
        if seq != self.seq {
            tracing::debug!("discarding stale translation result (seq {seq}, current {})", self.seq);
            return;
        }
        let Some(base) = self.text.clone() else {
            return;
        };

        let body = match outcome {
            TranslationOutcome::Done(translated) => {
                format!("{base}\n\n{TRANSLATION_SEPARATOR}\n{translated}")
            }
            TranslationOutcome::Failed(status) => {
                format!("{base}\n\n[translation failed] {status}")
            }
            TranslationOutcome::NetworkError(detail) => {
                format!("{base}\n\n[network error] {detail}")
            }
        };
        self.show_body(body).await;
    }

    /// Copy the current capture to the clipboard. Returns whether there was
    /// one, so the caller can chain the hide.
    pub async fn copy_image(&mut self) -> bool {
        let Some(image) = self.image.clone() else {
            return false;
        };
        if let Err(e) = self.clipboard.set_image(&image) {
            tracing::warn!("clipboard image write failed: {e:#}");
        }
        true
    }

    pub async fn save_image(&self, path: &Path) {
        let Some(image) = self.image.clone() else {
            return;
        };
        let path = path.to_path_buf();
        let result =
            tokio::task::spawn_blocking(move || snaptext_io::files::save_png(&path, &image)).await;
        match result {
            Ok(Ok(())) => tracing::info!("capture saved"),
            Ok(Err(e)) => tracing::error!("saving capture failed: {e:#}"),
            Err(e) => tracing::error!("save task failed: {e}"),
        }
    }

    /// Drop the displayed image and text. Only the lifecycle module calls
    /// this; the overlay snapshot has to be released in the same breath.
    pub fn release(&mut self) {
        self.image = None;
        self.text = None;
    }

    pub fn has_image(&self) -> bool {
        self.image.is_some()
    }

    pub fn has_text(&self) -> bool {
        self.text.is_some()
    }

    pub fn current_seq(&self) -> u64 {
        self.seq
    }

    async fn show_hint(&self, hint: &str) {
        let _ = self
            .display_tx
            .send(DisplayCommand::SessionText(SessionText::Hint(
                hint.to_string(),
            )))
            .await;
    }

    async fn show_body(&self, body: String) {
        let _ = self
            .display_tx
            .send(DisplayCommand::SessionText(SessionText::Body(body)))
            .await;
    }
}
