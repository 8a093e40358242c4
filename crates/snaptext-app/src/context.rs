use std::sync::Arc;
use std::time::Duration;

use kanal::AsyncSender;
use snaptext_capture::{PrimaryScreen, ScreenSource};
use snaptext_engine::{Dispatch, EngineHandle};
use snaptext_io::clipboard::{ClipboardSink, NullClipboard, SystemClipboard};
use snaptext_translator::{Translator, WebTranslator};
use snaptext_types::{AppEvent, DisplayCommand};

use crate::state::AppState;

/// Bundles the session loop's collaborators so its signature stays small and
/// every seam can be swapped in tests.
pub struct SessionContext {
    pub state: Arc<AppState>,
    pub event_tx: AsyncSender<AppEvent>,
    pub display_tx: AsyncSender<DisplayCommand>,
    pub screen: Box<dyn ScreenSource>,
    pub dispatcher: Arc<dyn Dispatch>,
    pub clipboard: Box<dyn ClipboardSink>,
    pub translator: Option<Arc<dyn Translator>>,
}

impl SessionContext {
    /// Production wiring: primary screen, engine child process, system
    /// clipboard, web translator. Must run on the runtime; the engine launch
    /// spawns its worker tasks.
    pub async fn initialize(
        state: Arc<AppState>,
        event_tx: AsyncSender<AppEvent>,
        display_tx: AsyncSender<DisplayCommand>,
    ) -> Self {
        let (engine_config, translator_config) = {
            let config = state.config.read().await;
            (config.engine.clone(), config.translator.clone())
        };

        let dispatcher: Arc<dyn Dispatch> =
            Arc::new(EngineHandle::launch(&engine_config, event_tx.clone()));

        let clipboard: Box<dyn ClipboardSink> = match SystemClipboard::new() {
            Ok(clipboard) => Box::new(clipboard),
            Err(e) => {
                tracing::warn!("system clipboard unavailable: {e}");
                Box::new(NullClipboard)
            }
        };

        let translator: Option<Arc<dyn Translator>> = if translator_config.enabled {
            match WebTranslator::new(
                translator_config.endpoint.clone(),
                Duration::from_secs(translator_config.timeout_secs),
            ) {
                Ok(translator) => Some(Arc::new(translator)),
                Err(e) => {
                    tracing::warn!("translator unavailable: {e}");
                    None
                }
            }
        } else {
            None
        };

        Self {
            state,
            event_tx,
            display_tx,
            screen: Box::new(PrimaryScreen),
            dispatcher,
            clipboard,
            translator,
        }
    }
}
