use std::sync::Arc;

use kanal::{AsyncReceiver, AsyncSender};
use snaptext_types::{AppEvent, DisplayCommand};
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

use crate::context::SessionContext;
use crate::events::session_loop;
use crate::io::watcher_io;
use crate::state::AppState;

/// Centralized channel management
pub struct ChannelSet {
    pub display: (AsyncSender<DisplayCommand>, AsyncReceiver<DisplayCommand>),
    pub events: (AsyncSender<AppEvent>, AsyncReceiver<AppEvent>),
}

impl ChannelSet {
    pub fn new() -> Self {
        Self {
            display: kanal::bounded_async(256), // selection redraw bursts
            events: kanal::bounded_async(256),  // pointer-move bursts
        }
    }
}

/// Application controller for task spawning and lifecycle
pub struct AppController {
    channels: ChannelSet,
    state: Arc<AppState>,
    cancel_token: CancellationToken,
}

impl AppController {
    pub fn new(state: Arc<AppState>) -> Self {
        Self {
            channels: ChannelSet::new(),
            state,
            cancel_token: CancellationToken::new(),
        }
    }

    pub fn spawn_tasks(&self) -> JoinSet<anyhow::Result<()>> {
        let mut tasks = JoinSet::new();

        // Session loop, the single owner of all displayed state
        let state = self.state.clone();
        let event_tx = self.channels.events.0.clone();
        let event_rx = self.channels.events.1.clone();
        let display_tx = self.channels.display.0.clone();
        tasks.spawn(async move {
            let ctx = SessionContext::initialize(state, event_tx, display_tx).await;
            session_loop(ctx, event_rx).await
        });

        // Hotkey watcher
        tasks.spawn(watcher_io(
            self.state.clone(),
            self.cancel_token.child_token(),
            self.channels.events.0.clone(),
        ));

        tasks
    }

    /// Run the presentation shell. Slint component handles are not `Send`, so
    /// this stays on the caller's thread instead of going into the `JoinSet`.
    pub async fn run_ui(&self) -> anyhow::Result<()> {
        snaptext_ui::ui_loop(
            self.channels.display.1.clone(),
            self.channels.events.0.clone(),
            self.state.config.clone(),
        )
        .await
    }

    pub fn shutdown(&self) {
        self.cancel_token.cancel();
    }
}
