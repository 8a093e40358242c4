use std::sync::Arc;
use std::time::Duration;

use kanal::AsyncSender;
use snaptext_capture::HotkeyManager;
use snaptext_types::AppEvent;
use tokio_util::sync::CancellationToken;

use crate::state::AppState;

/// Long-lived hotkey listener. Its only job is to post `Trigger` events into
/// the session loop; it never touches session state itself.
pub async fn watcher_io(
    state: Arc<AppState>,
    cancel: CancellationToken,
    event_tx: AsyncSender<AppEvent>,
) -> anyhow::Result<()> {
    let poll_interval = {
        let config = state.config.read().await;
        Duration::from_millis(config.hotkey_poll_ms)
    };

    tokio::task::spawn_blocking(move || {
        let hotkey_manager = match HotkeyManager::new() {
            Ok(manager) => manager,
            Err(e) => {
                tracing::error!("Failed to create hotkey manager: {e:#}");
                return;
            }
        };

        tracing::info!("capture hotkey registered (Alt+A)");

        loop {
            if cancel.is_cancelled() {
                break;
            }

            if hotkey_manager.poll() {
                tracing::info!("capture hotkey pressed");

                let tx = event_tx.clone();
                tokio::spawn(async move {
                    if let Err(e) = tx.send(AppEvent::Trigger).await {
                        tracing::error!("Failed to send capture trigger: {e}");
                    }
                });
            }

            std::thread::sleep(poll_interval);
        }

        tracing::info!("hotkey listener stopping");
    })
    .await?;

    Ok(())
}
