use kanal::{AsyncReceiver, AsyncSender};
use snaptext_capture::{CaptureOverlay, ScreenSource};
use snaptext_types::{AppEvent, DisplayCommand};

use crate::context::SessionContext;
use crate::lifecycle;
use crate::session::ResultController;

/// The single UI-owning execution context. Owns the overlay state machine and
/// the result controller, drains the event channel exclusively and is the
/// only code that mutates displayed state. Background tasks (hotkey watcher,
/// engine reader, translation requests) only ever post events here.
pub async fn session_loop(
    ctx: SessionContext,
    event_rx: AsyncReceiver<AppEvent>,
) -> anyhow::Result<()> {
    let SessionContext {
        state,
        event_tx,
        display_tx,
        mut screen,
        dispatcher,
        clipboard,
        translator,
    } = ctx;

    let (min_selection, translator_config) = {
        let config = state.config.read().await;
        (config.capture.min_selection_px, config.translator.clone())
    };

    let mut overlay = CaptureOverlay::new(min_selection);
    let mut controller = ResultController::new(
        display_tx.clone(),
        event_tx.clone(),
        clipboard,
        dispatcher,
        translator,
        translator_config,
    );

    tracing::info!("session loop started");
    while let Ok(event) = event_rx.recv().await {
        handle_event(
            &mut overlay,
            &mut controller,
            screen.as_mut(),
            &display_tx,
            event,
        )
        .await;
    }
    tracing::info!("session loop stopped");

    Ok(())
}

async fn handle_event(
    overlay: &mut CaptureOverlay,
    controller: &mut ResultController,
    screen: &mut dyn ScreenSource,
    display_tx: &AsyncSender<DisplayCommand>,
    event: AppEvent,
) {
    match event {
        AppEvent::Trigger => match overlay.start_capture(screen) {
            Ok(commands) => send_all(display_tx, commands).await,
            Err(e) => tracing::error!("screen snapshot failed: {e:#}"),
        },
        AppEvent::Pointer(input) => {
            let outcome = overlay.pointer(input);
            send_all(display_tx, outcome.commands).await;
            if let Some(capture) = outcome.capture {
                controller.process_capture(capture).await;
            }
        }
        AppEvent::CancelCapture => send_all(display_tx, overlay.cancel()).await,
        AppEvent::Recognition { seq, outcome } => controller.on_recognition(seq, outcome).await,
        AppEvent::Translated { seq, outcome } => controller.on_translated(seq, outcome).await,
        AppEvent::TranslateRequested => controller.translate().await,
        AppEvent::CopyImageRequested => {
            if controller.copy_image().await {
                lifecycle::enter_light_mode(overlay, controller, display_tx).await;
            }
        }
        AppEvent::SaveImageRequested(path) => controller.save_image(&path).await,
        AppEvent::DismissRequested => {
            lifecycle::enter_light_mode(overlay, controller, display_tx).await;
        }
    }
}

async fn send_all(display_tx: &AsyncSender<DisplayCommand>, commands: Vec<DisplayCommand>) {
    for command in commands {
        if display_tx.send(command).await.is_err() {
            tracing::warn!("display channel closed");
            return;
        }
    }
}
