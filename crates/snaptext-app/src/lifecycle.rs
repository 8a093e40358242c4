use kanal::AsyncSender;
use snaptext_capture::CaptureOverlay;
use snaptext_types::DisplayCommand;

use crate::session::ResultController;

/// The only teardown path. Idle means zero retained full-resolution buffers,
/// so the controller's capture and the overlay's snapshot are released
/// together; dropping either alone still pins megabytes of pixels.
///
/// Idempotent: running it twice leaves the same empty state.
pub async fn enter_light_mode(
    overlay: &mut CaptureOverlay,
    controller: &mut ResultController,
    display_tx: &AsyncSender<DisplayCommand>,
) {
    controller.release();
    overlay.release_snapshot();

    let _ = display_tx.send(DisplayCommand::ClearSession).await;
    let _ = display_tx.send(DisplayCommand::HideSession).await;

    tracing::debug!("entered light mode, image buffers released");
}
