use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use kanal::{AsyncReceiver, AsyncSender};
use slint::ComponentHandle;
use snaptext_config::Config;
use snaptext_types::{
    AppEvent, DisplayCommand, ImageBuffer, PointerButton, PointerInput, PointerPhase, Region,
    SessionText,
};
use tokio::sync::RwLock;

slint::include_modules!();

/// Ask the shell to leave its event loop. Safe to call from any thread.
pub fn request_quit() {
    let _ = slint::invoke_from_event_loop(|| {
        let _ = slint::quit_event_loop();
    });
}

/// Presentation shell. Owns the two windows, forwards raw input into the
/// event channel and applies display commands in the order the session loop
/// emitted them. No session state lives here.
pub async fn ui_loop(
    display_rx: AsyncReceiver<DisplayCommand>,
    event_tx: AsyncSender<AppEvent>,
    config: Arc<RwLock<Config>>,
) -> anyhow::Result<()> {
    let overlay = OverlayWindow::new()?;
    let result = ResultWindow::new()?;

    let save_dir = {
        let config = config.read().await;
        overlay.set_scrim_opacity(config.capture.scrim_opacity);
        config.save_dir.clone()
    };

    {
        let tx = event_tx.clone();
        overlay.on_pointer_pressed(move |x, y, secondary| {
            let button = if secondary {
                PointerButton::Secondary
            } else {
                PointerButton::Primary
            };
            send_event(
                &tx,
                AppEvent::Pointer(PointerInput {
                    phase: PointerPhase::Down,
                    button,
                    x: x as i32,
                    y: y as i32,
                }),
            );
        });
    }

    {
        let tx = event_tx.clone();
        overlay.on_pointer_moved(move |x, y| {
            send_event(
                &tx,
                AppEvent::Pointer(PointerInput {
                    phase: PointerPhase::Moved,
                    button: PointerButton::Primary,
                    x: x as i32,
                    y: y as i32,
                }),
            );
        });
    }

    {
        let tx = event_tx.clone();
        overlay.on_pointer_released(move |x, y| {
            send_event(
                &tx,
                AppEvent::Pointer(PointerInput {
                    phase: PointerPhase::Up,
                    button: PointerButton::Primary,
                    x: x as i32,
                    y: y as i32,
                }),
            );
        });
    }

    {
        let tx = event_tx.clone();
        overlay.on_cancel_requested(move || send_event(&tx, AppEvent::CancelCapture));
    }

    {
        let tx = event_tx.clone();
        result.on_copy_image_clicked(move || send_event(&tx, AppEvent::CopyImageRequested));
    }

    {
        let tx = event_tx.clone();
        result.on_translate_clicked(move || send_event(&tx, AppEvent::TranslateRequested));
    }

    {
        let tx = event_tx.clone();
        result.on_save_clicked(move || {
            let stamp = SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_secs())
                .unwrap_or(0);
            let path = save_dir.join(format!("snaptext-{stamp}.png"));
            send_event(&tx, AppEvent::SaveImageRequested(path));
        });
    }

    {
        let tx = event_tx.clone();
        result.on_dismiss_requested(move || send_event(&tx, AppEvent::DismissRequested));
    }

    // Closing the result window must quiet the session, never end the process.
    {
        let tx = event_tx.clone();
        result.window().on_close_requested(move || {
            send_event(&tx, AppEvent::DismissRequested);
            slint::CloseRequestResponse::KeepWindowShown
        });
    }

    {
        let overlay_weak = overlay.as_weak();
        let result_weak = result.as_weak();
        slint::spawn_local(async move {
            while let Ok(command) = display_rx.recv().await {
                let (Some(overlay), Some(result)) = (overlay_weak.upgrade(), result_weak.upgrade())
                else {
                    break;
                };
                apply_command(&overlay, &result, command);
            }
        })
        .unwrap();
    }

    slint::run_event_loop_until_quit()?;

    Ok(())
}

fn apply_command(overlay: &OverlayWindow, result: &ResultWindow, command: DisplayCommand) {
    match command {
        DisplayCommand::ShowOverlay { snapshot } => {
            overlay.set_selecting(false);
            overlay.set_snapshot(to_slint_image(&snapshot));
            overlay.set_armed(true);
            overlay.window().set_fullscreen(true);
            if let Err(e) = overlay.show() {
                tracing::error!("failed to show overlay: {e}");
                return;
            }
            // First presented frame must already carry the fresh snapshot.
            overlay.window().request_redraw();
        }
        DisplayCommand::OverlaySelection { rect } => match rect {
            Some(Region {
                x,
                y,
                width,
                height,
            }) => {
                overlay.set_sel_x(x as f32);
                overlay.set_sel_y(y as f32);
                overlay.set_sel_width(width as f32);
                overlay.set_sel_height(height as f32);
                overlay.set_selecting(true);
            }
            None => overlay.set_selecting(false),
        },
        DisplayCommand::ClearOverlay => {
            overlay.set_selecting(false);
            overlay.set_armed(false);
            overlay.set_snapshot(slint::Image::default());
        }
        DisplayCommand::FlushOverlay => {
            // The transparent frame has to reach the compositor before the
            // window hides, or the next show can re-present the stale frame.
            overlay.window().request_redraw();
        }
        DisplayCommand::HideOverlay => {
            if let Err(e) = overlay.hide() {
                tracing::error!("failed to hide overlay: {e}");
            }
        }
        DisplayCommand::ShowSession { preview } => {
            result.set_preview(to_slint_image(&preview));
            result.set_has_preview(true);
            if let Err(e) = result.show() {
                tracing::error!("failed to show result window: {e}");
            }
        }
        DisplayCommand::SessionText(text) => match text {
            SessionText::Hint(hint) => {
                result.set_body("".into());
                result.set_hint(hint.into());
            }
            SessionText::Body(body) => {
                result.set_body(body.into());
            }
        },
        DisplayCommand::ClearSession => {
            result.set_has_preview(false);
            result.set_preview(slint::Image::default());
            result.set_body("".into());
            result.set_hint("".into());
        }
        DisplayCommand::HideSession => {
            if let Err(e) = result.hide() {
                tracing::error!("failed to hide result window: {e}");
            }
        }
    }
}

fn to_slint_image(image: &ImageBuffer) -> slint::Image {
    let buffer = slint::SharedPixelBuffer::<slint::Rgba8Pixel>::clone_from_slice(
        &image.data,
        image.width,
        image.height,
    );
    slint::Image::from_rgba8(buffer)
}

fn send_event(tx: &AsyncSender<AppEvent>, event: AppEvent) {
    let tx = tx.clone();
    slint::spawn_local(async move {
        if let Err(e) = tx.send(event).await {
            tracing::error!("failed to forward UI event: {e}");
        }
    })
    .unwrap();
}
