use std::sync::Arc;

use kanal::{AsyncReceiver, AsyncSender};
use snaptext_capture::CaptureOverlay;
use snaptext_config::translator::TranslatorConfig;
use snaptext_types::{AppEvent, DisplayCommand, RecognitionOutcome, TranslationOutcome};

use crate::lifecycle;
use crate::session::ResultController;

use super::{RecordingClipboard, RecordingDispatcher, TestScreen, gradient, next_command};

struct Fixture {
    controller: ResultController,
    display_tx: AsyncSender<DisplayCommand>,
    display_rx: AsyncReceiver<DisplayCommand>,
    clipboard: RecordingClipboard,
}

fn fixture() -> Fixture {
    let (display_tx, display_rx) = kanal::bounded_async::<DisplayCommand>(64);
    let (event_tx, _event_rx) = kanal::bounded_async::<AppEvent>(64);

    let clipboard = RecordingClipboard::default();
    let controller = ResultController::new(
        display_tx.clone(),
        event_tx,
        Box::new(clipboard.clone()),
        Arc::new(RecordingDispatcher::default()),
        None,
        TranslatorConfig::default(),
    );

    Fixture {
        controller,
        display_tx,
        display_rx,
        clipboard,
    }
}

async fn drain(rx: &AsyncReceiver<DisplayCommand>, n: usize) {
    for _ in 0..n {
        next_command(rx).await;
    }
}

#[tokio::test]
async fn light_mode_entry_is_idempotent() {
    let mut f = fixture();

    let mut screen = TestScreen {
        frame: gradient(64, 64),
    };
    let mut overlay = CaptureOverlay::new(5);
    overlay.start_capture(&mut screen).unwrap();

    f.controller.process_capture(gradient(20, 20)).await;
    drain(&f.display_rx, 2).await; // ShowSession + hint
    f.controller
        .on_recognition(1, RecognitionOutcome::Text("hello".to_string()))
        .await;
    drain(&f.display_rx, 1).await;

    let display_tx = f.display_tx.clone();

    lifecycle::enter_light_mode(&mut overlay, &mut f.controller, &display_tx).await;
    assert!(!f.controller.has_image());
    assert!(!f.controller.has_text());
    assert!(!overlay.has_snapshot());
    assert_eq!(next_command(&f.display_rx).await, DisplayCommand::ClearSession);
    assert_eq!(next_command(&f.display_rx).await, DisplayCommand::HideSession);

    // Second entry: same commands, same (empty) state.
    lifecycle::enter_light_mode(&mut overlay, &mut f.controller, &display_tx).await;
    assert!(!f.controller.has_image());
    assert!(!f.controller.has_text());
    assert!(!overlay.has_snapshot());
    assert_eq!(next_command(&f.display_rx).await, DisplayCommand::ClearSession);
    assert_eq!(next_command(&f.display_rx).await, DisplayCommand::HideSession);
}

#[tokio::test]
async fn auto_copy_fires_only_for_substantive_text() {
    let mut f = fixture();
    f.controller.process_capture(gradient(10, 10)).await;
    drain(&f.display_rx, 2).await;

    f.controller.on_recognition(1, RecognitionOutcome::Noise).await;
    f.controller.on_recognition(1, RecognitionOutcome::NoText).await;
    f.controller
        .on_recognition(1, RecognitionOutcome::Failed("broken".to_string()))
        .await;
    assert!(f.clipboard.texts.lock().unwrap().is_empty());

    f.controller
        .on_recognition(1, RecognitionOutcome::Text("real".to_string()))
        .await;
    assert_eq!(
        f.clipboard.texts.lock().unwrap().clone(),
        vec!["real".to_string()]
    );
}

#[tokio::test]
async fn stale_sequence_numbers_are_ignored() {
    let mut f = fixture();
    f.controller.process_capture(gradient(10, 10)).await;
    f.controller.process_capture(gradient(10, 10)).await;
    assert_eq!(f.controller.current_seq(), 2);
    drain(&f.display_rx, 4).await;

    f.controller
        .on_recognition(1, RecognitionOutcome::Text("stale".to_string()))
        .await;
    assert!(!f.controller.has_text());
    assert!(f.clipboard.texts.lock().unwrap().is_empty());

    f.controller
        .on_translated(1, TranslationOutcome::Done("stale".to_string()))
        .await;
    assert!(!f.controller.has_text());
}

#[tokio::test]
async fn translation_outcomes_format_inline() {
    let mut f = fixture();
    f.controller.process_capture(gradient(10, 10)).await;
    drain(&f.display_rx, 2).await;
    f.controller
        .on_recognition(1, RecognitionOutcome::Text("Hi".to_string()))
        .await;
    drain(&f.display_rx, 1).await;

    f.controller
        .on_translated(1, TranslationOutcome::Failed(502))
        .await;
    assert_eq!(
        next_command(&f.display_rx).await,
        DisplayCommand::SessionText(snaptext_types::SessionText::Body(
            "Hi\n\n[translation failed] 502".to_string()
        ))
    );

    f.controller
        .on_translated(1, TranslationOutcome::NetworkError("timed out".to_string()))
        .await;
    assert_eq!(
        next_command(&f.display_rx).await,
        DisplayCommand::SessionText(snaptext_types::SessionText::Body(
            "Hi\n\n[network error] timed out".to_string()
        ))
    );

    // The original stays untouched underneath: a later success still builds
    // on the plain recognized text.
    f.controller
        .on_translated(1, TranslationOutcome::Done("你好".to_string()))
        .await;
    assert_eq!(
        next_command(&f.display_rx).await,
        DisplayCommand::SessionText(snaptext_types::SessionText::Body(
            "Hi\n\n=== Translation ===\n你好".to_string()
        ))
    );
}

#[tokio::test]
async fn copy_image_reports_whether_a_capture_exists() {
    let mut f = fixture();
    assert!(!f.controller.copy_image().await);

    f.controller.process_capture(gradient(12, 8)).await;
    drain(&f.display_rx, 2).await;
    assert!(f.controller.copy_image().await);
    assert_eq!(f.clipboard.images.lock().unwrap().clone(), vec![(12, 8)]);
}
