//! Recording surface.
//!
//! Every button maps to exactly one session operation. The `save` and
//! `discard` labels appear in more than one dialog; [`dispatch`] resolves
//! them against the dialog that is currently open.

use classnote_core::{
    CaptureError, CaptureManager, CoreResult, DialogKind, ExitDialog, RECORDING_EXTENSION,
    RecordingSession, RecordingStatus, SaveError, SaveRequest, SessionError, SessionSnapshot,
    TimerService,
};

use std::fmt::Write;

use tracing::debug;

/// A button press on the recording surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionIntent {
    /// Start button.
    Start,
    /// Pause button.
    Pause,
    /// Resume button.
    Resume,
    /// Stop button.
    Stop,
    /// Close button.
    Close,
    /// Typing into the filename field.
    Name(String),
    /// Save button in the save or close dialog.
    Save,
    /// Discard button in the close or discard dialog.
    Discard,
    /// Cancel button in any dialog.
    Cancel,
}

/// Apply `intent` to `session`.
///
/// Returns the sink work when the intent confirmed a save.
pub fn dispatch<C, T>(
    session: &mut RecordingSession<C, T>,
    intent: SessionIntent,
) -> CoreResult<Option<SaveRequest>>
where
    C: CaptureManager,
    T: TimerService,
{
    let dialog = session.dialog().kind();
    debug!(session_id = %session.id(), ?intent, ?dialog, "Dispatching intent");

    match intent {
        SessionIntent::Start => session.start()?,
        SessionIntent::Pause => session.pause(),
        SessionIntent::Resume => session.resume(),
        SessionIntent::Stop => session.request_stop(),
        SessionIntent::Close => session.request_close(),
        SessionIntent::Name(text) => session.edit_filename(&text),
        SessionIntent::Save => match dialog {
            DialogKind::Close => session.choose_save(),
            DialogKind::Save => return Ok(session.confirm_save()),
            DialogKind::None | DialogKind::Discard => {}
        },
        SessionIntent::Discard => match dialog {
            DialogKind::Close => session.choose_discard(),
            DialogKind::Discard => session.confirm_discard(),
            DialogKind::None | DialogKind::Save => {}
        },
        SessionIntent::Cancel => session.cancel_dialog(),
    }

    Ok(None)
}

/// Render the recording surface and any open dialog.
pub fn render(snapshot: &SessionSnapshot) -> String {
    let mut out = String::new();

    let marker = match snapshot.status {
        RecordingStatus::Idle => "○",
        RecordingStatus::Recording => "●",
        RecordingStatus::Paused => "‖",
    };
    let _ = writeln!(
        out,
        "{} {}  {}",
        marker,
        snapshot.elapsed_label(),
        snapshot.status
    );

    let buttons = match snapshot.status {
        RecordingStatus::Idle => "[start] [close]",
        RecordingStatus::Recording => "[pause] [stop] [close]",
        RecordingStatus::Paused => "[resume] [stop] [close]",
    };
    let _ = writeln!(out, "{}", buttons);

    match &snapshot.dialog {
        ExitDialog::None => {}
        ExitDialog::Save {
            filename_draft,
            is_saving,
        } => {
            let _ = writeln!(out, "── Save Recording ──");
            let _ = writeln!(out, "  name: {}  ({})", filename_draft, RECORDING_EXTENSION);
            if *is_saving {
                let _ = writeln!(out, "  Saving...");
            } else if snapshot.dialog.can_confirm_save() {
                let _ = writeln!(out, "  [save] [cancel]");
            } else {
                let _ = writeln!(out, "  [cancel]  (type `name <text>` to enable save)");
            }
        }
        ExitDialog::Close => {
            let _ = writeln!(out, "── Save recording before closing? ──");
            let _ = writeln!(out, "  [save] [discard] [cancel]");
        }
        ExitDialog::Discard => {
            let _ = writeln!(out, "── Discard this recording? This cannot be undone. ──");
            let _ = writeln!(out, "  [discard] [cancel]");
        }
    }

    out
}

/// User-facing message for a session failure.
pub fn describe_error(error: &SessionError) -> String {
    match error {
        SessionError::Capture { source, .. } => match source {
            CaptureError::PermissionDenied { .. } => {
                "Could not access microphone: permission denied. Grant access and try again."
                    .to_string()
            }
            CaptureError::DeviceUnavailable { reason, .. } => {
                format!("Could not access microphone: {}", reason)
            }
        },
        SessionError::Save { source, .. } => match source {
            SaveError::AlreadyExists { .. } => {
                "Failed to save recording: a recording with that name already exists. Pick another name."
                    .to_string()
            }
            SaveError::InvalidFilename { filename, .. } => {
                format!("Failed to save recording: {:?} is not a valid name.", filename)
            }
            other => format!("Failed to save recording: {}", other),
        },
    }
}
