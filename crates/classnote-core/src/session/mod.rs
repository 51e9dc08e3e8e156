//! Recording session: lifecycle state machine plus its exit dialog.

mod controller;
mod dialog;
mod filename;
mod status;

pub use {
    controller::{CloseCallback, RecordingSession, SaveRequest, SaveTicket, SessionSnapshot},
    dialog::{DialogKind, ExitDialog},
    filename::{RECORDING_EXTENSION, normalize_filename},
    status::RecordingStatus,
};

/// Render seconds as `m:ss`.
pub fn format_elapsed(seconds: u64) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}
