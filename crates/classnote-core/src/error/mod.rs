use std::{panic::Location, path::PathBuf};

use error_location::ErrorLocation;
use thiserror::Error;

/// Failure to obtain the audio input device.
///
/// Acquisition is all-or-nothing: when one of these is returned, no stream
/// or track is left running.
#[derive(Error, Debug)]
pub enum CaptureError {
    /// The platform refused access to the microphone.
    #[error("Microphone permission denied: {reason} {location}")]
    PermissionDenied {
        /// Platform-provided reason.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// No usable input device, or the device could not be opened.
    #[error("Microphone unavailable: {reason} {location}")]
    DeviceUnavailable {
        /// Platform-provided reason.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },
}

/// Errors reported by a persistence sink.
#[derive(Error, Debug)]
pub enum SaveError {
    /// The sink refused the filename (e.g. it contains a path separator).
    #[error("Invalid recording filename: {filename:?} {location}")]
    InvalidFilename {
        /// The rejected filename.
        filename: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// A recording with this name already exists.
    #[error("Recording already exists at {path:?} {location}")]
    AlreadyExists {
        /// Existing file.
        path: PathBuf,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// Filesystem failure while writing the artifact.
    #[error("Failed to write recording to {path:?}: {source} {location}")]
    Io {
        /// Destination path.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// The audio container could not be written.
    #[error("Failed to encode recording: {reason} {location}")]
    Encoding {
        /// Description of the encoder failure.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// The background save task died before reporting.
    #[error("Save task failed: {reason} {location}")]
    TaskFailed {
        /// Description of the task failure.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },
}

/// Errors surfaced by the recording session to its embedder.
#[derive(Error, Debug)]
pub enum SessionError {
    /// Starting a recording failed; the session stayed idle.
    #[error("Could not start recording: {source} {location}")]
    Capture {
        /// The underlying capture error.
        #[source]
        source: CaptureError,
        /// Location where this error was created.
        location: ErrorLocation,
    },

    /// Saving failed; the session kept its audio so the user can retry.
    #[error("Could not save recording: {source} {location}")]
    Save {
        /// The underlying sink error.
        #[source]
        source: SaveError,
        /// Location where this error was created.
        location: ErrorLocation,
    },
}

// Manual From impls with location tracking.
// Cannot use #[from] because it does not support extra fields.
impl From<CaptureError> for SessionError {
    #[track_caller]
    fn from(source: CaptureError) -> Self {
        SessionError::Capture {
            source,
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

impl From<SaveError> for SessionError {
    #[track_caller]
    fn from(source: SaveError) -> Self {
        SessionError::Save {
            source,
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

/// Result type alias using [`SessionError`].
pub type Result<T> = std::result::Result<T, SessionError>;
