//! Classnote Core Library
//!
//! Recording session controller for lecture capture: microphone lifecycle,
//! elapsed-time ticks, the idle/recording/paused state machine and the exit
//! dialog that guards unsaved audio.
//!
//! # Example
//!
//! ```no_run
//! use classnote_core::{
//!     CoreResult, IntervalTimer, Microphone, PersistenceSink, RecordingSession, WavFileSink,
//! };
//!
//! #[tokio::main]
//! async fn main() -> CoreResult<()> {
//!     let (tick_tx, mut tick_rx) = tokio::sync::mpsc::unbounded_channel();
//!     let mut session = RecordingSession::open(
//!         Microphone::new(),
//!         IntervalTimer::new(tick_tx),
//!         Box::new(|| println!("closed")),
//!     );
//!
//!     session.start()?;
//!     for _ in 0..3 {
//!         if let Some(tick) = tick_rx.recv().await {
//!             session.on_tick(tick);
//!         }
//!     }
//!
//!     session.request_stop();
//!     session.edit_filename("lecture-1");
//!     if let Some(request) = session.confirm_save() {
//!         let sink = WavFileSink::new("recordings");
//!         let result = sink.save(request.filename, request.artifact).await;
//!         session.complete_save(request.ticket, result)?;
//!     }
//!     Ok(())
//! }
//! ```

mod capture;
mod error;
mod session;
mod sink;
mod timer;

pub use {
    capture::{AudioArtifact, CaptureManager, Microphone, MicrophoneHandle},
    error::{CaptureError, Result as CoreResult, SaveError, SessionError},
    session::{
        CloseCallback, DialogKind, ExitDialog, RECORDING_EXTENSION, RecordingSession,
        RecordingStatus, SaveRequest, SaveTicket, SessionSnapshot, format_elapsed,
        normalize_filename,
    },
    sink::{PersistenceSink, WavFileSink},
    timer::{IntervalTimer, TICK_PERIOD, TimerId, TimerService},
};
