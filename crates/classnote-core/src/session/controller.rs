use crate::{
    CoreResult, SaveError, SessionError,
    capture::{AudioArtifact, CaptureManager},
    session::{DialogKind, ExitDialog, RecordingStatus, format_elapsed},
    timer::{TimerId, TimerService},
};

use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

/// Notification that the recording surface may be hidden.
pub type CloseCallback = Box<dyn FnMut() + Send>;

/// Correlates a [`SaveRequest`] with its outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SaveTicket(u64);

/// Work the embedder must run against a persistence sink, then report back
/// through [`RecordingSession::complete_save`].
#[derive(Debug)]
pub struct SaveRequest {
    /// Identifies this save attempt.
    pub ticket: SaveTicket,
    /// Normalized filename, carrying exactly one extension.
    pub filename: String,
    /// Audio captured up to the moment of confirmation.
    pub artifact: AudioArtifact,
}

/// Everything a view needs to render a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSnapshot {
    /// Current lifecycle status.
    pub status: RecordingStatus,
    /// Seconds accumulated while recording.
    pub elapsed_seconds: u64,
    /// Overlay currently shown.
    pub dialog: ExitDialog,
}

impl SessionSnapshot {
    /// Elapsed time as `m:ss`.
    pub fn elapsed_label(&self) -> String {
        format_elapsed(self.elapsed_seconds)
    }
}

/// Recording session state machine.
///
/// Owns the capture handle and the running timer exclusively; nothing else
/// may touch them. All transitions go through the methods below and are
/// applied to completion one at a time by the embedding event loop.
///
/// # Invariants
///
/// - A timer runs only while [`RecordingStatus::Recording`].
/// - The capture handle is held only while the status is active.
/// - At most one timer per session; the previous one is cancelled before a new one starts.
///
/// Dropping the session tears it down: the capture is released and the
/// timer cancelled whatever the status.
pub struct RecordingSession<C: CaptureManager, T: TimerService> {
    id: Uuid,
    status: RecordingStatus,
    elapsed_seconds: u64,
    capture: Option<C::Handle>,
    timer: Option<(TimerId, T::Handle)>,
    next_timer_id: u64,
    dialog: ExitDialog,
    pending_save: Option<SaveTicket>,
    next_ticket: u64,
    disposed: bool,
    capture_manager: C,
    timer_service: T,
    on_close: CloseCallback,
}

impl<C: CaptureManager, T: TimerService> RecordingSession<C, T> {
    /// Mount a session: idle, no dialog, nothing acquired yet.
    #[instrument(skip_all)]
    pub fn open(capture_manager: C, timer_service: T, on_close: CloseCallback) -> Self {
        let id = Uuid::new_v4();

        info!(session_id = %id, "Recording session opened");

        Self {
            id,
            status: RecordingStatus::Idle,
            elapsed_seconds: 0,
            capture: None,
            timer: None,
            next_timer_id: 0,
            dialog: ExitDialog::None,
            pending_save: None,
            next_ticket: 0,
            disposed: false,
            capture_manager,
            timer_service,
            on_close,
        }
    }

    /// Session ID for log correlation.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Current lifecycle status.
    pub fn status(&self) -> RecordingStatus {
        self.status
    }

    /// Seconds accumulated while recording.
    pub fn elapsed_seconds(&self) -> u64 {
        self.elapsed_seconds
    }

    /// Overlay currently shown.
    pub fn dialog(&self) -> &ExitDialog {
        &self.dialog
    }

    /// Owned copy of the renderable state.
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            status: self.status,
            elapsed_seconds: self.elapsed_seconds,
            dialog: self.dialog.clone(),
        }
    }

    /// True while the capture handle is held.
    pub fn is_capture_held(&self) -> bool {
        self.capture.is_some()
    }

    /// True while a timer is running.
    pub fn is_timer_running(&self) -> bool {
        self.timer.is_some()
    }

    /// Id stamped on ticks from the running timer.
    pub fn active_timer(&self) -> Option<TimerId> {
        self.timer.as_ref().map(|(id, _)| *id)
    }

    /// True once the session has been torn down.
    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    /// `idle` → `recording`.
    ///
    /// No-op while already active, while a dialog is open, or after teardown.
    ///
    /// # Errors
    ///
    /// [`SessionError::Capture`] when the microphone cannot be acquired. The
    /// session stays idle and holds nothing.
    #[instrument(skip(self), fields(session_id = %self.id))]
    pub fn start(&mut self) -> CoreResult<()> {
        if self.disposed || self.status.is_active() || self.dialog.kind() != DialogKind::None {
            debug!(status = %self.status, "Start ignored");
            return Ok(());
        }

        let handle = match self.capture_manager.acquire() {
            Ok(handle) => handle,
            Err(e) => {
                warn!(error = %e, "Microphone acquisition failed, staying idle");
                return Err(SessionError::from(e));
            }
        };

        self.capture = Some(handle);
        self.elapsed_seconds = 0;
        self.start_timer();
        self.status = RecordingStatus::Recording;

        info!("Recording started");

        Ok(())
    }

    /// `recording` → `paused`. No-op from any other status.
    #[instrument(skip(self), fields(session_id = %self.id))]
    pub fn pause(&mut self) {
        if self.status != RecordingStatus::Recording {
            debug!(status = %self.status, "Pause ignored");
            return;
        }

        if let Some(handle) = self.capture.as_ref() {
            self.capture_manager.mute(handle);
        }
        self.cancel_timer();
        self.status = RecordingStatus::Paused;

        info!(elapsed_seconds = self.elapsed_seconds, "Recording paused");
    }

    /// `paused` → `recording`, continuing from the current elapsed time.
    ///
    /// No-op from any other status or while a dialog is open.
    #[instrument(skip(self), fields(session_id = %self.id))]
    pub fn resume(&mut self) {
        if self.status != RecordingStatus::Paused || self.dialog.kind() != DialogKind::None {
            debug!(status = %self.status, "Resume ignored");
            return;
        }

        if let Some(handle) = self.capture.as_ref() {
            self.capture_manager.unmute(handle);
        }
        self.start_timer();
        self.status = RecordingStatus::Recording;

        info!(elapsed_seconds = self.elapsed_seconds, "Recording resumed");
    }

    /// Count one elapsed second if `timer` is the running timer.
    ///
    /// Ticks from a cancelled timer that were already queued are dropped.
    pub fn on_tick(&mut self, timer: TimerId) {
        if self.status != RecordingStatus::Recording || self.active_timer() != Some(timer) {
            debug!(session_id = %self.id, timer = %timer, "Stale tick dropped");
            return;
        }
        self.elapsed_seconds = self.elapsed_seconds.saturating_add(1);
    }

    /// Stop button: freeze the recording and ask for a filename.
    #[instrument(skip(self), fields(session_id = %self.id))]
    pub fn request_stop(&mut self) {
        if self.disposed || !self.status.is_active() || self.dialog.is_saving() {
            debug!(status = %self.status, "Stop ignored");
            return;
        }

        self.pause();
        self.dialog.open_save();

        info!(elapsed_seconds = self.elapsed_seconds, "Save dialog opened");
    }

    /// Close button: hide immediately when idle, otherwise freeze the
    /// recording and ask what to do with it.
    #[instrument(skip(self), fields(session_id = %self.id))]
    pub fn request_close(&mut self) {
        if self.disposed || self.dialog.is_saving() {
            debug!("Close ignored");
            return;
        }

        if !self.status.is_active() {
            info!("Closing idle session");
            (self.on_close)();
            return;
        }

        self.pause();
        if self.dialog.open_close() {
            info!("Close dialog opened");
        }
    }

    /// Close dialog: save before closing.
    pub fn choose_save(&mut self) {
        if self.dialog.escalate_to_save() {
            debug!(session_id = %self.id, "Close dialog escalated to save");
        }
    }

    /// Close dialog: throw the recording away (asks once more).
    pub fn choose_discard(&mut self) {
        if self.dialog.escalate_to_discard() {
            debug!(session_id = %self.id, "Close dialog escalated to discard");
        }
    }

    /// Dismiss the current dialog. The session stays paused.
    pub fn cancel_dialog(&mut self) {
        if self.dialog.cancel() {
            debug!(session_id = %self.id, status = %self.status, "Dialog cancelled");
        }
    }

    /// Replace the filename draft in the save dialog.
    pub fn edit_filename(&mut self, text: &str) {
        self.dialog.edit_draft(text);
    }

    /// Drop the recording and return to idle, then notify the embedder.
    ///
    /// Ignored while a save is in flight.
    #[instrument(skip(self), fields(session_id = %self.id))]
    pub fn confirm_discard(&mut self) {
        if self.disposed {
            return;
        }
        if self.dialog.is_saving() {
            warn!("Discard ignored while saving");
            return;
        }

        self.reset_to_idle();
        self.dialog.dismiss();

        info!("Recording discarded");

        (self.on_close)();
    }

    /// Save button: freeze the dialog and produce the sink work.
    ///
    /// Returns `None` when the button is disabled (no dialog, blank draft,
    /// save already in flight).
    #[instrument(skip(self), fields(session_id = %self.id))]
    pub fn confirm_save(&mut self) -> Option<SaveRequest> {
        if self.disposed || !self.dialog.can_confirm_save() {
            return None;
        }

        let Some(handle) = self.capture.as_ref() else {
            warn!("Save confirmed without a capture handle");
            return None;
        };
        let artifact = self.capture_manager.snapshot(handle);

        let filename = self.dialog.begin_saving()?;

        let ticket = SaveTicket(self.next_ticket);
        self.next_ticket += 1;
        self.pending_save = Some(ticket);

        info!(
            filename = %filename,
            sample_count = artifact.samples.len(),
            "Saving recording"
        );

        Some(SaveRequest {
            ticket,
            filename,
            artifact,
        })
    }

    /// Apply the outcome of a save started by [`RecordingSession::confirm_save`].
    ///
    /// Returns `true` when the session finished (saved, idle, embedder
    /// notified). Outcomes arriving after teardown, or for a ticket that is
    /// not the pending one, are dropped and return `false`.
    ///
    /// # Errors
    ///
    /// [`SessionError::Save`] when the sink failed. The dialog is unfrozen with
    /// the draft intact and the capture is still held, so the user can retry.
    #[instrument(skip(self, result), fields(session_id = %self.id))]
    pub fn complete_save(
        &mut self,
        ticket: SaveTicket,
        result: Result<(), SaveError>,
    ) -> CoreResult<bool> {
        if self.disposed {
            debug!("Save outcome arrived after teardown, dropped");
            return Ok(false);
        }
        if self.pending_save != Some(ticket) {
            warn!(?ticket, "Save outcome for unknown ticket, dropped");
            return Ok(false);
        }
        self.pending_save = None;

        match result {
            Ok(()) => {
                self.reset_to_idle();
                self.dialog.dismiss();

                info!("Recording saved");

                (self.on_close)();
                Ok(true)
            }
            Err(e) => {
                self.dialog.save_failed();
                warn!(error = %e, "Save failed, recording kept for retry");
                Err(SessionError::from(e))
            }
        }
    }

    /// Release everything regardless of status. Idempotent.
    ///
    /// Called automatically on drop.
    #[instrument(skip(self), fields(session_id = %self.id))]
    pub fn teardown(&mut self) {
        if self.disposed {
            return;
        }
        self.disposed = true;

        let was = self.status;
        self.reset_to_idle();
        self.dialog.dismiss();
        self.pending_save = None;

        info!(status = %was, "Recording session torn down");
    }

    fn start_timer(&mut self) {
        // At most one live timer per session.
        self.cancel_timer();

        let id = TimerId(self.next_timer_id);
        self.next_timer_id += 1;

        let handle = self.timer_service.start(id);
        self.timer = Some((id, handle));
    }

    fn cancel_timer(&mut self) {
        if let Some((_, handle)) = self.timer.take() {
            self.timer_service.cancel(handle);
        }
    }

    fn reset_to_idle(&mut self) {
        self.cancel_timer();
        self.capture_manager.release(self.capture.take());
        self.elapsed_seconds = 0;
        self.status = RecordingStatus::Idle;
    }
}

impl<C: CaptureManager, T: TimerService> Drop for RecordingSession<C, T> {
    fn drop(&mut self) {
        self.teardown();
    }
}
