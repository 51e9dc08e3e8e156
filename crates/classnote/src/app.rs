use crate::{
    AppCommand, AppError, AppResult,
    app_command::HELP,
    classroom::{ClassroomStore, SavedRecording},
    config::Config,
    view::{self, SessionIntent},
};

use std::{panic::Location, sync::Arc};

use chrono::Utc;
use classnote_core::{
    CaptureManager, IntervalTimer, Microphone, PersistenceSink, RecordingSession, SaveError,
    SaveTicket, TimerId, TimerService, WavFileSink,
};
use error_location::ErrorLocation;
use tokio::sync::{mpsc, watch};
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

/// Builds the capture manager and timer for a new recorder mount. The timer
/// must emit on the given sender.
pub(crate) type ResourceFactory<C, T> = Box<dyn Fn(mpsc::UnboundedSender<TimerId>) -> (C, T)>;

/// Recording surface mounted over the dashboard for one classroom.
pub(crate) struct Recorder<C: CaptureManager, T: TimerService> {
    /// Distinguishes this mount from earlier ones in late notifications.
    pub(crate) mount_id: Uuid,
    pub(crate) classroom_id: Uuid,
    pub(crate) session: RecordingSession<C, T>,
    /// Ticks from this mount's timers only.
    pub(crate) tick_rx: mpsc::UnboundedReceiver<TimerId>,
}

/// Result of a sink call, reported back to the event loop.
#[derive(Debug)]
pub(crate) struct SaveOutcome {
    pub(crate) mount_id: Uuid,
    pub(crate) ticket: SaveTicket,
    pub(crate) filename: String,
    pub(crate) duration_seconds: u64,
    pub(crate) result: Result<(), SaveError>,
}

/// Main application state.
///
/// Every event is applied to completion inside [`App::run`]'s loop. The sink
/// call is the only work that leaves the loop; its outcome comes back over
/// `save_rx`.
pub struct App<C: CaptureManager = Microphone, T: TimerService = IntervalTimer> {
    pub(crate) store: ClassroomStore,
    pub(crate) sink: Arc<WavFileSink>,
    pub(crate) recorder: Option<Recorder<C, T>>,
    pub(crate) resources: ResourceFactory<C, T>,
    pub(crate) command_rx: mpsc::Receiver<AppCommand>,
    pub(crate) shutdown_tx: watch::Sender<bool>,
    pub(crate) save_tx: mpsc::UnboundedSender<SaveOutcome>,
    pub(crate) save_rx: mpsc::UnboundedReceiver<SaveOutcome>,
    pub(crate) closed_tx: mpsc::UnboundedSender<Uuid>,
    pub(crate) closed_rx: mpsc::UnboundedReceiver<Uuid>,
}

impl App {
    /// Build the application around a loaded config, recording from the
    /// default microphone.
    pub fn new(
        config: Config,
        command_rx: mpsc::Receiver<AppCommand>,
        shutdown_tx: watch::Sender<bool>,
    ) -> Self {
        Self::with_resources(
            config,
            command_rx,
            shutdown_tx,
            Box::new(|tick_tx: mpsc::UnboundedSender<TimerId>| {
                (Microphone::new(), IntervalTimer::new(tick_tx))
            }),
        )
    }
}

impl<C: CaptureManager, T: TimerService> App<C, T> {
    /// Build the application with a custom source of recorder resources.
    pub(crate) fn with_resources(
        config: Config,
        command_rx: mpsc::Receiver<AppCommand>,
        shutdown_tx: watch::Sender<bool>,
        resources: ResourceFactory<C, T>,
    ) -> Self {
        let sink = Arc::new(WavFileSink::new(config.recording.output_dir));
        let (save_tx, save_rx) = mpsc::unbounded_channel();
        let (closed_tx, closed_rx) = mpsc::unbounded_channel();

        info!(output_dir = %sink.dir().display(), "Recordings directory");

        Self {
            store: ClassroomStore::new(),
            sink,
            recorder: None,
            resources,
            command_rx,
            shutdown_tx,
            save_tx,
            save_rx,
            closed_tx,
            closed_rx,
        }
    }

    /// Run the main application event loop.
    #[instrument(skip_all)]
    pub(crate) async fn run(mut self) -> AppResult<()> {
        info!("Classnote starting");
        println!("{}", view::render_dashboard(&self.store));

        loop {
            tokio::select! {
                Some(cmd) = self.command_rx.recv() => {
                    if matches!(cmd, AppCommand::Shutdown) {
                        info!("Shutdown requested");
                        break;
                    }
                    if let Err(e) = self.handle_command(cmd) {
                        error!(error = ?e, "Command failed");
                        println!("{}", user_message(&e));
                    }
                }

                Some(tick) = next_tick(&mut self.recorder) => {
                    if let Some(recorder) = self.recorder.as_mut() {
                        recorder.session.on_tick(tick);
                    }
                }

                Some(outcome) = self.save_rx.recv() => {
                    if let Err(e) = self.handle_save_outcome(outcome) {
                        error!(error = ?e, "Save failed");
                        println!("{}", user_message(&e));
                        self.render();
                    }
                }

                Some(mount_id) = self.closed_rx.recv() => {
                    self.unmount(mount_id);
                }

                _ = tokio::signal::ctrl_c() => {
                    info!("Interrupted");
                    break;
                }

                else => {
                    info!("All channels closed, shutting down");
                    break;
                }
            }
        }

        // Releases the microphone and cancels the timer whatever the status.
        if let Some(mut recorder) = self.recorder.take() {
            recorder.session.teardown();
        }

        let _ = self.shutdown_tx.send(true);
        info!("Classnote shut down successfully");

        Ok(())
    }

    #[instrument(skip(self))]
    pub(crate) fn handle_command(&mut self, cmd: AppCommand) -> AppResult<()> {
        match cmd {
            AppCommand::Session(intent) => return self.handle_intent(intent),
            AppCommand::Status => {
                self.render();
                return Ok(());
            }
            AppCommand::Help => {
                println!("{}", HELP);
                return Ok(());
            }
            AppCommand::Shutdown => return Ok(()),
            _ => {}
        }

        if self.recorder.is_some() {
            println!("Close the recorder first (`close`).");
            return Ok(());
        }

        match cmd {
            AppCommand::List => {}
            AppCommand::Create { name } => {
                self.store.add(&name)?;
            }
            AppCommand::Rename { position, name } => {
                let id = self.classroom_at(position)?;
                self.store.rename(id, &name)?;
            }
            AppCommand::Favourite { position } => {
                let id = self.classroom_at(position)?;
                self.store.toggle_favourite(id)?;
            }
            AppCommand::Trash { position } => {
                let id = self.classroom_at(position)?;
                self.store.move_to_trash(id)?;
            }
            AppCommand::Record { position } => {
                let id = self.classroom_at(position)?;
                self.mount(id);
            }
            AppCommand::Session(_)
            | AppCommand::Status
            | AppCommand::Help
            | AppCommand::Shutdown => {}
        }

        self.render();
        Ok(())
    }

    fn handle_intent(&mut self, intent: SessionIntent) -> AppResult<()> {
        let Some(recorder) = self.recorder.as_mut() else {
            println!("No recorder open. Use `record <n>` first.");
            return Ok(());
        };

        let request = view::dispatch(&mut recorder.session, intent)?;

        if let Some(request) = request {
            let outcome_tx = self.save_tx.clone();
            let sink = Arc::clone(&self.sink);
            let mount_id = recorder.mount_id;
            let duration_seconds = recorder.session.elapsed_seconds();

            tokio::spawn(async move {
                let filename = request.filename.clone();
                let result = sink.save(request.filename, request.artifact).await;
                let outcome = SaveOutcome {
                    mount_id,
                    ticket: request.ticket,
                    filename,
                    duration_seconds,
                    result,
                };
                if outcome_tx.send(outcome).is_err() {
                    debug!(mount_id = %mount_id, "App gone before save finished");
                }
            });
        }

        self.render();
        Ok(())
    }

    #[instrument(skip(self, outcome), fields(mount_id = %outcome.mount_id))]
    pub(crate) fn handle_save_outcome(&mut self, outcome: SaveOutcome) -> AppResult<()> {
        let Some(recorder) = self
            .recorder
            .as_mut()
            .filter(|r| r.mount_id == outcome.mount_id)
        else {
            debug!("Save outcome for an unmounted recorder, dropped");
            return Ok(());
        };

        let finished = recorder
            .session
            .complete_save(outcome.ticket, outcome.result)?;

        if finished {
            let classroom_id = recorder.classroom_id;
            self.store.add_recording(
                classroom_id,
                SavedRecording {
                    filename: outcome.filename.clone(),
                    duration_seconds: outcome.duration_seconds,
                    saved_at: Utc::now(),
                },
            )?;
            println!("Saved {}", outcome.filename);
        }

        Ok(())
    }

    fn mount(&mut self, classroom_id: Uuid) {
        let mount_id = Uuid::new_v4();
        let (tick_tx, tick_rx) = mpsc::unbounded_channel();
        let (capture, timer) = (self.resources)(tick_tx);

        let closed_tx = self.closed_tx.clone();
        let on_close = Box::new(move || {
            if closed_tx.send(mount_id).is_err() {
                warn!(mount_id = %mount_id, "Close notification dropped");
            }
        });

        let session = RecordingSession::open(capture, timer, on_close);

        info!(
            mount_id = %mount_id,
            classroom_id = %classroom_id,
            session_id = %session.id(),
            "Recorder opened"
        );

        self.recorder = Some(Recorder {
            mount_id,
            classroom_id,
            session,
            tick_rx,
        });
    }

    pub(crate) fn unmount(&mut self, mount_id: Uuid) {
        if self.recorder.as_ref().map(|r| r.mount_id) != Some(mount_id) {
            debug!(mount_id = %mount_id, "Close notification for a stale mount, ignored");
            return;
        }
        if let Some(mut recorder) = self.recorder.take() {
            recorder.session.teardown();
        }

        info!(mount_id = %mount_id, "Recorder closed");
        self.render();
    }

    fn render(&self) {
        match &self.recorder {
            Some(recorder) => {
                let title = self
                    .store
                    .get(recorder.classroom_id)
                    .map(|c| c.name.as_str())
                    .unwrap_or("Recording");
                println!("[{}]", title);
                print!("{}", view::render_session(&recorder.session.snapshot()));
            }
            None => print!("{}", view::render_dashboard(&self.store)),
        }
    }

    #[track_caller]
    fn classroom_at(&self, position: usize) -> AppResult<Uuid> {
        self.store
            .by_position(position)
            .map(|c| c.id)
            .ok_or_else(|| AppError::InvalidCommand {
                reason: format!("no classroom at position {}", position),
                location: ErrorLocation::from(Location::caller()),
            })
    }
}

async fn next_tick<C: CaptureManager, T: TimerService>(
    recorder: &mut Option<Recorder<C, T>>,
) -> Option<TimerId> {
    match recorder {
        Some(recorder) => recorder.tick_rx.recv().await,
        None => std::future::pending().await,
    }
}

/// Short message for the terminal; the full error goes to the log.
pub(crate) fn user_message(error: &AppError) -> String {
    match error {
        AppError::Session { source, .. } => view::describe_error(source),
        AppError::InvalidCommand { reason, .. } => reason.clone(),
        AppError::InvalidName { .. } => "Classroom name cannot be empty.".to_string(),
        AppError::ClassroomNotFound { .. } => "That classroom no longer exists.".to_string(),
        other => other.to_string(),
    }
}
