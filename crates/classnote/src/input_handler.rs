//! Terminal input forwarding.
//!
//! Reads lines from stdin on a blocking task, parses them into
//! [`AppCommand`]s and hands them to the main application over a channel.

use crate::{AppCommand, AppError, AppResult};

use std::{io::BufRead, panic::Location, time::Duration};

use error_location::ErrorLocation;
use tokio::sync::{mpsc, watch};
use tracing::{debug, info, instrument, warn};

/// Forwards typed commands to the application.
pub struct InputHandler {
    command_tx: mpsc::Sender<AppCommand>,
}

impl InputHandler {
    /// Create a handler that sends on `command_tx`.
    pub fn new(command_tx: mpsc::Sender<AppCommand>) -> Self {
        Self { command_tx }
    }

    /// Run the input loop until shutdown or end of input.
    ///
    /// End of input is treated as `quit`.
    #[instrument(skip_all)]
    pub async fn run(&self, mut shutdown_rx: watch::Receiver<bool>) -> AppResult<()> {
        let (line_tx, mut line_rx) = mpsc::channel::<String>(32);

        // Single persistent blocking task. Stdin has a blocking read and no
        // async equivalent that plays well with an interactive terminal.
        //
        // Shutdown: when line_rx is dropped (loop breaks), the next
        // line_tx.blocking_send() fails, breaking the blocking loop.
        let handle = tokio::task::spawn_blocking(move || {
            let stdin = std::io::stdin();
            for line in stdin.lock().lines() {
                match line {
                    Ok(line) => {
                        if line_tx.blocking_send(line).is_err() {
                            break;
                        }
                    }
                    Err(e) => {
                        warn!(error = %e, "Failed to read from stdin");
                        break;
                    }
                }
            }
        });

        loop {
            tokio::select! {
                _ = shutdown_rx.changed() => {
                    info!("Input handler shutting down");
                    break;
                }
                line = line_rx.recv() => {
                    match line {
                        Some(line) => self.handle_line(&line).await?,
                        None => {
                            info!("End of input, requesting shutdown");
                            self.send(AppCommand::Shutdown).await?;
                            break;
                        }
                    }
                }
            }
        }

        drop(line_rx);

        // Best-effort join: the blocking task is usually parked in a read
        // that only returns on the next line. The runtime is shut down in
        // the background on exit, so a stuck reader does not hold it open.
        match tokio::time::timeout(Duration::from_secs(1), handle).await {
            Ok(Ok(())) => debug!("Input forwarder stopped cleanly"),
            Ok(Err(e)) => warn!(error = ?e, "Input forwarder task panicked"),
            Err(_) => debug!(
                "Input forwarder did not stop within timeout, \
                   will be cleaned up on exit"
            ),
        }

        Ok(())
    }

    /// Parse `line` and forward the command. Parse errors are reported to
    /// the user and never stop the loop.
    #[instrument(skip(self))]
    pub(crate) async fn handle_line(&self, line: &str) -> AppResult<()> {
        match AppCommand::parse(line) {
            Ok(Some(command)) => self.send(command).await,
            Ok(None) => Ok(()),
            Err(AppError::InvalidCommand { reason, .. }) => {
                debug!(reason = %reason, "Invalid command");
                println!("{}", reason);
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    async fn send(&self, command: AppCommand) -> AppResult<()> {
        self.command_tx
            .send(command)
            .await
            .map_err(|e| AppError::ChannelSendFailed {
                message: format!("Failed to send command: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })
    }
}
