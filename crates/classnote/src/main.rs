//! Classnote: lecture recorder with a classroom dashboard.

mod app;
mod app_command;
mod auth;
mod classroom;
mod config;
mod error;
mod input_handler;
mod logging;
mod view;

pub(crate) use {
    app::App,
    app_command::AppCommand,
    error::{AppError, Result as AppResult},
    input_handler::InputHandler,
};

use crate::{
    auth::{AccessDecision, LocalAuth, check_access},
    config::Config,
};

use tokio::sync::{mpsc, watch};
use tracing::error;

/// Application entry point.
fn main() {
    let config = match Config::load() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load config: {}", e);
            std::process::exit(1);
        }
    };

    let data_dir = match Config::data_dir() {
        Ok(dir) => dir,
        Err(e) => {
            eprintln!("Failed to resolve data directory: {}", e);
            std::process::exit(1);
        }
    };

    // Flushes buffered log lines when dropped at the end of main.
    let _log_guard = match logging::init(&config.logging, &data_dir) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {}", e);
            std::process::exit(1);
        }
    };

    match check_access(&LocalAuth::from_config(&config.account)) {
        AccessDecision::Granted { .. } => {}
        AccessDecision::Loading => {
            println!("Loading...");
            std::process::exit(1);
        }
        AccessDecision::Redirect { to } => {
            eprintln!(
                "Not signed in, redirecting to {}: set account.user_id in the config file.",
                to
            );
            std::process::exit(1);
        }
    }

    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            error!("Failed to create tokio runtime: {:?}", e);
            eprintln!("Failed to start: {}", e);
            std::process::exit(1);
        }
    };

    rt.block_on(async {
        let (command_tx, command_rx) = mpsc::channel(32);
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        let input_handler = InputHandler::new(command_tx);
        let app = App::new(config, command_rx, shutdown_tx);

        tokio::join!(
            async {
                if let Err(e) = input_handler.run(shutdown_rx).await {
                    error!(error = ?e, "Input handler error");
                }
            },
            async {
                if let Err(e) = app.run().await {
                    error!(error = ?e, "App error");
                }
            }
        );
    });

    // The stdin reader may still be parked in a blocking read.
    rt.shutdown_background();
}
