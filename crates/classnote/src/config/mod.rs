mod account_config;
#[allow(clippy::module_inception)]
mod config;
mod logging_config;
mod recording_config;

pub(crate) use {
    account_config::AccountConfig, config::Config, logging_config::LoggingConfig,
    recording_config::RecordingConfig,
};

pub(crate) const DEFAULT_LOG_FILTER: &str = "classnote=debug,classnote_core=debug";

pub(crate) fn default_log_filter() -> String {
    DEFAULT_LOG_FILTER.to_string()
}
