use std::fmt;

/// Lifecycle of a recording session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RecordingStatus {
    /// No capture held, elapsed time at zero.
    #[default]
    Idle,
    /// Capture held and enabled, timer running.
    Recording,
    /// Capture held but muted, timer stopped.
    Paused,
}

impl RecordingStatus {
    /// Stable lowercase name, used in logs and views.
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordingStatus::Idle => "idle",
            RecordingStatus::Recording => "recording",
            RecordingStatus::Paused => "paused",
        }
    }

    /// True while the session owns the capture handle.
    pub fn is_active(&self) -> bool {
        !matches!(self, RecordingStatus::Idle)
    }
}

impl fmt::Display for RecordingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
