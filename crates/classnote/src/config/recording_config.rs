use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Recording surface configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordingConfig {
    /// Directory saved recordings are written to.
    pub output_dir: PathBuf,
}
