use crate::{SaveError, capture::AudioArtifact, sink::PersistenceSink};

use std::{
    fs, io,
    panic::Location,
    path::{Path, PathBuf},
};

use error_location::ErrorLocation;
use hound::{SampleFormat, WavSpec, WavWriter};
use tracing::{debug, info, instrument, warn};

/// Writes each recording as 32-bit float PCM into a directory.
///
/// The stored name is the session's normalized filename; the container is
/// WAV regardless of the extension, since encoding is left to downstream
/// tooling. Existing recordings are never overwritten.
#[derive(Debug, Clone)]
pub struct WavFileSink {
    dir: PathBuf,
}

impl WavFileSink {
    /// Sink writing into `dir`, created on first save.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Directory recordings are written to.
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl PersistenceSink for WavFileSink {
    #[instrument(skip(self, audio), fields(dir = ?self.dir))]
    async fn save(&self, filename: String, audio: AudioArtifact) -> Result<(), SaveError> {
        let dir = self.dir.clone();

        // hound writes synchronously; keep it off the event loop thread.
        tokio::task::spawn_blocking(move || write_wav(&dir, &filename, &audio))
            .await
            .map_err(|e| SaveError::TaskFailed {
                reason: format!("Save task panicked: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?
    }
}

#[track_caller]
fn write_wav(dir: &Path, filename: &str, audio: &AudioArtifact) -> Result<(), SaveError> {
    validate_filename(filename)?;

    fs::create_dir_all(dir).map_err(|source| SaveError::Io {
        path: dir.to_path_buf(),
        source,
        location: ErrorLocation::from(Location::caller()),
    })?;

    let path = dir.join(filename);
    if path.exists() {
        return Err(SaveError::AlreadyExists {
            path,
            location: ErrorLocation::from(Location::caller()),
        });
    }

    // Atomic write: write to a hidden temp file then publish
    let temp_path = dir.join(format!(".{}.part", filename));

    if let Err(e) = encode_wav(&temp_path, audio) {
        remove_temp(&temp_path);
        return Err(e);
    }

    debug!(temp_path = ?temp_path, sample_count = audio.samples.len(), "WAV data written");

    publish(&temp_path, &path)?;

    info!(
        path = ?path,
        duration_secs = audio.duration_seconds(),
        "Recording stored"
    );

    Ok(())
}

#[track_caller]
fn encode_wav(temp_path: &Path, audio: &AudioArtifact) -> Result<(), SaveError> {
    let spec = WavSpec {
        channels: audio.channels.max(1),
        sample_rate: audio.sample_rate,
        bits_per_sample: 32,
        sample_format: SampleFormat::Float,
    };

    let encode = |e: hound::Error| SaveError::Encoding {
        reason: e.to_string(),
        location: ErrorLocation::from(Location::caller()),
    };

    let mut writer = WavWriter::create(temp_path, spec).map_err(encode)?;
    for &sample in &audio.samples {
        writer.write_sample(sample).map_err(encode)?;
    }
    writer.finalize().map_err(encode)
}

/// Move the finished temp file to `path` without replacing anything there.
///
/// A hard link fails if `path` already exists, so a file that appeared
/// after the earlier existence check is never overwritten. Filesystems
/// without hard links fall back to a rename, which can only lose that race
/// to a file created in between. The temp file is removed on every path.
#[track_caller]
pub(crate) fn publish(temp_path: &Path, path: &Path) -> Result<(), SaveError> {
    let result = match fs::hard_link(temp_path, path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists => Err(already_exists(path)),
        Err(e) => {
            debug!(error = %e, "Hard link unavailable, falling back to rename");
            if path.exists() {
                Err(already_exists(path))
            } else {
                fs::rename(temp_path, path).map_err(|source| SaveError::Io {
                    path: path.to_path_buf(),
                    source,
                    location: ErrorLocation::from(Location::caller()),
                })
            }
        }
    };

    // After a successful rename the temp file is already gone.
    remove_temp(temp_path);
    result
}

#[track_caller]
fn already_exists(path: &Path) -> SaveError {
    SaveError::AlreadyExists {
        path: path.to_path_buf(),
        location: ErrorLocation::from(Location::caller()),
    }
}

fn remove_temp(temp_path: &Path) {
    if let Err(e) = fs::remove_file(temp_path) {
        if e.kind() != io::ErrorKind::NotFound {
            warn!(temp_path = ?temp_path, error = %e, "Failed to remove temp recording");
        }
    }
}

#[track_caller]
fn validate_filename(filename: &str) -> Result<(), SaveError> {
    let invalid = filename.is_empty()
        || filename.starts_with('.')
        || filename.contains(['/', '\\', '\0']);

    if invalid {
        return Err(SaveError::InvalidFilename {
            filename: filename.to_string(),
            location: ErrorLocation::from(Location::caller()),
        });
    }
    Ok(())
}
