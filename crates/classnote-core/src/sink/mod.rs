//! Destinations for finished recordings.

pub(crate) mod wav_file;

pub use wav_file::WavFileSink;

use crate::{SaveError, capture::AudioArtifact};

use std::future::Future;

/// Durably stores a named audio artifact.
///
/// The session never awaits a sink itself: it hands out a
/// [`SaveRequest`](crate::session::SaveRequest) and the embedder runs it here,
/// so the event loop keeps serving other events while the save is in flight.
pub trait PersistenceSink: Send + Sync + 'static {
    /// Store `audio` under `filename`.
    fn save(
        &self,
        filename: String,
        audio: AudioArtifact,
    ) -> impl Future<Output = Result<(), SaveError>> + Send;
}
