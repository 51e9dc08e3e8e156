use crate::CaptureError;

/// Audio captured during a session, handed to the persistence sink.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioArtifact {
    /// Interleaved f32 samples.
    pub samples: Vec<f32>,
    /// Frames per second.
    pub sample_rate: u32,
    /// Interleaved channel count.
    pub channels: u16,
}

impl AudioArtifact {
    /// True when no samples were captured.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Length of the captured audio in seconds.
    pub fn duration_seconds(&self) -> f64 {
        if self.sample_rate == 0 || self.channels == 0 {
            return 0.0;
        }
        self.samples.len() as f64 / (f64::from(self.sample_rate) * f64::from(self.channels))
    }
}

/// Acquires and releases the audio input resource.
///
/// Implementations know nothing about sessions or dialogs. The handle is an
/// exclusive grant: whoever holds it owns the device until it is passed back
/// to [`CaptureManager::release`].
pub trait CaptureManager {
    /// Exclusive grant to the input device and its tracks.
    type Handle;

    /// Request the input device.
    ///
    /// # Errors
    ///
    /// [`CaptureError::PermissionDenied`] or [`CaptureError::DeviceUnavailable`].
    /// On error nothing is held.
    fn acquire(&mut self) -> Result<Self::Handle, CaptureError>;

    /// Disable the tracks without giving the device back.
    fn mute(&mut self, handle: &Self::Handle);

    /// Re-enable tracks disabled by [`CaptureManager::mute`].
    fn unmute(&mut self, handle: &Self::Handle);

    /// Copy of everything captured through `handle` so far.
    fn snapshot(&self, handle: &Self::Handle) -> AudioArtifact;

    /// Stop every track and give the device back. `None` is a no-op.
    fn release(&mut self, handle: Option<Self::Handle>);
}
