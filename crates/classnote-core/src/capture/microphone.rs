use crate::{
    CaptureError,
    capture::{AudioArtifact, CaptureManager},
};

use std::{
    collections::VecDeque,
    panic::Location,
    sync::{
        Arc, Mutex,
        atomic::{AtomicBool, Ordering},
    },
    time::Duration,
};

use cpal::{
    Stream,
    traits::{DeviceTrait, HostTrait, StreamTrait},
};
use error_location::ErrorLocation;
use tracing::{debug, error, info, instrument, warn};

/// Longest recording kept in memory (90 minutes), whatever the device's
/// rate and channel count. Past this the oldest audio is dropped.
///
/// **Memory footprint at max capacity:**
/// - 48,000 Hz * 2 ch * 60s * 90 min * 4 bytes/f32 = ~2GB
/// - The buffer grows on demand; nothing is preallocated
pub(crate) const MAX_BUFFER_SECONDS: usize = 60 * 90;

/// Interleaved sample capacity holding [`MAX_BUFFER_SECONDS`] of audio.
pub(crate) fn buffer_capacity(sample_rate: u32, channels: u16) -> usize {
    MAX_BUFFER_SECONDS
        .saturating_mul(sample_rate as usize)
        .saturating_mul(usize::from(channels.max(1)))
}

/// Append `data`, evicting the oldest samples beyond `capacity`.
///
/// Returns the number of samples evicted.
pub(crate) fn push_capped(buf: &mut VecDeque<f32>, data: &[f32], capacity: usize) -> usize {
    buf.extend(data.iter().copied());
    let excess = buf.len().saturating_sub(capacity);
    buf.drain(..excess);
    excess
}

/// Platform messages that indicate the OS refused microphone access.
const PERMISSION_MARKERS: [&str; 3] = ["permission", "denied", "not authorized"];

/// Live microphone stream owned by a recording session.
pub struct MicrophoneHandle {
    stream: Stream,
    samples: Arc<Mutex<VecDeque<f32>>>,
    /// Equivalent of a track's `enabled` flag. Cleared while paused so the
    /// callback discards incoming frames.
    enabled: Arc<AtomicBool>,
    /// Cleared before the stream is dropped so no in-flight callback writes
    /// after release.
    live: Arc<AtomicBool>,
    sample_rate: u32,
    channels: u16,
}

impl MicrophoneHandle {
    /// True while captured frames are being kept.
    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::Acquire)
    }
}

/// [`CaptureManager`] over the default cpal input device.
#[derive(Debug, Default)]
pub struct Microphone;

impl Microphone {
    /// Create a manager for the host's default input device.
    pub fn new() -> Self {
        Self
    }
}

impl CaptureManager for Microphone {
    type Handle = MicrophoneHandle;

    #[track_caller]
    #[instrument(skip(self))]
    fn acquire(&mut self) -> Result<MicrophoneHandle, CaptureError> {
        let host = cpal::default_host();

        let device = host
            .default_input_device()
            .ok_or_else(|| CaptureError::DeviceUnavailable {
                reason: "No microphone found".to_string(),
                location: ErrorLocation::from(Location::caller()),
            })?;

        let config = device
            .default_input_config()
            .map_err(|e| classify(format!("Failed to get config: {}", e)))?;

        let sample_rate = config.sample_rate();
        let channels = config.channels();

        let capacity = buffer_capacity(sample_rate, channels);
        let samples = Arc::new(Mutex::new(VecDeque::new()));
        let enabled = Arc::new(AtomicBool::new(true));
        let live = Arc::new(AtomicBool::new(true));

        let stream = {
            let samples = Arc::clone(&samples);
            let enabled = Arc::clone(&enabled);
            let live = Arc::clone(&live);
            let mut eviction_reported = false;

            device
                .build_input_stream(
                    &config.into(),
                    move |data: &[f32], _: &cpal::InputCallbackInfo| {
                        if !live.load(Ordering::Acquire) || !enabled.load(Ordering::Acquire) {
                            return;
                        }
                        // A poisoned mutex still holds valid samples.
                        let mut buf = samples.lock().unwrap_or_else(|e| {
                            error!("Sample buffer lock poisoned, recovering: {}", e);
                            e.into_inner()
                        });
                        let evicted = push_capped(&mut buf, data, capacity);
                        if evicted > 0 && !eviction_reported {
                            eviction_reported = true;
                            warn!(
                                capacity,
                                max_seconds = MAX_BUFFER_SECONDS,
                                "Capture buffer full, oldest audio is being dropped"
                            );
                        }
                    },
                    |err| {
                        error!("Audio stream error: {}", err);
                    },
                    None,
                )
                .map_err(|e| classify(format!("Failed to build stream: {}", e)))?
        };

        // Dropping `stream` on this error path stops the device again.
        stream
            .play()
            .map_err(|e| classify(format!("Failed to start stream: {}", e)))?;

        info!(sample_rate, channels, capacity, "Microphone acquired");

        Ok(MicrophoneHandle {
            stream,
            samples,
            enabled,
            live,
            sample_rate,
            channels,
        })
    }

    #[instrument(skip(self, handle))]
    fn mute(&mut self, handle: &MicrophoneHandle) {
        handle.enabled.store(false, Ordering::Release);
        debug!("Microphone tracks disabled");
    }

    #[instrument(skip(self, handle))]
    fn unmute(&mut self, handle: &MicrophoneHandle) {
        handle.enabled.store(true, Ordering::Release);
        debug!("Microphone tracks enabled");
    }

    fn snapshot(&self, handle: &MicrophoneHandle) -> AudioArtifact {
        let samples: Vec<f32> = handle
            .samples
            .lock()
            .unwrap_or_else(|e| {
                warn!("Sample buffer lock poisoned, recovering: {}", e);
                e.into_inner()
            })
            .iter()
            .copied()
            .collect();

        debug!(sample_count = samples.len(), "Captured audio snapshot");

        AudioArtifact {
            samples,
            sample_rate: handle.sample_rate,
            channels: handle.channels,
        }
    }

    #[instrument(skip(self, handle))]
    fn release(&mut self, handle: Option<MicrophoneHandle>) {
        let Some(handle) = handle else {
            return;
        };

        handle.live.store(false, Ordering::Release);
        drop(handle.stream);
        // Give a backend whose drop is asynchronous time to run its last callback.
        std::thread::sleep(Duration::from_millis(5));

        info!("Microphone released");
    }
}

/// Map a platform error message onto the capture taxonomy.
#[track_caller]
pub(crate) fn classify(reason: String) -> CaptureError {
    let lowered = reason.to_lowercase();
    if PERMISSION_MARKERS.iter().any(|m| lowered.contains(m)) {
        CaptureError::PermissionDenied {
            reason,
            location: ErrorLocation::from(Location::caller()),
        }
    } else {
        CaptureError::DeviceUnavailable {
            reason,
            location: ErrorLocation::from(Location::caller()),
        }
    }
}
