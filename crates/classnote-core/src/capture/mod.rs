mod manager;
pub(crate) mod microphone;

pub use {
    manager::{AudioArtifact, CaptureManager},
    microphone::{Microphone, MicrophoneHandle},
};
