//! Error types for audio decoding and feature extraction
//!
//! Every variant is an extraction failure from the caller's point of view;
//! the Display text is what ends up in front of the user.

use symphonia::core::errors::Error as SymphoniaError;
use thiserror::Error;

/// Extraction failure
#[derive(Debug, Error)]
pub enum ExtractError {
    /// Zero-length input
    #[error("Audio input is empty")]
    EmptyInput,

    /// Container could not be identified
    #[error("Unrecognized or unsupported audio format: {0}")]
    Probe(#[source] SymphoniaError),

    /// Container holds no decodable audio track
    #[error("No audio track found in file")]
    NoAudioTrack,

    /// Track did not declare a sample rate
    #[error("Sample rate unknown")]
    MissingSampleRate,

    /// No decoder available for the track codec
    #[error("Unsupported codec: {0}")]
    UnsupportedCodec(#[source] SymphoniaError),

    /// Unrecoverable error while reading or decoding packets
    #[error("Failed to decode audio: {0}")]
    Decode(#[source] SymphoniaError),

    /// Stream decoded to zero samples
    #[error("Audio stream contained no samples")]
    NoSamples,

    /// Framing/filterbank parameters that cannot produce a matrix
    #[error("Invalid feature configuration: {0}")]
    InvalidConfig(String),

    /// FFT planner/processor failure
    #[error("FFT failed: {0}")]
    Fft(String),
}
