//! Feature extractor seam
//!
//! [`FeatureExtractor`] is what the upload handler calls. The production
//! implementation, [`MfccExtractor`], decodes and computes in one step and
//! keeps no state between calls.

use crate::decoder::decode_audio;
use crate::error::ExtractError;
use crate::mfcc::{compute_mfcc, MfccConfig, MfccMatrix};
use serde::Serialize;

/// Result of one successful extraction
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Extraction {
    /// Coefficients × frames
    pub mfcc: MfccMatrix,
    /// Native sample rate of the decoded file
    pub sample_rate: u32,
    /// Channel count before mono mixdown
    pub channels: usize,
    /// Mono sample count
    pub samples: usize,
    pub duration_seconds: f64,
}

/// Turns encoded audio bytes into an MFCC matrix
pub trait FeatureExtractor: Send + Sync {
    /// `audio` is the whole encoded file; `extension_hint` is its extension,
    /// without the dot
    fn extract(&self, audio: Vec<u8>, extension_hint: Option<&str>) -> Result<Extraction, ExtractError>;
}

/// Decoder + MFCC pipeline with fixed default framing
#[derive(Debug, Clone, Default)]
pub struct MfccExtractor {
    config: MfccConfig,
}

impl MfccExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn config(&self) -> &MfccConfig {
        &self.config
    }
}

impl FeatureExtractor for MfccExtractor {
    fn extract(&self, audio: Vec<u8>, extension_hint: Option<&str>) -> Result<Extraction, ExtractError> {
        let waveform = decode_audio(audio, extension_hint)?;
        let mfcc = compute_mfcc(&waveform.samples, waveform.sample_rate, &self.config)?;

        Ok(Extraction {
            mfcc,
            sample_rate: waveform.sample_rate,
            channels: waveform.channels,
            samples: waveform.samples.len(),
            duration_seconds: waveform.duration_seconds(),
        })
    }
}
