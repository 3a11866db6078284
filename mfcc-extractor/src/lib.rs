//! mfcc-extractor - Audio bytes to MFCC matrix
//!
//! Decodes an in-memory audio file (WAV, MP3, FLAC) at its native sample
//! rate, mixes it down to mono, and computes a 13-coefficient MFCC matrix
//! with fixed framing (2048-sample Hann window, hop 512, 128 Slaney mel
//! bands, orthonormal DCT-II).
//!
//! The extractor is stateless: every call is a pure function of the input
//! bytes, so identical input always produces an identical matrix.

pub mod decoder;
pub mod error;
pub mod extractor;
pub mod mel;
pub mod mfcc;

pub use decoder::{decode_audio, Waveform};
pub use error::ExtractError;
pub use extractor::{Extraction, FeatureExtractor, MfccExtractor};
pub use mfcc::{compute_mfcc, MfccConfig, MfccMatrix, N_MFCC};

/// Decode `audio` and return the default MFCC matrix
///
/// Convenience wrapper around [`MfccExtractor`] for callers that only need
/// the matrix.
pub fn extract_mfcc(audio: Vec<u8>, extension_hint: Option<&str>) -> Result<MfccMatrix, ExtractError> {
    MfccExtractor::new()
        .extract(audio, extension_hint)
        .map(|extraction| extraction.mfcc)
}
