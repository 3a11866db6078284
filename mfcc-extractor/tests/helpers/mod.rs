//! Test Helper Utilities
//!
//! Shared fixture builders for the mfcc-extractor integration tests

// Each test binary uses a different subset
#![allow(dead_code)]

pub mod audio_generator;

pub use audio_generator::{flac_i16, sine, to_i16, wav_f32, wav_i16};
