//! Test Helper Utilities
//!
//! Shared utilities for the mfcc-ui integration tests

// Each test binary uses a different subset
#![allow(dead_code)]

pub mod audio_generator;
pub mod log_capture;

pub use audio_generator::{flac_i16, sine, to_i16, wav_i16};
pub use log_capture::LogCapture;
