//! # MFCC Lab Common Library
//!
//! Shared code for the MFCC Lab crates:
//! - Error type used outside the audio path
//! - Bootstrap TOML configuration loading
//! - Tracing subscriber setup

pub mod config;
pub mod error;
pub mod logging;

pub use error::{Error, Result};
