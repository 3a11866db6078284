//! In-memory audio decoding
//!
//! **Purpose:** Decode an uploaded audio file to mono f32 PCM samples
//!
//! Uses symphonia for format-agnostic decoding. The sample rate is left at
//! whatever the file declares; nothing is resampled.

use crate::error::ExtractError;
use std::io::Cursor;
use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::{DecoderOptions, CODEC_TYPE_NULL};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use tracing::{debug, warn};

/// Decoded audio
#[derive(Debug, Clone, PartialEq)]
pub struct Waveform {
    /// Mono samples (f32, range [-1.0, 1.0])
    pub samples: Vec<f32>,
    /// Native sample rate in Hz
    pub sample_rate: u32,
    /// Channel count before the mono mixdown
    pub channels: usize,
}

impl Waveform {
    pub fn duration_seconds(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.samples.len() as f64 / self.sample_rate as f64
    }
}

/// Decode encoded audio bytes to a mono waveform
///
/// **Algorithm:**
/// 1. Probe the container from an in-memory cursor (extension used as hint)
/// 2. Pick the first track with a real codec
/// 3. Decode every packet of that track to interleaved f32
/// 4. Average channels down to mono
///
/// Packets the codec reports as corrupt are skipped. The stream as a whole
/// still fails if nothing decodes.
///
/// Takes the buffer by value: symphonia reads straight from it, so the
/// upload is held in memory once.
///
/// # Errors
/// * Empty input
/// * Unknown container or codec
/// * Unrecoverable read/decode errors
/// * Zero decoded samples
pub fn decode_audio(bytes: Vec<u8>, extension_hint: Option<&str>) -> Result<Waveform, ExtractError> {
    if bytes.is_empty() {
        return Err(ExtractError::EmptyInput);
    }

    debug!(
        bytes = bytes.len(),
        extension = extension_hint.unwrap_or("-"),
        "Decoding audio"
    );

    let source = Cursor::new(bytes);
    let mss = MediaSourceStream::new(Box::new(source), Default::default());

    let mut hint = Hint::new();
    if let Some(extension) = extension_hint {
        hint.with_extension(extension);
    }

    let probed = symphonia::default::get_probe()
        .format(&hint, mss, &FormatOptions::default(), &MetadataOptions::default())
        .map_err(ExtractError::Probe)?;

    let mut format = probed.format;

    let track = format
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
        .ok_or(ExtractError::NoAudioTrack)?;

    let track_id = track.id;
    let sample_rate = track
        .codec_params
        .sample_rate
        .ok_or(ExtractError::MissingSampleRate)?;
    let mut channels = track
        .codec_params
        .channels
        .map(|c| c.count())
        .unwrap_or(0);

    let mut decoder = symphonia::default::get_codecs()
        .make(&track.codec_params, &DecoderOptions::default())
        .map_err(ExtractError::UnsupportedCodec)?;

    let mut samples: Vec<f32> = Vec::new();
    let mut skipped_packets = 0usize;

    loop {
        let packet = match format.next_packet() {
            Ok(packet) => packet,
            Err(SymphoniaError::IoError(e)) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
                break;
            }
            Err(SymphoniaError::ResetRequired) => break,
            Err(e) => return Err(ExtractError::Decode(e)),
        };

        if packet.track_id() != track_id {
            continue;
        }

        let decoded = match decoder.decode(&packet) {
            Ok(decoded) => decoded,
            Err(SymphoniaError::DecodeError(reason)) => {
                warn!(reason, "Skipping corrupt audio packet");
                skipped_packets += 1;
                continue;
            }
            Err(SymphoniaError::IoError(e)) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
                break;
            }
            Err(e) => return Err(ExtractError::Decode(e)),
        };

        if decoded.frames() == 0 {
            continue;
        }

        let spec = *decoded.spec();
        let channel_count = spec.channels.count().max(1);
        channels = channel_count;

        let mut interleaved = SampleBuffer::<f32>::new(decoded.capacity() as u64, spec);
        interleaved.copy_interleaved_ref(decoded);

        mix_to_mono(interleaved.samples(), channel_count, &mut samples);
    }

    if samples.is_empty() {
        return Err(ExtractError::NoSamples);
    }

    let waveform = Waveform {
        samples,
        sample_rate,
        channels,
    };

    debug!(
        sample_rate,
        channels,
        total_samples = waveform.samples.len(),
        skipped_packets,
        duration_seconds = format!("{:.2}", waveform.duration_seconds()),
        "Audio decoding complete"
    );

    Ok(waveform)
}

/// Average interleaved frames into `out`
fn mix_to_mono(interleaved: &[f32], channels: usize, out: &mut Vec<f32>) {
    if channels == 1 {
        out.extend_from_slice(interleaved);
        return;
    }

    out.reserve(interleaved.len() / channels);
    for frame in interleaved.chunks_exact(channels) {
        let sum: f32 = frame.iter().sum();
        out.push(sum / channels as f32);
    }
}
