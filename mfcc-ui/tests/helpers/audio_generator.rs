//! Audio Test Fixture Generator
//!
//! Upload bodies for the API tests: in-memory WAV (via hound) and FLAC.
//!
//! The FLAC writer emits fixed-blocksize frames with VERBATIM subframes:
//! valid, lossless and trivially simple, so no encoder crate is needed.

use std::f32::consts::PI;
use std::io::Cursor;

/// Samples per FLAC frame
const FLAC_BLOCK_SIZE: usize = 4096;

/// Mono sine at amplitude 0.6
pub fn sine(freq: f32, sample_rate: u32, n_samples: usize) -> Vec<f32> {
    (0..n_samples)
        .map(|i| 0.6 * (2.0 * PI * freq * i as f32 / sample_rate as f32).sin())
        .collect()
}

/// Scale [-1, 1] floats to 16-bit PCM
pub fn to_i16(samples: &[f32]) -> Vec<i16> {
    samples
        .iter()
        .map(|&s| (s.clamp(-1.0, 1.0) * i16::MAX as f32) as i16)
        .collect()
}

/// Encode mono samples as 16-bit PCM WAV
pub fn wav_i16(sample_rate: u32, samples: &[f32]) -> Vec<u8> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut cursor = Cursor::new(Vec::new());
    let mut writer = hound::WavWriter::new(&mut cursor, spec).expect("Failed to create WAV writer");
    for value in to_i16(samples) {
        writer.write_sample(value).expect("Failed to write sample");
    }
    writer.finalize().expect("Failed to finalize WAV");
    cursor.into_inner()
}

/// Encode mono 16-bit samples as a FLAC stream
///
/// Supports the sample rates FLAC frame headers can name directly and up to
/// 127 frames (about 520k samples).
pub fn flac_i16(sample_rate: u32, samples: &[i16]) -> Vec<u8> {
    let rate_code: u8 = match sample_rate {
        8000 => 0x4,
        16000 => 0x5,
        22050 => 0x6,
        24000 => 0x7,
        32000 => 0x8,
        44100 => 0x9,
        48000 => 0xA,
        other => panic!("No FLAC frame header code for {} Hz", other),
    };
    let frame_count = samples.len().div_ceil(FLAC_BLOCK_SIZE);
    assert!(frame_count < 128, "Frame numbers above 127 need multi-byte coding");

    let mut out = b"fLaC".to_vec();

    // STREAMINFO, flagged as the last metadata block, 34 bytes
    out.extend_from_slice(&[0x80, 0x00, 0x00, 34]);
    out.extend_from_slice(&(FLAC_BLOCK_SIZE as u16).to_be_bytes());
    out.extend_from_slice(&(FLAC_BLOCK_SIZE as u16).to_be_bytes());
    out.extend_from_slice(&[0; 6]); // frame sizes unknown
    let packed: u64 = (u64::from(sample_rate) << 44) // 20 bits
        | (0 << 41) // channels - 1
        | (15 << 36) // bits per sample - 1
        | samples.len() as u64; // 36 bits
    out.extend_from_slice(&packed.to_be_bytes());
    out.extend_from_slice(&[0; 16]); // MD5 unset

    for (frame_number, block) in samples.chunks(FLAC_BLOCK_SIZE).enumerate() {
        let mut frame = vec![
            0xFF,
            0xF8,              // sync, fixed blocksize
            0x70 | rate_code,  // blocksize from 16-bit field below
            0x08,              // mono, 16 bits per sample
            frame_number as u8,
        ];
        frame.extend_from_slice(&((block.len() - 1) as u16).to_be_bytes());
        frame.push(crc8(&frame));

        frame.push(0x02); // VERBATIM subframe, no wasted bits
        for sample in block {
            frame.extend_from_slice(&sample.to_be_bytes());
        }
        let crc = crc16(&frame);
        frame.extend_from_slice(&crc.to_be_bytes());

        out.extend_from_slice(&frame);
    }

    out
}

/// CRC-8, polynomial 0x07, frame headers
fn crc8(data: &[u8]) -> u8 {
    data.iter().fold(0u8, |mut crc, &byte| {
        crc ^= byte;
        for _ in 0..8 {
            crc = if crc & 0x80 != 0 { (crc << 1) ^ 0x07 } else { crc << 1 };
        }
        crc
    })
}

/// CRC-16, polynomial 0x8005, whole frames
fn crc16(data: &[u8]) -> u16 {
    data.iter().fold(0u16, |mut crc, &byte| {
        crc ^= u16::from(byte) << 8;
        for _ in 0..8 {
            crc = if crc & 0x8000 != 0 { (crc << 1) ^ 0x8005 } else { crc << 1 };
        }
        crc
    })
}

#[test]
fn test_flac_checksums_match_reference_values() {
    assert_eq!(crc8(b"123456789"), 0xF4);
    assert_eq!(crc16(b"123456789"), 0xFEE8);
}
