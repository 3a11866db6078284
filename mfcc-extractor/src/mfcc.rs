//! MFCC computation
//!
//! Pipeline: centered STFT (periodic Hann) → power spectrum → Slaney mel
//! filterbank → dB with an 80 dB floor below the peak → orthonormal DCT-II,
//! keeping the first `n_mfcc` coefficients.
//!
//! Framing is fixed (see [`MfccConfig::default`]) so results do not drift
//! with library versions.

use crate::error::ExtractError;
use crate::mel::MelFilterBank;
use realfft::RealFftPlanner;
use serde::Serialize;
use std::f64::consts::PI;
use tracing::debug;

/// Number of cepstral coefficients per frame
pub const N_MFCC: usize = 13;

/// Floor applied before taking the log of power values
const AMIN: f32 = 1e-10;

/// Framing and filterbank parameters
#[derive(Debug, Clone, PartialEq)]
pub struct MfccConfig {
    /// Coefficients kept per frame
    pub n_mfcc: usize,
    /// FFT size, also the window length
    pub n_fft: usize,
    /// Samples between successive frame starts
    pub hop_length: usize,
    /// Number of mel bands
    pub n_mels: usize,
    /// Lowest filterbank frequency in Hz
    pub fmin: f32,
    /// Highest filterbank frequency in Hz (None = Nyquist)
    pub fmax: Option<f32>,
    /// Dynamic range kept below the loudest bin, in dB (None = unlimited)
    pub top_db: Option<f32>,
}

impl Default for MfccConfig {
    fn default() -> Self {
        Self {
            n_mfcc: N_MFCC,
            n_fft: 2048,
            hop_length: 512,
            n_mels: 128,
            fmin: 0.0,
            fmax: None,
            top_db: Some(80.0),
        }
    }
}

impl MfccConfig {
    /// Frames produced for `n_samples` input samples
    ///
    /// The signal is zero-padded by `n_fft / 2` on both sides, so every
    /// sample is the center of some frame.
    pub fn frame_count(&self, n_samples: usize) -> usize {
        let padded = n_samples + 2 * (self.n_fft / 2);
        if padded < self.n_fft || self.hop_length == 0 {
            return 0;
        }
        1 + (padded - self.n_fft) / self.hop_length
    }

    pub fn validate(&self) -> Result<(), ExtractError> {
        if self.n_fft < 2 {
            return Err(ExtractError::InvalidConfig(format!(
                "n_fft must be at least 2 (got {})",
                self.n_fft
            )));
        }
        if self.hop_length == 0 {
            return Err(ExtractError::InvalidConfig(
                "hop_length must be greater than zero".to_string(),
            ));
        }
        if self.n_mels == 0 || self.n_mfcc == 0 {
            return Err(ExtractError::InvalidConfig(
                "n_mels and n_mfcc must be greater than zero".to_string(),
            ));
        }
        if self.n_mfcc > self.n_mels {
            return Err(ExtractError::InvalidConfig(format!(
                "n_mfcc ({}) cannot exceed n_mels ({})",
                self.n_mfcc, self.n_mels
            )));
        }
        if let Some(fmax) = self.fmax {
            if fmax <= self.fmin {
                return Err(ExtractError::InvalidConfig(format!(
                    "fmax ({}) must be above fmin ({})",
                    fmax, self.fmin
                )));
            }
        }
        Ok(())
    }
}

/// MFCC matrix: one row per coefficient, one column per frame
///
/// Serializes as a plain nested array (`[[f32; n_frames]; n_mfcc]`).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct MfccMatrix {
    rows: Vec<Vec<f32>>,
}

impl MfccMatrix {
    /// Wrap precomputed rows (coefficients × frames)
    pub fn from_rows(rows: Vec<Vec<f32>>) -> Self {
        Self { rows }
    }

    pub fn n_coefficients(&self) -> usize {
        self.rows.len()
    }

    pub fn n_frames(&self) -> usize {
        self.rows.first().map(Vec::len).unwrap_or(0)
    }

    /// (rows, columns)
    pub fn shape(&self) -> (usize, usize) {
        (self.n_coefficients(), self.n_frames())
    }

    pub fn rows(&self) -> &[Vec<f32>] {
        &self.rows
    }

    pub fn into_rows(self) -> Vec<Vec<f32>> {
        self.rows
    }

    pub fn is_finite(&self) -> bool {
        self.rows.iter().flatten().all(|v| v.is_finite())
    }
}

/// Compute the MFCC matrix of a mono signal
pub fn compute_mfcc(
    samples: &[f32],
    sample_rate: u32,
    config: &MfccConfig,
) -> Result<MfccMatrix, ExtractError> {
    config.validate()?;
    if samples.is_empty() {
        return Err(ExtractError::NoSamples);
    }
    if sample_rate == 0 {
        return Err(ExtractError::MissingSampleRate);
    }

    let filterbank = MelFilterBank::new(
        sample_rate,
        config.n_fft,
        config.n_mels,
        config.fmin,
        config.fmax,
    );

    // Only the mel projection of each frame is kept, never the full spectrum
    let mut mel_frames: Vec<Vec<f32>> = Vec::with_capacity(config.frame_count(samples.len()));
    for_each_power_frame(samples, config.n_fft, config.hop_length, |power| {
        mel_frames.push(filterbank.apply(power));
    })?;

    power_to_db(&mut mel_frames, config.top_db);

    let basis = dct_ortho_basis(config.n_mfcc, config.n_mels);
    let mut rows: Vec<Vec<f32>> = (0..config.n_mfcc)
        .map(|_| Vec::with_capacity(mel_frames.len()))
        .collect();

    for log_mel in &mel_frames {
        for (row, basis_row) in rows.iter_mut().zip(&basis) {
            let coefficient: f64 = basis_row
                .iter()
                .zip(log_mel)
                .map(|(&b, &e)| b * e as f64)
                .sum();
            row.push(coefficient as f32);
        }
    }

    debug!(
        sample_rate,
        samples = samples.len(),
        n_mfcc = config.n_mfcc,
        frames = mel_frames.len(),
        "MFCC computation complete"
    );

    Ok(MfccMatrix { rows })
}

/// Periodic Hann window of length `n`
pub fn hann_window(n: usize) -> Vec<f32> {
    (0..n)
        .map(|i| (0.5 - 0.5 * (2.0 * PI * i as f64 / n as f64).cos()) as f32)
        .collect()
}

/// Centered short-time power spectrum, one `n_fft / 2 + 1` row per frame
///
/// Holds the whole spectrogram in memory; [`compute_mfcc`] streams frames
/// through the filterbank instead.
pub fn power_spectrogram(
    samples: &[f32],
    n_fft: usize,
    hop_length: usize,
) -> Result<Vec<Vec<f32>>, ExtractError> {
    let mut frames = Vec::new();
    for_each_power_frame(samples, n_fft, hop_length, |power| frames.push(power.to_vec()))?;
    Ok(frames)
}

/// Run the centered STFT and hand each frame's power spectrum to `visit`
///
/// The power buffer is reused between frames. Returns the frame count.
fn for_each_power_frame<F>(
    samples: &[f32],
    n_fft: usize,
    hop_length: usize,
    mut visit: F,
) -> Result<usize, ExtractError>
where
    F: FnMut(&[f32]),
{
    if n_fft == 0 || hop_length == 0 {
        return Err(ExtractError::InvalidConfig(
            "n_fft and hop_length must be greater than zero".to_string(),
        ));
    }

    let pad = n_fft / 2;
    let mut padded = vec![0.0f32; samples.len() + 2 * pad];
    padded[pad..pad + samples.len()].copy_from_slice(samples);
    if padded.len() < n_fft {
        return Ok(0);
    }

    let n_frames = 1 + (padded.len() - n_fft) / hop_length;
    let window = hann_window(n_fft);

    let mut planner = RealFftPlanner::<f32>::new();
    let fft = planner.plan_fft_forward(n_fft);
    let mut input = fft.make_input_vec();
    let mut spectrum = fft.make_output_vec();
    let mut power = vec![0.0f32; spectrum.len()];

    for frame_idx in 0..n_frames {
        let start = frame_idx * hop_length;
        for ((slot, &sample), &w) in input
            .iter_mut()
            .zip(&padded[start..start + n_fft])
            .zip(&window)
        {
            *slot = sample * w;
        }

        fft.process(&mut input, &mut spectrum)
            .map_err(|e| ExtractError::Fft(e.to_string()))?;

        for (p, c) in power.iter_mut().zip(&spectrum) {
            *p = c.norm_sqr();
        }
        visit(&power);
    }

    Ok(n_frames)
}

/// Convert power values to decibels in place
///
/// `10 * log10(max(AMIN, S))` with a reference of 1.0, then values more
/// than `top_db` below the overall maximum are raised to that floor.
pub fn power_to_db(frames: &mut [Vec<f32>], top_db: Option<f32>) {
    let mut max_db = f32::NEG_INFINITY;
    for value in frames.iter_mut().flatten() {
        *value = 10.0 * value.max(AMIN).log10();
        max_db = max_db.max(*value);
    }

    if let Some(top_db) = top_db {
        let floor = max_db - top_db;
        for value in frames.iter_mut().flatten() {
            *value = value.max(floor);
        }
    }
}

/// Orthonormal DCT-II basis, `n_out` rows of `n_in` weights
pub fn dct_ortho_basis(n_out: usize, n_in: usize) -> Vec<Vec<f64>> {
    let n = n_in as f64;
    (0..n_out)
        .map(|k| {
            let scale = if k == 0 { (1.0 / n).sqrt() } else { (2.0 / n).sqrt() };
            (0..n_in)
                .map(|i| scale * (PI * k as f64 * (2.0 * i as f64 + 1.0) / (2.0 * n)).cos())
                .collect()
        })
        .collect()
}
