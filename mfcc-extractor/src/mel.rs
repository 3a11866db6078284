//! Mel scale and triangular mel filterbank
//!
//! Uses the Slaney mel scale (linear below 1 kHz, logarithmic above) and
//! Slaney area normalization, so each filter integrates to roughly the same
//! energy regardless of its width.

/// Hz per mel in the linear region
const F_SP: f64 = 200.0 / 3.0;
/// Start of the logarithmic region in Hz
const MIN_LOG_HZ: f64 = 1000.0;
/// Start of the logarithmic region in mels
const MIN_LOG_MEL: f64 = MIN_LOG_HZ / F_SP;

fn log_step() -> f64 {
    6.4_f64.ln() / 27.0
}

/// Hz to mel conversion (Slaney)
pub fn hz_to_mel(hz: f64) -> f64 {
    if hz >= MIN_LOG_HZ {
        MIN_LOG_MEL + (hz / MIN_LOG_HZ).ln() / log_step()
    } else {
        hz / F_SP
    }
}

/// Mel to Hz conversion (Slaney)
pub fn mel_to_hz(mel: f64) -> f64 {
    if mel >= MIN_LOG_MEL {
        MIN_LOG_HZ * (log_step() * (mel - MIN_LOG_MEL)).exp()
    } else {
        F_SP * mel
    }
}

/// `n` frequencies evenly spaced on the mel scale between `fmin` and `fmax`
pub fn mel_frequencies(n: usize, fmin: f64, fmax: f64) -> Vec<f64> {
    let mel_min = hz_to_mel(fmin);
    let mel_max = hz_to_mel(fmax);
    if n == 1 {
        return vec![mel_to_hz(mel_min)];
    }
    (0..n)
        .map(|i| mel_to_hz(mel_min + (mel_max - mel_min) * i as f64 / (n - 1) as f64))
        .collect()
}

/// One triangular filter, stored over its nonzero bin range only
#[derive(Debug, Clone, PartialEq)]
struct TriangularFilter {
    start_bin: usize,
    weights: Vec<f32>,
}

/// Mel filterbank applied to one power-spectrum frame at a time
#[derive(Debug, Clone, PartialEq)]
pub struct MelFilterBank {
    n_bins: usize,
    filters: Vec<TriangularFilter>,
}

impl MelFilterBank {
    /// Build `n_mels` filters over the `n_fft / 2 + 1` rFFT bins
    ///
    /// `fmax` of `None` means Nyquist.
    pub fn new(sample_rate: u32, n_fft: usize, n_mels: usize, fmin: f32, fmax: Option<f32>) -> Self {
        let n_bins = n_fft / 2 + 1;
        let sr = sample_rate as f64;
        let fmax = fmax.map(f64::from).unwrap_or(sr / 2.0);

        let fft_freqs: Vec<f64> = (0..n_bins)
            .map(|i| i as f64 * sr / n_fft as f64)
            .collect();
        let mel_f = mel_frequencies(n_mels + 2, fmin as f64, fmax);

        let filters = (0..n_mels)
            .map(|i| {
                let (left, center, right) = (mel_f[i], mel_f[i + 1], mel_f[i + 2]);
                let lower_width = center - left;
                let upper_width = right - center;
                // Slaney normalization: 2 / bandwidth in Hz
                let enorm = 2.0 / (right - left);

                let dense: Vec<f64> = fft_freqs
                    .iter()
                    .map(|&freq| {
                        let lower = (freq - left) / lower_width;
                        let upper = (right - freq) / upper_width;
                        lower.min(upper).max(0.0) * enorm
                    })
                    .collect();

                let start_bin = dense.iter().position(|&w| w > 0.0).unwrap_or(0);
                let end_bin = dense
                    .iter()
                    .rposition(|&w| w > 0.0)
                    .map(|p| p + 1)
                    .unwrap_or(start_bin);

                TriangularFilter {
                    start_bin,
                    weights: dense[start_bin..end_bin].iter().map(|&w| w as f32).collect(),
                }
            })
            .collect();

        Self { n_bins, filters }
    }

    pub fn n_mels(&self) -> usize {
        self.filters.len()
    }

    pub fn n_bins(&self) -> usize {
        self.n_bins
    }

    /// Filter weights for band `index` expanded to all bins
    pub fn dense_weights(&self, index: usize) -> Vec<f32> {
        let mut dense = vec![0.0; self.n_bins];
        if let Some(filter) = self.filters.get(index) {
            dense[filter.start_bin..filter.start_bin + filter.weights.len()]
                .copy_from_slice(&filter.weights);
        }
        dense
    }

    /// Project one power-spectrum frame (`n_bins` values) onto the mel bands
    pub fn apply(&self, power_frame: &[f32]) -> Vec<f32> {
        debug_assert_eq!(power_frame.len(), self.n_bins);
        self.filters
            .iter()
            .map(|filter| {
                power_frame[filter.start_bin..]
                    .iter()
                    .zip(&filter.weights)
                    .map(|(p, w)| p * w)
                    .sum()
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mel_scale_is_linear_below_1khz() {
        assert!((hz_to_mel(0.0)).abs() < 1e-12);
        assert!((hz_to_mel(200.0) - 3.0).abs() < 1e-9);
        assert!((hz_to_mel(1000.0) - 15.0).abs() < 1e-9);
    }

    #[test]
    fn test_mel_scale_round_trips() {
        for hz in [0.0, 300.0, 999.0, 1000.0, 4000.0, 11025.0] {
            let back = mel_to_hz(hz_to_mel(hz));
            assert!((back - hz).abs() < 1e-6, "{} -> {}", hz, back);
        }
    }

    #[test]
    fn test_mel_frequencies_span_range() {
        let freqs = mel_frequencies(130, 0.0, 8000.0);
        assert_eq!(freqs.len(), 130);
        assert!(freqs[0].abs() < 1e-9);
        assert!((freqs[129] - 8000.0).abs() < 1e-6);
        assert!(freqs.windows(2).all(|w| w[1] > w[0]));
    }

    #[test]
    fn test_filterbank_shape() {
        let bank = MelFilterBank::new(22050, 2048, 128, 0.0, None);
        assert_eq!(bank.n_mels(), 128);
        assert_eq!(bank.n_bins(), 1025);
        assert_eq!(bank.dense_weights(0).len(), 1025);
    }

    #[test]
    fn test_filters_are_nonnegative_triangles() {
        let bank = MelFilterBank::new(16000, 512, 40, 0.0, None);
        for i in 0..bank.n_mels() {
            let weights = bank.dense_weights(i);
            assert!(weights.iter().all(|&w| w >= 0.0));
            assert!(weights.iter().any(|&w| w > 0.0), "filter {} is empty", i);
        }
    }

    #[test]
    fn test_apply_matches_dense_dot_product() {
        let bank = MelFilterBank::new(16000, 512, 40, 0.0, None);
        let frame: Vec<f32> = (0..bank.n_bins()).map(|i| (i % 7) as f32 * 0.1).collect();
        let projected = bank.apply(&frame);

        for (i, &value) in projected.iter().enumerate() {
            let expected: f32 = bank
                .dense_weights(i)
                .iter()
                .zip(&frame)
                .map(|(w, p)| w * p)
                .sum();
            assert!((value - expected).abs() < 1e-5);
        }
    }
}
