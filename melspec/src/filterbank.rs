//! Triangular mel filterbank.

use crate::config::{MAX_FFT_BINS, MAX_MEL_BANDS};
use crate::mel::{hz_to_mel, mel_to_hz};

/// Guards slope denominators when adjacent band edges share a bin.
const SLOPE_EPSILON: f32 = 1e-6;

/// Integer FFT bin edges of one mel band.
///
/// The triangle rises over `[left, center)` and falls over `[center, right)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BandEdges {
    pub left: usize,
    pub center: usize,
    pub right: usize,
}

/// Computes the `(left, center, right)` bin triple for each of `n_mels` bands.
///
/// Band edges are `n_mels + 2` points equally spaced on the mel scale between
/// `f_min` and `f_max`, mapped to fractional bins `hz / sample_rate * fft_size`
/// and truncated.
pub fn band_edges(
    n_mels: usize,
    fft_size: usize,
    sample_rate: f32,
    f_min: f32,
    f_max: f32,
) -> impl Iterator<Item = BandEdges> {
    let mel_min = hz_to_mel(f_min);
    let mel_max = hz_to_mel(f_max);
    let mel_step = (mel_max - mel_min) / (n_mels + 1) as f32;

    let bin_at = move |i: usize| -> usize {
        let hz = mel_to_hz(mel_min + i as f32 * mel_step);
        // `as` saturates: NaN and negatives map to bin 0.
        ((hz / sample_rate) * fft_size as f32) as usize
    };

    (0..n_mels).map(move |m| BandEdges {
        left: bin_at(m),
        center: bin_at(m + 1),
        right: bin_at(m + 2),
    })
}

/// Dense `[n_mels][bins]` weight matrix with fixed capacity.
///
/// Storage is allocated once for [`MAX_MEL_BANDS`] x [`MAX_FFT_BINS`] and
/// rewritten in place on every [`Filterbank::build`].
pub struct Filterbank {
    weights: Box<[f32]>,
    n_mels: usize,
    bins: usize,
}

impl Filterbank {
    /// Creates an empty filterbank with full capacity.
    pub fn new() -> Self {
        Self {
            weights: vec![0.0; MAX_MEL_BANDS * MAX_FFT_BINS].into_boxed_slice(),
            n_mels: 0,
            bins: 0,
        }
    }

    /// Rebuilds the weights for the given configuration.
    ///
    /// Sizes must already be validated: `n_mels <= MAX_MEL_BANDS` and
    /// `fft_size / 2 + 1 <= MAX_FFT_BINS`. Every write is bounds-checked against
    /// the bin count, so bands whose edges fall past Nyquist are clipped to a
    /// partial or empty triangle.
    pub fn build(&mut self, n_mels: usize, fft_size: usize, sample_rate: f32, f_min: f32, f_max: f32) {
        let bins = fft_size / 2 + 1;
        debug_assert!(n_mels <= MAX_MEL_BANDS && bins <= MAX_FFT_BINS);

        self.n_mels = n_mels;
        self.bins = bins;
        self.active_mut().fill(0.0);

        for (m, edges) in band_edges(n_mels, fft_size, sample_rate, f_min, f_max).enumerate() {
            let BandEdges { left, center, right } = edges;
            let rise = (center as f32 - left as f32) + SLOPE_EPSILON;
            let fall = (right as f32 - center as f32) + SLOPE_EPSILON;
            let row = &mut self.weights[m * bins..(m + 1) * bins];

            for k in left..center.min(bins) {
                row[k] = (k - left) as f32 / rise;
            }
            for k in center..right.min(bins) {
                row[k] = (right - k) as f32 / fall;
            }
        }
    }

    /// Number of bands in the current build.
    #[inline]
    pub fn n_mels(&self) -> usize {
        self.n_mels
    }

    /// Number of FFT bins per band in the current build.
    #[inline]
    pub fn bins(&self) -> usize {
        self.bins
    }

    /// Weights of band `m`, `bins()` long.
    ///
    /// # Panics
    ///
    /// Panics if `m >= n_mels()`.
    #[inline]
    pub fn row(&self, m: usize) -> &[f32] {
        assert!(m < self.n_mels, "band {m} out of range 0..{}", self.n_mels);
        &self.weights[m * self.bins..(m + 1) * self.bins]
    }

    /// Returns the `[start, end)` bin range holding non-zero weights of band `m`,
    /// or `None` for an empty band.
    pub fn support(&self, m: usize) -> Option<(usize, usize)> {
        let row = self.row(m);
        let start = row.iter().position(|&w| w != 0.0)?;
        let end = row.iter().rposition(|&w| w != 0.0)? + 1;
        Some((start, end))
    }

    /// Flattened `[n_mels * bins]` weights of the current build.
    #[inline]
    pub fn as_slice(&self) -> &[f32] {
        &self.weights[..self.n_mels * self.bins]
    }

    /// Weighted sum of `power` under band `m`.
    #[inline]
    pub fn band_energy(&self, m: usize, power: &[f32]) -> f32 {
        self.row(m).iter().zip(power).map(|(&w, &p)| w * p).sum()
    }

    fn active_mut(&mut self) -> &mut [f32] {
        let len = self.n_mels * self.bins;
        &mut self.weights[..len]
    }
}

impl Default for Filterbank {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Filterbank {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Filterbank")
            .field("n_mels", &self.n_mels)
            .field("bins", &self.bins)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn built(n_mels: usize, fft_size: usize, sr: f32, lo: f32, hi: f32) -> Filterbank {
        let mut fb = Filterbank::new();
        fb.build(n_mels, fft_size, sr, lo, hi);
        fb
    }

    #[test]
    fn test_shape() {
        let fb = built(64, 512, 16000.0, 0.0, 8000.0);
        assert_eq!(fb.n_mels(), 64);
        assert_eq!(fb.bins(), 257);
        assert_eq!(fb.as_slice().len(), 64 * 257);
        assert_eq!(fb.row(63).len(), 257);
    }

    #[test]
    fn test_weights_in_unit_range_and_zero_outside_support() {
        let fb = built(64, 512, 16000.0, 0.0, 8000.0);
        let edges: Vec<BandEdges> = band_edges(64, 512, 16000.0, 0.0, 8000.0).collect();
        for (m, e) in edges.iter().enumerate() {
            for (k, &w) in fb.row(m).iter().enumerate() {
                assert!((0.0..=1.0).contains(&w), "fb[{m}][{k}] = {w}");
                if k < e.left || k >= e.right {
                    assert_eq!(w, 0.0, "fb[{m}][{k}] outside [{}, {})", e.left, e.right);
                }
            }
        }
    }

    #[test]
    fn test_peak_near_center() {
        let fb = built(40, 1024, 16000.0, 0.0, 8000.0);
        let edges: Vec<BandEdges> = band_edges(40, 1024, 16000.0, 0.0, 8000.0).collect();
        for (m, e) in edges.iter().enumerate() {
            if e.right > e.center && e.center < fb.bins() {
                let w = fb.row(m)[e.center];
                assert!(w > 0.99, "band {m} center weight {w}");
            }
        }
    }

    #[test]
    fn test_edges_monotonic() {
        let edges: Vec<BandEdges> = band_edges(64, 512, 16000.0, 0.0, 8000.0).collect();
        for e in &edges {
            assert!(e.left <= e.center && e.center <= e.right);
        }
        assert_eq!(edges[0].left, 0);
        // f_max = Nyquist lands on (or, after rounding, just below) the last bin.
        assert!(edges[63].right >= 255 && edges[63].right <= 256);
    }

    #[test]
    fn test_degenerate_narrow_bands_are_finite() {
        // Many bands over few bins: adjacent edges coincide.
        let fb = built(128, 64, 8000.0, 0.0, 4000.0);
        for &w in fb.as_slice() {
            assert!(w.is_finite() && (0.0..=1.0).contains(&w));
        }
    }

    #[test]
    fn test_rebuild_is_bit_identical() {
        let a = built(64, 512, 16000.0, 20.0, 7600.0);
        let mut b = built(10, 256, 8000.0, 0.0, 4000.0);
        b.build(64, 512, 16000.0, 20.0, 7600.0);
        let a_bits: Vec<u32> = a.as_slice().iter().map(|w| w.to_bits()).collect();
        let b_bits: Vec<u32> = b.as_slice().iter().map(|w| w.to_bits()).collect();
        assert_eq!(a_bits, b_bits);
    }

    #[test]
    fn test_shrinking_rebuild_clears_stale_rows() {
        let mut fb = built(64, 512, 16000.0, 0.0, 8000.0);
        fb.build(8, 512, 16000.0, 0.0, 8000.0);
        assert_eq!(fb.n_mels(), 8);
        assert_eq!(fb.as_slice().len(), 8 * 257);
        // Growing back rebuilds every row from scratch.
        fb.build(64, 512, 16000.0, 0.0, 8000.0);
        let fresh = built(64, 512, 16000.0, 0.0, 8000.0);
        assert_eq!(fb.as_slice(), fresh.as_slice());
    }

    #[test]
    fn test_collapsed_range_gives_empty_bands() {
        let fb = built(16, 512, 16000.0, 4000.0, 4000.0);
        assert!(fb.as_slice().iter().all(|&w| w == 0.0));
        assert_eq!(fb.support(0), None);
    }

    #[test]
    fn test_support_and_energy() {
        let fb = built(16, 256, 16000.0, 0.0, 8000.0);
        let (start, end) = fb.support(5).unwrap();
        assert!(start < end && end <= fb.bins());

        let flat = vec![1.0f32; fb.bins()];
        let e = fb.band_energy(5, &flat);
        let sum: f32 = fb.row(5).iter().sum();
        assert!((e - sum).abs() < 1e-5);
    }
}
