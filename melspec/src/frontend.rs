//! Analysis window and forward real FFT.

use std::f32::consts::PI;
use std::sync::Arc;

use realfft::num_complex::Complex32;
use realfft::{RealFftPlanner, RealToComplex};

use crate::config::{MAX_FFT_BINS, MAX_FFT_SIZE, MIN_FFT_SIZE};
use crate::MelError;

/// Fills `out` with a symmetric Hann window of length `out.len()`.
pub fn hann_window(out: &mut [f32]) {
    let n = out.len();
    if n <= 1 {
        out.fill(1.0);
        return;
    }
    let denom = (n - 1) as f32;
    for (i, w) in out.iter_mut().enumerate() {
        *w = 0.5 * (1.0 - (2.0 * PI * i as f32 / denom).cos());
    }
}

/// Reports whether the transform can be prepared for `fft_size`.
pub fn is_supported_len(fft_size: usize) -> bool {
    fft_size.is_power_of_two() && (MIN_FFT_SIZE..=MAX_FFT_SIZE).contains(&fft_size)
}

/// Owns the Hann window and the forward real FFT for one transform length.
///
/// The transform's internal bin layout is hidden: callers only see the
/// one-sided power spectrum through [`SpectralFrontend::power_spectrum`].
pub struct SpectralFrontend {
    planner: RealFftPlanner<f32>,
    fft: Option<Arc<dyn RealToComplex<f32>>>,
    window: Box<[f32]>,
    spectrum: Box<[Complex32]>,
    scratch: Vec<Complex32>,
    scratch_len: usize,
    fft_size: usize,
}

impl SpectralFrontend {
    /// Creates an unprepared frontend with full-capacity buffers.
    pub fn new() -> Self {
        Self {
            planner: RealFftPlanner::new(),
            fft: None,
            window: vec![0.0; MAX_FFT_SIZE].into_boxed_slice(),
            spectrum: vec![Complex32::default(); MAX_FFT_BINS].into_boxed_slice(),
            scratch: Vec::new(),
            scratch_len: 0,
            fft_size: 0,
        }
    }

    /// Prepares the transform and window for `fft_size`.
    ///
    /// Nothing is modified when the length is unsupported.
    pub fn prepare(&mut self, fft_size: usize) -> Result<(), MelError> {
        if !is_supported_len(fft_size) {
            return Err(MelError::TransformInit { fft_size });
        }

        // Plans are cached by the planner, so reconfiguring back to a
        // previously used length is cheap.
        let fft = self.planner.plan_fft_forward(fft_size);
        let scratch_len = fft.get_scratch_len();
        if self.scratch.len() < scratch_len {
            self.scratch.resize(scratch_len, Complex32::default());
        }

        hann_window(&mut self.window[..fft_size]);
        self.fft = Some(fft);
        self.scratch_len = scratch_len;
        self.fft_size = fft_size;
        Ok(())
    }

    /// Whether [`SpectralFrontend::prepare`] has succeeded at least once.
    #[inline]
    pub fn is_prepared(&self) -> bool {
        self.fft.is_some()
    }

    /// Current transform length, 0 before preparation.
    #[inline]
    pub fn fft_size(&self) -> usize {
        self.fft_size
    }

    /// Number of one-sided bins, `fft_size / 2 + 1`.
    #[inline]
    pub fn bins(&self) -> usize {
        if self.fft_size == 0 { 0 } else { self.fft_size / 2 + 1 }
    }

    /// Window coefficients for the current length.
    #[inline]
    pub fn window(&self) -> &[f32] {
        &self.window[..self.fft_size]
    }

    /// Transforms one windowed frame and writes `|X[k]|^2` for every bin.
    ///
    /// `frame` must hold at least `fft_size` samples and is used as transform
    /// scratch, so its contents are clobbered. `power` must hold at least
    /// `bins()` values.
    pub fn power_spectrum(&mut self, frame: &mut [f32], power: &mut [f32]) -> Result<(), MelError> {
        let fft = self
            .fft
            .as_ref()
            .ok_or_else(|| MelError::InvalidArgument("transform not prepared".into()))?;
        let n = self.fft_size;
        let bins = n / 2 + 1;
        if frame.len() < n || power.len() < bins {
            return Err(MelError::InvalidArgument(format!(
                "frame/power buffers too small: {}/{}, need {n}/{bins}",
                frame.len(),
                power.len()
            )));
        }

        let spectrum = &mut self.spectrum[..bins];
        fft.process_with_scratch(&mut frame[..n], spectrum, &mut self.scratch[..self.scratch_len])?;

        // DC and Nyquist come out purely real.
        for (p, c) in power[..bins].iter_mut().zip(spectrum.iter()) {
            *p = c.norm_sqr();
        }
        Ok(())
    }
}

impl Default for SpectralFrontend {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for SpectralFrontend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpectralFrontend")
            .field("fft_size", &self.fft_size)
            .field("prepared", &self.is_prepared())
            .finish()
    }
}
