use serde::{Deserialize, Serialize};

use crate::MelError;

/// Largest supported FFT length.
pub const MAX_FFT_SIZE: usize = 2048;
/// Smallest supported FFT length.
pub const MIN_FFT_SIZE: usize = 32;
/// Largest supported number of mel bands.
pub const MAX_MEL_BANDS: usize = 128;
/// Number of one-sided spectrum bins at [`MAX_FFT_SIZE`].
pub const MAX_FFT_BINS: usize = MAX_FFT_SIZE / 2 + 1;

/// Configures log-mel spectrogram extraction.
///
/// The default matches the deployed classifier front end:
/// 16 kHz audio, 512-point FFT, 256-sample hop, 64 mel bands over 0-8000 Hz.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MelConfig {
    /// Input sample rate in Hz (default: 16000).
    pub sample_rate: f32,
    /// FFT length in samples, a power of two (default: 512).
    pub fft_size: usize,
    /// Sample advance between frames (default: 256).
    pub hop_length: usize,
    /// Number of mel bands (default: 64).
    pub n_mels: usize,
    /// Lowest band edge in Hz (default: 0).
    pub f_min: f32,
    /// Highest band edge in Hz, at most Nyquist (default: 8000).
    pub f_max: f32,
    /// Analyse a trailing partial frame with zero padding (default: false).
    pub pad_tail: bool,
}

impl Default for MelConfig {
    fn default() -> Self {
        Self {
            sample_rate: 16000.0,
            fft_size: 512,
            hop_length: 256,
            n_mels: 64,
            f_min: 0.0,
            f_max: 8000.0,
            pad_tail: false,
        }
    }
}

impl MelConfig {
    /// Number of one-sided spectrum bins, `fft_size / 2 + 1`.
    #[inline]
    pub fn fft_bins(&self) -> usize {
        self.fft_size / 2 + 1
    }

    /// Checks every size and range bound.
    ///
    /// Transform length support (power of two) is checked separately when the
    /// transform is prepared, so that it reports [`MelError::TransformInit`].
    pub fn validate(&self) -> Result<(), MelError> {
        if self.fft_size == 0 || self.fft_size > MAX_FFT_SIZE {
            return Err(MelError::InvalidConfig(format!(
                "fft_size {} out of range 1..={MAX_FFT_SIZE}",
                self.fft_size
            )));
        }
        if self.n_mels == 0 || self.n_mels > MAX_MEL_BANDS {
            return Err(MelError::InvalidConfig(format!(
                "n_mels {} out of range 1..={MAX_MEL_BANDS}",
                self.n_mels
            )));
        }
        if self.hop_length == 0 || self.hop_length >= self.fft_size {
            return Err(MelError::InvalidConfig(format!(
                "hop_length {} must be in 1..{}",
                self.hop_length, self.fft_size
            )));
        }
        if !self.sample_rate.is_finite() || self.sample_rate <= 0.0 {
            return Err(MelError::InvalidConfig(format!(
                "sample_rate {} must be positive",
                self.sample_rate
            )));
        }
        let nyquist = self.sample_rate / 2.0;
        if !self.f_min.is_finite() || self.f_min < 0.0 {
            return Err(MelError::InvalidConfig(format!("f_min {} must be >= 0", self.f_min)));
        }
        if !self.f_max.is_finite() || self.f_max > nyquist {
            return Err(MelError::InvalidConfig(format!(
                "f_max {} must be <= nyquist {nyquist}",
                self.f_max
            )));
        }
        // f_min == f_max is accepted and yields empty bands.
        if self.f_min > self.f_max {
            return Err(MelError::InvalidConfig(format!(
                "f_min {} must not exceed f_max {}",
                self.f_min, self.f_max
            )));
        }
        Ok(())
    }

    /// Number of frames produced for `pcm_len` samples, capped at `max_frames`.
    pub fn frame_count(&self, pcm_len: usize, max_frames: usize) -> usize {
        frame_count(pcm_len, self.fft_size, self.hop_length, self.pad_tail).min(max_frames)
    }
}

/// Number of analysis frames over `pcm_len` samples.
///
/// Without `pad_tail` only frames fully inside the input are counted, so inputs
/// shorter than `fft_size` yield zero frames. With `pad_tail` one extra frame
/// covers any remainder, and a non-empty input shorter than `fft_size` yields
/// a single padded frame.
pub fn frame_count(pcm_len: usize, fft_size: usize, hop_length: usize, pad_tail: bool) -> usize {
    if hop_length == 0 || pcm_len == 0 {
        return 0;
    }
    if pcm_len < fft_size {
        return usize::from(pad_tail);
    }
    let span = pcm_len - fft_size;
    if pad_tail {
        span.div_ceil(hop_length) + 1
    } else {
        span / hop_length + 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_default() {
        let cfg = MelConfig::default();
        assert_eq!(cfg.sample_rate, 16000.0);
        assert_eq!(cfg.fft_size, 512);
        assert_eq!(cfg.hop_length, 256);
        assert_eq!(cfg.n_mels, 64);
        assert_eq!(cfg.fft_bins(), 257);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn validate_rejects_oversized() {
        let cfg = MelConfig { fft_size: 4096, ..Default::default() };
        assert!(matches!(cfg.validate(), Err(MelError::InvalidConfig(_))));

        let cfg = MelConfig { n_mels: 129, ..Default::default() };
        assert!(matches!(cfg.validate(), Err(MelError::InvalidConfig(_))));

        let cfg = MelConfig { n_mels: 0, ..Default::default() };
        assert!(matches!(cfg.validate(), Err(MelError::InvalidConfig(_))));
    }

    #[test]
    fn validate_rejects_bad_ranges() {
        let bad = [
            MelConfig { hop_length: 0, ..Default::default() },
            MelConfig { hop_length: 512, ..Default::default() },
            MelConfig { sample_rate: 0.0, ..Default::default() },
            MelConfig { sample_rate: f32::NAN, ..Default::default() },
            MelConfig { f_min: -1.0, ..Default::default() },
            MelConfig { f_max: 8001.0, ..Default::default() },
            MelConfig { f_min: 5000.0, f_max: 4000.0, ..Default::default() },
        ];
        for cfg in bad {
            assert!(cfg.validate().is_err(), "expected rejection: {cfg:?}");
        }
    }

    #[test]
    fn validate_accepts_collapsed_band_range() {
        let cfg = MelConfig { f_min: 4000.0, f_max: 4000.0, ..Default::default() };
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn frame_count_floor() {
        assert_eq!(frame_count(4096, 512, 256, false), 15);
        assert_eq!(frame_count(512, 512, 256, false), 1);
        assert_eq!(frame_count(511, 512, 256, false), 0);
        assert_eq!(frame_count(0, 512, 256, false), 0);
        assert_eq!(frame_count(512 + 128, 512, 256, false), 1);
    }

    #[test]
    fn frame_count_pad_tail() {
        assert_eq!(frame_count(4096, 512, 256, true), 15);
        assert_eq!(frame_count(512, 512, 256, true), 1);
        assert_eq!(frame_count(512 + 128, 512, 256, true), 2);
        assert_eq!(frame_count(100, 512, 256, true), 1);
        assert_eq!(frame_count(0, 512, 256, true), 0);
    }

    #[test]
    fn frame_count_capped() {
        let cfg = MelConfig::default();
        assert_eq!(cfg.frame_count(4096, 64), 15);
        assert_eq!(cfg.frame_count(4096, 10), 10);
        assert_eq!(cfg.frame_count(4096, 0), 0);
    }

    #[test]
    fn partial_yaml_uses_defaults() {
        let cfg: MelConfig = serde_yaml::from_str("n_mels: 40\nf_max: 7600\n").unwrap();
        assert_eq!(cfg.n_mels, 40);
        assert_eq!(cfg.f_max, 7600.0);
        assert_eq!(cfg.fft_size, 512);
        assert!(!cfg.pad_tail);
    }

    #[test]
    fn json_roundtrip_and_partial_json() {
        let cfg = MelConfig { n_mels: 40, f_min: 20.0, pad_tail: true, ..Default::default() };
        let json = serde_json::to_string(&cfg).unwrap();
        let back: MelConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, cfg);

        let partial: MelConfig = serde_json::from_str(r#"{"fft_size": 1024, "hop_length": 160}"#).unwrap();
        assert_eq!(partial.fft_size, 1024);
        assert_eq!(partial.hop_length, 160);
        assert_eq!(partial.n_mels, 64);
        assert_eq!(partial.sample_rate, 16000.0);
    }
}
