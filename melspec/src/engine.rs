//! Framed log-mel spectrogram engine.

use tracing::{debug, trace};

use crate::config::{MelConfig, MAX_FFT_BINS, MAX_FFT_SIZE};
use crate::filterbank::Filterbank;
use crate::frontend::SpectralFrontend;
use crate::spectrogram::Spectrogram;
use crate::MelError;

/// Offset added to band energy before the log.
pub const LOG_OFFSET: f32 = 1e-6;
/// Floor applied to log-compressed energies, in dB.
pub const MIN_DB: f32 = -80.0;
/// Scale from signed 16-bit PCM to [-1, 1).
pub const PCM_SCALE: f32 = 1.0 / 32768.0;

/// Converts band energy to dB, floored at [`MIN_DB`].
#[inline]
pub fn log_compress(energy: f32) -> f32 {
    (10.0 * (energy + LOG_OFFSET).log10()).max(MIN_DB)
}

/// Turns PCM blocks into `[n_mels][n_frames]` log-mel matrices.
///
/// An engine starts uninitialized. [`SpectrogramEngine::init`] validates a
/// configuration and builds the window, transform and filterbank; after that
/// [`SpectrogramEngine::process`] can be called any number of times, and
/// `init` can be called again to reconfigure.
///
/// All buffers are allocated once, at full capacity, when the engine is
/// constructed. `process` does not allocate.
#[derive(Debug)]
pub struct SpectrogramEngine {
    config: Option<MelConfig>,
    frontend: SpectralFrontend,
    filterbank: Filterbank,
    frame: Box<[f32]>,
    power: Box<[f32]>,
}

impl SpectrogramEngine {
    /// Creates an uninitialized engine.
    pub fn new() -> Self {
        Self {
            config: None,
            frontend: SpectralFrontend::new(),
            filterbank: Filterbank::new(),
            frame: vec![0.0; MAX_FFT_SIZE].into_boxed_slice(),
            power: vec![0.0; MAX_FFT_BINS].into_boxed_slice(),
        }
    }

    /// Creates an engine and initializes it with `config`.
    pub fn with_config(config: MelConfig) -> Result<Self, MelError> {
        let mut engine = Self::new();
        engine.init(config)?;
        Ok(engine)
    }

    /// Validates `config` and prepares window, transform and filterbank.
    ///
    /// On error nothing is committed: an uninitialized engine stays
    /// uninitialized and a ready engine keeps its previous configuration.
    pub fn init(&mut self, config: MelConfig) -> Result<(), MelError> {
        config.validate()?;
        self.frontend.prepare(config.fft_size)?;
        self.filterbank.build(
            config.n_mels,
            config.fft_size,
            config.sample_rate,
            config.f_min,
            config.f_max,
        );

        debug!(
            sample_rate = config.sample_rate,
            fft_size = config.fft_size,
            hop_length = config.hop_length,
            n_mels = config.n_mels,
            f_min = config.f_min,
            f_max = config.f_max,
            reconfigure = self.config.is_some(),
            "mel spectrogram engine ready"
        );
        self.config = Some(config);
        Ok(())
    }

    /// Whether `init` has succeeded.
    #[inline]
    pub fn is_ready(&self) -> bool {
        self.config.is_some()
    }

    /// Active configuration, if initialized.
    #[inline]
    pub fn config(&self) -> Option<&MelConfig> {
        self.config.as_ref()
    }

    /// Active Hann window (empty before init).
    #[inline]
    pub fn window(&self) -> &[f32] {
        self.frontend.window()
    }

    /// Active filterbank.
    #[inline]
    pub fn filterbank(&self) -> &Filterbank {
        &self.filterbank
    }

    /// Number of frames `process` would produce, or 0 before init.
    pub fn frame_count(&self, pcm_len: usize, max_frames: usize) -> usize {
        self.config
            .as_ref()
            .map_or(0, |cfg| cfg.frame_count(pcm_len, max_frames))
    }

    /// Computes the log-mel spectrogram of `pcm` into `spectrogram`.
    ///
    /// Writes `n_mels * frames` values laid out row-major by band:
    /// `spectrogram[m * frames + f]`. Returns the frame count, which is capped
    /// at `max_frames`. Frames that run past the end of `pcm` are zero-padded.
    ///
    /// Fails with [`MelError::InvalidArgument`] when the engine is not ready or
    /// `spectrogram` is too small; the output is untouched in that case.
    pub fn process(
        &mut self,
        pcm: &[i16],
        spectrogram: &mut [f32],
        max_frames: usize,
    ) -> Result<usize, MelError> {
        let cfg = self
            .config
            .as_ref()
            .ok_or_else(|| MelError::InvalidArgument("engine not initialized".into()))?;

        let n_frames = cfg.frame_count(pcm.len(), max_frames);
        let n_mels = cfg.n_mels;
        let needed = n_mels * n_frames;
        if spectrogram.len() < needed {
            return Err(MelError::InvalidArgument(format!(
                "spectrogram buffer holds {} values, need {needed}",
                spectrogram.len()
            )));
        }

        let n_fft = cfg.fft_size;
        let hop = cfg.hop_length;
        let bins = cfg.fft_bins();

        for f in 0..n_frames {
            let offset = f * hop;
            let frame = &mut self.frame[..n_fft];
            let window = self.frontend.window();
            let avail = pcm.len().saturating_sub(offset).min(n_fft);

            for ((dst, &s), &w) in frame.iter_mut().zip(&pcm[offset..offset + avail]).zip(window) {
                *dst = s as f32 * PCM_SCALE * w;
            }
            frame[avail..].fill(0.0);

            self.frontend.power_spectrum(frame, &mut self.power[..bins])?;

            let power = &self.power[..bins];
            for m in 0..n_mels {
                let energy = self.filterbank.band_energy(m, power);
                spectrogram[m * n_frames + f] = log_compress(energy);
            }
        }

        trace!(samples = pcm.len(), frames = n_frames, "computed mel spectrogram");
        Ok(n_frames)
    }

    /// Like [`SpectrogramEngine::process`] but allocates the output.
    pub fn compute(&mut self, pcm: &[i16], max_frames: usize) -> Result<Spectrogram, MelError> {
        let n_mels = self
            .config
            .as_ref()
            .map(|cfg| cfg.n_mels)
            .ok_or_else(|| MelError::InvalidArgument("engine not initialized".into()))?;
        let n_frames = self.frame_count(pcm.len(), max_frames);
        let mut data = vec![0.0f32; n_mels * n_frames];
        let produced = self.process(pcm, &mut data, max_frames)?;
        debug_assert_eq!(produced, n_frames);
        Ok(Spectrogram::from_raw(data, n_mels, produced))
    }
}

impl Default for SpectrogramEngine {
    fn default() -> Self {
        Self::new()
    }
}
