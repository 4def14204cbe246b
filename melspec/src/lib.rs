//! Log-mel spectrogram front end for on-device audio classifiers.
//!
//! Turns blocks of mono PCM16 audio into `[n_mels][n_frames]` log-mel feature
//! matrices normalized to [0, 1], ready to be packed into a fixed-size
//! classifier input.
//!
//! # Pipeline
//!
//! 1. [`SpectrogramEngine::init`]: validate a [`MelConfig`], prepare the Hann
//!    window, the real FFT and the triangular mel [`Filterbank`]
//! 2. [`SpectrogramEngine::process`]: frame, window, transform, aggregate
//!    band energies and log-compress (`10 * log10(e + 1e-6)`, floored at -80 dB)
//! 3. [`normalize()`]: min-max rescale the finished matrix to [0, 1]
//!
//! Buffers are allocated once, at the compile-time maxima ([`MAX_FFT_SIZE`],
//! [`MAX_MEL_BANDS`]), when the engine is constructed. Processing does not
//! allocate and writes into a caller-provided slice.
//!
//! # Example
//!
//! ```rust
//! use giztoy_melspec::{normalize, MelConfig, SpectrogramEngine};
//!
//! let cfg = MelConfig::default(); // 16 kHz, fft 512, hop 256, 64 mels
//! let mut engine = SpectrogramEngine::with_config(cfg.clone()).unwrap();
//!
//! let pcm = vec![0i16; 4096];
//! let mut spec = vec![0.0f32; cfg.n_mels * 64];
//! let frames = engine.process(&pcm, &mut spec, 64).unwrap();
//! assert_eq!(frames, 15);
//!
//! normalize(&mut spec, cfg.n_mels, frames);
//! ```

mod config;
mod engine;
mod error;
pub mod filterbank;
pub mod frontend;
pub mod mel;
mod normalize;
pub mod pcm;
mod spectrogram;
pub mod tensor;

pub use config::{frame_count, MelConfig, MAX_FFT_BINS, MAX_FFT_SIZE, MAX_MEL_BANDS, MIN_FFT_SIZE};
pub use engine::{log_compress, SpectrogramEngine, LOG_OFFSET, MIN_DB, PCM_SCALE};
pub use error::MelError;
pub use filterbank::{BandEdges, Filterbank};
pub use frontend::SpectralFrontend;
pub use normalize::{min_max, normalize};
pub use spectrogram::Spectrogram;
