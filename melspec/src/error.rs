use thiserror::Error;

/// Errors returned by mel spectrogram operations.
#[derive(Debug, Error)]
pub enum MelError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("transform init failed: unsupported fft size {fft_size}")]
    TransformInit { fft_size: usize },

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("transform failed: {0}")]
    Transform(#[from] realfft::FftError),
}

impl MelError {
    /// Returns the negative status code reported to firmware-style callers.
    pub fn code(&self) -> i32 {
        match self {
            MelError::InvalidConfig(_) => -1,
            MelError::TransformInit { .. } => -2,
            MelError::InvalidArgument(_) => -3,
            MelError::Transform(_) => -4,
        }
    }
}
