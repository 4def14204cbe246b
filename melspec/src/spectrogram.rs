use crate::normalize;

/// Owned `[n_mels][n_frames]` log-mel matrix, row-major by band.
#[derive(Debug, Clone, PartialEq)]
pub struct Spectrogram {
    data: Vec<f32>,
    n_mels: usize,
    n_frames: usize,
}

impl Spectrogram {
    /// Wraps a row-major buffer of exactly `n_mels * n_frames` values.
    ///
    /// # Panics
    ///
    /// Panics if the length does not match the shape.
    pub fn from_raw(data: Vec<f32>, n_mels: usize, n_frames: usize) -> Self {
        assert_eq!(data.len(), n_mels * n_frames, "spectrogram shape mismatch");
        Self { data, n_mels, n_frames }
    }

    #[inline]
    pub fn n_mels(&self) -> usize {
        self.n_mels
    }

    #[inline]
    pub fn n_frames(&self) -> usize {
        self.n_frames
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Values of band `m` across all frames.
    #[inline]
    pub fn row(&self, m: usize) -> &[f32] {
        &self.data[m * self.n_frames..(m + 1) * self.n_frames]
    }

    /// Value of band `m` at frame `f`.
    #[inline]
    pub fn get(&self, m: usize, f: usize) -> f32 {
        assert!(f < self.n_frames, "frame {f} out of range 0..{}", self.n_frames);
        self.data[m * self.n_frames + f]
    }

    /// Iterates over band rows; yields `n_mels` rows even when there are no frames.
    pub fn rows(&self) -> impl Iterator<Item = &[f32]> {
        (0..self.n_mels).map(move |m| self.row(m))
    }

    #[inline]
    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    /// Global `(min, max)`, `None` when empty.
    pub fn min_max(&self) -> Option<(f32, f32)> {
        normalize::min_max(&self.data)
    }

    /// Rescales all values to [0, 1]; see [`normalize::normalize`].
    pub fn normalize(&mut self) {
        normalize::normalize(&mut self.data, self.n_mels, self.n_frames);
    }

    pub fn into_vec(self) -> Vec<f32> {
        self.data
    }
}
