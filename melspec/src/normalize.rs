//! Min-max normalization of a finished spectrogram.

/// Returns the global `(min, max)` of `values`, or `None` when empty.
///
/// NaN values are skipped.
pub fn min_max(values: &[f32]) -> Option<(f32, f32)> {
    let (&first, rest) = values.split_first()?;
    Some(rest.iter().fold((first, first), |(lo, hi), &v| (lo.min(v), hi.max(v))))
}

/// Rescales the first `n_mels * n_frames` values of `spectrogram` to [0, 1] in place.
///
/// The global minimum maps to 0.0 and the maximum to 1.0. A flat region
/// (`max == min`, e.g. silent input) carries no signal and is zero-filled.
/// An empty region is left as is.
pub fn normalize(spectrogram: &mut [f32], n_mels: usize, n_frames: usize) {
    let len = n_mels.saturating_mul(n_frames).min(spectrogram.len());
    let region = &mut spectrogram[..len];

    let Some((min, max)) = min_max(region) else {
        return;
    };
    let range = max - min;
    if range == 0.0 {
        region.fill(0.0);
        return;
    }
    for v in region.iter_mut() {
        *v = (*v - min) / range;
    }
}
