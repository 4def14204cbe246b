//! Mel-scale conversions.
//!
//! Uses the HTK formula. Inputs are expected to be non-negative; negative
//! frequencies are not guarded and yield NaN once `1 + hz/700` drops below zero.

/// Converts frequency in Hz to mel scale.
#[inline]
pub fn hz_to_mel(hz: f32) -> f32 {
    2595.0 * (1.0 + hz / 700.0).log10()
}

/// Converts mel scale frequency back to Hz.
#[inline]
pub fn mel_to_hz(mel: f32) -> f32 {
    700.0 * (10.0_f32.powf(mel / 2595.0) - 1.0)
}
