//! Packing features into a fixed-size classifier input.

/// Copies the flattened spectrogram into `tensor`, zero-filling the remainder.
///
/// Values beyond `tensor.len()` are dropped. Returns the number of values copied.
pub fn fill_input_tensor(spectrogram: &[f32], tensor: &mut [f32]) -> usize {
    let n = spectrogram.len().min(tensor.len());
    tensor[..n].copy_from_slice(&spectrogram[..n]);
    tensor[n..].fill(0.0);
    n
}
