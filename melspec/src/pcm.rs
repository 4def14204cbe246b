//! Raw PCM16 little-endian decoding.

/// Decodes little-endian PCM16 bytes into `out`, returning the number of samples written.
///
/// Decodes `min(bytes.len() / 2, out.len())` samples; a trailing odd byte is ignored.
pub fn samples_from_le_bytes(bytes: &[u8], out: &mut [i16]) -> usize {
    let mut n = 0;
    for (dst, pair) in out.iter_mut().zip(bytes.chunks_exact(2)) {
        *dst = i16::from_le_bytes([pair[0], pair[1]]);
        n += 1;
    }
    n
}

/// Decodes little-endian PCM16 bytes into a new vector.
pub fn decode_le_bytes(bytes: &[u8]) -> Vec<i16> {
    bytes
        .chunks_exact(2)
        .map(|pair| i16::from_le_bytes([pair[0], pair[1]]))
        .collect()
}
