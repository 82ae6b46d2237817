//! Linear PCM conversions
//!
//! Float samples are normalized to [-1.0, 1.0]. PCM16 uses a symmetric
//! scale of 32767 and truncates toward zero so that output is bit-exact
//! across platforms.

use bytes::BufMut;

use crate::error::{Error, Result};

/// Full-scale value used for float <-> i16 conversion
pub const PCM16_SCALE: f32 = 32767.0;

/// Convert one normalized float sample to i16 (clip, scale, truncate)
#[inline]
pub fn float_to_i16(sample: f32) -> i16 {
    // `as` truncates toward zero and maps NaN to 0
    (sample.clamp(-1.0, 1.0) * PCM16_SCALE) as i16
}

/// Convert float samples to little-endian PCM16 bytes
pub fn float_to_pcm16(audio: &[f32]) -> Vec<u8> {
    let mut out = Vec::with_capacity(audio.len() * 2);
    put_pcm16(audio, &mut out);
    out
}

/// Append little-endian PCM16 bytes for `audio` to `buf`
pub fn put_pcm16<B: BufMut>(audio: &[f32], buf: &mut B) {
    for &sample in audio {
        buf.put_i16_le(float_to_i16(sample));
    }
}

/// Convert little-endian PCM16 bytes back to normalized floats
pub fn pcm16_to_float(bytes: &[u8]) -> Result<Vec<f32>> {
    if bytes.len() % 2 != 0 {
        return Err(Error::malformed_input(format!(
            "PCM16 input of {} bytes is not a multiple of 2",
            bytes.len()
        )));
    }

    Ok(bytes
        .chunks_exact(2)
        .map(|b| i16::from_le_bytes([b[0], b[1]]) as f32 / PCM16_SCALE)
        .collect())
}

/// Convert float samples to little-endian float32 bytes
pub fn float_to_f32_bytes(audio: &[f32]) -> Vec<u8> {
    let mut out = Vec::with_capacity(audio.len() * 4);
    put_f32(audio, &mut out);
    out
}

/// Append little-endian float32 bytes for `audio` to `buf`
pub fn put_f32<B: BufMut>(audio: &[f32], buf: &mut B) {
    for &sample in audio {
        buf.put_f32_le(sample);
    }
}

/// Convert little-endian float32 bytes back to samples
pub fn f32_bytes_to_float(bytes: &[u8]) -> Result<Vec<f32>> {
    if bytes.len() % 4 != 0 {
        return Err(Error::malformed_input(format!(
            "float32 input of {} bytes is not a multiple of 4",
            bytes.len()
        )));
    }

    Ok(bytes
        .chunks_exact(4)
        .map(|b| f32::from_le_bytes([b[0], b[1], b[2], b[3]]))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncation_not_rounding() {
        // 0.5 * 32767 = 16383.5
        assert_eq!(float_to_i16(0.5), 16383);
        assert_eq!(float_to_i16(-0.5), -16383);
    }

    #[test]
    fn test_clipping() {
        assert_eq!(float_to_i16(1.5), 32767);
        assert_eq!(float_to_i16(-7.0), -32767);
        assert_eq!(float_to_i16(f32::NAN), 0);
    }

    #[test]
    fn test_pcm16_little_endian() {
        let bytes = float_to_pcm16(&[1.0, -1.0, 0.0]);
        assert_eq!(bytes, vec![0xFF, 0x7F, 0x01, 0x80, 0x00, 0x00]);
    }

    #[test]
    fn test_pcm16_decode() {
        let samples = pcm16_to_float(&[0xFF, 0x7F, 0x00, 0x00]).unwrap();
        assert_eq!(samples, vec![1.0, 0.0]);
    }

    #[test]
    fn test_pcm16_odd_length() {
        let err = pcm16_to_float(&[0x00, 0x01, 0x02]).unwrap_err();
        assert!(matches!(err, Error::MalformedInput(_)));
    }

    #[test]
    fn test_f32_bytes() {
        let samples = [0.25f32, -0.75, 1.0];
        let bytes = float_to_f32_bytes(&samples);
        assert_eq!(bytes.len(), 12);
        assert_eq!(&bytes[..4], &0.25f32.to_le_bytes());
        assert_eq!(f32_bytes_to_float(&bytes).unwrap(), samples.to_vec());
        assert!(f32_bytes_to_float(&bytes[..5]).is_err());
    }

    #[test]
    fn test_empty_input() {
        assert!(float_to_pcm16(&[]).is_empty());
        assert!(pcm16_to_float(&[]).unwrap().is_empty());
    }
}
