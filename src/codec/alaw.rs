//! G.711 A-law companding
//!
//! Compresses 16-bit linear samples to 8-bit segment/mantissa codes as
//! specified by ITU-T G.711, with even-bit inversion (XOR 0x55).
//!
//! ```text
//!  bit:   7      6..4      3..0
//!       ┌──────┬─────────┬──────────┐
//!       │ sign │ segment │ mantissa │   then ^ 0x55
//!       └──────┴─────────┴──────────┘
//! ```

use bytes::BufMut;

use super::pcm::{float_to_i16, PCM16_SCALE};

/// Largest magnitude representable before the top segment saturates
const ALAW_CLIP: i32 = 32635;

/// Even-bit inversion mask
const ALAW_MASK: u8 = 0x55;

/// Compress one linear PCM16 sample to A-law
#[inline]
pub fn linear_to_alaw(sample: i16) -> u8 {
    let sign: u8 = if sample >= 0 { 0x80 } else { 0x00 };
    let magnitude = (sample as i32).abs().min(ALAW_CLIP);

    let compressed = if magnitude >= 256 {
        // Bit length of the high byte picks the segment (1..=7)
        let segment = 8 - ((magnitude >> 8) as u8).leading_zeros() as i32;
        let mantissa = (magnitude >> (segment + 3)) & 0x0F;
        ((segment << 4) | mantissa) as u8
    } else {
        (magnitude >> 4) as u8
    };

    (compressed | sign) ^ ALAW_MASK
}

/// Expand one A-law code to linear PCM16 (segment midpoint)
#[inline]
pub fn alaw_to_linear(code: u8) -> i16 {
    let a = code ^ ALAW_MASK;
    let mut t = ((a & 0x0F) as i16) << 4;
    let segment = (a & 0x70) >> 4;

    match segment {
        0 => t += 8,
        1 => t += 0x108,
        _ => {
            t += 0x108;
            t <<= segment - 1;
        }
    }

    if a & 0x80 != 0 {
        t
    } else {
        -t
    }
}

/// Encode float samples to A-law, one byte per sample
pub fn encode_g711_alaw(audio: &[f32]) -> Vec<u8> {
    let mut out = Vec::with_capacity(audio.len());
    put_alaw(audio, &mut out);
    out
}

/// Append A-law bytes for `audio` to `buf`
pub fn put_alaw<B: BufMut>(audio: &[f32], buf: &mut B) {
    for &sample in audio {
        buf.put_u8(linear_to_alaw(float_to_i16(sample)));
    }
}

/// Decode A-law bytes back to normalized floats
pub fn decode_g711_alaw(bytes: &[u8]) -> Vec<f32> {
    bytes
        .iter()
        .map(|&b| alaw_to_linear(b) as f32 / PCM16_SCALE)
        .collect()
}
