//! Sample format conversion
//!
//! Pure, stateless converters between normalized float samples and the
//! byte encodings a telephony transport accepts.

pub mod alaw;
pub mod pcm;

pub use alaw::{decode_g711_alaw, encode_g711_alaw};
pub use pcm::{f32_bytes_to_float, float_to_f32_bytes, float_to_pcm16, pcm16_to_float};

use bytes::BufMut;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Byte encoding of emitted audio
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// 16-bit signed little-endian PCM
    #[default]
    Pcm16,
    /// 32-bit little-endian float
    Float32,
    /// 8-bit G.711 A-law
    Alaw,
}

impl OutputFormat {
    /// Encoded width of one sample
    pub const fn bytes_per_sample(self) -> usize {
        match self {
            OutputFormat::Pcm16 => 2,
            OutputFormat::Float32 => 4,
            OutputFormat::Alaw => 1,
        }
    }

    /// Encode samples into a new byte vector
    pub fn encode(self, audio: &[f32]) -> Vec<u8> {
        match self {
            OutputFormat::Pcm16 => float_to_pcm16(audio),
            OutputFormat::Float32 => float_to_f32_bytes(audio),
            OutputFormat::Alaw => encode_g711_alaw(audio),
        }
    }

    /// Encode samples into an existing buffer
    pub fn encode_into<B: BufMut>(self, audio: &[f32], buf: &mut B) {
        match self {
            OutputFormat::Pcm16 => pcm::put_pcm16(audio, buf),
            OutputFormat::Float32 => pcm::put_f32(audio, buf),
            OutputFormat::Alaw => alaw::put_alaw(audio, buf),
        }
    }

    /// Decode bytes of this format back to normalized floats
    pub fn decode(self, bytes: &[u8]) -> Result<Vec<f32>> {
        match self {
            OutputFormat::Pcm16 => pcm16_to_float(bytes),
            OutputFormat::Float32 => f32_bytes_to_float(bytes),
            OutputFormat::Alaw => Ok(decode_g711_alaw(bytes)),
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            OutputFormat::Pcm16 => "pcm16",
            OutputFormat::Float32 => "float32",
            OutputFormat::Alaw => "alaw",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OutputFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "pcm16" => Ok(OutputFormat::Pcm16),
            "float32" => Ok(OutputFormat::Float32),
            "alaw" => Ok(OutputFormat::Alaw),
            other => Err(Error::invalid_parameter(format!("unknown output format: {other}"))),
        }
    }
}
