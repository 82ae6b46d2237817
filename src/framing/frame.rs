//! Fixed-size encoded frames handed to the transport

use bytes::Bytes;

use crate::codec::OutputFormat;
use crate::error::Result;

/// One transport quantum of encoded audio
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    payload: Bytes,
    format: OutputFormat,
    /// Position in the assembler's output, starting at 0
    sequence: u64,
    /// Trailing silence samples added on flush
    padding: usize,
}

impl Frame {
    pub fn new(payload: Bytes, format: OutputFormat, sequence: u64, padding: usize) -> Self {
        Self {
            payload,
            format,
            sequence,
            padding,
        }
    }

    pub fn payload(&self) -> &Bytes {
        &self.payload
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.payload
    }

    pub fn into_bytes(self) -> Bytes {
        self.payload
    }

    /// Payload length in bytes
    pub fn len(&self) -> usize {
        self.payload.len()
    }

    pub fn is_empty(&self) -> bool {
        self.payload.is_empty()
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    pub fn padding(&self) -> usize {
        self.padding
    }

    pub fn is_padded(&self) -> bool {
        self.padding > 0
    }

    /// Number of samples carried, padding included
    pub fn samples(&self) -> usize {
        self.payload.len() / self.format.bytes_per_sample()
    }

    /// Decode the payload back to normalized floats
    pub fn decode(&self) -> Result<Vec<f32>> {
        self.format.decode(&self.payload)
    }
}

impl AsRef<[u8]> for Frame {
    fn as_ref(&self) -> &[u8] {
        &self.payload
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_accessors() {
        let payload = Bytes::from(OutputFormat::Alaw.encode(&[0.0; 160]));
        let frame = Frame::new(payload, OutputFormat::Alaw, 7, 40);

        assert_eq!(frame.len(), 160);
        assert_eq!(frame.samples(), 160);
        assert_eq!(frame.sequence(), 7);
        assert!(frame.is_padded());
        assert!(frame.as_bytes().iter().all(|&b| b == 0xD5));
    }

    #[test]
    fn test_frame_decode() {
        let samples = [0.5f32, -0.25];
        let frame = Frame::new(
            Bytes::from(OutputFormat::Float32.encode(&samples)),
            OutputFormat::Float32,
            0,
            0,
        );
        assert_eq!(frame.samples(), 2);
        assert_eq!(frame.decode().unwrap(), samples.to_vec());
    }
}
