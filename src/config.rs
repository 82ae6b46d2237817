//! Pipeline configuration
//!
//! Loaded from TOML or built in code. Every field has a telephony default,
//! so an empty document yields 24 kHz in, 8 kHz / 20 ms PCM16 frames out.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::audio::resampler::ResampleQuality;
use crate::codec::OutputFormat;
use crate::constants::*;
use crate::error::{Error, Result};

/// Configuration for one framing pipeline (one per call)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Native rate of the synthesis engine
    pub source_sample_rate: u32,

    /// Rate expected by the transport
    pub target_sample_rate: u32,

    /// Duration of one transport frame
    pub frame_duration_ms: u32,

    /// Encoding of emitted frames
    pub output_format: OutputFormat,

    /// Resampler strategy preference
    pub resample_quality: ResampleQuality,

    /// Suggested ring buffer depth for transport-side jitter absorption
    pub ring_buffer_ms: u32,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            source_sample_rate: DEFAULT_SOURCE_SAMPLE_RATE,
            target_sample_rate: DEFAULT_TARGET_SAMPLE_RATE,
            frame_duration_ms: DEFAULT_FRAME_DURATION_MS,
            output_format: OutputFormat::Pcm16,
            resample_quality: ResampleQuality::Auto,
            ring_buffer_ms: DEFAULT_RING_BUFFER_MS,
        }
    }
}

impl PipelineConfig {
    /// Parse a configuration from a TOML document
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration from a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&contents)
    }

    pub fn with_source_sample_rate(mut self, rate: u32) -> Self {
        self.source_sample_rate = rate;
        self
    }

    pub fn with_target_sample_rate(mut self, rate: u32) -> Self {
        self.target_sample_rate = rate;
        self
    }

    pub fn with_frame_duration_ms(mut self, ms: u32) -> Self {
        self.frame_duration_ms = ms;
        self
    }

    pub fn with_output_format(mut self, format: OutputFormat) -> Self {
        self.output_format = format;
        self
    }

    pub fn with_resample_quality(mut self, quality: ResampleQuality) -> Self {
        self.resample_quality = quality;
        self
    }

    /// Check that the configuration describes a usable pipeline
    pub fn validate(&self) -> Result<()> {
        if self.source_sample_rate == 0 {
            return Err(Error::invalid_parameter("source_sample_rate must be positive"));
        }
        if self.target_sample_rate == 0 {
            return Err(Error::invalid_parameter("target_sample_rate must be positive"));
        }
        if self.frame_duration_ms == 0 {
            return Err(Error::invalid_parameter("frame_duration_ms must be positive"));
        }
        if self.frame_samples() == 0 {
            return Err(Error::invalid_parameter(format!(
                "{} ms at {} Hz is shorter than one sample",
                self.frame_duration_ms, self.target_sample_rate
            )));
        }
        Ok(())
    }

    /// Samples per frame at the target rate
    pub fn frame_samples(&self) -> usize {
        (self.target_sample_rate as u64 * self.frame_duration_ms as u64 / 1000) as usize
    }

    /// Bytes per frame in the configured output format
    pub fn frame_bytes(&self) -> usize {
        self.frame_samples() * self.output_format.bytes_per_sample()
    }

    /// Ring buffer capacity in target-rate samples
    pub fn ring_buffer_capacity(&self) -> usize {
        (self.target_sample_rate as u64 * self.ring_buffer_ms as u64 / 1000) as usize
    }
}
