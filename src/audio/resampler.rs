//! Sample rate conversion to the transport rate
//!
//! Two strategies produce output of identical length:
//!
//! - **Fft**: band-limited resampling with `rubato::FftFixedIn` (cargo
//!   feature `hq-resample`, on by default).
//! - **Linear**: deterministic linear interpolation over the grid
//!   `i * (source_len - 1) / (target_len - 1)`. Cheap, dependency free,
//!   and aliasing-prone on downsampling.
//!
//! The strategy is resolved once in [`Resampler::new`]. Each chunk is
//! resampled independently, so output never depends on earlier chunks.

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, warn};

#[cfg(feature = "hq-resample")]
use rubato::{FftFixedIn, Resampler as _};

use crate::audio::chunk::AudioChunk;
use crate::error::{Error, Result};

/// Input block size handed to the FFT kernel
#[cfg(feature = "hq-resample")]
pub const FFT_CHUNK_SIZE: usize = 1024;

/// Consecutive empty kernel outputs tolerated before giving up
#[cfg(feature = "hq-resample")]
const MAX_EMPTY_BLOCKS: usize = 4;

/// Requested resampling quality
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResampleQuality {
    /// Best strategy compiled into this build
    #[default]
    Auto,
    Linear,
    HighQuality,
}

/// Strategy actually in use
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResampleStrategy {
    Linear,
    Fft,
}

/// Output length for `source_len` samples: `round(len * target / source)`,
/// rounding half up.
///
/// `source_rate` must be non-zero.
pub fn target_len(source_len: usize, source_rate: u32, target_rate: u32) -> usize {
    let num = source_len as u64 * target_rate as u64;
    let den = source_rate as u64;
    ((2 * num + den) / (2 * den)) as usize
}

/// Linear interpolation of `input` onto `out_len` evenly spaced points that
/// span the first and last input samples.
pub fn linear_resample(input: &[f32], out_len: usize) -> Vec<f32> {
    if out_len == 0 || input.is_empty() {
        return vec![0.0; out_len];
    }
    if input.len() == 1 || out_len == 1 {
        return vec![input[0]; out_len];
    }

    let last = input.len() - 1;
    let step = last as f64 / (out_len - 1) as f64;

    (0..out_len)
        .map(|i| {
            let pos = i as f64 * step;
            let idx = pos.floor() as usize;
            if idx >= last {
                return input[last];
            }
            let frac = (pos - idx as f64) as f32;
            input[idx] + (input[idx + 1] - input[idx]) * frac
        })
        .collect()
}

/// Converts chunks from any source rate to a fixed target rate
pub struct Resampler {
    target_rate: u32,
    strategy: ResampleStrategy,
    /// Kernel for the most recently seen source rate
    #[cfg(feature = "hq-resample")]
    kernel: Option<FftKernel>,
}

#[cfg(feature = "hq-resample")]
struct FftKernel {
    source_rate: u32,
    /// `None` when rubato rejected this rate pair
    inner: Option<FftFixedIn<f32>>,
    /// Zero-padded input block (reused to avoid allocations)
    block: Vec<f32>,
}

#[cfg(feature = "hq-resample")]
impl FftKernel {
    fn build(source_rate: u32, target_rate: u32) -> Self {
        let inner = match FftFixedIn::<f32>::new(
            source_rate as usize,
            target_rate as usize,
            FFT_CHUNK_SIZE,
            1,
            1,
        ) {
            Ok(fft) => {
                debug!(
                    "Created FFT resampler {}Hz -> {}Hz (block {}, delay {})",
                    source_rate,
                    target_rate,
                    fft.input_frames_next(),
                    fft.output_delay()
                );
                Some(fft)
            }
            Err(e) => {
                warn!(
                    "FFT resampler unavailable for {}Hz -> {}Hz, using linear interpolation: {}",
                    source_rate, target_rate, e
                );
                None
            }
        };

        Self {
            source_rate,
            inner,
            block: Vec::with_capacity(FFT_CHUNK_SIZE * 2),
        }
    }
}

impl Resampler {
    /// Create a resampler for `target_rate`, resolving the strategy once
    pub fn new(target_rate: u32, quality: ResampleQuality) -> Result<Self> {
        if target_rate == 0 {
            return Err(Error::invalid_parameter("target sample rate must be positive"));
        }

        let strategy = select_strategy(quality);
        debug!("Resampler to {}Hz using {:?} strategy", target_rate, strategy);

        Ok(Self {
            target_rate,
            strategy,
            #[cfg(feature = "hq-resample")]
            kernel: None,
        })
    }

    pub fn target_rate(&self) -> u32 {
        self.target_rate
    }

    pub fn strategy(&self) -> ResampleStrategy {
        self.strategy
    }

    /// Build the kernel for `source_rate` ahead of the first chunk
    pub fn prepare(&mut self, source_rate: u32) -> Result<()> {
        check_source_rate(source_rate)?;
        #[cfg(feature = "hq-resample")]
        {
            if self.strategy == ResampleStrategy::Fft && source_rate != self.target_rate {
                self.kernel_for(source_rate);
            }
        }
        Ok(())
    }

    /// Resample a chunk to the target rate.
    ///
    /// A chunk already at the target rate is returned as is.
    pub fn resample(&mut self, chunk: AudioChunk) -> Result<AudioChunk> {
        check_source_rate(chunk.sample_rate)?;
        if chunk.sample_rate == self.target_rate {
            return Ok(chunk);
        }

        let samples = self.resample_slice(&chunk.samples, chunk.sample_rate)?;
        Ok(AudioChunk::new(samples, self.target_rate))
    }

    /// Resample raw samples recorded at `source_rate`
    pub fn resample_slice(&mut self, input: &[f32], source_rate: u32) -> Result<Vec<f32>> {
        check_source_rate(source_rate)?;
        if source_rate == self.target_rate {
            return Ok(input.to_vec());
        }

        let out_len = target_len(input.len(), source_rate, self.target_rate);
        if out_len == 0 {
            return Ok(Vec::new());
        }

        match self.strategy {
            ResampleStrategy::Linear => Ok(linear_resample(input, out_len)),
            ResampleStrategy::Fft => self.resample_fft(input, source_rate, out_len),
        }
    }

    #[cfg(feature = "hq-resample")]
    fn kernel_for(&mut self, source_rate: u32) -> &mut FftKernel {
        if self
            .kernel
            .as_ref()
            .map_or(true, |k| k.source_rate != source_rate)
        {
            self.kernel = None;
        }
        let target_rate = self.target_rate;
        self.kernel
            .get_or_insert_with(|| FftKernel::build(source_rate, target_rate))
    }

    #[cfg(feature = "hq-resample")]
    fn resample_fft(&mut self, input: &[f32], source_rate: u32, out_len: usize) -> Result<Vec<f32>> {
        let FftKernel { inner, block, .. } = self.kernel_for(source_rate);
        let Some(fft) = inner.as_mut() else {
            return Ok(linear_resample(input, out_len));
        };

        fft.reset();
        let delay = fft.output_delay();
        let needed = delay + out_len;
        let block_len = fft.input_frames_next();
        let mut out = Vec::with_capacity(needed + fft.output_frames_max());

        // Feed zero-padded blocks until the delayed output covers `out_len`
        let mut pos = 0;
        let mut empty_blocks = 0;
        while out.len() < needed {
            block.clear();
            let end = (pos + block_len).min(input.len());
            if pos < end {
                block.extend_from_slice(&input[pos..end]);
            }
            block.resize(block_len, 0.0);
            pos += block_len;

            let processed = fft
                .process(&[block.as_slice()], None)
                .map_err(|e| Error::Resample(e.to_string()))?;
            // A freshly reset kernel fills its overlap buffer before emitting
            match processed.first() {
                Some(channel) if !channel.is_empty() => {
                    out.extend_from_slice(channel);
                    empty_blocks = 0;
                }
                _ => {
                    empty_blocks += 1;
                    if empty_blocks > MAX_EMPTY_BLOCKS {
                        return Err(Error::Resample(format!(
                            "FFT resampler produced no output for {} consecutive blocks",
                            empty_blocks
                        )));
                    }
                }
            }
        }

        out.drain(..delay);
        out.truncate(out_len);
        Ok(out)
    }

    #[cfg(not(feature = "hq-resample"))]
    fn resample_fft(&mut self, input: &[f32], _source_rate: u32, out_len: usize) -> Result<Vec<f32>> {
        Ok(linear_resample(input, out_len))
    }
}

impl fmt::Debug for Resampler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Resampler")
            .field("target_rate", &self.target_rate)
            .field("strategy", &self.strategy)
            .finish()
    }
}

fn check_source_rate(source_rate: u32) -> Result<()> {
    if source_rate == 0 {
        return Err(Error::invalid_parameter("source sample rate must be positive"));
    }
    Ok(())
}

fn select_strategy(quality: ResampleQuality) -> ResampleStrategy {
    let hq_available = cfg!(feature = "hq-resample");
    match quality {
        ResampleQuality::Linear => ResampleStrategy::Linear,
        ResampleQuality::Auto if hq_available => ResampleStrategy::Fft,
        ResampleQuality::Auto => ResampleStrategy::Linear,
        ResampleQuality::HighQuality if hq_available => ResampleStrategy::Fft,
        ResampleQuality::HighQuality => {
            warn!("High-quality resampling not compiled in, falling back to linear interpolation");
            ResampleStrategy::Linear
        }
    }
}
