//! Fixed-frame assembly
//!
//! Re-quantizes arbitrarily sized synthesis chunks into uniform transport
//! frames (160 samples / 20 ms at 8 kHz by default).
//!
//! ```text
//!  chunk (24 kHz, any length)
//!        │ resample
//!        ▼
//!  ┌───────────┬───────────────────────────────┐
//!  │ leftover  │ new samples                   │
//!  └───────────┴───────────────────────────────┘
//!  │◄── frame ──►│◄── frame ──►│◄── leftover ──►│
//! ```
//!
//! Between chunks the leftover always holds fewer than `frame_samples`
//! samples. When the source ends, a non-empty leftover is padded with
//! silence and emitted as one last frame.

use bytes::{Bytes, BytesMut};
use std::collections::VecDeque;
use std::iter::FusedIterator;
use tracing::{debug, trace};

use crate::audio::chunk::AudioChunk;
use crate::audio::resampler::{ResampleStrategy, Resampler};
use crate::codec::OutputFormat;
use crate::config::PipelineConfig;
use crate::error::Result;
use crate::framing::frame::Frame;

/// Per-call frame assembler
pub struct FrameAssembler {
    resampler: Resampler,
    frame_samples: usize,
    /// Format used by [`FrameAssembler::frames`]
    output_format: OutputFormat,
    /// Resampled samples not yet emitted
    leftover: Vec<f32>,
    next_sequence: u64,
    stats: AssemblerStats,
}

impl FrameAssembler {
    /// Create an assembler for the given configuration
    pub fn new(config: &PipelineConfig) -> Result<Self> {
        config.validate()?;

        let mut resampler = Resampler::new(config.target_sample_rate, config.resample_quality)?;
        resampler.prepare(config.source_sample_rate)?;

        let frame_samples = config.frame_samples();
        debug!(
            "Frame assembler: {}Hz -> {}Hz, {} samples/frame ({}ms, {})",
            config.source_sample_rate,
            config.target_sample_rate,
            frame_samples,
            config.frame_duration_ms,
            config.output_format
        );

        Ok(Self {
            resampler,
            frame_samples,
            output_format: config.output_format,
            leftover: Vec::with_capacity(frame_samples * 2),
            next_sequence: 0,
            stats: AssemblerStats::default(),
        })
    }

    /// Resample and encode one chunk with no framing.
    ///
    /// Does not touch buffered audio; meant for one-shot synthesis.
    pub fn process_chunk(
        &mut self,
        audio: impl Into<AudioChunk>,
        format: OutputFormat,
    ) -> Result<Bytes> {
        let resampled = self.resampler.resample(audio.into())?;
        Ok(Bytes::from(format.encode(&resampled.samples)))
    }

    /// Lazily turn a stream of chunks into fixed-size frames.
    ///
    /// The returned iterator pulls the next chunk only after every frame of
    /// the previous one has been taken, and flushes the padded tail when the
    /// source ends. An error is yielded once and ends the stream.
    pub fn generate_frames<I>(&mut self, chunks: I, format: OutputFormat) -> FrameStream<'_, I::IntoIter>
    where
        I: IntoIterator,
        I::Item: Into<AudioChunk>,
    {
        FrameStream {
            assembler: self,
            source: chunks.into_iter(),
            format,
            pending: VecDeque::new(),
            done: false,
        }
    }

    /// [`generate_frames`](Self::generate_frames) in the configured output format
    pub fn frames<I>(&mut self, chunks: I) -> FrameStream<'_, I::IntoIter>
    where
        I: IntoIterator,
        I::Item: Into<AudioChunk>,
    {
        let format = self.output_format;
        self.generate_frames(chunks, format)
    }

    /// Add one chunk and return every frame that became complete
    pub fn push_chunk(
        &mut self,
        audio: impl Into<AudioChunk>,
        format: OutputFormat,
    ) -> Result<Vec<Frame>> {
        let mut frames = Vec::new();
        self.push_chunk_into(audio.into(), format, &mut frames)?;
        Ok(frames)
    }

    /// Emit the buffered tail padded with silence, if any
    pub fn flush(&mut self, format: OutputFormat) -> Option<Frame> {
        if self.leftover.is_empty() {
            return None;
        }

        let padding = self.frame_samples.saturating_sub(self.leftover.len());
        self.leftover.resize(self.frame_samples, 0.0);

        let frame = Frame::new(
            encode_payload(&self.leftover, format),
            format,
            self.next_sequence,
            padding,
        );
        self.leftover.clear();
        self.next_sequence += 1;
        self.stats.frames_emitted += 1;
        self.stats.padded_samples += padding as u64;

        debug!("Flushed final frame {} with {} samples of padding", frame.sequence(), padding);
        Some(frame)
    }

    /// Discard buffered audio and restart sequence numbering
    pub fn reset(&mut self) {
        if !self.leftover.is_empty() {
            debug!("Reset discarding {} buffered samples", self.leftover.len());
        }
        self.leftover.clear();
        self.next_sequence = 0;
    }

    fn push_chunk_into<E: Extend<Frame>>(
        &mut self,
        audio: AudioChunk,
        format: OutputFormat,
        out: &mut E,
    ) -> Result<()> {
        let samples_in = audio.len();
        let resampled = self.resampler.resample(audio)?;

        self.stats.chunks_processed += 1;
        self.stats.samples_in += samples_in as u64;
        self.stats.samples_resampled += resampled.len() as u64;

        self.leftover.extend_from_slice(&resampled.samples);
        self.drain_frames(format, out);
        Ok(())
    }

    fn drain_frames<E: Extend<Frame>>(&mut self, format: OutputFormat, out: &mut E) {
        let n = self.frame_samples;
        let full = self.leftover.len() / n * n;
        if full == 0 {
            return;
        }

        for start in (0..full).step_by(n) {
            let frame = Frame::new(
                encode_payload(&self.leftover[start..start + n], format),
                format,
                self.next_sequence,
                0,
            );
            trace!("Frame {} ready ({} bytes)", frame.sequence(), frame.len());
            self.next_sequence += 1;
            out.extend(std::iter::once(frame));
        }

        self.stats.frames_emitted += (full / n) as u64;
        self.leftover.drain(..full);
    }

    pub fn frame_samples(&self) -> usize {
        self.frame_samples
    }

    /// Encoded frame size in the configured output format
    pub fn frame_bytes(&self) -> usize {
        self.frame_samples * self.output_format.bytes_per_sample()
    }

    pub fn output_format(&self) -> OutputFormat {
        self.output_format
    }

    pub fn target_rate(&self) -> u32 {
        self.resampler.target_rate()
    }

    pub fn resample_strategy(&self) -> ResampleStrategy {
        self.resampler.strategy()
    }

    /// Samples waiting for a full frame
    pub fn buffered_samples(&self) -> usize {
        self.leftover.len()
    }

    pub fn stats(&self) -> AssemblerStats {
        self.stats.clone()
    }

    pub fn reset_stats(&mut self) {
        self.stats = AssemblerStats::default();
    }
}

fn encode_payload(samples: &[f32], format: OutputFormat) -> Bytes {
    let mut buf = BytesMut::with_capacity(samples.len() * format.bytes_per_sample());
    format.encode_into(samples, &mut buf);
    buf.freeze()
}

/// Pull-based frame sequence returned by [`FrameAssembler::generate_frames`]
pub struct FrameStream<'a, I> {
    assembler: &'a mut FrameAssembler,
    source: I,
    format: OutputFormat,
    /// Frames completed by the last chunk, not yet pulled
    pending: VecDeque<Frame>,
    done: bool,
}

impl<I> Iterator for FrameStream<'_, I>
where
    I: Iterator,
    I::Item: Into<AudioChunk>,
{
    type Item = Result<Frame>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(frame) = self.pending.pop_front() {
                return Some(Ok(frame));
            }
            if self.done {
                return None;
            }

            match self.source.next() {
                Some(chunk) => {
                    if let Err(e) =
                        self.assembler
                            .push_chunk_into(chunk.into(), self.format, &mut self.pending)
                    {
                        self.done = true;
                        return Some(Err(e));
                    }
                }
                None => {
                    self.done = true;
                    return self.assembler.flush(self.format).map(Ok);
                }
            }
        }
    }
}

impl<I> FusedIterator for FrameStream<'_, I>
where
    I: Iterator,
    I::Item: Into<AudioChunk>,
{
}

/// Assembler statistics
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssemblerStats {
    pub chunks_processed: u64,
    /// Samples received at the source rate
    pub samples_in: u64,
    /// Samples after resampling
    pub samples_resampled: u64,
    pub frames_emitted: u64,
    pub padded_samples: u64,
}
