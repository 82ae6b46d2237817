//! Audio subsystem module

pub mod buffer;
pub mod chunk;
pub mod resampler;

pub use buffer::{BufferState, RingBufferStats, StreamingRingBuffer};
pub use chunk::AudioChunk;
pub use resampler::{ResampleQuality, ResampleStrategy, Resampler};
