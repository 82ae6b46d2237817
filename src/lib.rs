//! # Telephony Framer
//!
//! Turns variable-rate, variable-length synthesized speech into the fixed
//! 20 ms frames a GSM/PSTN transport consumes.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────────┐
//! │                     SPEECH SYNTHESIS (external)                      │
//! │          AudioChunk { samples: Vec<f32>, sample_rate: 24000 }        │
//! └──────────────────────────────────┬───────────────────────────────────┘
//!                                    │ arbitrary chunk sizes
//!                                    ▼
//! ┌──────────────────────────────────────────────────────────────────────┐
//! │                 Frame Assembler (framing::assembler)                 │
//! │  ┌─────────────┐    ┌─────────────────┐    ┌──────────────────────┐  │
//! │  │  Resampler  │───►│ Leftover buffer │───►│  Encoder (codec)     │  │
//! │  │ FFT/linear  │    │  < 1 frame      │    │  pcm16|float32|alaw  │  │
//! │  └─────────────┘    └─────────────────┘    └──────────┬───────────┘  │
//! └───────────────────────────────────────────────────────┼──────────────┘
//!                                                         │ Frame (320 B pcm16,
//!                                                         │        160 B alaw)
//!                                                         ▼
//! ┌──────────────────────────────────────────────────────────────────────┐
//! │         Streaming Ring Buffer (audio::buffer), optional              │
//! │       bursty writes ──► [ circular storage ] ──► 20 ms reads         │
//! └──────────────────────────────────┬───────────────────────────────────┘
//!                                    ▼
//! ┌──────────────────────────────────────────────────────────────────────┐
//! │                  MODEM / TRANSPORT LOOP (external)                   │
//! └──────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every component is owned by a single call/session and is synchronous:
//! no locks, no blocking, no timers. Pacing belongs to the transport loop.

pub mod audio;
pub mod codec;
pub mod config;
pub mod error;
pub mod framing;

pub use audio::{AudioChunk, ResampleQuality, Resampler, StreamingRingBuffer};
pub use codec::OutputFormat;
pub use config::PipelineConfig;
pub use error::{Error, Result};
pub use framing::{Frame, FrameAssembler};

/// Library-wide constants
pub mod constants {
    /// Default native rate of the synthesis engine
    pub const DEFAULT_SOURCE_SAMPLE_RATE: u32 = 24000;

    /// Default transport sample rate (narrowband telephony)
    pub const DEFAULT_TARGET_SAMPLE_RATE: u32 = 8000;

    /// Default frame duration in milliseconds
    pub const DEFAULT_FRAME_DURATION_MS: u32 = 20;

    /// Default ring buffer depth in milliseconds
    pub const DEFAULT_RING_BUFFER_MS: u32 = 200;
}
