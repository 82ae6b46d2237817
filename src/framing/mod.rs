//! Fixed-size frame assembly for telephony transports

pub mod assembler;
pub mod frame;

pub use assembler::{AssemblerStats, FrameAssembler, FrameStream};
pub use frame::Frame;
