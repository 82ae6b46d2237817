//! Fixed-capacity ring buffer for mono float samples
//!
//! Decouples bursty writes (frame assembly) from a fixed-cadence reader
//! (the modem loop). Owned by one session task; no locking.
//!
//! Overflow and underrun are reported through return values only:
//! `write` returns how many samples fit, `read` returns `None` when fewer
//! than the requested samples are buffered.

use tracing::trace;

use crate::error::{Error, Result};

/// Fill state of a [`StreamingRingBuffer`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BufferState {
    Empty,
    Partial,
    Full,
}

/// Circular sample buffer addressed by read/write cursors
pub struct StreamingRingBuffer {
    storage: Box<[f32]>,
    sample_rate: u32,
    write_cursor: usize,
    read_cursor: usize,
    available: usize,
    samples_written: u64,
    samples_dropped: u64,
    samples_read: u64,
}

impl StreamingRingBuffer {
    /// Create a buffer holding `capacity` samples at `sample_rate`
    pub fn new(capacity: usize, sample_rate: u32) -> Result<Self> {
        if capacity == 0 {
            return Err(Error::invalid_parameter("ring buffer capacity must be positive"));
        }
        if sample_rate == 0 {
            return Err(Error::invalid_parameter("ring buffer sample rate must be positive"));
        }

        Ok(Self {
            storage: vec![0.0; capacity].into_boxed_slice(),
            sample_rate,
            write_cursor: 0,
            read_cursor: 0,
            available: 0,
            samples_written: 0,
            samples_dropped: 0,
            samples_read: 0,
        })
    }

    /// Create a buffer sized for `duration_ms` of audio
    pub fn with_duration_ms(duration_ms: u32, sample_rate: u32) -> Result<Self> {
        let capacity = (sample_rate as u64 * duration_ms as u64 / 1000) as usize;
        Self::new(capacity, sample_rate)
    }

    /// Write as many samples as fit. Returns the number written.
    ///
    /// Unread data is never overwritten; the remainder is dropped.
    pub fn write(&mut self, samples: &[f32]) -> usize {
        let capacity = self.capacity();
        let count = samples.len().min(capacity - self.available);

        if count > 0 {
            // At most two copies: up to the end of storage, then from the start
            let first = count.min(capacity - self.write_cursor);
            self.storage[self.write_cursor..self.write_cursor + first]
                .copy_from_slice(&samples[..first]);
            self.storage[..count - first].copy_from_slice(&samples[first..count]);

            self.write_cursor = (self.write_cursor + count) % capacity;
            self.available += count;
            self.samples_written += count as u64;
        }

        let dropped = samples.len() - count;
        if dropped > 0 {
            self.samples_dropped += dropped as u64;
            trace!("Ring buffer full, dropped {} samples", dropped);
        }

        count
    }

    /// Read exactly `n` samples, or `None` if fewer are buffered
    pub fn read(&mut self, n: usize) -> Option<Vec<f32>> {
        if self.available < n {
            return None;
        }

        let mut out = vec![0.0; n];
        self.copy_out(&mut out);
        Some(out)
    }

    /// Fill `out` completely, or leave everything untouched and return false
    pub fn read_into(&mut self, out: &mut [f32]) -> bool {
        if self.available < out.len() {
            return false;
        }
        self.copy_out(out);
        true
    }

    fn copy_out(&mut self, out: &mut [f32]) {
        let capacity = self.capacity();
        let n = out.len();

        let first = n.min(capacity - self.read_cursor);
        out[..first].copy_from_slice(&self.storage[self.read_cursor..self.read_cursor + first]);
        out[first..].copy_from_slice(&self.storage[..n - first]);

        self.read_cursor = (self.read_cursor + n) % capacity;
        self.available -= n;
        self.samples_read += n as u64;
    }

    /// Discard all buffered samples. Storage is not zeroed.
    pub fn clear(&mut self) {
        self.write_cursor = 0;
        self.read_cursor = 0;
        self.available = 0;
    }

    pub fn available_samples(&self) -> usize {
        self.available
    }

    /// Buffered audio in milliseconds
    pub fn available_ms(&self) -> f64 {
        self.available as f64 * 1000.0 / self.sample_rate as f64
    }

    pub fn capacity(&self) -> usize {
        self.storage.len()
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn is_empty(&self) -> bool {
        self.available == 0
    }

    pub fn is_full(&self) -> bool {
        self.available == self.capacity()
    }

    pub fn state(&self) -> BufferState {
        if self.is_empty() {
            BufferState::Empty
        } else if self.is_full() {
            BufferState::Full
        } else {
            BufferState::Partial
        }
    }

    /// Get fill level as a fraction of capacity
    pub fn fill_level(&self) -> f32 {
        self.available as f32 / self.capacity() as f32
    }

    pub fn stats(&self) -> RingBufferStats {
        RingBufferStats {
            samples_written: self.samples_written,
            samples_dropped: self.samples_dropped,
            samples_read: self.samples_read,
        }
    }

    pub fn reset_stats(&mut self) {
        self.samples_written = 0;
        self.samples_dropped = 0;
        self.samples_read = 0;
    }
}

/// Ring buffer statistics
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RingBufferStats {
    pub samples_written: u64,
    pub samples_dropped: u64,
    pub samples_read: u64,
}
