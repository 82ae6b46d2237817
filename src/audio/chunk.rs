//! Audio chunks delivered by the synthesis engine

/// Mono float audio tagged with its sample rate
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AudioChunk {
    /// Normalized samples in [-1.0, 1.0]
    pub samples: Vec<f32>,
    /// Sample rate in Hz
    pub sample_rate: u32,
}

impl AudioChunk {
    pub fn new(samples: Vec<f32>, sample_rate: u32) -> Self {
        Self {
            samples,
            sample_rate,
        }
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Chunk duration in milliseconds (0 for a zero rate)
    pub fn duration_ms(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.samples.len() as f64 * 1000.0 / self.sample_rate as f64
    }

    pub fn into_samples(self) -> Vec<f32> {
        self.samples
    }
}

impl From<(Vec<f32>, u32)> for AudioChunk {
    fn from((samples, sample_rate): (Vec<f32>, u32)) -> Self {
        Self::new(samples, sample_rate)
    }
}

impl From<(&[f32], u32)> for AudioChunk {
    fn from((samples, sample_rate): (&[f32], u32)) -> Self {
        Self::new(samples.to_vec(), sample_rate)
    }
}
