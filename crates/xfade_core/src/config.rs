//! Stream Configuration
//!
//! The three values fixed for a prepared session. Changing any of them
//! requires a new `configure()` call.

use serde::{Deserialize, Serialize};
use xfade_dsp::MIN_SAMPLE_RATE;

use crate::error::EngineResult;

/// Most channels the processor handles
pub const MAX_CHANNELS: u16 = 2;

/// Audio stream configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamConfig {
    /// Sample rate in Hz (e.g., 44100, 48000, 96000)
    pub sample_rate: u32,

    /// Largest block the host will pass to `process`, in frames
    pub max_block_size: u32,

    /// Number of audio channels (1 = mono, 2 = stereo)
    pub channels: u16,
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            sample_rate: 48000,
            max_block_size: 512,
            channels: 2,
        }
    }
}

impl StreamConfig {
    pub fn new(sample_rate: u32, max_block_size: u32, channels: u16) -> Self {
        Self {
            sample_rate,
            max_block_size,
            channels,
        }
    }

    /// Create config optimized for low latency
    pub fn low_latency() -> Self {
        Self {
            max_block_size: 128, // ~2.6ms latency
            ..Self::default()
        }
    }

    /// Create config optimized for stability
    pub fn stable() -> Self {
        Self {
            max_block_size: 1024, // ~21ms latency
            ..Self::default()
        }
    }

    /// Parse a configuration from JSON
    pub fn from_json(json: &str) -> EngineResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Calculate latency in milliseconds for one full block
    pub fn latency_ms(&self) -> f32 {
        (self.max_block_size as f32 / self.sample_rate as f32) * 1000.0
    }

    /// Validate configuration
    ///
    /// The top band (16 kHz) must stay below Nyquist, so the sample rate
    /// must be strictly above 32 kHz.
    pub fn validate(&self) -> Result<(), String> {
        if self.sample_rate as f32 <= MIN_SAMPLE_RATE || self.sample_rate > 192000 {
            return Err(format!("Invalid sample rate: {}", self.sample_rate));
        }
        if self.channels == 0 || self.channels > MAX_CHANNELS {
            return Err(format!("Invalid channel count: {}", self.channels));
        }
        if self.max_block_size == 0 || self.max_block_size > 8192 {
            return Err(format!("Invalid block size: {}", self.max_block_size));
        }
        Ok(())
    }
}
