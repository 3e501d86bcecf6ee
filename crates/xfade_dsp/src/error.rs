//! DSP Error Types

use thiserror::Error;

/// Errors that can occur during DSP operations
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum DspError {
    #[error("Invalid band index: {0} (must be 0-9)")]
    InvalidBandIndex(usize),

    #[error("Invalid filter coefficients for frequency {frequency}Hz at sample rate {sample_rate}Hz")]
    InvalidCoefficients { frequency: f32, sample_rate: f32 },

    #[error("Quality factor must be positive, got {0}")]
    InvalidQ(f32),

    #[error("Gain factor must be positive and finite, got {0}")]
    InvalidGain(f32),

    #[error("Sample rate must be positive, got {0}")]
    InvalidSampleRate(f32),
}
