//! Engine Error Types

use thiserror::Error;

/// Errors that can occur in the processing engine
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Processor not configured - call configure() before process()")]
    NotConfigured,

    #[error("Block of {frames} frames exceeds configured maximum of {max}")]
    BlockTooLarge { frames: usize, max: usize },

    #[error("Buffer size mismatch: expected {expected}, got {got}")]
    BufferSizeMismatch { expected: usize, got: usize },

    #[error("Stream configuration error: {0}")]
    ConfigError(String),

    #[error("Unknown parameter id: {0}")]
    UnknownParameter(String),

    #[error("DSP error: {0}")]
    DspError(#[from] xfade_dsp::DspError),

    #[error("Failed to parse configuration: {0}")]
    ParseError(#[from] serde_json::Error),
}

/// Result type alias for engine operations
pub type EngineResult<T> = Result<T, EngineError>;
