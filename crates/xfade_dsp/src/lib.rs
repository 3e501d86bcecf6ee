//! XFade DSP - Digital Signal Processing Module
//!
//! This crate provides the signal path building blocks for XFade EQ:
//! - Fixed table of 10 octave-spaced bands shared by banks A, B and C
//! - RBJ peaking sections on top of `biquad` Direct Form II Transposed
//! - 10-band cascades with a fixed ascending processing order
//! - Crossfade weights blending the three banks
//!
//! # Architecture
//!
//! Nothing here allocates after construction. Coefficients are replaced
//! between blocks; delay lines persist until an explicit `reset()`.

mod bands;
mod bank;
mod crossfade;
mod error;
mod peak;

pub use bands::{
    gain_param_id, gain_param_name, Band, BankId, BANDS, BAND_Q, MIN_SAMPLE_RATE, NUM_BANDS,
    NUM_BANKS,
};
pub use bank::FilterBank;
pub use crossfade::{compute_weights, MixWeights};
pub use error::DspError;
pub use peak::{db_to_gain, magnitude_at, peak_coefficients, unity_coefficients, PeakingFilter};

// Re-export so callers can hold coefficients without depending on biquad directly
pub use biquad::Coefficients;
