//! XFade Core - Processing Engine
//!
//! This crate wraps the `xfade_dsp` building blocks into the per-block
//! engine a host drives:
//! - Lock-free parameter storage shared between control and audio threads
//! - Stream configuration with validation and JSON loading
//! - Coefficient updates for all 30 sections once per block
//! - Parallel A/B/C processing with crossfade accumulation
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                     Control Thread                           │
//! │   host automation / UI ──set_gain/set_crossfade──▶ params    │
//! └──────────────────────────────────────────────────────────────┘
//!                              │ AtomicU32 per parameter
//!                              ▼
//! ┌──────────────────────────────────────────────────────────────┐
//! │                      Audio Thread                            │
//! │  updater ──▶ weights ──▶ dry ──▶ banks A/B/C ──▶ Σ w·wet     │
//! │              (Zero allocation in this path)                  │
//! └──────────────────────────────────────────────────────────────┘
//! ```

mod config;
mod error;
mod params;
mod processor;
mod updater;

pub use config::{StreamConfig, MAX_CHANNELS};
pub use error::{EngineError, EngineResult};
pub use params::{
    parameter_layout, resolve, GainHandle, ParamHandle, ParamInfo, SharedParams, CROSSFADE_ID,
    GAIN_MAX_DB, GAIN_MIN_DB,
};
pub use processor::XFadeProcessor;
pub use updater::{ChannelBanks, CoefficientUpdater};

// Re-export DSP types for convenience
pub use xfade_dsp::{compute_weights, BankId, FilterBank, MixWeights, BANDS, NUM_BANDS, NUM_BANKS};
