//! Parameter Surface
//!
//! Host-owned parameter storage shared between the control thread and the
//! audio thread. Every value lives in its own atomic cell, so a read is a
//! single relaxed load; no cross-parameter consistency is attempted.
//!
//! String ids are resolved to handles once, off the audio thread. The audio
//! thread only ever sees handles.

use std::sync::atomic::{AtomicU32, Ordering};

use serde::{Deserialize, Serialize};
use tracing::debug;
use xfade_dsp::{gain_param_id, gain_param_name, BankId, BANDS, NUM_BANDS, NUM_BANKS};

use crate::error::{EngineError, EngineResult};

/// Id of the crossfade control
pub const CROSSFADE_ID: &str = "xFader";

/// Display name of the crossfade control
pub const CROSSFADE_NAME: &str = "XFader";

pub const GAIN_MIN_DB: f32 = -12.0;
pub const GAIN_MAX_DB: f32 = 12.0;
pub const GAIN_DEFAULT_DB: f32 = 0.0;

pub const CROSSFADE_MIN: f32 = -1.0;
pub const CROSSFADE_MAX: f32 = 1.0;
pub const CROSSFADE_DEFAULT: f32 = 0.0;

const NUM_GAINS: usize = NUM_BANDS * NUM_BANKS;

/// Pre-resolved reference to one (band, bank) gain cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GainHandle {
    band: usize,
    bank: BankId,
}

impl GainHandle {
    pub fn new(band: usize, bank: BankId) -> Option<Self> {
        (band < NUM_BANDS).then_some(Self { band, bank })
    }

    pub fn band(&self) -> usize {
        self.band
    }

    pub fn bank(&self) -> BankId {
        self.bank
    }

    /// Every handle, indexed `[bank][band]`
    pub fn all() -> [[GainHandle; NUM_BANDS]; NUM_BANKS] {
        core::array::from_fn(|bank| {
            core::array::from_fn(|band| GainHandle {
                band,
                bank: BankId::ALL[bank],
            })
        })
    }

    #[inline]
    fn slot(&self) -> usize {
        self.bank.index() * NUM_BANDS + self.band
    }
}

/// Any parameter the core reads
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamHandle {
    Crossfade,
    Gain(GainHandle),
}

/// Declarative description of one parameter, for exposing controls to a host
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParamInfo {
    pub id: String,
    pub name: String,
    pub min: f32,
    pub max: f32,
    pub default: f32,
}

/// Build the full parameter layout: the crossfade first, then 30 gains bank by bank
///
/// Allocates. Only call during setup.
pub fn parameter_layout() -> Vec<ParamInfo> {
    let mut layout = Vec::with_capacity(NUM_GAINS + 1);
    layout.push(ParamInfo {
        id: CROSSFADE_ID.to_string(),
        name: CROSSFADE_NAME.to_string(),
        min: CROSSFADE_MIN,
        max: CROSSFADE_MAX,
        default: CROSSFADE_DEFAULT,
    });

    for bank in BankId::ALL {
        for band in &BANDS {
            layout.push(ParamInfo {
                id: gain_param_id(band, bank),
                name: gain_param_name(band, bank),
                min: GAIN_MIN_DB,
                max: GAIN_MAX_DB,
                default: GAIN_DEFAULT_DB,
            });
        }
    }

    debug!("Built parameter layout with {} entries", layout.len());
    layout
}

/// Resolve a string id to a handle
pub fn resolve(id: &str) -> EngineResult<ParamHandle> {
    if id == CROSSFADE_ID {
        return Ok(ParamHandle::Crossfade);
    }

    for bank in BankId::ALL {
        let Some(stem) = id.strip_suffix(bank.suffix()) else {
            continue;
        };
        if let Some(band) = BANDS.iter().find(|b| b.id == stem) {
            debug!("Resolved parameter '{}' to band {} bank {}", id, band.index, bank);
            return Ok(ParamHandle::Gain(GainHandle {
                band: band.index,
                bank,
            }));
        }
    }

    Err(EngineError::UnknownParameter(id.to_string()))
}

/// Keep a value inside its declared range; NaN falls back to the default
fn sanitize(value: f32, min: f32, max: f32, default: f32) -> f32 {
    if value.is_nan() {
        default
    } else {
        value.clamp(min, max)
    }
}

/// Lock-free parameter storage shared between control and audio threads
///
/// Rust pattern: AtomicF32 doesn't exist, so values are stored as f32 bits
/// in `AtomicU32` cells.
pub struct SharedParams {
    gain_bits: [AtomicU32; NUM_GAINS],
    crossfade_bits: AtomicU32,
}

impl SharedParams {
    /// Create storage with every parameter at its default
    pub fn new() -> Self {
        Self {
            gain_bits: core::array::from_fn(|_| AtomicU32::new(GAIN_DEFAULT_DB.to_bits())),
            crossfade_bits: AtomicU32::new(CROSSFADE_DEFAULT.to_bits()),
        }
    }

    /// Set a gain in dB, clamped to [-12, 12]
    pub fn set_gain(&self, handle: GainHandle, gain_db: f32) {
        let value = sanitize(gain_db, GAIN_MIN_DB, GAIN_MAX_DB, GAIN_DEFAULT_DB);
        self.gain_bits[handle.slot()].store(value.to_bits(), Ordering::Relaxed);
    }

    /// Current gain in dB
    #[inline]
    pub fn gain(&self, handle: GainHandle) -> f32 {
        f32::from_bits(self.gain_bits[handle.slot()].load(Ordering::Relaxed))
    }

    /// Set the crossfade position, clamped to [-1, 1]
    pub fn set_crossfade(&self, position: f32) {
        let value = sanitize(position, CROSSFADE_MIN, CROSSFADE_MAX, CROSSFADE_DEFAULT);
        self.crossfade_bits.store(value.to_bits(), Ordering::Relaxed);
    }

    /// Current crossfade position
    #[inline]
    pub fn crossfade(&self) -> f32 {
        f32::from_bits(self.crossfade_bits.load(Ordering::Relaxed))
    }

    /// Set any parameter through a handle
    pub fn set(&self, handle: ParamHandle, value: f32) {
        match handle {
            ParamHandle::Crossfade => self.set_crossfade(value),
            ParamHandle::Gain(gain) => self.set_gain(gain, value),
        }
    }

    /// Read any parameter through a handle
    pub fn get(&self, handle: ParamHandle) -> f32 {
        match handle {
            ParamHandle::Crossfade => self.crossfade(),
            ParamHandle::Gain(gain) => self.gain(gain),
        }
    }

    /// Set a parameter by its string id
    ///
    /// Resolves the id on every call. Not for the audio thread.
    pub fn set_by_id(&self, id: &str, value: f32) -> EngineResult<()> {
        self.set(resolve(id)?, value);
        Ok(())
    }

    /// Set all ten gains of one bank
    pub fn set_bank_gains(&self, bank: BankId, gains_db: &[f32; NUM_BANDS]) {
        for (band, gain_db) in gains_db.iter().enumerate() {
            self.set_gain(GainHandle { band, bank }, *gain_db);
        }
    }

    /// Read all ten gains of one bank, one atomic load each
    #[inline]
    pub fn gains_snapshot(&self, bank: BankId) -> [f32; NUM_BANDS] {
        core::array::from_fn(|band| self.gain(GainHandle { band, bank }))
    }

    /// Put every parameter back at its default
    pub fn reset_to_defaults(&self) {
        for cell in &self.gain_bits {
            cell.store(GAIN_DEFAULT_DB.to_bits(), Ordering::Relaxed);
        }
        self.crossfade_bits
            .store(CROSSFADE_DEFAULT.to_bits(), Ordering::Relaxed);
    }
}

impl Default for SharedParams {
    fn default() -> Self {
        Self::new()
    }
}
