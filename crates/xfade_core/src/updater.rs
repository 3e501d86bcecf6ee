//! Coefficient Updater
//!
//! Once per block, turns the current gain snapshot into coefficients for
//! all 30 sections. Each (bank, band) is designed once and copied into
//! every channel's cascade for that bank.
//!
//! No smoothing: a knob moving mid-block takes effect at the next block
//! boundary as a single step.

use xfade_dsp::{
    db_to_gain, peak_coefficients, unity_coefficients, Coefficients, DspError, FilterBank, BANDS,
    BAND_Q, NUM_BANDS, NUM_BANKS,
};

use crate::params::{GainHandle, SharedParams};

/// The three cascades (A, B, C) of one channel, indexed by `BankId::index()`
pub type ChannelBanks = [FilterBank; NUM_BANKS];

/// Recomputes filter coefficients from gain parameters
pub struct CoefficientUpdater {
    sample_rate: f32,
    // Resolved once at configure time, indexed [bank][band]
    handles: [[GainHandle; NUM_BANDS]; NUM_BANKS],
}

impl CoefficientUpdater {
    pub fn new(sample_rate: f32) -> Self {
        Self {
            sample_rate,
            handles: GainHandle::all(),
        }
    }

    /// Refresh every section of every channel
    ///
    /// # Real-time Safety
    /// One atomic load per gain, no allocations.
    ///
    /// All 30 sections are designed before any is written, so a failure
    /// leaves every cascade on its previous coefficients.
    ///
    /// # Errors
    /// Only if the sample rate puts a band at or above Nyquist, which
    /// configuration validation rules out.
    pub fn refresh(&self, params: &SharedParams, channels: &mut [ChannelBanks]) -> Result<(), DspError> {
        let mut designed = [[unity_coefficients(); NUM_BANDS]; NUM_BANKS];
        for (row, handles) in designed.iter_mut().zip(&self.handles) {
            for ((coeffs, band), handle) in row.iter_mut().zip(&BANDS).zip(handles) {
                let gain = db_to_gain(params.gain(*handle));
                *coeffs = peak_coefficients(self.sample_rate, band.frequency, BAND_Q, gain)?;
            }
        }

        for banks in channels.iter_mut() {
            for (bank, row) in banks.iter_mut().zip(&designed) {
                install(bank, row)?;
            }
        }
        Ok(())
    }
}

#[inline]
fn install(bank: &mut FilterBank, row: &[Coefficients<f32>; NUM_BANDS]) -> Result<(), DspError> {
    for (band, coeffs) in row.iter().enumerate() {
        bank.set_band_coefficients(band, *coeffs)?;
    }
    Ok(())
}
