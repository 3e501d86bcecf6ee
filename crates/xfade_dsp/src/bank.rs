//! 10-Band Filter Bank
//!
//! A fixed-order cascade of peaking sections for one (bank, channel) pair.
//! The signal passes band 0 -> band 9; the order is part of the contract.

use biquad::Coefficients;

use crate::bands::{BANDS, BAND_Q, NUM_BANDS};
use crate::error::DspError;
use crate::peak::{db_to_gain, magnitude_at, PeakingFilter};

/// Cascade of ten peaking sections
///
/// Designed for real-time use: no allocations in `process()`.
pub struct FilterBank {
    filters: [PeakingFilter; NUM_BANDS],
}

impl FilterBank {
    /// Create a flat cascade
    pub fn new() -> Self {
        Self {
            filters: core::array::from_fn(|_| PeakingFilter::new()),
        }
    }

    /// Recompute all ten sections from gains in dB
    ///
    /// Stops at the first band that fails; earlier bands keep their new
    /// coefficients, later ones keep the old ones.
    pub fn set_gains(&mut self, sample_rate: f32, gains_db: &[f32; NUM_BANDS]) -> Result<(), DspError> {
        for (filter, (band, gain_db)) in self.filters.iter_mut().zip(BANDS.iter().zip(gains_db)) {
            filter.set_peak(sample_rate, band.frequency, BAND_Q, db_to_gain(*gain_db))?;
        }
        Ok(())
    }

    /// Install precomputed coefficients for one band
    ///
    /// Lets a caller compute a band once and share it across channels.
    #[inline]
    pub fn set_band_coefficients(&mut self, band_index: usize, coeffs: Coefficients<f32>) -> Result<(), DspError> {
        let filter = self
            .filters
            .get_mut(band_index)
            .ok_or(DspError::InvalidBandIndex(band_index))?;
        filter.set_coefficients(coeffs);
        Ok(())
    }

    /// Current coefficients of one band
    pub fn coefficients(&self, band_index: usize) -> Result<Coefficients<f32>, DspError> {
        self.filters
            .get(band_index)
            .map(PeakingFilter::coefficients)
            .ok_or(DspError::InvalidBandIndex(band_index))
    }

    /// Run one sample through all bands in ascending order
    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        self.filters
            .iter_mut()
            .fold(input, |sample, filter| filter.run(sample))
    }

    /// Run a buffer through the cascade in place
    ///
    /// # Real-time Safety
    /// No allocations. O(n) where n = buffer length.
    #[inline]
    pub fn process_block(&mut self, buffer: &mut [f32]) {
        for sample in buffer.iter_mut() {
            *sample = self.process(*sample);
        }
    }

    /// Combined magnitude response of the cascade at `frequency`
    pub fn magnitude_at(&self, frequency: f32, sample_rate: f32) -> f32 {
        self.filters
            .iter()
            .map(|f| magnitude_at(&f.coefficients(), frequency, sample_rate))
            .product()
    }

    /// Reset filter state (clear delay lines)
    ///
    /// Only called when the processing configuration changes.
    pub fn reset(&mut self) {
        for filter in self.filters.iter_mut() {
            filter.reset();
        }
    }
}

impl Default for FilterBank {
    fn default() -> Self {
        Self::new()
    }
}
