//! Peaking Filter
//!
//! One second-order IIR section boosting or cutting a band around a center
//! frequency. Coefficients come from the `biquad` crate's RBJ (Robert
//! Bristow-Johnson) peaking design; the recurrence runs in Direct Form II
//! Transposed.

use biquad::{Biquad, Coefficients, DirectForm2Transposed, Errors, Hertz, Type};

use crate::error::DspError;

/// Delay-line values below this are flushed to zero
const DENORMAL_THRESHOLD: f32 = 1e-15;

/// Flush tiny values to zero so a decaying tail never reaches subnormals
#[inline(always)]
pub fn flush_denormal(x: f32) -> f32 {
    if x.abs() < DENORMAL_THRESHOLD {
        0.0
    } else {
        x
    }
}

/// Convert dB gain to a linear amplitude factor
/// Formula: amplitude = 10^(dB/20)
#[inline]
pub fn db_to_gain(db: f32) -> f32 {
    10.0_f32.powf(db / 20.0)
}

/// Coefficients of a section that passes its input through unchanged
pub fn unity_coefficients() -> Coefficients<f32> {
    Coefficients {
        a1: 0.0,
        a2: 0.0,
        b0: 1.0,
        b1: 0.0,
        b2: 0.0,
    }
}

/// Compute normalized peaking coefficients
///
/// `gain_factor` is linear (1.0 = flat); the peak height at `frequency`
/// equals `gain_factor`. Designed in f64 and narrowed to f32.
///
/// # Errors
/// Returns an error if the frequency is not strictly between 0 and Nyquist,
/// if `q` is not positive, or if the gain factor is not positive and finite.
pub fn peak_coefficients(
    sample_rate: f32,
    frequency: f32,
    q: f32,
    gain_factor: f32,
) -> Result<Coefficients<f32>, DspError> {
    let fs = Hertz::<f64>::from_hz(sample_rate as f64)
        .map_err(|_| DspError::InvalidSampleRate(sample_rate))?;
    let invalid_frequency = DspError::InvalidCoefficients {
        frequency,
        sample_rate,
    };
    let f0 = Hertz::<f64>::from_hz(frequency as f64).map_err(|_| invalid_frequency)?;

    // from_params lets a band sitting exactly on Nyquist through
    if 2.0 * frequency as f64 >= sample_rate as f64 {
        return Err(invalid_frequency);
    }
    if q.is_nan() || q <= 0.0 {
        return Err(DspError::InvalidQ(q));
    }
    if !gain_factor.is_finite() || gain_factor <= 0.0 {
        return Err(DspError::InvalidGain(gain_factor));
    }

    // biquad's PeakingEQ takes its gain in dB
    let gain_db = 20.0 * (gain_factor as f64).log10();
    let coeffs = Coefficients::<f64>::from_params(Type::PeakingEQ(gain_db), fs, f0, q as f64)
        .map_err(|e| match e {
            Errors::NegativeQ => DspError::InvalidQ(q),
            Errors::OutsideNyquist | Errors::NegativeFrequency => invalid_frequency,
        })?;

    Ok(Coefficients {
        a1: coeffs.a1 as f32,
        a2: coeffs.a2 as f32,
        b0: coeffs.b0 as f32,
        b1: coeffs.b1 as f32,
        b2: coeffs.b2 as f32,
    })
}

/// Magnitude response |H(e^jw)| of a single section at `frequency`
pub fn magnitude_at(coeffs: &Coefficients<f32>, frequency: f32, sample_rate: f32) -> f32 {
    let w = 2.0 * std::f64::consts::PI * frequency as f64 / sample_rate as f64;
    let (cos1, sin1) = (w.cos(), w.sin());
    let (cos2, sin2) = ((2.0 * w).cos(), (2.0 * w).sin());

    // z^-1 = e^{-jw}, z^-2 = e^{-2jw}
    let num_re = coeffs.b0 as f64 + coeffs.b1 as f64 * cos1 + coeffs.b2 as f64 * cos2;
    let num_im = -(coeffs.b1 as f64 * sin1 + coeffs.b2 as f64 * sin2);
    let den_re = 1.0 + coeffs.a1 as f64 * cos1 + coeffs.a2 as f64 * cos2;
    let den_im = -(coeffs.a1 as f64 * sin1 + coeffs.a2 as f64 * sin2);

    let num = (num_re * num_re + num_im * num_im).sqrt();
    let den = (den_re * den_re + den_im * den_im).sqrt();
    (num / den) as f32
}

/// A single peaking section with its own delay line
///
/// Holds the last coefficients applied so callers can inspect them; the
/// delay line survives coefficient updates and is cleared only by `reset()`.
/// Delay-line values under 1e-15 are flushed to zero after every sample.
pub struct PeakingFilter {
    // DirectForm2Transposed: better numerical stability than DF1
    section: DirectForm2Transposed<f32>,
    coeffs: Coefficients<f32>,
}

impl PeakingFilter {
    /// Create a flat (pass-through) section
    pub fn new() -> Self {
        let coeffs = unity_coefficients();
        Self {
            section: DirectForm2Transposed::<f32>::new(coeffs),
            coeffs,
        }
    }

    /// Recompute coefficients for a peak at `frequency`
    ///
    /// Leaves the current coefficients untouched on error.
    pub fn set_peak(
        &mut self,
        sample_rate: f32,
        frequency: f32,
        q: f32,
        gain_factor: f32,
    ) -> Result<(), DspError> {
        let coeffs = peak_coefficients(sample_rate, frequency, q, gain_factor)?;
        self.set_coefficients(coeffs);
        Ok(())
    }

    /// Swap in precomputed coefficients, keeping the delay line
    #[inline]
    pub fn set_coefficients(&mut self, coeffs: Coefficients<f32>) {
        self.section.update_coefficients(coeffs);
        self.coeffs = coeffs;
    }

    pub fn coefficients(&self) -> Coefficients<f32> {
        self.coeffs
    }

    /// Process one sample
    #[inline]
    pub fn run(&mut self, input: f32) -> f32 {
        let output = self.section.run(input);
        self.section.s1 = flush_denormal(self.section.s1);
        self.section.s2 = flush_denormal(self.section.s2);
        output
    }

    /// Process a buffer in place
    #[inline]
    pub fn process_block(&mut self, buffer: &mut [f32]) {
        for sample in buffer.iter_mut() {
            *sample = self.run(*sample);
        }
    }

    /// Clear the delay line
    pub fn reset(&mut self) {
        self.section.reset_state();
    }
}

impl Default for PeakingFilter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FS: f32 = 48000.0;

    fn sine(freq: f32, len: usize) -> Vec<f32> {
        (0..len)
            .map(|i| (2.0 * std::f32::consts::PI * freq * i as f32 / FS).sin() * 0.25)
            .collect()
    }

    fn peak_abs(buffer: &[f32]) -> f32 {
        buffer.iter().fold(0.0_f32, |acc, s| acc.max(s.abs()))
    }

    #[test]
    fn test_db_to_gain() {
        assert_eq!(db_to_gain(0.0), 1.0);
        assert!((db_to_gain(20.0) - 10.0).abs() < 1e-4);
        assert!((db_to_gain(-6.0) - 0.501_187).abs() < 1e-4);
    }

    #[test]
    fn test_unity_gain_is_passthrough() {
        let c = peak_coefficients(FS, 1000.0, 1.4, 1.0).unwrap();
        assert_eq!(c.b0, 1.0);
        assert_eq!(c.b1, c.a1);
        assert_eq!(c.b2, c.a2);

        let mut filter = PeakingFilter::new();
        filter.set_coefficients(c);
        let input = sine(440.0, 512);
        let mut output = input.clone();
        filter.process_block(&mut output);
        assert_eq!(input, output);
    }

    #[test]
    fn test_matches_biquad_design_in_db() {
        use biquad::ToHertz;

        for gain_db in [-12.0_f32, -3.5, 6.0, 12.0] {
            let ours = peak_coefficients(FS, 2000.0, 1.4, db_to_gain(gain_db)).unwrap();
            let reference = Coefficients::<f32>::from_params(
                Type::PeakingEQ(gain_db),
                ToHertz::<f32>::hz(FS),
                ToHertz::<f32>::hz(2000.0_f32),
                1.4,
            )
            .unwrap();

            assert!((ours.b0 - reference.b0).abs() < 1e-5, "b0 at {} dB", gain_db);
            assert!((ours.b1 - reference.b1).abs() < 1e-5, "b1 at {} dB", gain_db);
            assert!((ours.b2 - reference.b2).abs() < 1e-5, "b2 at {} dB", gain_db);
            assert!((ours.a1 - reference.a1).abs() < 1e-5, "a1 at {} dB", gain_db);
            assert!((ours.a2 - reference.a2).abs() < 1e-5, "a2 at {} dB", gain_db);
        }
    }

    #[test]
    fn test_peak_height_matches_gain() {
        let gain = db_to_gain(12.0);
        let c = peak_coefficients(FS, 1000.0, 1.4, gain).unwrap();
        let at_center = magnitude_at(&c, 1000.0, FS);
        assert!((at_center - gain).abs() < 1e-3, "got {}", at_center);

        // Far from the center the section is close to flat
        let far = magnitude_at(&c, 30.0, FS);
        assert!((far - 1.0).abs() < 0.05, "got {}", far);
    }

    #[test]
    fn test_cut_attenuates_center() {
        let c = peak_coefficients(FS, 250.0, 1.4, db_to_gain(-12.0)).unwrap();
        let at_center = magnitude_at(&c, 250.0, FS);
        assert!((at_center - db_to_gain(-12.0)).abs() < 1e-3);
    }

    #[test]
    fn test_rejects_frequency_at_nyquist() {
        let err = peak_coefficients(FS, 24000.0, 1.4, 1.0).unwrap_err();
        assert!(matches!(err, DspError::InvalidCoefficients { .. }));
        assert!(peak_coefficients(32000.0, 16000.0, 1.4, 1.0).is_err());
        assert!(peak_coefficients(FS, 0.0, 1.4, 1.0).is_err());
    }

    #[test]
    fn test_rejects_non_positive_q() {
        assert_eq!(
            peak_coefficients(FS, 1000.0, 0.0, 1.0).unwrap_err(),
            DspError::InvalidQ(0.0)
        );
        assert!(peak_coefficients(FS, 1000.0, -1.0, 1.0).is_err());
        assert!(peak_coefficients(FS, 1000.0, f32::NAN, 1.0).is_err());
    }

    #[test]
    fn test_rejects_non_positive_sample_rate() {
        assert_eq!(
            peak_coefficients(0.0, 1000.0, 1.4, 1.0).unwrap_err(),
            DspError::InvalidSampleRate(0.0)
        );
        assert!(peak_coefficients(-48000.0, 1000.0, 1.4, 1.0).is_err());
    }

    #[test]
    fn test_rejects_bad_gain() {
        assert!(peak_coefficients(FS, 1000.0, 1.4, 0.0).is_err());
        assert!(peak_coefficients(FS, 1000.0, 1.4, f32::INFINITY).is_err());
        assert!(peak_coefficients(FS, 1000.0, 1.4, f32::NAN).is_err());
    }

    #[test]
    fn test_flush_denormal() {
        assert_eq!(flush_denormal(1e-20), 0.0);
        assert_eq!(flush_denormal(-1e-16), 0.0);
        assert_eq!(flush_denormal(f32::MIN_POSITIVE / 2.0), 0.0);
        assert_eq!(flush_denormal(1e-6), 1e-6);
        assert_eq!(flush_denormal(-0.5), -0.5);
    }

    #[test]
    fn test_decay_settles_to_exact_zero() {
        let mut filter = PeakingFilter::new();
        filter.set_peak(FS, 31.25, 1.4, db_to_gain(12.0)).unwrap();

        filter.run(1.0);
        let mut tail = vec![0.0; 48000 * 20];
        filter.process_block(&mut tail);

        assert!(tail.iter().all(|s| !s.is_subnormal()));
        assert_eq!(*tail.last().unwrap(), 0.0);
    }

    #[test]
    fn test_set_peak_error_keeps_coefficients() {
        let mut filter = PeakingFilter::new();
        filter.set_peak(FS, 1000.0, 1.4, 2.0).unwrap();
        let before = filter.coefficients();

        assert!(filter.set_peak(FS, 30000.0, 1.4, 2.0).is_err());
        let after = filter.coefficients();
        assert_eq!(before.b0.to_bits(), after.b0.to_bits());
        assert_eq!(before.a2.to_bits(), after.a2.to_bits());
    }

    #[test]
    fn test_boost_increases_amplitude() {
        let mut filter = PeakingFilter::new();
        filter.set_peak(FS, 1000.0, 1.4, db_to_gain(12.0)).unwrap();

        let input = sine(1000.0, 4800);
        let mut output = input.clone();
        filter.process_block(&mut output);

        // Skip the transient, compare steady state
        let steady_in = peak_abs(&input[2400..]);
        let steady_out = peak_abs(&output[2400..]);
        assert!(
            (steady_out / steady_in - db_to_gain(12.0)).abs() < 0.05,
            "ratio {}",
            steady_out / steady_in
        );
    }

    #[test]
    fn test_run_matches_process_block() {
        let mut a = PeakingFilter::new();
        let mut b = PeakingFilter::new();
        a.set_peak(FS, 125.0, 1.4, 3.0).unwrap();
        b.set_peak(FS, 125.0, 1.4, 3.0).unwrap();

        let input = sine(100.0, 256);
        let mut block = input.clone();
        b.process_block(&mut block);

        for (x, y) in input.iter().zip(block.iter()) {
            assert_eq!(a.run(*x).to_bits(), y.to_bits());
        }
    }

    #[test]
    fn test_reset_clears_delay_line() {
        let mut filter = PeakingFilter::new();
        filter.set_peak(FS, 1000.0, 1.4, 4.0).unwrap();

        let mut fresh = PeakingFilter::new();
        fresh.set_coefficients(filter.coefficients());

        // Build up state, then clear it
        let mut warm = sine(1000.0, 300);
        filter.process_block(&mut warm);
        filter.reset();

        let impulse = [1.0, 0.0, 0.0, 0.0];
        for x in impulse {
            assert_eq!(filter.run(x).to_bits(), fresh.run(x).to_bits());
        }
    }
}
