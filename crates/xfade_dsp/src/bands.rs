//! Band Definition Table
//!
//! The ten octave-spaced center frequencies shared by every bank and every
//! channel, plus the A/B/C bank identities used to derive parameter ids.

use std::fmt;

/// Number of peaking sections in one cascade
pub const NUM_BANDS: usize = 10;

/// Number of parallel banks (A, B, C)
pub const NUM_BANKS: usize = 3;

/// Fixed quality factor of every band
pub const BAND_Q: f32 = 1.4;

/// Sample rate must stay strictly above this for the top band to sit below Nyquist
pub const MIN_SAMPLE_RATE: f32 = 2.0 * 16000.0;

/// One fixed band of the equalizer
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Band {
    pub index: usize,
    pub frequency: f32,
    /// Parameter id stem, combined with a bank suffix (e.g. `g1k` + `_A`)
    pub id: &'static str,
    /// Display name used by the parameter layout
    pub name: &'static str,
}

impl Band {
    const fn new(index: usize, frequency: f32, id: &'static str, name: &'static str) -> Self {
        Self {
            index,
            frequency,
            id,
            name,
        }
    }
}

/// Band table, ascending in frequency. Cascades run in this order.
pub const BANDS: [Band; NUM_BANDS] = [
    Band::new(0, 31.25, "g31p25", "31.25 Hz"),
    Band::new(1, 62.5, "g62p5", "62.5 Hz"),
    Band::new(2, 125.0, "g125", "125 Hz"),
    Band::new(3, 250.0, "g250", "250 Hz"),
    Band::new(4, 500.0, "g500", "500 Hz"),
    Band::new(5, 1000.0, "g1k", "1 kHz"),
    Band::new(6, 2000.0, "g2k", "2 kHz"),
    Band::new(7, 4000.0, "g4k", "4 kHz"),
    Band::new(8, 8000.0, "g8k", "8 kHz"),
    Band::new(9, 16000.0, "g16k", "16 kHz"),
];

/// Identity of one of the three parallel banks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BankId {
    A,
    B,
    C,
}

impl BankId {
    /// All banks in processing order
    pub const ALL: [BankId; NUM_BANKS] = [BankId::A, BankId::B, BankId::C];

    pub fn index(self) -> usize {
        match self {
            BankId::A => 0,
            BankId::B => 1,
            BankId::C => 2,
        }
    }

    /// Suffix appended to a band id to form a gain parameter id
    pub fn suffix(self) -> &'static str {
        match self {
            BankId::A => "_A",
            BankId::B => "_B",
            BankId::C => "_C",
        }
    }

    /// Suffix appended to a band name to form a display name
    pub fn subscript(self) -> &'static str {
        match self {
            BankId::A => " (A)",
            BankId::B => " (B)",
            BankId::C => " (C)",
        }
    }
}

impl fmt::Display for BankId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            BankId::A => "A",
            BankId::B => "B",
            BankId::C => "C",
        };
        f.write_str(label)
    }
}

/// Gain parameter id for a (band, bank) pair, e.g. `g1k_A`
///
/// Allocates. Only call off the audio thread.
pub fn gain_param_id(band: &Band, bank: BankId) -> String {
    format!("{}{}", band.id, bank.suffix())
}

/// Gain parameter display name for a (band, bank) pair, e.g. `1 kHz (A)`
pub fn gain_param_name(band: &Band, bank: BankId) -> String {
    format!("{}{}", band.name, bank.subscript())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_band_frequencies_ascending() {
        for pair in BANDS.windows(2) {
            assert!(pair[0].frequency < pair[1].frequency);
        }
        assert_eq!(BANDS[0].frequency, 31.25);
        assert_eq!(BANDS[9].frequency, 16000.0);
    }

    #[test]
    fn test_band_indices_match_position() {
        for (i, band) in BANDS.iter().enumerate() {
            assert_eq!(band.index, i);
        }
    }

    #[test]
    fn test_highest_band_below_min_nyquist() {
        assert!(BANDS[NUM_BANDS - 1].frequency * 2.0 <= MIN_SAMPLE_RATE);
    }

    #[test]
    fn test_bank_index_matches_order() {
        for (i, bank) in BankId::ALL.iter().enumerate() {
            assert_eq!(bank.index(), i);
        }
    }

    #[test]
    fn test_gain_param_ids() {
        assert_eq!(gain_param_id(&BANDS[5], BankId::A), "g1k_A");
        assert_eq!(gain_param_id(&BANDS[0], BankId::C), "g31p25_C");
        assert_eq!(gain_param_name(&BANDS[1], BankId::B), "62.5 Hz (B)");
    }

    #[test]
    fn test_gain_param_ids_unique() {
        let mut ids: Vec<String> = BankId::ALL
            .iter()
            .flat_map(|&bank| BANDS.iter().map(move |band| gain_param_id(band, bank)))
            .collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), NUM_BANDS * NUM_BANKS);
    }
}
