//! Crossfade Mixer
//!
//! Maps a single crossfade position x in [-1, 1] to three mix weights:
//!
//! ```text
//!   x = -1        x = 0        x = +1
//!   C only  <-->  A only  <-->  B only
//! ```
//!
//! Weights are linear in x on each side of zero and always sum to 1.

use crate::bands::BankId;

/// Mix weights for banks A, B and C
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MixWeights {
    pub a: f32,
    pub b: f32,
    pub c: f32,
}

impl MixWeights {
    /// Weights with all of the signal on bank A
    pub const CENTER: MixWeights = MixWeights {
        a: 1.0,
        b: 0.0,
        c: 0.0,
    };

    /// Weight applied to `bank`
    #[inline]
    pub fn for_bank(&self, bank: BankId) -> f32 {
        match bank {
            BankId::A => self.a,
            BankId::B => self.b,
            BankId::C => self.c,
        }
    }

    pub fn sum(&self) -> f32 {
        self.a + self.b + self.c
    }
}

impl Default for MixWeights {
    fn default() -> Self {
        Self::CENTER
    }
}

/// Compute mix weights from a crossfade position
///
/// The input is not clamped. Values outside [-1, 1] produce a negative
/// weight for bank A but the formulas stay finite for any finite `x`.
#[inline]
pub fn compute_weights(x: f32) -> MixWeights {
    MixWeights {
        a: 1.0 - x.abs(),
        b: x.max(0.0),
        c: (-x).max(0.0),
    }
}
