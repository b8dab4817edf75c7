//! Fixed-point energy.
//!
//! Energy is stored as a raw `u128` with 18 decimal places, so one whole
//! unit is `10^18` raw. All arithmetic saturates; bounds are applied with
//! [`Energy::apply_signed`].
//!
//! ```
//! use critter_logic::energy::Energy;
//!
//! let e = Energy::from_units(42);
//! assert_eq!(e.whole_units(), 42);
//! assert_eq!(Energy::MAX.whole_units(), 100);
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::{MAX_ENERGY_UNITS, MILLI_PER_UNIT};

/// Raw value of one whole energy unit.
pub const ENERGY_SCALE: u128 = 1_000_000_000_000_000_000;

/// Raw value of one milli-unit.
const MILLI_SCALE: u128 = ENERGY_SCALE / MILLI_PER_UNIT as u128;

/// Fixed-point energy amount.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Energy(u128);

impl Energy {
    pub const ZERO: Energy = Energy(0);
    pub const MAX: Energy = Energy(MAX_ENERGY_UNITS as u128 * ENERGY_SCALE);

    pub const fn from_raw(raw: u128) -> Self {
        Self(raw)
    }

    pub const fn raw(self) -> u128 {
        self.0
    }

    pub fn from_units(units: u64) -> Self {
        Self((units as u128).saturating_mul(ENERGY_SCALE))
    }

    pub fn from_milli(milli: u64) -> Self {
        Self((milli as u128).saturating_mul(MILLI_SCALE))
    }

    /// Whole units, truncating the fractional part.
    pub fn whole_units(self) -> u64 {
        u64::try_from(self.0 / ENERGY_SCALE).unwrap_or(u64::MAX)
    }

    pub fn saturating_add(self, other: Energy) -> Energy {
        Energy(self.0.saturating_add(other.0))
    }

    pub fn saturating_sub(self, other: Energy) -> Energy {
        Energy(self.0.saturating_sub(other.0))
    }

    /// Apply a signed raw delta, clamping the result to `[0, max]`.
    pub fn apply_signed(self, delta: i128, max: Energy) -> Energy {
        let moved = if delta >= 0 {
            self.0.saturating_add(delta.unsigned_abs())
        } else {
            self.0.saturating_sub(delta.unsigned_abs())
        };
        Energy(moved.min(max.0))
    }
}

impl fmt::Display for Energy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let whole = self.0 / ENERGY_SCALE;
        let hundredths = (self.0 % ENERGY_SCALE) / (ENERGY_SCALE / 100);
        write!(f, "{}.{:02}", whole, hundredths)
    }
}

/// Convert an unsigned raw amount to a signed delta, saturating at `i128::MAX`.
pub(crate) fn to_signed(raw: u128) -> i128 {
    i128::try_from(raw).unwrap_or(i128::MAX)
}
