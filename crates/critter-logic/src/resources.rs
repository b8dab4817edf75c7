//! Energy and health deltas for a completed activity.
//!
//! Sleep restores energy, amplified by nutrition. Work spends energy,
//! damped by nutrition. Sleep also recovers a little health.
//!
//! Coefficients come from [`Tuning`]; the fixed contract is monotonicity:
//! for equal duration and kind, a pet with more nutrition never ends with
//! less energy. Saturating multiplication keeps that ordering even for
//! absurd durations.

use serde::{Deserialize, Serialize};

use crate::activity::ActivityKind;
use crate::config::Tuning;
use crate::constants::MAX_HEALTH;
use crate::energy::{to_signed, Energy};
use crate::state::Vitals;

/// Signed change to a pet's vitals.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceDelta {
    /// Raw fixed-point energy change.
    pub energy: i128,
    pub health: i64,
}

/// Compute the vitals change for `duration` ticks of `kind` at `nutrition`.
pub fn compute_delta(
    kind: ActivityKind,
    duration: u64,
    nutrition: u64,
    tuning: &Tuning,
) -> ResourceDelta {
    // Tuning is validated non-zero; max(1) keeps a bad config from panicking.
    let pivot = tuning.nutrition_pivot.max(1) as u128;
    let fed_pivot = pivot + nutrition as u128;

    match kind {
        ActivityKind::Sleep => {
            let base = (duration as u128)
                .saturating_mul(Energy::from_milli(tuning.sleep_energy_milli_per_tick).raw());
            let gain = base.saturating_mul(fed_pivot) / pivot;
            let health = duration / tuning.sleep_ticks_per_health.max(1);
            ResourceDelta {
                energy: to_signed(gain),
                health: i64::try_from(health).unwrap_or(i64::MAX),
            }
        }
        ActivityKind::Work => {
            let base = (duration as u128)
                .saturating_mul(Energy::from_milli(tuning.work_energy_milli_per_tick).raw());
            let cost = base.saturating_mul(pivot) / fed_pivot;
            ResourceDelta {
                energy: -to_signed(cost),
                health: 0,
            }
        }
    }
}

/// Apply a delta, clamping energy to `[0, MAX]` and health to `[0, 100]`.
pub fn apply_delta(vitals: &mut Vitals, delta: ResourceDelta) {
    vitals.energy = vitals.energy.apply_signed(delta.energy, Energy::MAX);
    vitals.health = (vitals.health as i64)
        .saturating_add(delta.health)
        .clamp(0, MAX_HEALTH as i64) as u8;
}
