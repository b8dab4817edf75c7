//! Timed activities and their lazy resolution.
//!
//! A pet is busy while it carries an [`Activity`]. Nothing runs in the
//! background: an expired activity is only settled when some operation
//! calls [`resolve`] with the current tick. Resolution applies the resource
//! delta and XP for the activity's full scheduled duration and clears the
//! busy lock. Resolving an already-resolved state is a no-op.
//!
//! ```
//! use critter_logic::activity::{resolve, start, ActivityKind};
//! use critter_logic::config::EngineConfig;
//! use critter_logic::state::PetState;
//!
//! let config = EngineConfig::default();
//! let mut pet = PetState::newborn(0, &config);
//! start(&mut pet, ActivityKind::Work, 0, 50).unwrap();
//!
//! let (still_busy, nothing) = resolve(pet.clone(), 49, &config.tuning);
//! assert!(still_busy.is_busy() && nothing.is_none());
//!
//! let (done, settled) = resolve(pet, 50, &config.tuning);
//! assert!(!done.is_busy());
//! assert_eq!(settled.unwrap().xp_awarded, 50);
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::Tuning;
use crate::hunger::is_starving;
use crate::leveling::{activity_xp, award_xp};
use crate::resources::{apply_delta, compute_delta, ResourceDelta};
use crate::state::PetState;
use crate::Tick;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActivityKind {
    Sleep,
    Work,
}

impl fmt::Display for ActivityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActivityKind::Sleep => write!(f, "sleep"),
            ActivityKind::Work => write!(f, "work"),
        }
    }
}

/// An activity in progress. `free_at > started_at` always holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Activity {
    pub kind: ActivityKind,
    pub started_at: Tick,
    pub free_at: Tick,
}

impl Activity {
    pub fn duration(&self) -> u64 {
        self.free_at.saturating_sub(self.started_at)
    }

    pub fn is_complete(&self, now: Tick) -> bool {
        now >= self.free_at
    }
}

/// What settling one expired activity did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resolution {
    pub kind: ActivityKind,
    pub duration: u64,
    pub delta: ResourceDelta,
    pub xp_awarded: u64,
    pub levels_gained: u32,
    pub resolved_at: Tick,
}

/// Settle the pet's activity if it has expired by `now`.
pub fn resolve(mut state: PetState, now: Tick, tuning: &Tuning) -> (PetState, Option<Resolution>) {
    let resolution = resolve_in_place(&mut state, now, tuning);
    (state, resolution)
}

/// In-place form of [`resolve`].
pub fn resolve_in_place(state: &mut PetState, now: Tick, tuning: &Tuning) -> Option<Resolution> {
    let activity = state.activity.filter(|a| a.is_complete(now))?;
    let duration = activity.duration();

    let delta = compute_delta(activity.kind, duration, state.vitals.nutrition, tuning);
    apply_delta(&mut state.vitals, delta);

    let xp_awarded = activity_xp(activity.kind, duration, tuning);
    let levels_gained = award_xp(&mut state.progress, xp_awarded);

    state.activity = None;

    Some(Resolution {
        kind: activity.kind,
        duration,
        delta,
        xp_awarded,
        levels_gained,
        resolved_at: activity.free_at,
    })
}

/// Why a new activity cannot start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartRejection {
    /// Duration of zero ticks.
    ZeroDuration,
    /// `now + duration` does not fit in a tick.
    DurationOverflow,
    /// Still busy until the given tick.
    Busy { free_at: Tick },
    /// Starving since the given tick.
    Starving { hungry_at: Tick },
}

/// Check whether an already-resolved pet may start `duration` ticks of
/// activity at `now`. Returns the tick the pet would be free again.
pub fn check_start(state: &PetState, now: Tick, duration: u64) -> Result<Tick, StartRejection> {
    if duration == 0 {
        return Err(StartRejection::ZeroDuration);
    }
    let free_at = now
        .checked_add(duration)
        .ok_or(StartRejection::DurationOverflow)?;
    if let Some(activity) = state.activity {
        return Err(StartRejection::Busy {
            free_at: activity.free_at,
        });
    }
    if is_starving(&state.hunger, now) {
        return Err(StartRejection::Starving {
            hungry_at: state.hunger.hungry_at,
        });
    }
    Ok(free_at)
}

/// Start an activity on an already-resolved pet.
pub fn start(
    state: &mut PetState,
    kind: ActivityKind,
    now: Tick,
    duration: u64,
) -> Result<Activity, StartRejection> {
    let free_at = check_start(state, now, duration)?;
    let activity = Activity {
        kind,
        started_at: now,
        free_at,
    };
    state.activity = Some(activity);
    Ok(activity)
}
