//! Derived read model for a pet.
//!
//! Everything here is computed from stored state and the current tick;
//! nothing is persisted.

use serde::{Deserialize, Serialize};

use crate::activity::ActivityKind;
use crate::config::EngineConfig;
use crate::energy::Energy;
use crate::hunger::{is_starving, ticks_since_fed, ticks_until_hungry};
use crate::leveling::{level_progress_percent, xp_to_next_level};
use crate::state::PetState;
use crate::Tick;

/// Happiness below which a pet with nothing else going on is sad.
const SAD_BELOW: u8 = 40;

/// Weights of the 0-100 composite scores.
mod weights {
    pub const HUNGRY: i32 = 40;
    pub const TIRED: i32 = 30;
    pub const WORKING: i32 = 20;
    pub const SLEEPING: i32 = 10;
    pub const WELL_FED: i32 = 20;
    pub const HEALTHY: i32 = 20;
    pub const HAS_FRENS: i32 = 15;
    /// Nutrition and health must exceed this to count as well fed or healthy.
    pub const GOOD_STAT: u64 = 50;

    pub const HUNGER_PENALTY: i32 = 60;
    pub const WORK_PENALTY: i32 = 50;
    pub const PER_FREN: usize = 10;
    pub const PER_REQUEST: usize = 5;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Mood {
    Working,
    Sleeping,
    Hungry,
    Tired,
    Sad,
    Happy,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PetStatus {
    pub is_busy: bool,
    pub is_working: bool,
    pub is_sleeping: bool,
    pub is_starving: bool,
    pub is_tired: bool,
    pub ticks_until_free: u64,
    pub ticks_until_hungry: u64,
    pub ticks_since_fed: u64,
    pub age: u64,
    /// `None` when the current level can no longer be left.
    pub xp_to_next_level: Option<u64>,
    pub level_progress_percent: u8,
    /// Overall wellbeing, 0-100.
    pub happiness: u8,
    /// 100 when fed, lower once starving.
    pub hunger: u8,
    /// 100 when idle, lower while working.
    pub work: u8,
    /// Grows with frens and pending requests, capped at 100.
    pub social: u8,
    pub mood: Mood,
}

/// Derive status for a pet born at `born_at` with `frens` mutual frens and
/// `pending` inbound requests. `state` should already be resolved at `now`.
pub fn derive_status(
    state: &PetState,
    born_at: Tick,
    frens: usize,
    pending: usize,
    now: Tick,
    config: &EngineConfig,
) -> PetStatus {
    let kind = state.activity.map(|a| a.kind);
    let is_working = kind == Some(ActivityKind::Work);
    let is_sleeping = kind == Some(ActivityKind::Sleep);
    let is_starving = is_starving(&state.hunger, now);
    let is_tired = state.vitals.energy < Energy::from_units(config.tired_energy_units);

    let flag = |on: bool, weight: i32| if on { weight } else { 0 };
    let happiness = percent(
        100 - flag(is_starving, weights::HUNGRY)
            - flag(is_tired, weights::TIRED)
            - flag(is_working, weights::WORKING)
            - flag(is_sleeping, weights::SLEEPING)
            + flag(state.vitals.nutrition > weights::GOOD_STAT, weights::WELL_FED)
            + flag(u64::from(state.vitals.health) > weights::GOOD_STAT, weights::HEALTHY)
            + flag(frens > 0, weights::HAS_FRENS),
    );
    let social = frens
        .saturating_mul(weights::PER_FREN)
        .saturating_add(pending.saturating_mul(weights::PER_REQUEST))
        .min(100) as u8;

    let mood = if is_working {
        Mood::Working
    } else if is_sleeping {
        Mood::Sleeping
    } else if is_starving {
        Mood::Hungry
    } else if is_tired {
        Mood::Tired
    } else if happiness < SAD_BELOW {
        Mood::Sad
    } else {
        Mood::Happy
    };

    PetStatus {
        is_busy: state.is_busy(),
        is_working,
        is_sleeping,
        is_starving,
        is_tired,
        ticks_until_free: state
            .activity
            .map_or(0, |a| a.free_at.saturating_sub(now)),
        ticks_until_hungry: ticks_until_hungry(&state.hunger, now),
        ticks_since_fed: ticks_since_fed(&state.hunger, now),
        age: now.saturating_sub(born_at),
        xp_to_next_level: xp_to_next_level(&state.progress),
        level_progress_percent: level_progress_percent(&state.progress),
        happiness,
        hunger: percent(100 - flag(is_starving, weights::HUNGER_PENALTY)),
        work: percent(100 - flag(is_working, weights::WORK_PENALTY)),
        social,
        mood,
    }
}

fn percent(score: i32) -> u8 {
    score.clamp(0, 100) as u8
}
