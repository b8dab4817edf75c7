//! Per-pet state blocks.
//!
//! Each block is plain data. The engine stores them as separate ECS
//! components; the pure rules operate on the assembled [`PetState`].

use serde::{Deserialize, Serialize};

use crate::activity::Activity;
use crate::config::EngineConfig;
use crate::constants::{STARTING_HEALTH, STARTING_LEVEL};
use crate::energy::Energy;
use crate::Tick;

/// Bounded resources.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vitals {
    /// `[0, Energy::MAX]`
    pub energy: Energy,
    /// `[0, 100]`
    pub health: u8,
    /// Accumulates from feeding, no upper cap.
    pub nutrition: u64,
}

/// Feeding timestamps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hunger {
    pub last_fed_at: Tick,
    pub hungry_at: Tick,
}

/// Leveling track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Progress {
    pub level: u32,
    pub xp: u64,
}

impl Default for Progress {
    fn default() -> Self {
        Self {
            level: STARTING_LEVEL,
            xp: 0,
        }
    }
}

/// Everything the time-driven rules need to know about one pet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PetState {
    pub vitals: Vitals,
    pub hunger: Hunger,
    pub progress: Progress,
    /// `Some` while the pet is busy.
    pub activity: Option<Activity>,
}

impl PetState {
    /// State of a pet created at `now`.
    pub fn newborn(now: Tick, config: &EngineConfig) -> Self {
        Self {
            vitals: Vitals {
                energy: Energy::MAX,
                health: STARTING_HEALTH,
                nutrition: config.baseline_nutrition,
            },
            hunger: Hunger {
                last_fed_at: now,
                hungry_at: now.saturating_add(config.hunger_window),
            },
            progress: Progress::default(),
            activity: None,
        }
    }

    pub fn is_busy(&self) -> bool {
        self.activity.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn newborn_defaults() {
        let config = EngineConfig::default();
        let state = PetState::newborn(10, &config);
        assert_eq!(state.vitals.energy, Energy::MAX);
        assert_eq!(state.vitals.health, 100);
        assert_eq!(state.vitals.nutrition, 50);
        assert_eq!(state.progress.level, 1);
        assert_eq!(state.progress.xp, 0);
        assert!(!state.is_busy());
        assert_eq!(state.hunger.last_fed_at, 10);
        assert_eq!(state.hunger.hungry_at, 10 + config.hunger_window);
    }

    #[test]
    fn newborn_near_end_of_time_saturates() {
        let state = PetState::newborn(u64::MAX - 1, &EngineConfig::default());
        assert_eq!(state.hunger.hungry_at, u64::MAX);
    }
}
