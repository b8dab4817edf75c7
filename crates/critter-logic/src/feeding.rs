//! Effect of a meal.
//!
//! Food raises nutrition without a cap, restores health up to 100 and
//! energy up to the maximum, and always renews the hunger deadline no matter
//! how well-fed the pet already is. Payment and busy checks belong to the
//! caller; this is only the state change.

use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;
use crate::constants::MAX_HEALTH;
use crate::energy::Energy;
use crate::hunger::renew;
use crate::state::PetState;
use crate::Tick;

/// Summary of what a meal changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MealEffect {
    pub nutrition_gained: u64,
    pub health_gained: u8,
    pub energy_gained: Energy,
    pub hungry_at: Tick,
}

/// Apply `food_amount` units of food at `now`.
pub fn apply_food(
    state: &mut PetState,
    food_amount: u64,
    now: Tick,
    config: &EngineConfig,
) -> MealEffect {
    let tuning = &config.tuning;
    let vitals = &mut state.vitals;

    let nutrition_before = vitals.nutrition;
    vitals.nutrition = vitals.nutrition.saturating_add(food_amount);

    let health_before = vitals.health;
    let health_boost = food_amount.saturating_mul(tuning.feed_health_per_unit);
    vitals.health = (vitals.health as u64)
        .saturating_add(health_boost)
        .min(MAX_HEALTH as u64) as u8;

    let energy_before = vitals.energy;
    let energy_boost =
        Energy::from_milli(tuning.feed_energy_milli_per_unit).raw().saturating_mul(food_amount as u128);
    vitals.energy = vitals
        .energy
        .saturating_add(Energy::from_raw(energy_boost))
        .min(Energy::MAX);

    renew(&mut state.hunger, now, config.hunger_window);

    MealEffect {
        nutrition_gained: vitals.nutrition - nutrition_before,
        health_gained: vitals.health - health_before,
        energy_gained: vitals.energy.saturating_sub(energy_before),
        hungry_at: state.hunger.hungry_at,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn meal_on_full_pet_caps_stats() {
        let config = EngineConfig::default();
        let mut pet = PetState::newborn(0, &config);
        let effect = apply_food(&mut pet, 10, 7, &config);

        assert_eq!(pet.vitals.nutrition, 60);
        assert_eq!(pet.vitals.health, 100);
        assert_eq!(pet.vitals.energy, Energy::MAX);
        assert_eq!(effect.health_gained, 0);
        assert_eq!(effect.energy_gained, Energy::ZERO);
        assert_eq!(pet.hunger.last_fed_at, 7);
        assert_eq!(pet.hunger.hungry_at, 7 + config.hunger_window);
    }

    #[test]
    fn meal_restores_depleted_pet() {
        let config = EngineConfig::default();
        let mut pet = PetState::newborn(0, &config);
        pet.vitals.health = 40;
        pet.vitals.energy = Energy::from_units(20);

        let effect = apply_food(&mut pet, 15, 0, &config);
        assert_eq!(pet.vitals.health, 55);
        assert_eq!(pet.vitals.energy, Energy::from_units(35));
        assert_eq!(effect.health_gained, 15);
        assert_eq!(effect.nutrition_gained, 15);
    }

    #[test]
    fn hunger_always_renewed() {
        let config = EngineConfig::default();
        let mut pet = PetState::newborn(0, &config);
        pet.vitals.nutrition = u64::MAX;
        apply_food(&mut pet, 1, 1_000_000, &config);
        assert_eq!(pet.vitals.nutrition, u64::MAX);
        assert_eq!(pet.hunger.hungry_at, 1_000_000 + config.hunger_window);
    }
}
