//! Engine configuration.
//!
//! The exact coefficients behind sleep, work, feeding, and XP are tunables.
//! Only their qualitative shape is fixed: more nutrition never makes an
//! activity leave a pet with less energy. Configuration can be loaded from
//! JSON; missing fields fall back to [`crate::constants::defaults`].
//!
//! ```
//! use critter_logic::config::{validate_config, EngineConfig};
//!
//! let config = EngineConfig::from_json_str(r#"{ "hunger_window": 1000 }"#).unwrap();
//! assert_eq!(config.hunger_window, 1000);
//! assert_eq!(config.baseline_nutrition, 50);
//! assert!(validate_config(&config).is_empty());
//! ```

use serde::{Deserialize, Serialize};

use crate::constants::defaults;

/// Activity and feeding coefficients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub sleep_energy_milli_per_tick: u64,
    pub work_energy_milli_per_tick: u64,
    /// Must be non-zero.
    pub nutrition_pivot: u64,
    /// Must be non-zero.
    pub sleep_ticks_per_health: u64,
    pub work_xp_per_tick: u64,
    /// Must be non-zero.
    pub sleep_xp_divisor: u64,
    pub feed_health_per_unit: u64,
    pub feed_energy_milli_per_unit: u64,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            sleep_energy_milli_per_tick: defaults::SLEEP_ENERGY_MILLI_PER_TICK,
            work_energy_milli_per_tick: defaults::WORK_ENERGY_MILLI_PER_TICK,
            nutrition_pivot: defaults::NUTRITION_PIVOT,
            sleep_ticks_per_health: defaults::SLEEP_TICKS_PER_HEALTH,
            work_xp_per_tick: defaults::WORK_XP_PER_TICK,
            sleep_xp_divisor: defaults::SLEEP_XP_DIVISOR,
            feed_health_per_unit: defaults::FEED_HEALTH_PER_UNIT,
            feed_energy_milli_per_unit: defaults::FEED_ENERGY_MILLI_PER_UNIT,
        }
    }
}

/// Top-level engine configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub tuning: Tuning,
    /// Ticks after the last meal at which a pet starts starving.
    pub hunger_window: u64,
    pub baseline_nutrition: u64,
    pub tired_energy_units: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            tuning: Tuning::default(),
            hunger_window: defaults::HUNGER_WINDOW,
            baseline_nutrition: defaults::BASELINE_NUTRITION,
            tired_energy_units: defaults::TIRED_ENERGY_UNITS,
        }
    }
}

impl EngineConfig {
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json_string(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Configuration validation error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Nutrition pivot of zero would divide by zero.
    ZeroNutritionPivot,
    /// Sleep health divisor of zero.
    ZeroSleepTicksPerHealth,
    /// Sleep XP divisor of zero.
    ZeroSleepXpDivisor,
    /// Pets would be born starving.
    ZeroHungerWindow,
}

/// Validate a configuration, returning all errors found.
pub fn validate_config(config: &EngineConfig) -> Vec<ConfigError> {
    let mut errors = Vec::new();

    if config.tuning.nutrition_pivot == 0 {
        errors.push(ConfigError::ZeroNutritionPivot);
    }
    if config.tuning.sleep_ticks_per_health == 0 {
        errors.push(ConfigError::ZeroSleepTicksPerHealth);
    }
    if config.tuning.sleep_xp_divisor == 0 {
        errors.push(ConfigError::ZeroSleepXpDivisor);
    }
    if config.hunger_window == 0 {
        errors.push(ConfigError::ZeroHungerWindow);
    }

    errors
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(validate_config(&EngineConfig::default()).is_empty());
    }

    #[test]
    fn zero_divisors_rejected() {
        let mut config = EngineConfig::default();
        config.tuning.nutrition_pivot = 0;
        config.tuning.sleep_xp_divisor = 0;
        config.tuning.sleep_ticks_per_health = 0;
        config.hunger_window = 0;
        let errors = validate_config(&config);
        assert_eq!(errors.len(), 4);
        assert!(errors.contains(&ConfigError::ZeroNutritionPivot));
        assert!(errors.contains(&ConfigError::ZeroHungerWindow));
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config =
            EngineConfig::from_json_str(r#"{ "tuning": { "work_xp_per_tick": 4 } }"#).unwrap();
        assert_eq!(config.tuning.work_xp_per_tick, 4);
        assert_eq!(config.tuning.sleep_xp_divisor, 2);
        assert_eq!(config.hunger_window, 300_000);
    }

    #[test]
    fn json_roundtrip() {
        let mut config = EngineConfig::default();
        config.tired_energy_units = 12;
        let json = config.to_json_string().unwrap();
        assert_eq!(EngineConfig::from_json_str(&json).unwrap(), config);
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(EngineConfig::from_json_str("{ not json").is_err());
    }
}
