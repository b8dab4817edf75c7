//! Stat bounds and default tuning values.
//!
//! Bounds are fixed; everything in [`defaults`] can be overridden through
//! [`crate::config::EngineConfig`].

/// Upper bound for health.
pub const MAX_HEALTH: u8 = 100;

/// Upper bound for energy, in whole units.
pub const MAX_ENERGY_UNITS: u64 = 100;

/// Health a freshly created pet starts with.
pub const STARTING_HEALTH: u8 = MAX_HEALTH;

/// Level a freshly created pet starts at.
pub const STARTING_LEVEL: u32 = 1;

/// Energy is configured in milli-units: 1000 = one whole energy unit.
pub const MILLI_PER_UNIT: u64 = 1_000;

pub mod defaults {
    /// Ticks a pet can go without food before it starves.
    pub const HUNGER_WINDOW: u64 = 300_000;

    /// Nutrition of a newly created pet.
    pub const BASELINE_NUTRITION: u64 = 50;

    /// Energy (whole units) below which a pet counts as tired.
    pub const TIRED_ENERGY_UNITS: u64 = 30;

    /// Energy recovered per tick of sleep at zero nutrition (milli-units).
    pub const SLEEP_ENERGY_MILLI_PER_TICK: u64 = 1_000;

    /// Energy spent per tick of work at zero nutrition (milli-units).
    pub const WORK_ENERGY_MILLI_PER_TICK: u64 = 1_000;

    /// Nutrition at which sleep gain doubles and work cost halves.
    pub const NUTRITION_PIVOT: u64 = 100;

    /// Ticks of sleep per point of health recovered.
    pub const SLEEP_TICKS_PER_HEALTH: u64 = 10;

    /// XP per tick of work.
    pub const WORK_XP_PER_TICK: u64 = 1;

    /// Sleep earns work XP divided by this.
    pub const SLEEP_XP_DIVISOR: u64 = 2;

    /// Health restored per unit of food.
    pub const FEED_HEALTH_PER_UNIT: u64 = 1;

    /// Energy restored per unit of food (milli-units).
    pub const FEED_ENERGY_MILLI_PER_UNIT: u64 = 1_000;
}
