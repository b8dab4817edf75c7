//! Pure simulation logic for Critter.
//!
//! This crate contains all pet rules that are independent of any entity
//! store, clock, or payment backend. Functions take plain data and return
//! results, making them unit-testable and reusable by the engine, the
//! headless harness, and any future host.
//!
//! # Module Overview
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`activity`] | Sleep/work kinds, start checks, lazy resolution of expired activities |
//! | [`config`] | Engine configuration, JSON loading, validation |
//! | [`constants`] | Stat bounds and default tuning values |
//! | [`energy`] | Fixed-point energy with 18 decimal places |
//! | [`feeding`] | Effect of food on nutrition, health, energy, and hunger |
//! | [`hunger`] | Starvation predicate and hunger timers |
//! | [`leveling`] | XP thresholds, cascading level-ups, activity XP rates |
//! | [`resources`] | Energy/health deltas for a completed activity |
//! | [`state`] | Per-pet state blocks shared with the engine |
//! | [`status`] | Derived read model: flags, timers, mood |

pub mod activity;
pub mod config;
pub mod constants;
pub mod energy;
pub mod feeding;
pub mod hunger;
pub mod leveling;
pub mod resources;
pub mod state;
pub mod status;

/// Monotonic simulation tick shared by every pet.
pub type Tick = u64;
