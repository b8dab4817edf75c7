//! Component definitions for the pet store.
//!
//! Components are pure data structs attached to pet entities.
//! They have no behavior beyond small helpers - rules live in systems
//! and in `critter-logic`.

mod pet;
mod social;

pub use pet::*;
pub use social::*;

pub use critter_logic::activity::{Activity, ActivityKind};
pub use critter_logic::state::{Hunger, Progress, Vitals};
