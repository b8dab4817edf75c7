//! Critter Core - Persistent Digital-Pet Engine
//!
//! A deterministic simulation of owned pets with bounded vitals, timed
//! activities, a starvation gate, paid feeding, leveling, and a fren graph.
//!
//! # Architecture
//!
//! The store uses an Entity Component System (ECS) via `hecs`:
//! - **Entities**: one per pet, indexed by a stable `PetId`
//! - **Components**: pure data (`Pet`, `Vitals`, `Hunger`, `Progress`, `Frens`, `Activity`)
//! - **Systems**: free functions that load a working copy, check, mutate, and commit
//!
//! Nothing runs in the background. An activity that has ended is settled by
//! whichever operation touches the pet next.
//!
//! # Example
//!
//! ```rust
//! use critter_core::prelude::*;
//!
//! let mut engine = PetEngine::new(ManualClock::new(0), FreeFood);
//! let alice = Identity::new("alice");
//! let pet = engine.create(alice.clone()).unwrap();
//!
//! engine.put_to_sleep(pet, &alice, 6).unwrap();
//! engine.clock().advance(6);
//!
//! let view = engine.get_attributes(pet).unwrap();
//! assert_eq!(view.record.state.progress.level, 2);
//! ```

pub mod access;
pub mod components;
pub mod engine;
pub mod error;
pub mod payment;
pub mod persistence;
pub mod store;
pub mod systems;
pub mod time;

/// Commonly used types for convenient importing
pub mod prelude {
    pub use crate::components::*;
    pub use crate::engine::PetEngine;
    pub use crate::error::PetError;
    pub use crate::payment::{FreeFood, LedgerPayments, PaymentChannel, PaymentError};
    pub use crate::store::{PetRecord, PetStore};
    pub use crate::systems::PetView;
    pub use crate::time::{ManualClock, TimeSource};
}
