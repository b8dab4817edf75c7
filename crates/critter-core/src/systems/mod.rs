//! Systems - operations that load, check, mutate, and commit pets
//!
//! Every system takes the store, the engine config, and the current tick
//! explicitly. Mutating systems settle any expired activity on their working
//! copies before checking preconditions.

mod activity;
mod feeding;
mod lifecycle;
mod social;

pub use activity::*;
pub use feeding::*;
pub use lifecycle::*;
pub use social::*;
