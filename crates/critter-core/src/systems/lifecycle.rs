//! Lifecycle system - birth, death, and the projected read model

use critter_logic::activity::resolve;
use critter_logic::config::EngineConfig;
use critter_logic::status::{derive_status, PetStatus};
use critter_logic::Tick;
use serde::{Deserialize, Serialize};

use crate::access::ensure_owner;
use crate::components::{Identity, PetId};
use crate::error::PetError;
use crate::store::{PetRecord, PetStore};

/// A pet as it looks at a given tick.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PetView {
    /// Stored state with any expired activity settled.
    pub record: PetRecord,
    pub status: PetStatus,
}

pub fn create(
    store: &mut PetStore,
    config: &EngineConfig,
    now: Tick,
    owner: Identity,
) -> Result<PetId, PetError> {
    let id = store.create(owner, now, config)?;
    log::info!("Pet {} born at tick {}", id, now);
    Ok(id)
}

/// Remove a pet. Only its owner may do this; other pets forget it.
pub fn destroy(store: &mut PetStore, id: PetId, caller: &Identity) -> Result<PetRecord, PetError> {
    let pet = store.load(id)?;
    ensure_owner(&pet, caller)?;
    let removed = store.remove(id)?;
    log::info!("Pet {} destroyed by {}", id, caller);
    Ok(removed)
}

/// Read a pet at `now`. Expired activities are settled in the returned view
/// only; the store is left as is.
pub fn get_attributes(
    store: &PetStore,
    config: &EngineConfig,
    now: Tick,
    id: PetId,
) -> Result<PetView, PetError> {
    let mut record = store.load(id)?;
    let (state, _) = resolve(record.state, now, &config.tuning);
    record.state = state;
    let status = derive_status(
        &record.state,
        record.born_at,
        record.frens.frens.len(),
        record.frens.potential.len(),
        now,
        config,
    );
    Ok(PetView { record, status })
}
