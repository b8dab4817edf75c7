//! Activity system - busy lock, lazy resolution, sleep and work

use critter_logic::activity::{resolve_in_place, start, ActivityKind, Resolution};
use critter_logic::config::EngineConfig;
use critter_logic::Tick;

use crate::access::ensure_owner;
use crate::components::{Identity, PetId};
use crate::error::PetError;
use crate::store::{PetRecord, PetStore};

/// Settle an expired activity on a working copy.
pub(crate) fn settle(pet: &mut PetRecord, now: Tick, config: &EngineConfig) -> Option<Resolution> {
    let resolution = resolve_in_place(&mut pet.state, now, &config.tuning)?;

    log::debug!(
        "Pet {} finished {} ({} ticks): energy {}, health {}, +{} xp",
        pet.id,
        resolution.kind,
        resolution.duration,
        pet.state.vitals.energy,
        pet.state.vitals.health,
        resolution.xp_awarded
    );
    if resolution.levels_gained > 0 {
        log::info!(
            "Pet {} reached level {} (+{})",
            pet.id,
            pet.state.progress.level,
            resolution.levels_gained
        );
    }
    Some(resolution)
}

/// Commit any expired activity for `id`. Not owner-gated; never changes
/// anything observable through [`crate::systems::get_attributes`].
pub fn resolve_pet(
    store: &mut PetStore,
    config: &EngineConfig,
    now: Tick,
    id: PetId,
) -> Result<Option<Resolution>, PetError> {
    let mut pet = store.load(id)?;
    let resolution = settle(&mut pet, now, config);
    if resolution.is_some() {
        store.commit(&pet)?;
    }
    Ok(resolution)
}

pub fn put_to_sleep(
    store: &mut PetStore,
    config: &EngineConfig,
    now: Tick,
    id: PetId,
    caller: &Identity,
    duration: u64,
) -> Result<PetRecord, PetError> {
    begin_activity(store, config, now, id, caller, ActivityKind::Sleep, duration)
}

pub fn put_to_work(
    store: &mut PetStore,
    config: &EngineConfig,
    now: Tick,
    id: PetId,
    caller: &Identity,
    duration: u64,
) -> Result<PetRecord, PetError> {
    begin_activity(store, config, now, id, caller, ActivityKind::Work, duration)
}

fn begin_activity(
    store: &mut PetStore,
    config: &EngineConfig,
    now: Tick,
    id: PetId,
    caller: &Identity,
    kind: ActivityKind,
    duration: u64,
) -> Result<PetRecord, PetError> {
    let mut pet = store.load(id)?;
    ensure_owner(&pet, caller)?;

    settle(&mut pet, now, config);
    let activity = start(&mut pet.state, kind, now, duration)
        .map_err(|rejection| PetError::from_rejection(id, rejection))?;

    store.commit(&pet)?;
    log::info!(
        "Pet {} started {} at tick {}, free at {}",
        id,
        kind,
        now,
        activity.free_at
    );
    Ok(pet)
}
