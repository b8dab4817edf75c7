//! Pet store - the authoritative entity table.
//!
//! Pets live in a `hecs::World`, one entity per pet, with their state split
//! across components (`Pet`, `Vitals`, `Hunger`, `Progress`, `Frens`, and an
//! `Activity` that is only present while the pet is busy). A `PetId` index
//! maps stable ids to ECS entities.
//!
//! Systems never edit components in place. They [`load`](PetStore::load) an
//! owned [`PetRecord`], work on the copy, and [`commit`](PetStore::commit) it
//! only once every precondition has passed, so a failed operation leaves the
//! store untouched.

use std::collections::BTreeMap;

use critter_logic::config::EngineConfig;
use critter_logic::constants::MAX_HEALTH;
use critter_logic::energy::Energy;
use critter_logic::leveling::xp_threshold;
use critter_logic::state::PetState;
use critter_logic::Tick;
use hecs::{Entity, World};
use serde::{Deserialize, Serialize};

use crate::components::*;
use crate::error::PetError;

/// Owned working copy of one pet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PetRecord {
    pub id: PetId,
    pub owner: Identity,
    pub born_at: Tick,
    pub state: PetState,
    pub frens: Frens,
}

impl PetRecord {
    pub fn is_busy(&self) -> bool {
        self.state.is_busy()
    }
}

pub struct PetStore {
    world: World,
    index: BTreeMap<PetId, Entity>,
    /// Highest id ever issued; ids are never reused.
    last_id: u64,
}

impl PetStore {
    pub fn new() -> Self {
        Self {
            world: World::new(),
            index: BTreeMap::new(),
            last_id: 0,
        }
    }

    /// Allocate a pet for `owner`, born at `now`.
    pub fn create(&mut self, owner: Identity, now: Tick, config: &EngineConfig) -> Result<PetId, PetError> {
        let next = self
            .last_id
            .checked_add(1)
            .ok_or_else(|| PetError::InvalidRequest("pet id space exhausted".into()))?;
        self.last_id = next;
        let id = PetId(next);
        let state = PetState::newborn(now, config);

        let entity = self.world.spawn((
            Pet {
                id,
                owner,
                born_at: now,
            },
            state.vitals,
            state.hunger,
            state.progress,
            Frens::default(),
        ));
        self.index.insert(id, entity);
        Ok(id)
    }

    /// Snapshot a pet into an owned record.
    pub fn load(&self, id: PetId) -> Result<PetRecord, PetError> {
        let entity = self.entity(id)?;
        let mut query = self
            .world
            .query_one::<(&Pet, &Vitals, &Hunger, &Progress, &Frens, Option<&Activity>)>(entity)
            .map_err(|_| PetError::NotFound(id))?;
        let (pet, vitals, hunger, progress, frens, activity) =
            query.get().ok_or(PetError::NotFound(id))?;

        Ok(PetRecord {
            id: pet.id,
            owner: pet.owner.clone(),
            born_at: pet.born_at,
            state: PetState {
                vitals: *vitals,
                hunger: *hunger,
                progress: *progress,
                activity: activity.copied(),
            },
            frens: frens.clone(),
        })
    }

    /// Write a record's mutable state back to its entity.
    pub fn commit(&mut self, record: &PetRecord) -> Result<(), PetError> {
        let entity = self.entity(record.id)?;
        self.world
            .insert(
                entity,
                (
                    record.state.vitals,
                    record.state.hunger,
                    record.state.progress,
                    record.frens.clone(),
                ),
            )
            .map_err(|_| PetError::NotFound(record.id))?;

        match record.state.activity {
            Some(activity) => self
                .world
                .insert_one(entity, activity)
                .map_err(|_| PetError::NotFound(record.id))?,
            None => match self.world.remove_one::<Activity>(entity) {
                Ok(_) | Err(hecs::ComponentError::MissingComponent(_)) => {}
                Err(hecs::ComponentError::NoSuchEntity) => return Err(PetError::NotFound(record.id)),
            },
        }
        Ok(())
    }

    /// Remove a pet and scrub its id from every other pet's social lists.
    pub fn remove(&mut self, id: PetId) -> Result<PetRecord, PetError> {
        let record = self.load(id)?;
        let entity = self.entity(id)?;
        self.world
            .despawn(entity)
            .map_err(|_| PetError::NotFound(id))?;
        self.index.remove(&id);

        for (_, frens) in self.world.query_mut::<&mut Frens>() {
            if frens.forget(id) {
                log::debug!("Dropped references to destroyed pet {}", id);
            }
        }
        Ok(record)
    }

    pub fn contains(&self, id: PetId) -> bool {
        self.index.contains_key(&id)
    }

    /// Number of live pets.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Highest id ever issued, 0 before the first pet.
    pub fn last_id(&self) -> u64 {
        self.last_id
    }

    /// Live pet ids in ascending order.
    pub fn ids(&self) -> Vec<PetId> {
        self.index.keys().copied().collect()
    }

    /// Pets owned by `owner`, ascending.
    pub fn pets_of(&self, owner: &Identity) -> Vec<PetId> {
        let mut ids: Vec<PetId> = self
            .world
            .query::<&Pet>()
            .iter()
            .filter(|(_, pet)| pet.owner == *owner)
            .map(|(_, pet)| pet.id)
            .collect();
        ids.sort();
        ids
    }

    /// Every live pet, ascending by id.
    pub fn records(&self) -> Result<Vec<PetRecord>, PetError> {
        self.index.keys().map(|&id| self.load(id)).collect()
    }

    /// Rebuild a store from records, e.g. after loading a snapshot.
    ///
    /// Every record must satisfy the same invariants the systems maintain:
    /// bounded vitals, a level whose XP sits below its threshold, activities
    /// that end after they start, and social lists that are symmetric and
    /// only name live pets.
    pub fn from_records(last_id: u64, records: Vec<PetRecord>) -> Result<Self, PetError> {
        let mut by_id: BTreeMap<PetId, &PetRecord> = BTreeMap::new();
        for record in &records {
            if record.id.0 == 0 || record.id.0 > last_id || by_id.insert(record.id, record).is_some() {
                return Err(invalid(record.id, "has an out-of-range or duplicate id"));
            }
            check_state(record)?;
        }
        for record in &records {
            check_social(record, &by_id)?;
        }

        let mut store = Self::new();
        for record in &records {
            let entity = store.world.spawn((
                Pet {
                    id: record.id,
                    owner: record.owner.clone(),
                    born_at: record.born_at,
                },
                record.state.vitals,
                record.state.hunger,
                record.state.progress,
                record.frens.clone(),
            ));
            store.index.insert(record.id, entity);
            store.commit(record)?;
        }
        store.last_id = last_id;
        Ok(store)
    }

    fn entity(&self, id: PetId) -> Result<Entity, PetError> {
        self.index.get(&id).copied().ok_or(PetError::NotFound(id))
    }
}

fn invalid(id: PetId, problem: &str) -> PetError {
    PetError::InvalidRequest(format!("snapshot pet {} {}", id, problem))
}

fn check_state(record: &PetRecord) -> Result<(), PetError> {
    let state = &record.state;
    if state.vitals.health > MAX_HEALTH {
        return Err(invalid(record.id, "has health above the maximum"));
    }
    if state.vitals.energy > Energy::MAX {
        return Err(invalid(record.id, "has energy above the maximum"));
    }
    if state.progress.level == 0 {
        return Err(invalid(record.id, "has level 0"));
    }
    if xp_threshold(state.progress.level).map_or(false, |threshold| state.progress.xp >= threshold) {
        return Err(invalid(record.id, "holds XP past its level threshold"));
    }
    if let Some(activity) = state.activity {
        if activity.free_at <= activity.started_at {
            return Err(invalid(record.id, "has an activity that ends before it starts"));
        }
    }
    Ok(())
}

fn check_social(record: &PetRecord, by_id: &BTreeMap<PetId, &PetRecord>) -> Result<(), PetError> {
    for fren in &record.frens.frens {
        let mutual = by_id
            .get(fren)
            .map_or(false, |other| other.frens.is_fren(record.id));
        if *fren == record.id || !mutual {
            return Err(invalid(record.id, "has a one-sided or dangling fren"));
        }
    }
    for (i, requester) in record.frens.potential.iter().enumerate() {
        if *requester == record.id
            || !by_id.contains_key(requester)
            || record.frens.is_fren(*requester)
            || record.frens.potential[..i].contains(requester)
        {
            return Err(invalid(record.id, "has a malformed pending request"));
        }
    }
    Ok(())
}

impl Default for PetStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use critter_logic::activity::start;

    fn alice() -> Identity {
        Identity::new("alice")
    }

    #[test]
    fn ids_are_monotonic_and_never_reused() {
        let mut store = PetStore::new();
        let config = EngineConfig::default();
        let a = store.create(alice(), 0, &config).unwrap();
        let b = store.create(alice(), 0, &config).unwrap();
        assert_eq!((a, b), (PetId(1), PetId(2)));

        store.remove(b).unwrap();
        let c = store.create(alice(), 0, &config).unwrap();
        assert_eq!(c, PetId(3));
        assert_eq!(store.len(), 2);
        assert_eq!(store.last_id(), 3);
    }

    #[test]
    fn load_missing_is_not_found() {
        let store = PetStore::new();
        assert_eq!(store.load(PetId(9)), Err(PetError::NotFound(PetId(9))));
    }

    #[test]
    fn commit_round_trips_activity() {
        let mut store = PetStore::new();
        let config = EngineConfig::default();
        let id = store.create(alice(), 0, &config).unwrap();

        let mut pet = store.load(id).unwrap();
        start(&mut pet.state, ActivityKind::Sleep, 0, 10).unwrap();
        pet.state.vitals.energy = Energy::from_units(3);
        store.commit(&pet).unwrap();
        assert_eq!(store.load(id).unwrap(), pet);

        pet.state.activity = None;
        store.commit(&pet).unwrap();
        assert!(!store.load(id).unwrap().is_busy());
    }

    #[test]
    fn uncommitted_changes_are_discarded() {
        let mut store = PetStore::new();
        let id = store.create(alice(), 0, &EngineConfig::default()).unwrap();
        let mut pet = store.load(id).unwrap();
        pet.state.vitals.health = 1;
        drop(pet);
        assert_eq!(store.load(id).unwrap().state.vitals.health, 100);
    }

    #[test]
    fn remove_scrubs_social_lists() {
        let mut store = PetStore::new();
        let config = EngineConfig::default();
        let a = store.create(alice(), 0, &config).unwrap();
        let b = store.create(alice(), 0, &config).unwrap();
        let c = store.create(alice(), 0, &config).unwrap();

        let mut pb = store.load(b).unwrap();
        pb.frens.befriend(a);
        pb.frens.push_request(c);
        store.commit(&pb).unwrap();
        let mut pa = store.load(a).unwrap();
        pa.frens.befriend(b);
        store.commit(&pa).unwrap();

        store.remove(b).unwrap();
        assert!(store.load(a).unwrap().frens.frens.is_empty());

        store.remove(c).unwrap();
        assert!(!store.contains(c));
        assert_eq!(store.ids(), vec![a]);
    }

    #[test]
    fn pets_of_filters_by_owner() {
        let mut store = PetStore::new();
        let config = EngineConfig::default();
        let a = store.create(alice(), 0, &config).unwrap();
        store.create(Identity::new("bob"), 0, &config).unwrap();
        let c = store.create(alice(), 0, &config).unwrap();
        assert_eq!(store.pets_of(&alice()), vec![a, c]);
        assert!(store.pets_of(&Identity::new("carol")).is_empty());
    }

    #[test]
    fn rebuild_from_records() {
        let mut store = PetStore::new();
        let config = EngineConfig::default();
        store.create(alice(), 0, &config).unwrap();
        let b = store.create(alice(), 3, &config).unwrap();
        store.remove(PetId(1)).unwrap();

        let rebuilt = PetStore::from_records(store.last_id(), store.records().unwrap()).unwrap();
        assert_eq!(rebuilt.ids(), vec![b]);
        assert_eq!(rebuilt.last_id(), 2);
        assert_eq!(rebuilt.load(b).unwrap(), store.load(b).unwrap());
    }

    #[test]
    fn rebuild_rejects_ids_past_last_id() {
        let mut store = PetStore::new();
        store.create(alice(), 0, &EngineConfig::default()).unwrap();
        let records = store.records().unwrap();
        assert!(PetStore::from_records(0, records).is_err());
    }

    #[test]
    fn committing_idle_twice_is_fine() {
        let mut store = PetStore::new();
        let id = store.create(alice(), 0, &EngineConfig::default()).unwrap();
        let pet = store.load(id).unwrap();
        store.commit(&pet).unwrap();
        store.commit(&pet).unwrap();
        assert_eq!(store.load(id).unwrap(), pet);
    }

    #[test]
    fn commit_to_despawned_entity_is_not_found() {
        let mut store = PetStore::new();
        let id = store.create(alice(), 0, &EngineConfig::default()).unwrap();
        let pet = store.load(id).unwrap();
        let entity = store.entity(id).unwrap();
        store.world.despawn(entity).unwrap();
        assert_eq!(store.commit(&pet), Err(PetError::NotFound(id)));
    }

    #[test]
    fn exhausted_id_space_refuses_new_pets() {
        let mut store = PetStore::from_records(u64::MAX, Vec::new()).unwrap();
        let err = store.create(alice(), 0, &EngineConfig::default()).unwrap_err();
        assert!(matches!(err, PetError::InvalidRequest(_)));
        assert_eq!(store.last_id(), u64::MAX);
        assert!(store.is_empty());
    }

    fn pair() -> (PetRecord, PetRecord) {
        let mut store = PetStore::new();
        let config = EngineConfig::default();
        let a = store.create(alice(), 0, &config).unwrap();
        let b = store.create(Identity::new("bob"), 0, &config).unwrap();
        (store.load(a).unwrap(), store.load(b).unwrap())
    }

    fn rebuild(a: &PetRecord, b: &PetRecord) -> Result<PetStore, PetError> {
        PetStore::from_records(2, vec![a.clone(), b.clone()])
    }

    #[test]
    fn rebuild_rejects_out_of_range_vitals() {
        let (mut a, b) = pair();
        a.state.vitals.energy = Energy::from_units(500);
        assert!(matches!(rebuild(&a, &b), Err(PetError::InvalidRequest(_))));

        let (mut a, b) = pair();
        a.state.vitals.health = 250;
        assert!(rebuild(&a, &b).is_err());
    }

    #[test]
    fn rebuild_rejects_impossible_progress() {
        let (mut a, b) = pair();
        a.state.progress.level = 0;
        assert!(rebuild(&a, &b).is_err());

        let (mut a, b) = pair();
        a.state.progress.xp = 2;
        assert!(rebuild(&a, &b).is_err());
    }

    #[test]
    fn rebuild_rejects_backwards_activity() {
        let (mut a, b) = pair();
        a.state.activity = Some(Activity {
            kind: ActivityKind::Work,
            started_at: 10,
            free_at: 10,
        });
        assert!(rebuild(&a, &b).is_err());
    }

    #[test]
    fn rebuild_rejects_one_sided_and_dangling_frens() {
        let (mut a, b) = pair();
        a.frens.frens.insert(b.id);
        assert!(rebuild(&a, &b).is_err());

        let (mut a, b) = pair();
        a.frens.frens.insert(PetId(2));
        assert!(PetStore::from_records(2, vec![a]).is_err());

        let (mut a, mut b) = pair();
        a.frens.befriend(b.id);
        b.frens.befriend(a.id);
        assert!(rebuild(&a, &b).is_ok());
    }

    #[test]
    fn rebuild_rejects_malformed_requests() {
        let (a, mut b) = pair();
        b.frens.potential.push(b.id);
        assert!(rebuild(&a, &b).is_err());

        let (a, mut b) = pair();
        b.frens.potential = vec![a.id, a.id];
        assert!(rebuild(&a, &b).is_err());

        let (mut a, mut b) = pair();
        a.frens.befriend(b.id);
        b.frens.befriend(a.id);
        b.frens.potential.push(a.id);
        assert!(rebuild(&a, &b).is_err());

        let (a, mut b) = pair();
        b.frens.potential.push(PetId(7));
        assert!(rebuild(&a, &b).is_err());

        let (a, mut b) = pair();
        b.frens.push_request(a.id);
        assert!(rebuild(&a, &b).is_ok());
    }
}
