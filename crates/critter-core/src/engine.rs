//! Pet engine - main entry point bundling store, clock, payments, and config

use std::io::{Read, Write};

use critter_logic::activity::Resolution;
use critter_logic::config::{validate_config, ConfigError, EngineConfig};
use critter_logic::Tick;

use crate::components::{Identity, PetId};
use crate::error::PetError;
use crate::payment::PaymentChannel;
use crate::persistence::{load_store, save_store, SnapshotError};
use crate::store::{PetRecord, PetStore};
use crate::systems::{self, PetView};
use crate::time::TimeSource;

/// Main pet engine
///
/// Reads the clock once per call and hands the tick to the systems, so every
/// operation sees a single consistent `now`.
pub struct PetEngine<T: TimeSource, P: PaymentChannel> {
    store: PetStore,
    clock: T,
    payments: P,
    config: EngineConfig,
}

impl<T: TimeSource, P: PaymentChannel> PetEngine<T, P> {
    /// Create an empty engine with default tuning
    pub fn new(clock: T, payments: P) -> Self {
        Self {
            store: PetStore::new(),
            clock,
            payments,
            config: EngineConfig::default(),
        }
    }

    /// Create an empty engine with custom tuning, rejecting unusable values
    pub fn with_config(clock: T, payments: P, config: EngineConfig) -> Result<Self, Vec<ConfigError>> {
        let errors = validate_config(&config);
        if !errors.is_empty() {
            return Err(errors);
        }
        Ok(Self {
            store: PetStore::new(),
            clock,
            payments,
            config,
        })
    }

    pub fn now(&self) -> Tick {
        self.clock.current_tick()
    }

    pub fn create(&mut self, owner: Identity) -> Result<PetId, PetError> {
        let now = self.now();
        logged("create", systems::create(&mut self.store, &self.config, now, owner))
    }

    pub fn destroy(&mut self, id: PetId, caller: &Identity) -> Result<PetRecord, PetError> {
        logged("destroy", systems::destroy(&mut self.store, id, caller))
    }

    pub fn get_attributes(&self, id: PetId) -> Result<PetView, PetError> {
        systems::get_attributes(&self.store, &self.config, self.now(), id)
    }

    pub fn put_to_sleep(&mut self, id: PetId, caller: &Identity, duration: u64) -> Result<PetRecord, PetError> {
        let now = self.now();
        logged(
            "sleep",
            systems::put_to_sleep(&mut self.store, &self.config, now, id, caller, duration),
        )
    }

    pub fn put_to_work(&mut self, id: PetId, caller: &Identity, duration: u64) -> Result<PetRecord, PetError> {
        let now = self.now();
        logged(
            "work",
            systems::put_to_work(&mut self.store, &self.config, now, id, caller, duration),
        )
    }

    pub fn feed(&mut self, id: PetId, caller: &Identity, food_amount: u64) -> Result<PetRecord, PetError> {
        let now = self.now();
        logged(
            "feed",
            systems::feed(
                &mut self.store,
                &mut self.payments,
                &self.config,
                now,
                id,
                caller,
                food_amount,
            ),
        )
    }

    /// Settle an expired activity without starting anything new.
    pub fn resolve(&mut self, id: PetId) -> Result<Option<Resolution>, PetError> {
        let now = self.now();
        systems::resolve_pet(&mut self.store, &self.config, now, id)
    }

    pub fn add_fren(&mut self, requester: PetId, target: PetId, caller: &Identity) -> Result<(), PetError> {
        logged(
            "add_fren",
            systems::add_fren(&mut self.store, requester, target, caller),
        )
    }

    pub fn accept_fren(&mut self, id: PetId, caller: &Identity, requester: PetId) -> Result<(), PetError> {
        logged(
            "accept_fren",
            systems::accept_fren(&mut self.store, id, caller, requester),
        )
    }

    pub fn decline_fren(&mut self, id: PetId, caller: &Identity, requester: PetId) -> Result<(), PetError> {
        logged(
            "decline_fren",
            systems::decline_fren(&mut self.store, id, caller, requester),
        )
    }

    pub fn remove_fren(&mut self, id: PetId, caller: &Identity, other: PetId) -> Result<(), PetError> {
        logged(
            "remove_fren",
            systems::remove_fren(&mut self.store, id, caller, other),
        )
    }

    pub fn get_frens(&self, id: PetId) -> Result<Vec<PetId>, PetError> {
        systems::get_frens(&self.store, id)
    }

    pub fn get_potential_frens(&self, id: PetId) -> Result<Vec<PetId>, PetError> {
        systems::get_potential_frens(&self.store, id)
    }

    pub fn pets_of(&self, owner: &Identity) -> Vec<PetId> {
        self.store.pets_of(owner)
    }

    /// Total live pets
    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    pub fn last_id(&self) -> u64 {
        self.store.last_id()
    }

    /// Save the store to a writer
    pub fn save<W: Write>(&self, writer: W) -> Result<(), SnapshotError> {
        save_store(writer, &self.store, self.now())?;
        log::info!("Saved {} pets", self.store.len());
        Ok(())
    }

    /// Replace the store with a snapshot read from `reader`. On error the
    /// current store is kept.
    pub fn load<R: Read>(&mut self, reader: R) -> Result<Tick, SnapshotError> {
        let (store, saved_at) = load_store(reader)?;
        self.store = store;
        log::info!(
            "Loaded {} pets saved at tick {}",
            self.store.len(),
            saved_at
        );
        Ok(saved_at)
    }

    pub fn store(&self) -> &PetStore {
        &self.store
    }

    pub fn clock(&self) -> &T {
        &self.clock
    }

    pub fn payments(&self) -> &P {
        &self.payments
    }

    pub fn payments_mut(&mut self) -> &mut P {
        &mut self.payments
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }
}

fn logged<R>(op: &str, result: Result<R, PetError>) -> Result<R, PetError> {
    if let Err(err) = &result {
        log::warn!("{} rejected: {}", op, err);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payment::{FreeFood, LedgerPayments};
    use crate::time::ManualClock;
    use std::sync::Arc;

    #[test]
    fn engine_reads_shared_clock() {
        let clock = Arc::new(ManualClock::new(0));
        let mut engine = PetEngine::new(Arc::clone(&clock), FreeFood);
        let alice = Identity::new("alice");
        let id = engine.create(alice.clone()).unwrap();

        engine.put_to_work(id, &alice, 10).unwrap();
        assert!(matches!(
            engine.feed(id, &alice, 1),
            Err(PetError::Conflict { .. })
        ));

        clock.advance(10);
        engine.feed(id, &alice, 1).unwrap();
        assert_eq!(engine.get_attributes(id).unwrap().record.state.hunger.last_fed_at, 10);
    }

    #[test]
    fn bad_config_is_rejected() {
        let mut config = EngineConfig::default();
        config.hunger_window = 0;
        let result = PetEngine::with_config(ManualClock::new(0), FreeFood, config);
        assert!(matches!(result, Err(errors) if errors == vec![ConfigError::ZeroHungerWindow]));
    }

    #[test]
    fn payments_flow_through_engine() {
        let alice = Identity::new("alice");
        let mut ledger = LedgerPayments::new();
        ledger.deposit(&alice, 5);
        let mut engine = PetEngine::new(ManualClock::new(0), ledger);
        let id = engine.create(alice.clone()).unwrap();

        engine.feed(id, &alice, 5).unwrap();
        assert!(matches!(
            engine.feed(id, &alice, 1),
            Err(PetError::PaymentDenied { .. })
        ));
        assert_eq!(engine.payments().collected(), 5);
    }

    #[test]
    fn save_then_load_restores_store() {
        let alice = Identity::new("alice");
        let mut engine = PetEngine::new(ManualClock::new(3), FreeFood);
        let id = engine.create(alice.clone()).unwrap();
        let mut bytes = Vec::new();
        engine.save(&mut bytes).unwrap();

        engine.destroy(id, &alice).unwrap();
        assert!(engine.is_empty());

        assert_eq!(engine.load(&bytes[..]).unwrap(), 3);
        assert_eq!(engine.pets_of(&alice), vec![id]);
        assert_eq!(engine.create(alice).unwrap(), PetId(2));
    }
}
