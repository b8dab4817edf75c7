//! Feeding system - paid meals for idle pets

use critter_logic::config::EngineConfig;
use critter_logic::feeding::apply_food;
use critter_logic::Tick;

use super::activity::settle;
use crate::access::ensure_owner;
use crate::components::{Identity, PetId};
use crate::error::PetError;
use crate::payment::PaymentChannel;
use crate::store::{PetRecord, PetStore};

/// Feed `food_amount` units to an idle pet, charging its owner.
///
/// Starvation does not block feeding; being busy does. Payment is only
/// requested after every local check has passed. A zero-unit meal still
/// renews the hunger deadline; whether it is payable is up to `payments`.
pub fn feed(
    store: &mut PetStore,
    payments: &mut dyn PaymentChannel,
    config: &EngineConfig,
    now: Tick,
    id: PetId,
    caller: &Identity,
    food_amount: u64,
) -> Result<PetRecord, PetError> {
    let mut pet = store.load(id)?;
    ensure_owner(&pet, caller)?;

    settle(&mut pet, now, config);
    if let Some(activity) = pet.state.activity {
        return Err(PetError::Conflict {
            pet: id,
            free_at: activity.free_at,
        });
    }

    payments
        .transfer_into(caller, food_amount)
        .map_err(|reason| PetError::PaymentDenied { pet: id, reason })?;

    let effect = apply_food(&mut pet.state, food_amount, now, config);
    store.commit(&pet)?;

    log::info!(
        "Pet {} ate {} (nutrition {}, health {}, energy {}), hungry at {}",
        id,
        food_amount,
        pet.state.vitals.nutrition,
        pet.state.vitals.health,
        pet.state.vitals.energy,
        effect.hungry_at
    );
    Ok(pet)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payment::{FreeFood, LedgerPayments, PaymentError};
    use crate::systems::put_to_work;

    fn setup() -> (PetStore, EngineConfig, PetId, Identity) {
        let mut store = PetStore::new();
        let config = EngineConfig::default();
        let owner = Identity::new("alice");
        let id = store.create(owner.clone(), 0, &config).unwrap();
        (store, config, id, owner)
    }

    #[test]
    fn feeding_raises_nutrition_and_renews_hunger() {
        let (mut store, config, id, owner) = setup();
        let pet = feed(&mut store, &mut FreeFood, &config, 40, id, &owner, 10).unwrap();
        assert_eq!(pet.state.vitals.nutrition, 60);
        assert_eq!(pet.state.vitals.health, 100);
        assert_eq!(pet.state.hunger.last_fed_at, 40);
        assert_eq!(pet.state.hunger.hungry_at, 40 + config.hunger_window);
    }

    #[test]
    fn busy_pet_cannot_eat() {
        let (mut store, config, id, owner) = setup();
        put_to_work(&mut store, &config, 0, id, &owner, 50).unwrap();
        let err = feed(&mut store, &mut FreeFood, &config, 10, id, &owner, 1).unwrap_err();
        assert_eq!(err, PetError::Conflict { pet: id, free_at: 50 });
    }

    #[test]
    fn busy_pet_is_not_charged() {
        let (mut store, config, id, owner) = setup();
        let mut ledger = LedgerPayments::new();
        ledger.deposit(&owner, 10);
        put_to_work(&mut store, &config, 0, id, &owner, 50).unwrap();
        assert!(feed(&mut store, &mut ledger, &config, 10, id, &owner, 5).is_err());
        assert_eq!(ledger.balance_of(&owner), 10);
    }

    #[test]
    fn expired_work_resolves_before_meal() {
        let (mut store, config, id, owner) = setup();
        put_to_work(&mut store, &config, 0, id, &owner, 50).unwrap();
        let pet = feed(&mut store, &mut FreeFood, &config, 50, id, &owner, 1).unwrap();
        assert!(!pet.is_busy());
        assert!(pet.state.progress.level > 1);
    }

    #[test]
    fn unpaid_meal_changes_nothing() {
        let (mut store, config, id, owner) = setup();
        let mut ledger = LedgerPayments::new();
        let before = store.load(id).unwrap();
        let err = feed(&mut store, &mut ledger, &config, 5, id, &owner, 10).unwrap_err();
        assert!(matches!(
            err,
            PetError::PaymentDenied {
                reason: PaymentError::InsufficientFunds { .. },
                ..
            }
        ));
        assert_eq!(store.load(id).unwrap(), before);
    }

    #[test]
    fn non_owner_cannot_feed() {
        let (mut store, config, id, _) = setup();
        let err = feed(&mut store, &mut FreeFood, &config, 0, id, &Identity::new("bob"), 10).unwrap_err();
        assert!(matches!(err, PetError::Unauthorized { .. }));
    }

    #[test]
    fn empty_meal_still_renews_hunger() {
        let (mut store, config, id, owner) = setup();
        let now = config.hunger_window + 5;
        let mut ledger = LedgerPayments::new();
        let pet = feed(&mut store, &mut ledger, &config, now, id, &owner, 0).unwrap();
        assert_eq!(pet.state.vitals.nutrition, 50);
        assert_eq!(pet.state.hunger.last_fed_at, now);
        assert_eq!(pet.state.hunger.hungry_at, now + config.hunger_window);
        assert_eq!(ledger.collected(), 0);
    }

    #[test]
    fn starving_pet_can_still_eat() {
        let (mut store, config, id, owner) = setup();
        let now = config.hunger_window + 1;
        let pet = feed(&mut store, &mut FreeFood, &config, now, id, &owner, 1).unwrap();
        assert_eq!(pet.state.hunger.hungry_at, now + config.hunger_window);
    }
}
