//! Social system - fren requests and the mutual fren graph

use crate::access::ensure_owner;
use crate::components::{Identity, PetId};
use crate::error::PetError;
use crate::store::PetStore;

/// Queue a fren request from `requester` (owned by `caller`) to `target`.
pub fn add_fren(
    store: &mut PetStore,
    requester: PetId,
    target: PetId,
    caller: &Identity,
) -> Result<(), PetError> {
    let from = store.load(requester)?;
    ensure_owner(&from, caller)?;
    if requester == target {
        return Err(PetError::InvalidRequest(format!(
            "pet {} cannot befriend itself",
            requester
        )));
    }

    let mut to = store.load(target)?;
    if to.frens.is_fren(requester) {
        return Err(PetError::InvalidRequest(format!(
            "pets {} and {} are already frens",
            requester, target
        )));
    }
    if !to.frens.push_request(requester) {
        return Err(PetError::InvalidRequest(format!(
            "pet {} already has a pending request from {}",
            target, requester
        )));
    }

    store.commit(&to)?;
    log::debug!("Pet {} sent a fren request to {}", requester, target);
    Ok(())
}

/// Accept a pending request, forming a mutual edge.
pub fn accept_fren(
    store: &mut PetStore,
    id: PetId,
    caller: &Identity,
    requester: PetId,
) -> Result<(), PetError> {
    let mut pet = store.load(id)?;
    ensure_owner(&pet, caller)?;
    if !pet.frens.is_pending(requester) {
        return Err(no_request(id, requester));
    }
    let mut other = store.load(requester)?;

    pet.frens.befriend(requester);
    // Also clears a crossed request in the other direction.
    other.frens.befriend(id);

    store.commit(&pet)?;
    store.commit(&other)?;
    log::info!("Pets {} and {} are now frens", id, requester);
    Ok(())
}

/// Drop a pending request without forming an edge.
pub fn decline_fren(
    store: &mut PetStore,
    id: PetId,
    caller: &Identity,
    requester: PetId,
) -> Result<(), PetError> {
    let mut pet = store.load(id)?;
    ensure_owner(&pet, caller)?;
    if !pet.frens.take_request(requester) {
        return Err(no_request(id, requester));
    }
    store.commit(&pet)?;
    log::debug!("Pet {} declined a fren request from {}", id, requester);
    Ok(())
}

/// Break an existing friendship on both sides.
pub fn remove_fren(
    store: &mut PetStore,
    id: PetId,
    caller: &Identity,
    other: PetId,
) -> Result<(), PetError> {
    let mut pet = store.load(id)?;
    ensure_owner(&pet, caller)?;
    if !pet.frens.is_fren(other) {
        return Err(PetError::InvalidRequest(format!(
            "pets {} and {} are not frens",
            id, other
        )));
    }
    let mut former = store.load(other)?;

    pet.frens.unfriend(other);
    former.frens.unfriend(id);

    store.commit(&pet)?;
    store.commit(&former)?;
    log::info!("Pets {} and {} are no longer frens", id, other);
    Ok(())
}

/// Mutual frens, ascending.
pub fn get_frens(store: &PetStore, id: PetId) -> Result<Vec<PetId>, PetError> {
    Ok(store.load(id)?.frens.frens.into_iter().collect())
}

/// Pending inbound requests in arrival order.
pub fn get_potential_frens(store: &PetStore, id: PetId) -> Result<Vec<PetId>, PetError> {
    Ok(store.load(id)?.frens.potential)
}

fn no_request(id: PetId, requester: PetId) -> PetError {
    PetError::InvalidRequest(format!(
        "pet {} has no pending request from {}",
        id, requester
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use critter_logic::config::EngineConfig;

    struct World {
        store: PetStore,
        a: PetId,
        b: PetId,
        alice: Identity,
        bob: Identity,
    }

    fn two_pets() -> World {
        let mut store = PetStore::new();
        let config = EngineConfig::default();
        let alice = Identity::new("alice");
        let bob = Identity::new("bob");
        let a = store.create(alice.clone(), 0, &config).unwrap();
        let b = store.create(bob.clone(), 0, &config).unwrap();
        World { store, a, b, alice, bob }
    }

    #[test]
    fn accept_forms_mutual_edge() {
        let mut w = two_pets();
        add_fren(&mut w.store, w.a, w.b, &w.alice).unwrap();
        assert_eq!(get_potential_frens(&w.store, w.b).unwrap(), vec![w.a]);

        accept_fren(&mut w.store, w.b, &w.bob, w.a).unwrap();
        assert_eq!(get_frens(&w.store, w.a).unwrap(), vec![w.b]);
        assert_eq!(get_frens(&w.store, w.b).unwrap(), vec![w.a]);
        assert!(get_potential_frens(&w.store, w.b).unwrap().is_empty());
    }

    #[test]
    fn decline_leaves_no_edge() {
        let mut w = two_pets();
        add_fren(&mut w.store, w.a, w.b, &w.alice).unwrap();
        decline_fren(&mut w.store, w.b, &w.bob, w.a).unwrap();
        assert!(get_potential_frens(&w.store, w.b).unwrap().is_empty());
        assert!(get_frens(&w.store, w.a).unwrap().is_empty());
        assert!(get_frens(&w.store, w.b).unwrap().is_empty());
    }

    #[test]
    fn crossed_requests_collapse_on_accept() {
        let mut w = two_pets();
        add_fren(&mut w.store, w.a, w.b, &w.alice).unwrap();
        add_fren(&mut w.store, w.b, w.a, &w.bob).unwrap();
        accept_fren(&mut w.store, w.b, &w.bob, w.a).unwrap();
        assert!(get_potential_frens(&w.store, w.a).unwrap().is_empty());
        assert!(get_potential_frens(&w.store, w.b).unwrap().is_empty());
    }

    #[test]
    fn request_rules() {
        let mut w = two_pets();
        assert!(matches!(
            add_fren(&mut w.store, w.a, w.a, &w.alice),
            Err(PetError::InvalidRequest(_))
        ));
        assert!(matches!(
            add_fren(&mut w.store, w.a, w.b, &w.bob),
            Err(PetError::Unauthorized { .. })
        ));
        assert_eq!(
            add_fren(&mut w.store, w.a, PetId(99), &w.alice),
            Err(PetError::NotFound(PetId(99)))
        );

        add_fren(&mut w.store, w.a, w.b, &w.alice).unwrap();
        assert!(matches!(
            add_fren(&mut w.store, w.a, w.b, &w.alice),
            Err(PetError::InvalidRequest(_))
        ));
        accept_fren(&mut w.store, w.b, &w.bob, w.a).unwrap();
        assert!(matches!(
            add_fren(&mut w.store, w.a, w.b, &w.alice),
            Err(PetError::InvalidRequest(_))
        ));
    }

    #[test]
    fn only_the_target_owner_answers() {
        let mut w = two_pets();
        add_fren(&mut w.store, w.a, w.b, &w.alice).unwrap();
        assert!(matches!(
            accept_fren(&mut w.store, w.b, &w.alice, w.a),
            Err(PetError::Unauthorized { .. })
        ));
        assert!(matches!(
            decline_fren(&mut w.store, w.a, &w.alice, w.b),
            Err(PetError::InvalidRequest(_))
        ));
    }

    #[test]
    fn remove_breaks_both_sides() {
        let mut w = two_pets();
        add_fren(&mut w.store, w.a, w.b, &w.alice).unwrap();
        accept_fren(&mut w.store, w.b, &w.bob, w.a).unwrap();

        remove_fren(&mut w.store, w.a, &w.alice, w.b).unwrap();
        assert!(get_frens(&w.store, w.a).unwrap().is_empty());
        assert!(get_frens(&w.store, w.b).unwrap().is_empty());
        assert!(matches!(
            remove_fren(&mut w.store, w.a, &w.alice, w.b),
            Err(PetError::InvalidRequest(_))
        ));
    }
}
