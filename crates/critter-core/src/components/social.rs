//! Social component: mutual frens and pending inbound requests

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::PetId;

/// Friend lists of one pet.
///
/// `frens` is one half of a symmetric relation; the systems keep the other
/// half in sync. `potential` holds inbound requests in arrival order and
/// never contains a duplicate, the pet itself, or an existing fren.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Frens {
    pub frens: BTreeSet<PetId>,
    pub potential: Vec<PetId>,
}

impl Frens {
    pub fn is_fren(&self, other: PetId) -> bool {
        self.frens.contains(&other)
    }

    pub fn is_pending(&self, requester: PetId) -> bool {
        self.potential.contains(&requester)
    }

    /// Queue an inbound request. Returns false if it was already queued.
    pub fn push_request(&mut self, requester: PetId) -> bool {
        if self.is_pending(requester) {
            return false;
        }
        self.potential.push(requester);
        true
    }

    /// Remove a pending request. Returns false if it was not pending.
    pub fn take_request(&mut self, requester: PetId) -> bool {
        let before = self.potential.len();
        self.potential.retain(|&p| p != requester);
        self.potential.len() != before
    }

    /// Record one side of a friendship, dropping any request from the same pet.
    pub fn befriend(&mut self, other: PetId) {
        self.take_request(other);
        self.frens.insert(other);
    }

    pub fn unfriend(&mut self, other: PetId) -> bool {
        self.frens.remove(&other)
    }

    /// Drop every reference to a pet that no longer exists.
    pub fn forget(&mut self, gone: PetId) -> bool {
        let was_fren = self.unfriend(gone);
        let was_pending = self.take_request(gone);
        was_fren || was_pending
    }
}
