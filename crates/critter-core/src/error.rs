//! Error taxonomy for pet operations.
//!
//! Every mutating operation either succeeds completely or returns one of
//! these without touching the store. Nothing is retried automatically; the
//! caller clears the blocking condition (wait, feed, pay) and resubmits.

use critter_logic::activity::StartRejection;
use critter_logic::Tick;
use thiserror::Error;

use crate::components::{Identity, PetId};
use crate::payment::PaymentError;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PetError {
    /// Caller is not the pet's owner.
    #[error("{caller} is not the owner of pet {pet}")]
    Unauthorized { pet: PetId, caller: Identity },

    /// Pet is in the middle of an activity.
    #[error("pet {pet} is busy until tick {free_at}")]
    Conflict { pet: PetId, free_at: Tick },

    /// Pet is too hungry to start an activity.
    #[error("pet {pet} has been starving since tick {hungry_at}")]
    Starvation { pet: PetId, hungry_at: Tick },

    /// The payment collaborator refused the food purchase.
    #[error("payment for pet {pet} denied: {reason}")]
    PaymentDenied { pet: PetId, reason: PaymentError },

    #[error("pet {0} not found")]
    NotFound(PetId),

    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

impl PetError {
    /// Whether resubmitting after the blocking condition clears can succeed.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            PetError::Conflict { .. } | PetError::Starvation { .. } | PetError::PaymentDenied { .. }
        )
    }

    pub(crate) fn from_rejection(pet: PetId, rejection: StartRejection) -> Self {
        match rejection {
            StartRejection::ZeroDuration => {
                PetError::InvalidRequest("activity duration must be at least one tick".into())
            }
            StartRejection::DurationOverflow => {
                PetError::InvalidRequest("activity would end past the last tick".into())
            }
            StartRejection::Busy { free_at } => PetError::Conflict { pet, free_at },
            StartRejection::Starving { hungry_at } => PetError::Starvation { pet, hungry_at },
        }
    }
}
