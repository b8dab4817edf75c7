//! Owner checks for mutating operations.

use crate::components::Identity;
use crate::error::PetError;
use crate::store::PetRecord;

/// Fails with `Unauthorized` unless `caller` owns `pet`.
pub fn ensure_owner(pet: &PetRecord, caller: &Identity) -> Result<(), PetError> {
    if pet.owner == *caller {
        Ok(())
    } else {
        Err(PetError::Unauthorized {
            pet: pet.id,
            caller: caller.clone(),
        })
    }
}
