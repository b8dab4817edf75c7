//! Save/Load for the pet store
//!
//! Uses bincode to dump every live pet as an owned [`PetRecord`] plus the id
//! counter. Components are reassembled into a fresh world on load.

use std::io::{Read, Write};

use critter_logic::Tick;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::PetError;
use crate::store::{PetRecord, PetStore};

/// Version number for save file format (increment when format changes)
const SAVE_VERSION: u32 = 1;

/// Serializable snapshot of the store
#[derive(Debug, Serialize, Deserialize)]
pub struct SaveData {
    /// Save format version
    pub version: u32,
    /// Tick the snapshot was taken at
    pub saved_at: Tick,
    /// Highest id ever issued, so ids stay unique after reload
    pub last_id: u64,
    pub pets: Vec<PetRecord>,
}

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Encode(#[from] Box<bincode::ErrorKind>),
    #[error("Save version mismatch: expected {expected}, found {found}")]
    VersionMismatch { expected: u32, found: u32 },
    #[error("Corrupt snapshot: {0}")]
    Invalid(#[from] PetError),
}

/// Write the whole store to `writer`.
pub fn save_store<W: Write>(writer: W, store: &PetStore, now: Tick) -> Result<(), SnapshotError> {
    let save_data = SaveData {
        version: SAVE_VERSION,
        saved_at: now,
        last_id: store.last_id(),
        pets: store.records()?,
    };
    bincode::serialize_into(writer, &save_data)?;
    Ok(())
}

/// Read a store back. Returns the store and the tick it was saved at.
pub fn load_store<R: Read>(reader: R) -> Result<(PetStore, Tick), SnapshotError> {
    let save_data: SaveData = bincode::deserialize_from(reader)?;

    if save_data.version != SAVE_VERSION {
        return Err(SnapshotError::VersionMismatch {
            expected: SAVE_VERSION,
            found: save_data.version,
        });
    }

    let store = PetStore::from_records(save_data.last_id, save_data.pets)?;
    Ok((store, save_data.saved_at))
}
