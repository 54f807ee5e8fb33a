//! Save and restore of overlay, held token, position and movement mode.
//!
//! The blob lives under a single key as JSON:
//! `{ "cells": [["i,j", value|null], ...], "held": number|null,
//!    "playerPos": [lat, lng], "movementMode": "buttons"|"geolocation" }`.
//! A `null` cell value means "explicitly emptied"; a missing cell falls back
//! to the generator.
//!
//! Loading never fails outward: a missing or malformed blob is reported in the
//! log and treated as "no saved game".

pub mod store;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::overlay::MutationOverlay;
use crate::types::{CellCoord, CellKeyError, CellValue, LatLng, MovementMode, Token};
pub use store::{FileStore, KeyValueStore, MemoryStore, StoreError};

pub const SAVE_KEY: &str = "cellcraft.save";

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("save blob is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    CellKey(#[from] CellKeyError),
}

/// Wire shape of the saved blob.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SaveBlob {
    pub cells: Vec<(String, Option<u32>)>,
    pub held: Option<u32>,
    pub player_pos: [f64; 2],
    #[serde(default)]
    pub movement_mode: MovementMode,
}

/// Everything a session needs to resume.
#[derive(Debug, Clone, PartialEq)]
pub struct SaveState {
    pub overlay: MutationOverlay,
    pub held: CellValue,
    pub player: LatLng,
    pub mode: MovementMode,
}

impl SaveBlob {
    pub fn from_parts(
        overlay: &MutationOverlay,
        held: CellValue,
        player: LatLng,
        mode: MovementMode,
    ) -> Self {
        Self {
            cells: overlay
                .entries()
                .map(|(coord, value)| (coord.to_string(), value.map(Token::value)))
                .collect(),
            held: held.map(Token::value),
            player_pos: [player.lat, player.lng],
            movement_mode: mode,
        }
    }
}

impl SaveState {
    pub fn to_blob(&self) -> SaveBlob {
        SaveBlob::from_parts(&self.overlay, self.held, self.player, self.mode)
    }

    /// Rejects malformed cell keys; a raw `0` value reads as empty.
    pub fn from_blob(blob: SaveBlob) -> Result<Self, PersistenceError> {
        let overlay = blob
            .cells
            .into_iter()
            .map(|(key, value)| -> Result<_, PersistenceError> {
                let coord = key.parse::<CellCoord>()?;
                Ok((coord, value.and_then(Token::new)))
            })
            .collect::<Result<MutationOverlay, PersistenceError>>()?;
        Ok(Self {
            overlay,
            held: blob.held.and_then(Token::new),
            player: LatLng::new(blob.player_pos[0], blob.player_pos[1]),
            mode: blob.movement_mode,
        })
    }
}

pub fn save(store: &mut dyn KeyValueStore, state: &SaveState) -> Result<(), PersistenceError> {
    save_blob(store, &state.to_blob())
}

pub fn save_blob(store: &mut dyn KeyValueStore, blob: &SaveBlob) -> Result<(), PersistenceError> {
    let json = serde_json::to_string(blob)?;
    store.set(SAVE_KEY, &json)?;
    Ok(())
}

/// Strict variant of [`load`], for diagnostics.
pub fn try_load(store: &dyn KeyValueStore) -> Result<Option<SaveState>, PersistenceError> {
    let Some(json) = store.get(SAVE_KEY)? else {
        return Ok(None);
    };
    let blob: SaveBlob = serde_json::from_str(&json)?;
    let state = SaveState::from_blob(blob)?;
    if !(state.player.lat.is_finite() && state.player.lng.is_finite()) {
        return Ok(None);
    }
    Ok(Some(state))
}

pub fn load(store: &dyn KeyValueStore) -> Option<SaveState> {
    match try_load(store) {
        Ok(state) => state,
        Err(err) => {
            log::warn!("ignoring unreadable saved game: {err}");
            None
        }
    }
}

pub fn clear(store: &mut dyn KeyValueStore) -> Result<(), PersistenceError> {
    store.remove(SAVE_KEY)?;
    Ok(())
}
