// Player records and the derived candidate/lineup representations.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::position::{EaId, Position};

/// An immutable player card as read from the catalogue.
///
/// Immutable for the duration of a single optimisation run: the solver never
/// mutates a `Player`, only derives `Candidate`s from it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub ea_id: EaId,
    pub name: String,
    pub club_id: Option<i64>,
    pub league_id: Option<i64>,
    pub nation_id: Option<i64>,
    pub market_price: Option<u64>,
    pub ratings_by_position: HashMap<Position, f64>,
    #[serde(default)]
    pub is_icon: bool,
    #[serde(default)]
    pub is_hero: bool,
}

impl Player {
    /// Rating at `position`, or `None` if the player is ineligible there.
    pub fn rating_at(&self, position: Position) -> Option<f64> {
        self.ratings_by_position.get(&position).copied()
    }

    /// Case-insensitive, trimmed name used for the secondary uniqueness key.
    pub fn normalized_name(&self) -> String {
        self.name.trim().to_lowercase()
    }
}

/// A player record annotated for a specific slot: effective price, ownership
/// and mandatory-inclusion flags, and the position-specific rating used as
/// the objective coefficient for this candidate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Candidate {
    pub player: Player,
    pub slot_position: Position,
    pub rating: f64,
    pub effective_price: u64,
    pub is_owned: bool,
    pub is_required: bool,
}

impl Candidate {
    pub fn ea_id(&self) -> EaId {
        self.player.ea_id
    }

    pub fn normalized_name(&self) -> String {
        self.player.normalized_name()
    }
}

/// A single filled slot in a solved lineup: the slot's required position,
/// the selected candidate, and the solver's chemistry contribution for this
/// slot (recomputed and verified against the reference evaluator).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineupSlot {
    pub slot_index: usize,
    pub position: Position,
    pub candidate: Candidate,
    pub slot_chemistry: i64,
}

/// The solved 11-player lineup, in slot order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Lineup {
    pub slots: Vec<LineupSlot>,
}

impl Lineup {
    /// Players in slot order, suitable for passing to the chemistry
    /// evaluator (§4.1 operates on the 11-player list directly).
    pub fn players(&self) -> Vec<&Player> {
        self.slots.iter().map(|s| &s.candidate.player).collect()
    }

    pub fn total_cost(&self) -> u64 {
        self.slots.iter().map(|s| s.candidate.effective_price).sum()
    }

    pub fn total_rating(&self) -> f64 {
        self.slots.iter().map(|s| s.candidate.rating).sum()
    }

    pub fn total_chemistry(&self) -> i64 {
        self.slots.iter().map(|s| s.slot_chemistry).sum()
    }

    pub fn owned_count(&self) -> usize {
        self.slots.iter().filter(|s| s.candidate.is_owned).count()
    }

    pub fn required_count(&self) -> usize {
        self.slots.iter().filter(|s| s.candidate.is_required).count()
    }
}
