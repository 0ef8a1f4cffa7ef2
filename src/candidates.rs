// Candidate Provider: per-slot eligible-player lists with derived price and
// ownership/required flags, feeding the solver's decision variables.

use std::collections::HashSet;

use crate::catalogue::{CandidateQuery, PlayerCatalogue};
use crate::error::SquadError;
use crate::player::{Candidate, Player};
use crate::position::{EaId, Position};

/// Fallback price (coins) assigned to a required player with no market
/// price. Mirrors the source's `futbin_price` fallback for extinct required
/// cards. Counted against budget per the resolved Open Question in
/// SPEC_FULL.md §9.
pub const REQUIRED_FALLBACK_PRICE: u64 = 1_000_000;

/// Build the candidate list for one slot.
///
/// Implements §4.2's eligibility predicate and four-way price resolution.
/// Returns `SquadError::EmptySlot` if nothing survives.
pub fn build_candidates(
    catalogue: &dyn PlayerCatalogue,
    slot_index: usize,
    position: Position,
    owned: &HashSet<EaId>,
    include: &HashSet<EaId>,
    owned_only: bool,
    candidate_limit: usize,
    min_rating: f64,
) -> Result<Vec<Candidate>, SquadError> {
    let raw = catalogue.candidates_for_position(CandidateQuery {
        position,
        min_rating,
        owned_only,
        owned,
        include,
        limit: candidate_limit,
    });

    let mut candidates = Vec::with_capacity(raw.len());
    for player in raw {
        if let Some(candidate) = resolve_candidate(player, position, owned, include, min_rating) {
            candidates.push(candidate);
        }
    }

    if candidates.is_empty() {
        return Err(SquadError::EmptySlot {
            slot: slot_index,
            position,
        });
    }

    Ok(candidates)
}

/// Apply the eligibility and price-resolution rules to a single player for
/// one slot. Returns `None` if the player is rejected outright.
fn resolve_candidate(
    player: Player,
    position: Position,
    owned: &HashSet<EaId>,
    include: &HashSet<EaId>,
    min_rating: f64,
) -> Option<Candidate> {
    let rating = player.rating_at(position)?;
    if rating <= 0.0 {
        return None;
    }

    let is_required = include.contains(&player.ea_id);
    let is_owned = owned.contains(&player.ea_id);

    // Rule 2: the rating floor applies unless the player is required.
    if rating < min_rating && !is_required {
        return None;
    }

    let effective_price = if is_owned {
        0
    } else if is_required {
        player.market_price.unwrap_or(REQUIRED_FALLBACK_PRICE)
    } else {
        player.market_price?
    };

    Some(Candidate {
        player,
        slot_position: position,
        rating,
        effective_price,
        is_owned,
        is_required,
    })
}

/// Pre-flight check: every member of `include` must appear in at least one
/// slot's candidate list, or the required player cannot be placed at all.
pub fn check_required_players_placeable(
    candidates_by_slot: &[Vec<Candidate>],
    include: &HashSet<EaId>,
) -> Result<(), SquadError> {
    for &ea_id in include {
        let placeable = candidates_by_slot
            .iter()
            .any(|slot| slot.iter().any(|c| c.ea_id() == ea_id));
        if !placeable {
            return Err(SquadError::Unplaceable { ea_id });
        }
    }
    Ok(())
}
