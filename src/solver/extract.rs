// Solution extraction: read a solved `good_lp` `Solution` back into a
// `Lineup`, reading the chosen `x[s,c]` per slot and the solver's own
// `slot_chem` value for later cross-checking against the chemistry
// evaluator.

use std::collections::HashMap;

use good_lp::{Solution, Variable};

use crate::player::Candidate;
use crate::player::{Lineup, LineupSlot};

/// Pull the selected candidate for each slot out of a solved model.
///
/// `x` and `slot_chem` are the variable handles `model::build` returned
/// alongside the candidates were built from, in the same order, or the
/// `(slot, candidate)` indices will not line up.
pub fn extract_lineup(
    solution: &impl Solution,
    x: &HashMap<(usize, usize), Variable>,
    slot_chem: &[Variable],
    candidates: &[Vec<Candidate>],
) -> Lineup {
    let mut slots = Vec::with_capacity(candidates.len());

    for (s, slot_candidates) in candidates.iter().enumerate() {
        let chosen = slot_candidates
            .iter()
            .enumerate()
            .find(|(c, _)| {
                let var = x[&(s, *c)];
                solution.value(var) > 0.5
            })
            .map(|(_, cand)| cand.clone())
            .expect("C1 guarantees exactly one candidate is selected per slot");

        let chem = solution.value(slot_chem[s]).round() as i64;

        slots.push(LineupSlot {
            slot_index: s,
            position: chosen.slot_position,
            candidate: chosen,
            slot_chemistry: chem,
        });
    }

    Lineup { slots }
}
