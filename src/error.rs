// Error taxonomy for the squad optimisation core.
//
// Every fallible public function returns `Result<_, SquadError>`. Errors
// always carry the offending identifiers; none are retried inside the core,
// and partial results are never returned (see `solver::optimize`).

use thiserror::Error;

use crate::position::{EaId, Position};

#[derive(Debug, Error)]
pub enum SquadError {
    /// Wrong number of positions, invalid position code, out-of-range
    /// `min_chemistry`, or a malformed/oversize include-set. Caught before
    /// any catalogue access.
    #[error("expected exactly 11 positions, got {got}")]
    InputShape { got: usize },

    #[error("min_chemistry must be in [0, 33], got {got}")]
    ChemistryOutOfRange { got: i64 },

    #[error("include_players must not exceed 11 entries, got {got}")]
    IncludeSetTooLarge { got: usize },

    /// A required `ea_id` is not present in the catalogue at all.
    #[error("required player {ea_id} not found in catalogue")]
    MissingPlayer { ea_id: EaId },

    /// A required `ea_id` is present but not eligible for any of the
    /// requested slots.
    #[error("required player {ea_id} is not eligible for any requested position")]
    Unplaceable { ea_id: EaId },

    /// No candidates survive filtering for some slot.
    #[error("no candidates for position {position} (slot {slot})")]
    EmptySlot { slot: usize, position: Position },

    /// The solver proved no assignment satisfies all hard constraints.
    #[error("no feasible solution satisfies all hard constraints (min_chemistry={min_chemistry}, budget={budget})")]
    Infeasible { min_chemistry: i64, budget: u64 },

    /// The solver exited without a feasibility proof within the time budget.
    #[error("solver did not produce a feasible solution within {timeout_seconds}s")]
    TimedOut { timeout_seconds: u64 },

    /// The post-solve chemistry evaluator disagrees with the solver's summed
    /// `slot_chem`. This is an implementation bug and must be raised, never
    /// papered over.
    #[error("chemistry verification mismatch: evaluator computed {evaluator}, solver reported {solver}")]
    VerificationMismatch { evaluator: i64, solver: i64 },

    /// An internal solver error that does not map to any of the above (e.g.
    /// an unexpected unbounded model, which should be unreachable for this
    /// formulation).
    #[error("internal solver error: {message}")]
    Internal { message: String },
}
