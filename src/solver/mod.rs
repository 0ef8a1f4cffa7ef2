// Squad Solver: orchestrates validation, candidate building, MILP solving,
// and post-solve verification into the single public entry point
// `optimize`.
//
// Grounded on `original_source/optimizer/solver.py`'s `SquadOptimizer.solve`
// for the overall pipeline shape (validate -> fetch candidates -> build
// model -> solve -> extract -> verify), realised with `good_lp`/HiGHS in
// place of CP-SAT.

pub mod extract;
pub mod model;

use std::collections::HashSet;
use std::time::Instant;

use good_lp::{Solution, SolverModel};
use tracing::{info, warn};

use crate::catalogue::PlayerCatalogue;
use crate::chemistry;
use crate::error::SquadError;
use crate::player::Lineup;
use crate::position::{EaId, Position};
use crate::{candidates, config::SolverConfig};

/// One optimisation request: the 11 slot positions (in squad order), the
/// constraint parameters, and the player pools that scope the search.
#[derive(Debug, Clone)]
pub struct SolverRequest {
    pub positions: Vec<Position>,
    pub budget: u64,
    pub min_chemistry: i64,
    pub owned: HashSet<EaId>,
    pub include: HashSet<EaId>,
    pub owned_only: bool,
}

/// Whether the returned lineup is a proven optimum or merely the best
/// solution found before the time budget ran out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SquadStatus {
    Optimal,
    Feasible,
}

/// The solved lineup plus solve metadata.
#[derive(Debug, Clone)]
pub struct SolverResponse {
    pub lineup: Lineup,
    pub status: SquadStatus,
    pub objective_rating: f64,
    pub elapsed_seconds: f64,
}

/// Run the full pipeline: validate the request, build per-slot candidates,
/// solve the MILP, and verify the result before returning it.
///
/// Never returns a partial or unverified lineup: any internal disagreement
/// between the solver's own chemistry bookkeeping and the reference
/// evaluator is raised as `SquadError::VerificationMismatch` rather than
/// silently returned.
pub fn optimize(
    catalogue: &dyn PlayerCatalogue,
    request: &SolverRequest,
    config: &SolverConfig,
) -> Result<SolverResponse, SquadError> {
    validate_request(request)?;

    for &ea_id in &request.include {
        if catalogue.player(ea_id).is_none() {
            return Err(SquadError::MissingPlayer { ea_id });
        }
    }

    let mut candidates_by_slot = Vec::with_capacity(request.positions.len());
    for (slot_index, &position) in request.positions.iter().enumerate() {
        let slot_candidates = candidates::build_candidates(
            catalogue,
            slot_index,
            position,
            &request.owned,
            &request.include,
            request.owned_only,
            config.candidate_limit,
            config.min_rating,
        )?;
        candidates_by_slot.push(slot_candidates);
    }

    candidates::check_required_players_placeable(&candidates_by_slot, &request.include)?;

    info!(
        slots = candidates_by_slot.len(),
        total_candidates = candidates_by_slot.iter().map(Vec::len).sum::<usize>(),
        "built candidate pools, invoking solver"
    );

    let model::BuiltModel {
        vars,
        constraints,
        objective,
        x,
        slot_chem,
    } = model::build(
        &candidates_by_slot,
        request.budget,
        request.min_chemistry,
        &request.include,
    );

    let start = Instant::now();
    let mut problem = vars
        .maximise(objective)
        .using(good_lp::solvers::highs::highs);
    for constraint in constraints {
        problem = problem.with(constraint);
    }
    problem = problem.set_time_limit(config.timeout_seconds as f64);

    let solution = match problem.solve() {
        Ok(solution) => solution,
        Err(good_lp::ResolutionError::Infeasible) => {
            return Err(SquadError::Infeasible {
                min_chemistry: request.min_chemistry,
                budget: request.budget,
            })
        }
        Err(good_lp::ResolutionError::Unbounded) => {
            return Err(SquadError::Internal {
                message: "solver reported an unbounded model; this should be unreachable for a \
                          bounded 0/1 assignment formulation"
                    .to_string(),
            })
        }
        Err(other) => {
            // HiGHS (via good_lp) reports a plain resolution error, not a
            // distinct "no solution" status, when it exhausts the time
            // limit without ever finding a feasible assignment.
            if start.elapsed().as_secs_f64() >= config.timeout_seconds as f64 * 0.98 {
                return Err(SquadError::TimedOut {
                    timeout_seconds: config.timeout_seconds,
                });
            }
            return Err(SquadError::Internal {
                message: format!("solver error: {other}"),
            });
        }
    };
    let elapsed = start.elapsed();

    // `good_lp`'s cross-backend API does not expose HiGHS's detailed solve
    // status, so a near-timeout elapsed duration is treated as a signal that
    // the solver may not have proven optimality (see SPEC_FULL.md §4.3).
    let status = if elapsed.as_secs_f64() >= config.timeout_seconds as f64 * 0.98 {
        warn!(
            elapsed = elapsed.as_secs_f64(),
            timeout = config.timeout_seconds,
            "solver ran to the time limit; reporting Feasible rather than Optimal"
        );
        SquadStatus::Feasible
    } else {
        SquadStatus::Optimal
    };

    let lineup = extract::extract_lineup(&solution, &x, &slot_chem, &candidates_by_slot);

    let players = lineup.players();
    let evaluator_chemistry = chemistry::squad_chemistry(&players);
    let solver_chemistry = lineup.total_chemistry();
    if evaluator_chemistry != solver_chemistry {
        return Err(SquadError::VerificationMismatch {
            evaluator: evaluator_chemistry,
            solver: solver_chemistry,
        });
    }

    let objective_rating = lineup.total_rating();

    Ok(SolverResponse {
        lineup,
        status,
        objective_rating,
        elapsed_seconds: elapsed.as_secs_f64(),
    })
}

/// Validate request shape before touching the catalogue: exactly 11
/// positions, `min_chemistry` in `[0, 33]`, and a well-formed include set.
fn validate_request(request: &SolverRequest) -> Result<(), SquadError> {
    if request.positions.len() != 11 {
        return Err(SquadError::InputShape {
            got: request.positions.len(),
        });
    }

    if !(0..=33).contains(&request.min_chemistry) {
        return Err(SquadError::ChemistryOutOfRange {
            got: request.min_chemistry,
        });
    }

    if request.include.len() > 11 {
        return Err(SquadError::IncludeSetTooLarge {
            got: request.include.len(),
        });
    }

    Ok(())
}
