// CP-style integer model build: decision variables, structural constraints
// C1-C5, and the chemistry table/cap/conditional-equality encoding for C6.
//
// Grounded on `original_source/optimizer/solver.py` (`_build_and_solve_cpsat`,
// `_add_chemistry_constraints`) for the model itself, and on
// `other_examples/manifests/teymour-aldridge-abacus`'s `good_lp` usage for
// the idiomatic Rust realization (no native element/min-equality/
// only-enforce-if constraints in a linear MILP modeller, so both are lowered
// to the big-M disjunctions described in spec Design Notes 1-3).

use std::collections::HashMap;
use std::collections::HashSet;

use good_lp::{constraint, variable, Constraint, Expression, ProblemVariables, Variable};

use crate::chemistry::{CLUB_COUNT_MAX, CLUB_THRESHOLDS, LEAGUE_NATION_COUNT_MAX, LEAGUE_THRESHOLDS, NATION_THRESHOLDS};
use crate::player::Candidate;
use crate::position::EaId;

/// Scale factor applied to floating-point ratings before they enter the
/// integer objective, preserving two decimal places (spec §4.3).
pub const RATING_SCALE: f64 = 100.0;

/// Everything the solver needs after a successful model build: the variable
/// problem itself (consumed by `.maximise(...)`), the constraint set, the
/// objective, and the variable handles extraction needs to read back.
pub struct BuiltModel {
    pub vars: ProblemVariables,
    pub constraints: Vec<Constraint>,
    pub objective: Expression,
    pub x: HashMap<(usize, usize), Variable>,
    pub slot_chem: Vec<Variable>,
}

/// Build the full model for an 11-slot candidate assignment problem.
pub fn build(
    candidates: &[Vec<Candidate>],
    budget: u64,
    min_chemistry: i64,
    include: &HashSet<EaId>,
) -> BuiltModel {
    let mut vars = ProblemVariables::new();
    let mut constraints = Vec::new();

    // --- Decision variables: x[s, c] ---------------------------------
    let mut x: HashMap<(usize, usize), Variable> = HashMap::new();
    for (s, slot_candidates) in candidates.iter().enumerate() {
        for c in 0..slot_candidates.len() {
            let var = vars.add(variable().name(format!("x_{s}_{c}")).binary());
            x.insert((s, c), var);
        }
    }

    // --- C1: exactly one candidate per slot ---------------------------
    for (s, slot_candidates) in candidates.iter().enumerate() {
        let sum: Expression = (0..slot_candidates.len())
            .map(|c| Expression::from(x[&(s, c)]))
            .sum();
        constraints.push(constraint!(sum == 1.0));
    }

    // --- C2: ea_id uniqueness across all slots ------------------------
    let mut by_ea_id: HashMap<EaId, Vec<(usize, usize)>> = HashMap::new();
    for (s, slot_candidates) in candidates.iter().enumerate() {
        for (c, cand) in slot_candidates.iter().enumerate() {
            by_ea_id.entry(cand.ea_id()).or_default().push((s, c));
        }
    }
    for positions in by_ea_id.values() {
        if positions.len() > 1 {
            let sum: Expression = positions.iter().map(|&(s, c)| Expression::from(x[&(s, c)])).sum();
            constraints.push(constraint!(sum <= 1.0));
        }
    }

    // --- C3: normalised-name uniqueness across all slots --------------
    let mut by_name: HashMap<String, Vec<(usize, usize)>> = HashMap::new();
    for (s, slot_candidates) in candidates.iter().enumerate() {
        for (c, cand) in slot_candidates.iter().enumerate() {
            let name = cand.normalized_name();
            if !name.is_empty() {
                by_name.entry(name).or_default().push((s, c));
            }
        }
    }
    for positions in by_name.values() {
        if positions.len() > 1 {
            let sum: Expression = positions.iter().map(|&(s, c)| Expression::from(x[&(s, c)])).sum();
            constraints.push(constraint!(sum <= 1.0));
        }
    }

    // --- C4: mandatory inclusion --------------------------------------
    for &required in include {
        if let Some(positions) = by_ea_id.get(&required) {
            let sum: Expression = positions.iter().map(|&(s, c)| Expression::from(x[&(s, c)])).sum();
            constraints.push(constraint!(sum == 1.0));
        }
    }

    // --- C5: budget -----------------------------------------------------
    let budget_sum: Expression = candidates
        .iter()
        .enumerate()
        .flat_map(|(s, slot_candidates)| {
            slot_candidates
                .iter()
                .enumerate()
                .map(move |(c, cand)| (cand.effective_price as f64) * x[&(s, c)])
        })
        .sum();
    constraints.push(constraint!(budget_sum <= budget as f64));

    // --- Chemistry encoding --------------------------------------------
    let club_pts = build_affiliation_pts(
        &mut vars,
        &mut constraints,
        candidates,
        &x,
        CLUB_COUNT_MAX,
        CLUB_THRESHOLDS,
        "club",
        |cand| cand.player.club_id,
        |_cand| 1.0,
    );
    let league_pts = build_affiliation_pts(
        &mut vars,
        &mut constraints,
        candidates,
        &x,
        LEAGUE_NATION_COUNT_MAX,
        LEAGUE_THRESHOLDS,
        "league",
        |cand| cand.player.league_id,
        |cand| if cand.player.is_hero { 2.0 } else { 1.0 },
    );
    let nation_pts = build_affiliation_pts(
        &mut vars,
        &mut constraints,
        candidates,
        &x,
        LEAGUE_NATION_COUNT_MAX,
        NATION_THRESHOLDS,
        "nation",
        |cand| cand.player.nation_id,
        |cand| if cand.player.is_icon { 2.0 } else { 1.0 },
    );

    // --- Per-slot chemistry variable and conditional equalities --------
    let mut slot_chem = Vec::with_capacity(candidates.len());
    for (s, slot_candidates) in candidates.iter().enumerate() {
        let chem_var = vars.add(
            variable()
                .name(format!("slot_chem_{s}"))
                .integer()
                .min(0.0)
                .max(3.0),
        );

        for (c, cand) in slot_candidates.iter().enumerate() {
            let is_selected = x[&(s, c)];

            if cand.player.is_icon || cand.player.is_hero {
                add_conditional_equality(&mut constraints, is_selected, chem_var.into(), 3.0.into());
                continue;
            }

            let zero = Expression::from(0.0);
            let club_term = cand
                .player
                .club_id
                .and_then(|id| club_pts.get(&id))
                .cloned()
                .unwrap_or_else(|| zero.clone());
            let league_term = cand
                .player
                .league_id
                .and_then(|id| league_pts.get(&id))
                .cloned()
                .unwrap_or_else(|| zero.clone());
            let nation_term = cand
                .player
                .nation_id
                .and_then(|id| nation_pts.get(&id))
                .cloned()
                .unwrap_or(zero);

            let total = club_term + league_term + nation_term;
            let capped = add_cap_at_three(
                &mut vars,
                &mut constraints,
                total,
                &format!("chem_{s}_{c}"),
            );

            add_conditional_equality(&mut constraints, is_selected, chem_var.into(), capped.into());
        }

        slot_chem.push(chem_var);
    }

    // --- C6: global chemistry floor (hard constraint) -------------------
    let chem_sum: Expression = slot_chem.iter().map(|&v| Expression::from(v)).sum();
    constraints.push(constraint!(chem_sum >= min_chemistry as f64));

    // --- Objective: maximise scaled rating -------------------------------
    let objective: Expression = candidates
        .iter()
        .enumerate()
        .flat_map(|(s, slot_candidates)| {
            slot_candidates.iter().enumerate().map(move |(c, cand)| {
                let scaled = (cand.rating * RATING_SCALE).round();
                scaled * x[&(s, c)]
            })
        })
        .sum();

    BuiltModel {
        vars,
        constraints,
        objective,
        x,
        slot_chem,
    }
}

/// Build the shared affiliation-count variable and per-id chemistry-points
/// expression for one dimension (club, league, or nation).
///
/// Returns a map from affiliation id to the `pts(count)` expression, so that
/// multiple candidates sharing the same id reuse the same tier variables
/// rather than duplicating them (numerically identical to creating one set
/// per candidate, as spec §4.3 describes, since the points value depends
/// only on the shared count).
fn build_affiliation_pts(
    vars: &mut ProblemVariables,
    constraints: &mut Vec<Constraint>,
    candidates: &[Vec<Candidate>],
    x: &HashMap<(usize, usize), Variable>,
    count_max: i64,
    thresholds: &[(i64, i64)],
    label: &str,
    id_of: impl Fn(&Candidate) -> Option<i64>,
    multiplier_of: impl Fn(&Candidate) -> f64,
) -> HashMap<i64, Expression> {
    let mut terms_by_id: HashMap<i64, Vec<(usize, usize, f64)>> = HashMap::new();
    for (s, slot_candidates) in candidates.iter().enumerate() {
        for (c, cand) in slot_candidates.iter().enumerate() {
            if let Some(id) = id_of(cand) {
                terms_by_id
                    .entry(id)
                    .or_default()
                    .push((s, c, multiplier_of(cand)));
            }
        }
    }

    let mut pts_by_id = HashMap::new();
    for (id, terms) in terms_by_id {
        let count_var = vars.add(
            variable()
                .name(format!("{label}_count_{id}"))
                .integer()
                .min(0.0)
                .max(count_max as f64),
        );
        let sum: Expression = terms
            .iter()
            .map(|&(s, c, mult)| mult * x[&(s, c)])
            .sum();
        constraints.push(constraint!(Expression::from(count_var) == sum));

        let pts_expr = add_tier_indicators(
            vars,
            constraints,
            count_var,
            count_max,
            thresholds,
            &format!("{label}_{id}"),
        );
        pts_by_id.insert(id, pts_expr);
    }
    pts_by_id
}

/// Encode `pts(count_var)` as a telescoping sum of exact threshold-crossing
/// indicators: `tier_k = 1` iff `count_var >= threshold_k`. Exact for
/// integer `count_var` bounded by `count_max` (Design Note 1: a disjunction
/// over count ranges, equivalent to a native element/table constraint).
fn add_tier_indicators(
    vars: &mut ProblemVariables,
    constraints: &mut Vec<Constraint>,
    count_var: Variable,
    count_max: i64,
    thresholds: &[(i64, i64)],
    name_prefix: &str,
) -> Expression {
    let m = count_max as f64;
    let mut pts_expr = Expression::from(0.0);
    let mut prev_points = 0i64;

    for (i, &(threshold, points)) in thresholds.iter().enumerate() {
        let tier = vars.add(
            variable()
                .name(format!("{name_prefix}_tier{i}"))
                .binary(),
        );

        // tier = 1 only if count_var >= threshold.
        constraints.push(constraint!(
            Expression::from(count_var) - (threshold as f64) + 1.0 <= m * tier
        ));
        // tier = 1 forces count_var >= threshold.
        constraints.push(constraint!(
            (threshold as f64) - Expression::from(count_var) <= m * (1.0 - tier)
        ));

        let weight = (points - prev_points) as f64;
        pts_expr = pts_expr + weight * tier;
        prev_points = points;
    }

    pts_expr
}

/// Encode `capped = min(total, 3)` exactly, for `total` an integer
/// expression bounded in `[0, 9]` (club_pts + league_pts + nation_pts, each
/// in `[0, 3]`). Design Note 2: prefer a native min constraint; this is the
/// big-M linearisation with a tight bound (M = 9).
fn add_cap_at_three(
    vars: &mut ProblemVariables,
    constraints: &mut Vec<Constraint>,
    total: Expression,
    name_prefix: &str,
) -> Variable {
    const M: f64 = 9.0;

    let capped = vars.add(
        variable()
            .name(format!("{name_prefix}_capped"))
            .integer()
            .min(0.0)
            .max(3.0),
    );
    let is_over = vars.add(variable().name(format!("{name_prefix}_over3")).binary());

    // is_over = 1 iff total >= 4.
    constraints.push(constraint!(total.clone() - 3.0 <= M * is_over));
    constraints.push(constraint!(4.0 - total.clone() <= M * (1.0 - is_over)));

    // capped <= total always; capped >= total when total <= 3 (is_over = 0);
    // capped >= 3 when total >= 4 (is_over = 1). Combined with the domain
    // bound capped <= 3, this pins capped = min(total, 3) exactly.
    constraints.push(constraint!(Expression::from(capped) <= total.clone()));
    constraints.push(constraint!(Expression::from(capped) >= total - M * is_over));
    constraints.push(constraint!(
        Expression::from(capped) >= 3.0 - M * (1.0 - is_over)
    ));

    capped
}

/// Encode `x = 1 => lhs = rhs` (Design Note 3: CP-SAT's `OnlyEnforceIf` on an
/// equality, lowered to the standard two-inequality big-M gate). Both sides
/// live in `[0, 3]`, so `M = 3` is the tightest valid bound.
fn add_conditional_equality(
    constraints: &mut Vec<Constraint>,
    x: Variable,
    lhs: Expression,
    rhs: Expression,
) {
    const M: f64 = 3.0;
    constraints.push(constraint!(lhs.clone() - rhs.clone() <= M * (1.0 - x)));
    constraints.push(constraint!(rhs - lhs <= M * (1.0 - x)));
}
