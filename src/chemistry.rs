// Chemistry Evaluator: the pure, ground-truth oracle for squad cohesion.
//
// Used both as a post-solve verification step (the solver's own `slot_chem`
// values must agree with a fresh run of this module) and, in tests, as the
// reference implementation the solver's linear encoding is checked against.

use crate::player::Player;

/// club: >=2 -> 1, >=4 -> 2, >=7 -> 3
pub const CLUB_THRESHOLDS: &[(i64, i64)] = &[(2, 1), (4, 2), (7, 3)];
/// league: >=3 -> 1, >=5 -> 2, >=8 -> 3
pub const LEAGUE_THRESHOLDS: &[(i64, i64)] = &[(3, 1), (5, 2), (8, 3)];
/// nation: >=2 -> 1, >=5 -> 2, >=8 -> 3
pub const NATION_THRESHOLDS: &[(i64, i64)] = &[(2, 1), (5, 2), (8, 3)];

/// Upper bound on a club affiliation count (11 players, no doubling).
pub const CLUB_COUNT_MAX: i64 = 11;
/// Upper bound on a league/nation affiliation count (doubled for heroes/icons).
pub const LEAGUE_NATION_COUNT_MAX: i64 = 22;

/// Map an affiliation count to chemistry points via a monotone step
/// function. `thresholds` must be sorted ascending by count.
fn points_from_threshold(count: i64, thresholds: &[(i64, i64)]) -> i64 {
    let mut points = 0;
    for &(threshold, pts) in thresholds {
        if count >= threshold {
            points = pts;
        } else {
            break;
        }
    }
    points
}

/// Count of lineup members (including `player` itself) sharing `player`'s
/// club, with no card-type multiplier.
pub fn club_count(players: &[&Player], player: &Player) -> i64 {
    let Some(club_id) = player.club_id else {
        return 0;
    };
    players.iter().filter(|p| p.club_id == Some(club_id)).count() as i64
}

/// Count of lineup members sharing `player`'s league, doubled for heroes.
pub fn league_count(players: &[&Player], player: &Player) -> i64 {
    let Some(league_id) = player.league_id else {
        return 0;
    };
    players
        .iter()
        .filter(|p| p.league_id == Some(league_id))
        .map(|p| if p.is_hero { 2 } else { 1 })
        .sum()
}

/// Count of lineup members sharing `player`'s nation, doubled for icons.
pub fn nation_count(players: &[&Player], player: &Player) -> i64 {
    let Some(nation_id) = player.nation_id else {
        return 0;
    };
    players
        .iter()
        .filter(|p| p.nation_id == Some(nation_id))
        .map(|p| if p.is_icon { 2 } else { 1 })
        .sum()
}

/// Per-player chemistry contribution, including the icon/hero override.
pub fn player_chemistry(players: &[&Player], player: &Player) -> i64 {
    if player.is_icon || player.is_hero {
        return 3;
    }

    let club_pts = points_from_threshold(club_count(players, player), CLUB_THRESHOLDS);
    let league_pts = points_from_threshold(league_count(players, player), LEAGUE_THRESHOLDS);
    let nation_pts = points_from_threshold(nation_count(players, player), NATION_THRESHOLDS);

    (club_pts + league_pts + nation_pts).min(3)
}

/// Detailed per-player breakdown, used for diagnostics and for populating
/// the solver response's `slot_chem` values.
#[derive(Debug, Clone)]
pub struct PlayerChemistryBreakdown {
    pub ea_id: crate::position::EaId,
    pub chemistry: i64,
    pub club_count: i64,
    pub league_count: i64,
    pub nation_count: i64,
}

/// Full squad chemistry breakdown: per-player detail plus the total.
#[derive(Debug, Clone)]
pub struct ChemistryBreakdown {
    pub total_chemistry: i64,
    pub players: Vec<PlayerChemistryBreakdown>,
}

/// Squad chemistry: sum of per-player contributions, in `[0, 33]`.
///
/// Returns 0 for a lineup whose length is not exactly 11 (an error in the
/// caller, not reported here — callers that need 11-length validation should
/// check `players.len()` themselves before calling).
pub fn squad_chemistry(players: &[&Player]) -> i64 {
    if players.len() != 11 {
        return 0;
    }
    players.iter().map(|p| player_chemistry(players, p)).sum()
}

/// Same as `squad_chemistry`, but with the per-player detail retained.
pub fn breakdown(players: &[&Player]) -> ChemistryBreakdown {
    if players.len() != 11 {
        return ChemistryBreakdown {
            total_chemistry: 0,
            players: Vec::new(),
        };
    }

    let mut total = 0;
    let mut rows = Vec::with_capacity(players.len());
    for &p in players {
        let chem = player_chemistry(players, p);
        total += chem;
        rows.push(PlayerChemistryBreakdown {
            ea_id: p.ea_id,
            chemistry: chem,
            club_count: club_count(players, p),
            league_count: league_count(players, p),
            nation_count: nation_count(players, p),
        });
    }

    ChemistryBreakdown {
        total_chemistry: total,
        players: rows,
    }
}
