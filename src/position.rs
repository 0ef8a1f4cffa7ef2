// Position codes and the stable player identity newtype.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A field position eligible to fill one lineup slot.
///
/// This is a closed set: every slot in a returned lineup carries exactly one
/// of these, and every player's `ratings_by_position` keys are drawn from the
/// same set (absence of a key means ineligibility at that position).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Position {
    GK,
    RB,
    RWB,
    CB,
    LB,
    LWB,
    CDM,
    RM,
    CM,
    LM,
    CAM,
    RF,
    RW,
    ST,
    LW,
    LF,
    CF,
}

impl Position {
    /// All positions in the closed set, in a fixed (alphabetical-ish, stable)
    /// order used wherever a deterministic iteration is needed.
    pub const ALL: [Position; 17] = [
        Position::GK,
        Position::RB,
        Position::RWB,
        Position::CB,
        Position::LB,
        Position::LWB,
        Position::CDM,
        Position::RM,
        Position::CM,
        Position::LM,
        Position::CAM,
        Position::RF,
        Position::RW,
        Position::ST,
        Position::LW,
        Position::LF,
        Position::CF,
    ];

    /// Parse a position code string (case-insensitive).
    pub fn from_str_pos(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "GK" => Some(Position::GK),
            "RB" => Some(Position::RB),
            "RWB" => Some(Position::RWB),
            "CB" => Some(Position::CB),
            "LB" => Some(Position::LB),
            "LWB" => Some(Position::LWB),
            "CDM" => Some(Position::CDM),
            "RM" => Some(Position::RM),
            "CM" => Some(Position::CM),
            "LM" => Some(Position::LM),
            "CAM" => Some(Position::CAM),
            "RF" => Some(Position::RF),
            "RW" => Some(Position::RW),
            "ST" => Some(Position::ST),
            "LW" => Some(Position::LW),
            "LF" => Some(Position::LF),
            "CF" => Some(Position::CF),
            _ => None,
        }
    }

    /// Display string for this position (the inverse of `from_str_pos`).
    pub fn display_str(&self) -> &'static str {
        match self {
            Position::GK => "GK",
            Position::RB => "RB",
            Position::RWB => "RWB",
            Position::CB => "CB",
            Position::LB => "LB",
            Position::LWB => "LWB",
            Position::CDM => "CDM",
            Position::RM => "RM",
            Position::CM => "CM",
            Position::LM => "LM",
            Position::CAM => "CAM",
            Position::RF => "RF",
            Position::RW => "RW",
            Position::ST => "ST",
            Position::LW => "LW",
            Position::LF => "LF",
            Position::CF => "CF",
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_str())
    }
}

/// Stable integer identity of a specific player card.
///
/// Kept as a newtype rather than a bare `i64` so it can't be confused with
/// `club_id`/`league_id`/`nation_id` at call sites.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EaId(pub i64);

impl fmt::Display for EaId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_every_position() {
        for pos in Position::ALL {
            let s = pos.display_str();
            assert_eq!(Position::from_str_pos(s), Some(pos));
        }
    }

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!(Position::from_str_pos("st"), Some(Position::ST));
        assert_eq!(Position::from_str_pos("St"), Some(Position::ST));
    }

    #[test]
    fn rejects_unknown_codes() {
        assert_eq!(Position::from_str_pos("QB"), None);
        assert_eq!(Position::from_str_pos(""), None);
    }
}
