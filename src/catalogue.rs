// Player catalogue: the dependency-injected read interface the Candidate
// Provider queries, replacing the source's global MongoDB handle.

use std::collections::HashSet;
use std::path::Path;

use serde::Deserialize;

use crate::player::Player;
use crate::position::{EaId, Position};

/// Parameters for a single position-indexed catalogue lookup.
///
/// Mirrors the source's Mongo query shape directly: the base predicate is
/// "rated at this position, meets min_rating, meets owned_only", OR'd with
/// "rated at this position AND in `include`" so that required players survive
/// a query that would otherwise have excluded them (§4.2 rule 2 and 3).
pub struct CandidateQuery<'a> {
    pub position: Position,
    pub min_rating: f64,
    pub owned_only: bool,
    pub owned: &'a HashSet<EaId>,
    pub include: &'a HashSet<EaId>,
    pub limit: usize,
}

/// The two read operations the core needs from an external catalogue.
///
/// Implementations may realise this as an indexed query on a document store;
/// the contract is the ordering (descending by position rating, stable
/// ascending-`ea_id` tie-break) and the bound (`limit + |include|`), not a
/// particular storage engine.
pub trait PlayerCatalogue {
    /// Players eligible at `query.position`, matching the base filter or the
    /// include-set bypass, sorted descending by position rating (ties broken
    /// by ascending `ea_id`), truncated to `query.limit + query.include.len()`.
    fn candidates_for_position(&self, query: CandidateQuery<'_>) -> Vec<Player>;

    /// Single player lookup by identity, for the mandatory-inclusion
    /// pre-flight checks.
    fn player(&self, ea_id: EaId) -> Option<Player>;
}

/// A fixture-backed catalogue held entirely in memory.
///
/// This is the one concrete `PlayerCatalogue` this crate ships; a real
/// deployment would have scrapers and a document store populate something
/// with the same trait, out of scope here (§1).
#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalogue {
    players: Vec<Player>,
}

impl InMemoryCatalogue {
    pub fn new(players: Vec<Player>) -> Self {
        InMemoryCatalogue { players }
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    /// Load a catalogue from a JSON array of `Player` records.
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, CatalogueError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| CatalogueError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let players: Vec<Player> =
            serde_json::from_str(&text).map_err(|source| CatalogueError::Json {
                path: path.display().to_string(),
                source,
            })?;
        Ok(InMemoryCatalogue { players })
    }

    /// Load a catalogue from a flat CSV of players with a single rating
    /// column per supported position (empty cell = ineligible).
    ///
    /// Expected header: `ea_id,name,club_id,league_id,nation_id,market_price,
    /// is_icon,is_hero,GK,RB,RWB,CB,LB,LWB,CDM,RM,CM,LM,CAM,RF,RW,ST,LW,LF,CF`.
    pub fn load_csv(path: impl AsRef<Path>) -> Result<Self, CatalogueError> {
        let path = path.as_ref();
        let mut reader = csv::Reader::from_path(path).map_err(|source| CatalogueError::Csv {
            path: path.display().to_string(),
            source,
        })?;

        let mut players = Vec::new();
        for record in reader.deserialize() {
            let raw: RawCsvPlayer = record.map_err(|source| CatalogueError::Csv {
                path: path.display().to_string(),
                source,
            })?;
            players.push(raw.into_player());
        }

        Ok(InMemoryCatalogue { players })
    }
}

impl PlayerCatalogue for InMemoryCatalogue {
    fn candidates_for_position(&self, query: CandidateQuery<'_>) -> Vec<Player> {
        let CandidateQuery {
            position,
            min_rating,
            owned_only,
            owned,
            include,
            limit,
        } = query;

        let mut eligible: Vec<&Player> = self
            .players
            .iter()
            .filter(|p| p.rating_at(position).map(|r| r > 0.0).unwrap_or(false))
            .filter(|p| {
                let is_required = include.contains(&p.ea_id);
                let meets_base = p.rating_at(position).unwrap_or(0.0) >= min_rating
                    && (!owned_only || owned.contains(&p.ea_id));
                meets_base || is_required
            })
            .collect();

        eligible.sort_by(|a, b| {
            let ra = a.rating_at(position).unwrap_or(0.0);
            let rb = b.rating_at(position).unwrap_or(0.0);
            rb.partial_cmp(&ra)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.ea_id.cmp(&b.ea_id))
        });

        eligible
            .into_iter()
            .take(limit + include.len())
            .cloned()
            .collect()
    }

    fn player(&self, ea_id: EaId) -> Option<Player> {
        self.players.iter().find(|p| p.ea_id == ea_id).cloned()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CatalogueError {
    #[error("failed to read catalogue file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to parse catalogue JSON {path}: {source}")]
    Json {
        path: String,
        source: serde_json::Error,
    },
    #[error("failed to parse catalogue CSV {path}: {source}")]
    Csv { path: String, source: csv::Error },
}

#[derive(Debug, Deserialize)]
struct RawCsvPlayer {
    ea_id: i64,
    name: String,
    #[serde(default)]
    club_id: Option<i64>,
    #[serde(default)]
    league_id: Option<i64>,
    #[serde(default)]
    nation_id: Option<i64>,
    #[serde(default)]
    market_price: Option<u64>,
    #[serde(default)]
    is_icon: bool,
    #[serde(default)]
    is_hero: bool,
    #[serde(default)]
    gk: Option<f64>,
    #[serde(default)]
    rb: Option<f64>,
    #[serde(default)]
    rwb: Option<f64>,
    #[serde(default)]
    cb: Option<f64>,
    #[serde(default)]
    lb: Option<f64>,
    #[serde(default)]
    lwb: Option<f64>,
    #[serde(default)]
    cdm: Option<f64>,
    #[serde(default)]
    rm: Option<f64>,
    #[serde(default)]
    cm: Option<f64>,
    #[serde(default)]
    lm: Option<f64>,
    #[serde(default)]
    cam: Option<f64>,
    #[serde(default)]
    rf: Option<f64>,
    #[serde(default)]
    rw: Option<f64>,
    #[serde(default)]
    st: Option<f64>,
    #[serde(default)]
    lw: Option<f64>,
    #[serde(default)]
    lf: Option<f64>,
    #[serde(default)]
    cf: Option<f64>,
}

impl RawCsvPlayer {
    fn into_player(self) -> Player {
        let mut ratings_by_position = std::collections::HashMap::new();
        let mut insert = |pos: Position, rating: Option<f64>| {
            if let Some(r) = rating {
                if r > 0.0 {
                    ratings_by_position.insert(pos, r);
                }
            }
        };
        insert(Position::GK, self.gk);
        insert(Position::RB, self.rb);
        insert(Position::RWB, self.rwb);
        insert(Position::CB, self.cb);
        insert(Position::LB, self.lb);
        insert(Position::LWB, self.lwb);
        insert(Position::CDM, self.cdm);
        insert(Position::RM, self.rm);
        insert(Position::CM, self.cm);
        insert(Position::LM, self.lm);
        insert(Position::CAM, self.cam);
        insert(Position::RF, self.rf);
        insert(Position::RW, self.rw);
        insert(Position::ST, self.st);
        insert(Position::LW, self.lw);
        insert(Position::LF, self.lf);
        insert(Position::CF, self.cf);

        Player {
            ea_id: EaId(self.ea_id),
            name: self.name,
            club_id: self.club_id,
            league_id: self.league_id,
            nation_id: self.nation_id,
            market_price: self.market_price,
            ratings_by_position,
            is_icon: self.is_icon,
            is_hero: self.is_hero,
        }
    }
}
