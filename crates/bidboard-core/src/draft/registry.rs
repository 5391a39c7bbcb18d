// Player pool: lookup, ad-hoc insertion, filtered views and CSV import.

use std::collections::{BTreeSet, HashMap};
use std::io::Read;
use std::path::Path;

use serde::Deserialize;
use tracing::{info, warn};

use crate::error::{DraftError, Result};

use super::player::{Player, Position};

/// Team recorded for players added during the draft.
pub const UNKNOWN_TEAM: &str = "Unknown";

/// Optional criteria for listing undrafted players. `None` matches anything.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlayerFilter {
    pub position: Option<Position>,
    pub tier: Option<u32>,
    pub tag: Option<String>,
}

impl PlayerFilter {
    fn matches(&self, player: &Player) -> bool {
        self.position.as_ref().map_or(true, |p| *p == player.position)
            && self.tier.map_or(true, |t| t == player.tier)
            && self.tag.as_deref().map_or(true, |t| t == player.tag)
    }
}

/// The full player pool, indexed by exact name.
#[derive(Debug, Clone, Default)]
pub struct PlayerRegistry {
    players: Vec<Player>,
    index: HashMap<String, usize>,
}

impl PlayerRegistry {
    /// Build a registry from already-parsed players. Later duplicates of a
    /// name are dropped.
    pub fn new(players: Vec<Player>) -> Self {
        let mut registry = PlayerRegistry::default();
        for player in players {
            if registry.index.contains_key(&player.name) {
                warn!("skipping duplicate player '{}'", player.name);
                continue;
            }
            registry.insert(player);
        }
        registry
    }

    fn insert(&mut self, player: Player) -> usize {
        let idx = self.players.len();
        self.index.insert(player.name.clone(), idx);
        self.players.push(player);
        idx
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Player> {
        self.players.iter()
    }

    /// Exact, case-sensitive lookup.
    pub fn find_by_name(&self, name: &str) -> Result<&Player> {
        self.index
            .get(name)
            .map(|&i| &self.players[i])
            .ok_or_else(|| DraftError::player_not_found(name))
    }

    pub fn find_by_name_mut(&mut self, name: &str) -> Result<&mut Player> {
        match self.index.get(name) {
            Some(&i) => Ok(&mut self.players[i]),
            None => Err(DraftError::player_not_found(name)),
        }
    }

    /// Add a player who is missing from the imported pool. Returns the
    /// existing record if the name is already present.
    pub fn add_ad_hoc(&mut self, name: &str, position: Position) -> Result<&Player> {
        let name = name.trim();
        if name.is_empty() {
            return Err(DraftError::InvalidInput("player name is blank".into()));
        }
        let idx = match self.index.get(name) {
            Some(&i) => i,
            None => {
                info!("Adding ad-hoc player '{}' ({})", name, position);
                self.insert(Player::new(name, position, UNKNOWN_TEAM, 0, ""))
            }
        };
        Ok(&self.players[idx])
    }

    /// Names of undrafted players matching `filter`, sorted alphabetically.
    ///
    /// Recomputed on every call; nothing is cached between calls.
    pub fn filter<'a>(&'a self, filter: &PlayerFilter) -> impl Iterator<Item = &'a str> + 'a {
        let mut names: Vec<&str> = self
            .players
            .iter()
            .filter(|p| !p.is_sold() && filter.matches(p))
            .map(|p| p.name.as_str())
            .collect();
        names.sort_unstable();
        names.into_iter()
    }

    /// Distinct positions in the pool.
    pub fn positions(&self) -> Vec<Position> {
        let set: BTreeSet<&Position> = self.players.iter().map(|p| &p.position).collect();
        set.into_iter().cloned().collect()
    }

    /// Distinct tiers in the pool, ascending.
    pub fn tiers(&self) -> Vec<u32> {
        let set: BTreeSet<u32> = self.players.iter().map(|p| p.tier).collect();
        set.into_iter().collect()
    }

    /// Distinct non-empty scouting tags in the pool.
    pub fn tags(&self) -> Vec<String> {
        let set: BTreeSet<&str> = self
            .players
            .iter()
            .map(|p| p.tag.as_str())
            .filter(|t| !t.is_empty())
            .collect();
        set.into_iter().map(String::from).collect()
    }

    /// Sold players in pick order.
    pub fn sold(&self) -> Vec<&Player> {
        let mut sold: Vec<&Player> = self.players.iter().filter(|p| p.is_sold()).collect();
        sold.sort_by_key(|p| p.pick);
        sold
    }
}

// ---------------------------------------------------------------------------
// CSV import
// ---------------------------------------------------------------------------

/// One row of the player pool CSV.
#[derive(Debug, Deserialize)]
struct RawPlayerRow {
    #[serde(rename = "Name")]
    name: String,
    #[serde(rename = "Position")]
    position: String,
    #[serde(rename = "Team", default)]
    team: String,
    #[serde(rename = "Tier")]
    tier: String,
    #[serde(rename = "TAD", default)]
    tad: String,
}

impl RawPlayerRow {
    fn into_player(self) -> std::result::Result<Player, String> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err("blank name".into());
        }
        let position = Position::from_str_pos(&self.position)
            .ok_or_else(|| format!("'{name}' has a blank position"))?;
        let tier = self
            .tier
            .trim()
            .parse::<u32>()
            .map_err(|_| format!("'{name}' has non-integer tier '{}'", self.tier.trim()))?;
        Ok(Player::new(
            name,
            position,
            self.team.trim(),
            tier,
            self.tad.trim(),
        ))
    }
}

fn players_from_reader<R: Read>(rdr: R) -> std::result::Result<Vec<Player>, csv::Error> {
    let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::Headers).from_reader(rdr);
    let mut players = Vec::new();
    for result in reader.deserialize::<RawPlayerRow>() {
        match result {
            Ok(raw) => match raw.into_player() {
                Ok(player) => players.push(player),
                Err(reason) => warn!("skipping player row: {}", reason),
            },
            Err(e) => {
                warn!("skipping malformed player row: {}", e);
            }
        }
    }
    Ok(players)
}

impl PlayerRegistry {
    /// Parse a player pool from any reader. Malformed rows are skipped with
    /// a warning.
    pub fn from_reader<R: Read>(rdr: R) -> std::result::Result<Self, csv::Error> {
        Ok(PlayerRegistry::new(players_from_reader(rdr)?))
    }

    /// Load the player pool CSV (`Name, Position, Team, Tier, TAD`).
    pub fn load(path: &Path) -> Result<Self> {
        let file = std::fs::File::open(path).map_err(|source| DraftError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let registry = PlayerRegistry::from_reader(file).map_err(|source| DraftError::Csv {
            path: path.to_path_buf(),
            source,
        })?;
        info!("Loaded {} players from {}", registry.len(), path.display());
        Ok(registry)
    }
}
