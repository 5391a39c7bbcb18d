// Player records and football positions.

use serde::{Serialize, Serializer};
use std::fmt;

/// Football positions used for filtering and display.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Position {
    Quarterback,
    RunningBack,
    WideReceiver,
    TightEnd,
    Kicker,
    Defense,
    /// Any label outside the standard set (e.g. "FLEX", "IDP").
    Flex(String),
}

impl Position {
    /// Parse a position string.
    ///
    /// Handles the common abbreviations:
    /// - "QB", "RB", "WR", "TE"
    /// - "K" / "PK" -> Kicker
    /// - "DST" / "D/ST" / "DEF" -> Defense
    ///
    /// Anything else that is not blank becomes `Flex` with the upper-cased
    /// label. Returns `None` for a blank string.
    pub fn from_str_pos(s: &str) -> Option<Self> {
        let upper = s.trim().to_uppercase();
        match upper.as_str() {
            "" => None,
            "QB" => Some(Position::Quarterback),
            "RB" => Some(Position::RunningBack),
            "WR" => Some(Position::WideReceiver),
            "TE" => Some(Position::TightEnd),
            "K" | "PK" => Some(Position::Kicker),
            "DST" | "D/ST" | "DEF" => Some(Position::Defense),
            _ => Some(Position::Flex(upper)),
        }
    }

    /// Return the display string for this position.
    pub fn display_str(&self) -> &str {
        match self {
            Position::Quarterback => "QB",
            Position::RunningBack => "RB",
            Position::WideReceiver => "WR",
            Position::TightEnd => "TE",
            Position::Kicker => "K",
            Position::Defense => "DST",
            Position::Flex(label) => label,
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.display_str())
    }
}

impl Serialize for Position {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(self.display_str())
    }
}

/// Where a player sits in the draft lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PlayerStatus {
    Undrafted,
    Nominated,
    Sold,
}

/// A player in the pool, plus the draft-state fields stamped on it as the
/// auction progresses.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Player {
    pub name: String,
    pub position: Position,
    pub team: String,
    pub tier: u32,
    /// Target/Avoid/Dart-throw scouting label. Free-form, may be empty.
    pub tag: String,
    pub nominating_owner: Option<String>,
    pub buying_owner: Option<String>,
    /// Sale price, 0 until sold.
    pub price: u32,
    /// Overall pick number, 0 until sold.
    pub pick: u32,
}

impl Player {
    pub fn new(name: &str, position: Position, team: &str, tier: u32, tag: &str) -> Self {
        Player {
            name: name.to_string(),
            position,
            team: team.to_string(),
            tier,
            tag: tag.to_string(),
            nominating_owner: None,
            buying_owner: None,
            price: 0,
            pick: 0,
        }
    }

    pub fn status(&self) -> PlayerStatus {
        if self.buying_owner.is_some() {
            PlayerStatus::Sold
        } else if self.nominating_owner.is_some() {
            PlayerStatus::Nominated
        } else {
            PlayerStatus::Undrafted
        }
    }

    pub fn is_sold(&self) -> bool {
        self.status() == PlayerStatus::Sold
    }

    /// Clear the sale and the nomination, leaving the player undrafted.
    pub(crate) fn revert_sale(&mut self) {
        self.buying_owner = None;
        self.nominating_owner = None;
        self.price = 0;
        self.pick = 0;
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}, {}) tier {}",
            self.name, self.position, self.team, self.tier
        )?;
        if !self.tag.is_empty() {
            write!(f, " [{}]", self.tag)?;
        }
        match (&self.buying_owner, &self.nominating_owner) {
            (Some(buyer), _) => write!(f, " sold to {} for ${} (pick {})", buyer, self.price, self.pick),
            (None, Some(nominator)) => write!(f, " nominated by {}", nominator),
            (None, None) => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_standard_positions() {
        assert_eq!(Position::from_str_pos("qb"), Some(Position::Quarterback));
        assert_eq!(Position::from_str_pos("RB"), Some(Position::RunningBack));
        assert_eq!(Position::from_str_pos(" WR "), Some(Position::WideReceiver));
        assert_eq!(Position::from_str_pos("TE"), Some(Position::TightEnd));
        assert_eq!(Position::from_str_pos("PK"), Some(Position::Kicker));
        assert_eq!(Position::from_str_pos("D/ST"), Some(Position::Defense));
        assert_eq!(Position::from_str_pos("def"), Some(Position::Defense));
    }

    #[test]
    fn unknown_position_is_flex() {
        assert_eq!(
            Position::from_str_pos("idp"),
            Some(Position::Flex("IDP".into()))
        );
        assert_eq!(Position::from_str_pos("   "), None);
    }

    #[test]
    fn display_round_trips_through_parse() {
        for pos in [
            Position::Quarterback,
            Position::RunningBack,
            Position::WideReceiver,
            Position::TightEnd,
            Position::Kicker,
            Position::Defense,
        ] {
            assert_eq!(Position::from_str_pos(pos.display_str()), Some(pos));
        }
    }

    #[test]
    fn status_follows_draft_fields() {
        let mut p = Player::new("Josh Allen", Position::Quarterback, "BUF", 1, "Target");
        assert_eq!(p.status(), PlayerStatus::Undrafted);

        p.nominating_owner = Some("Seth".into());
        assert_eq!(p.status(), PlayerStatus::Nominated);

        p.buying_owner = Some("Lance".into());
        p.price = 30;
        p.pick = 4;
        assert_eq!(p.status(), PlayerStatus::Sold);

        p.revert_sale();
        assert_eq!(p.status(), PlayerStatus::Undrafted);
        assert_eq!(p.nominating_owner, None);
        assert_eq!(p.price, 0);
        assert_eq!(p.pick, 0);
    }

    #[test]
    fn display_shows_sale() {
        let mut p = Player::new("Josh Allen", Position::Quarterback, "BUF", 1, "Target");
        assert_eq!(p.to_string(), "Josh Allen (QB, BUF) tier 1 [Target]");
        p.buying_owner = Some("Lance".into());
        p.price = 30;
        p.pick = 4;
        assert_eq!(
            p.to_string(),
            "Josh Allen (QB, BUF) tier 1 [Target] sold to Lance for $30 (pick 4)"
        );
    }

    #[test]
    fn position_serializes_as_abbreviation() {
        let json = serde_json::to_string(&Position::Defense).unwrap();
        assert_eq!(json, "\"DST\"");
    }
}
