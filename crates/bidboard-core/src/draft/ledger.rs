// Owner budgets and rosters.
//
// `buy` and `refund` are the only code paths that change an owner's budget or
// roster; the fields are private to this module.

use serde::Serialize;
use std::fmt;

use crate::error::{DraftError, Result};

use super::player::{Player, Position};

/// One team in the draft.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Owner {
    name: String,
    nomination_number: u32,
    is_mine: bool,
    salary_cap: u32,
    roster_limit: usize,
    budget: u32,
    /// Names of drafted players, in the order they were bought.
    roster: Vec<String>,
}

impl Owner {
    pub fn new(
        name: &str,
        nomination_number: u32,
        is_mine: bool,
        salary_cap: u32,
        roster_limit: usize,
    ) -> Self {
        Owner {
            name: name.to_string(),
            nomination_number,
            is_mine,
            salary_cap,
            roster_limit,
            budget: salary_cap,
            roster: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn nomination_number(&self) -> u32 {
        self.nomination_number
    }

    pub fn is_mine(&self) -> bool {
        self.is_mine
    }

    /// Remaining budget.
    pub fn budget(&self) -> u32 {
        self.budget
    }

    /// Total spent so far.
    pub fn spent(&self) -> u32 {
        self.salary_cap - self.budget
    }

    pub fn roster(&self) -> &[String] {
        &self.roster
    }

    pub fn roster_limit(&self) -> usize {
        self.roster_limit
    }

    pub fn open_slots(&self) -> usize {
        self.roster_limit.saturating_sub(self.roster.len())
    }

    pub fn is_full(&self) -> bool {
        self.roster.len() >= self.roster_limit
    }

    /// Maximum bid this owner can make.
    ///
    /// Must reserve $1 per empty slot (excluding the slot about to be filled).
    pub fn max_bid(&self) -> u32 {
        let open = self.open_slots();
        if open == 0 {
            return 0;
        }
        let reserved = u32::try_from(open - 1).unwrap_or(u32::MAX);
        self.budget.saturating_sub(reserved)
    }

    /// Check that a purchase at `price` would be accepted, without changing
    /// anything.
    pub fn check_purchase(&self, price: u32) -> Result<()> {
        if self.is_full() {
            return Err(DraftError::RosterFull {
                owner: self.name.clone(),
                limit: self.roster_limit,
            });
        }
        let max_bid = self.max_bid();
        if price > max_bid {
            return Err(DraftError::Unaffordable {
                owner: self.name.clone(),
                price,
                max_bid,
            });
        }
        Ok(())
    }

    /// Buy `player` at `price`, stamping the sale onto the player record.
    pub fn buy(
        &mut self,
        player: &mut Player,
        position: Position,
        team: &str,
        price: u32,
    ) -> Result<()> {
        self.check_purchase(price)?;

        self.roster.push(player.name.clone());
        self.budget -= price;

        player.buying_owner = Some(self.name.clone());
        player.position = position;
        player.team = team.to_string();
        player.price = price;
        Ok(())
    }

    /// Undo a `buy` of the named player at `price`.
    pub fn refund(&mut self, player_name: &str, price: u32) -> Result<()> {
        let idx = self
            .roster
            .iter()
            .rposition(|p| p == player_name)
            .ok_or_else(|| DraftError::player_not_found(player_name))?;
        let restored = self.budget.checked_add(price).filter(|b| *b <= self.salary_cap);
        let Some(budget) = restored else {
            return Err(DraftError::InvalidInput(format!(
                "refund of ${price} would push {} above the ${} cap",
                self.name, self.salary_cap
            )));
        };

        self.roster.remove(idx);
        self.budget = budget;
        Ok(())
    }
}

impl fmt::Display for Owner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: budget ${}, max bid ${}, {}/{} players",
            self.name,
            self.budget,
            self.max_bid(),
            self.roster.len(),
            self.roster_limit
        )
    }
}
