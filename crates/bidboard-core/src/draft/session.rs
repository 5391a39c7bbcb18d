// Draft session: pick counter, rounds, nomination rotation, and the
// nominate / complete / undo operations that tie the ledger, the registry
// and the log together.

use std::collections::HashSet;

use tracing::{info, warn};

use crate::error::{DraftError, Result};

use super::ledger::Owner;
use super::log::{DraftLog, PickRecord, NO_OWNER};
use super::player::{Player, Position};
use super::registry::{PlayerFilter, PlayerRegistry};

/// Round for a given pick number.
pub fn round_for(pick: u32, num_owners: usize) -> u32 {
    let n = u32::try_from(num_owners.max(1)).unwrap_or(u32::MAX);
    pick / n + 1
}

/// The complete state of one auction draft.
#[derive(Debug)]
pub struct DraftSession {
    /// Owners in nomination order.
    owners: Vec<Owner>,
    registry: PlayerRegistry,
    log: DraftLog,
    pick: u32,
    round: u32,
    /// Index into `owners` of whoever nominates next.
    current_owner_idx: usize,
}

impl DraftSession {
    /// Start a new draft. Owners are ordered by nomination number; names and
    /// nomination numbers must be unique.
    pub fn new(mut owners: Vec<Owner>, registry: PlayerRegistry, log: DraftLog) -> Result<Self> {
        if owners.is_empty() {
            return Err(DraftError::InvalidInput("a draft needs at least one owner".into()));
        }
        let mut names = HashSet::new();
        let mut numbers = HashSet::new();
        for owner in &owners {
            if owner.name().trim().is_empty() {
                return Err(DraftError::InvalidInput("owner name is blank".into()));
            }
            // The log matches owner names exactly and reads "None" as no owner.
            if owner.name() != owner.name().trim() {
                return Err(DraftError::InvalidInput(format!(
                    "owner name '{}' has leading or trailing spaces",
                    owner.name()
                )));
            }
            if owner.name() == NO_OWNER {
                return Err(DraftError::InvalidInput(format!(
                    "'{NO_OWNER}' cannot be used as an owner name"
                )));
            }
            if !names.insert(owner.name()) {
                return Err(DraftError::InvalidInput(format!(
                    "duplicate owner '{}'",
                    owner.name()
                )));
            }
            if !numbers.insert(owner.nomination_number()) {
                return Err(DraftError::InvalidInput(format!(
                    "duplicate nomination number {}",
                    owner.nomination_number()
                )));
            }
        }
        owners.sort_by_key(|o| o.nomination_number());

        let round = round_for(1, owners.len());
        Ok(DraftSession {
            owners,
            registry,
            log,
            pick: 1,
            round,
            current_owner_idx: 0,
        })
    }

    /// Rebuild a session from an existing log by replaying every record.
    ///
    /// Players in the log that are missing from the pool are added ad hoc
    /// with the position and team the log recorded.
    pub fn resume(owners: Vec<Owner>, registry: PlayerRegistry, log: DraftLog) -> Result<Self> {
        let records = log.records()?;
        let mut session = DraftSession::new(owners, registry, log)?;

        for record in &records {
            if record.pick != session.pick {
                warn!(
                    "Log pick {} for {} replayed as pick {}",
                    record.pick, record.player, session.pick
                );
            }
            let position = Position::from_str_pos(&record.position).ok_or_else(|| {
                DraftError::MalformedLog {
                    path: session.log.path().to_path_buf(),
                    message: format!("pick {} has a blank position", record.pick),
                }
            })?;
            if session.registry.find_by_name(&record.player).is_err() {
                session.registry.add_ad_hoc(&record.player, position.clone())?;
            }
            if let Some(nominator) = &record.nominating_owner {
                if session.owner(nominator).is_err() {
                    warn!("Log names unknown nominating owner '{}'", nominator);
                }
            }
            let owner_idx = session.owner_index(&record.buying_owner)?;
            {
                let player = session.registry.find_by_name_mut(&record.player)?;
                if let Some(buyer) = &player.buying_owner {
                    return Err(DraftError::AlreadySold {
                        player: player.name.clone(),
                        buyer: buyer.clone(),
                    });
                }
                player.nominating_owner = record.nominating_owner.clone();
            }
            session.apply_sale(owner_idx, &record.player, position, &record.team, record.price)?;
        }

        info!(
            "Resumed draft from {}: {} picks replayed, next pick {}",
            session.log.path().display(),
            records.len(),
            session.pick
        );
        Ok(session)
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    pub fn owners(&self) -> &[Owner] {
        &self.owners
    }

    pub fn registry(&self) -> &PlayerRegistry {
        &self.registry
    }

    pub fn log(&self) -> &DraftLog {
        &self.log
    }

    /// The pick that will be made next, starting at 1.
    pub fn pick(&self) -> u32 {
        self.pick
    }

    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn current_owner_index(&self) -> usize {
        self.current_owner_idx
    }

    pub fn owner(&self, name: &str) -> Result<&Owner> {
        self.owner_index(name).map(|i| &self.owners[i])
    }

    fn owner_index(&self, name: &str) -> Result<usize> {
        self.owners
            .iter()
            .position(|o| o.name() == name)
            .ok_or_else(|| DraftError::owner_not_found(name))
    }

    pub fn player(&self, name: &str) -> Result<&Player> {
        self.registry.find_by_name(name)
    }

    /// The user's own team, if one is flagged.
    pub fn my_team(&self) -> Option<&Owner> {
        self.owners.iter().find(|o| o.is_mine())
    }

    pub fn max_bid(&self, owner: &str) -> Result<u32> {
        Ok(self.owner(owner)?.max_bid())
    }

    /// Sum of every owner's remaining budget.
    pub fn total_remaining_budget(&self) -> u32 {
        self.owners.iter().map(|o| o.budget()).sum()
    }

    /// Undrafted player names matching `filter`, alphabetically.
    pub fn available<'a>(&'a self, filter: &PlayerFilter) -> impl Iterator<Item = &'a str> + 'a {
        self.registry.filter(filter)
    }

    /// The owner on the clock: starting at the current index and walking the
    /// rotation, the first owner with an open roster slot. `None` once every
    /// roster is full.
    pub fn next_owner(&self) -> Option<&Owner> {
        let n = self.owners.len();
        (0..n)
            .map(|offset| &self.owners[(self.current_owner_idx + offset) % n])
            .find(|o| !o.is_full())
    }

    /// Whether every roster is full.
    pub fn is_complete(&self) -> bool {
        self.owners.iter().all(|o| o.is_full())
    }

    // -----------------------------------------------------------------------
    // Operations
    // -----------------------------------------------------------------------

    /// Add a player missing from the imported pool.
    pub fn add_player(&mut self, name: &str, position: Position) -> Result<&Player> {
        self.registry.add_ad_hoc(name, position)
    }

    /// Put a player up for auction on behalf of `owner`. Does not touch
    /// budgets, rosters or the pick counter.
    pub fn nominate(&mut self, owner: &str, player: &str) -> Result<&Player> {
        let owner_name = self.owner(owner)?.name().to_string();
        let player = self.registry.find_by_name_mut(player)?;
        if let Some(buyer) = &player.buying_owner {
            return Err(DraftError::AlreadySold {
                player: player.name.clone(),
                buyer: buyer.clone(),
            });
        }
        player.nominating_owner = Some(owner_name);
        info!(
            "{} nominated by {}",
            player.name,
            player.nominating_owner.as_deref().unwrap_or_default()
        );
        Ok(&*player)
    }

    /// Sell `player` to `owner` at `price`.
    ///
    /// Everything is validated and the log record written before any state
    /// changes, so a failure leaves the session untouched.
    pub fn complete_pick(&mut self, player: &str, owner: &str, price: u32) -> Result<PickRecord> {
        let owner_idx = self.owner_index(owner)?;
        let p = self.registry.find_by_name(player)?;
        if let Some(buyer) = &p.buying_owner {
            return Err(DraftError::AlreadySold {
                player: p.name.clone(),
                buyer: buyer.clone(),
            });
        }
        self.owners[owner_idx].check_purchase(price)?;

        let record = PickRecord {
            player: p.name.clone(),
            position: p.position.to_string(),
            team: p.team.clone(),
            pick: self.pick,
            nominating_owner: p.nominating_owner.clone(),
            buying_owner: self.owners[owner_idx].name().to_string(),
            price,
        };
        let (position, team) = (p.position.clone(), p.team.clone());

        self.log.append(&record)?;
        if let Err(e) = self.apply_sale(owner_idx, player, position, &team, price) {
            // Keep the log in step with the in-memory state.
            if let Err(log_err) = self.log.truncate_last() {
                warn!("Failed to roll back log after rejected pick: {}", log_err);
            }
            return Err(e);
        }

        let owner = &self.owners[owner_idx];
        info!(
            "Pick {}: {} drafted {} for ${} (budget ${}, max bid ${})",
            record.pick,
            owner.name(),
            record.player,
            price,
            owner.budget(),
            owner.max_bid()
        );
        Ok(record)
    }

    /// Revert the most recent pick.
    ///
    /// The last log record says who bought whom for how much; the buyer is
    /// refunded, the player goes back to undrafted with no nominator, and
    /// the pick counter, round and rotation step back by one.
    pub fn undo_last_pick(&mut self) -> Result<PickRecord> {
        let record = self.log.last()?.ok_or(DraftError::EmptyLog)?;

        let owner_idx = self.owner_index(&record.buying_owner)?;
        let player = self.registry.find_by_name(&record.player)?;
        let on_roster = self.owners[owner_idx]
            .roster()
            .iter()
            .any(|name| *name == record.player);
        if player.buying_owner.as_deref() != Some(record.buying_owner.as_str()) || !on_roster {
            return Err(DraftError::MalformedLog {
                path: self.log.path().to_path_buf(),
                message: format!(
                    "last pick says {} went to {}, which does not match the draft state",
                    record.player, record.buying_owner
                ),
            });
        }

        self.log.truncate_last()?;
        if let Err(e) = self.owners[owner_idx].refund(&record.player, record.price) {
            if let Err(log_err) = self.log.append(&record) {
                warn!("Failed to restore log after rejected undo: {}", log_err);
            }
            return Err(e);
        }
        self.registry
            .find_by_name_mut(&record.player)?
            .revert_sale();

        self.pick = self.pick.saturating_sub(1).max(1);
        self.round = round_for(self.pick, self.owners.len());
        let n = self.owners.len();
        self.current_owner_idx = (self.current_owner_idx + n - 1) % n;

        info!(
            "Reversed pick {}: {} back from {} (${} refunded)",
            record.pick, record.player, record.buying_owner, record.price
        );
        Ok(record)
    }

    /// Buy through the ledger, stamp the pick number, and advance the pick
    /// counter, round and rotation.
    fn apply_sale(
        &mut self,
        owner_idx: usize,
        player: &str,
        position: Position,
        team: &str,
        price: u32,
    ) -> Result<()> {
        let player = self.registry.find_by_name_mut(player)?;
        self.owners[owner_idx].buy(player, position, team, price)?;
        player.pick = self.pick;

        self.pick += 1;
        self.round = round_for(self.pick, self.owners.len());
        self.current_owner_idx = (self.current_owner_idx + 1) % self.owners.len();
        Ok(())
    }
}
