// Application state and the command loop.
//
// Owns the draft session, runs one command at a time to completion, and
// renders the result as text. Core errors are reported to the user and the
// loop carries on; nothing a command does is fatal.

use std::io::{BufRead, Write};

use anyhow::Context;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, warn};

use bidboard_core::{DraftError, DraftLog, DraftSession, Owner, Player, PlayerRegistry};

use crate::commands::{parse_command, Command, HELP};
use crate::config::Config;
use crate::render;

/// A command that could not be carried out. The loop reports it and
/// carries on.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error(transparent)]
    Draft(#[from] DraftError),

    #[error("failed to encode snapshot: {0}")]
    Snapshot(#[from] serde_json::Error),
}

/// What the loop should do after a command.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// Print this and read the next command.
    Continue(String),
    Quit,
}

/// Serializable view of the whole draft, for the `snapshot` command.
#[derive(Debug, Serialize)]
pub struct AppSnapshot<'a> {
    pub league: &'a str,
    pub round: u32,
    pub pick: u32,
    pub total_remaining_budget: u32,
    pub on_the_clock: Option<&'a str>,
    pub complete: bool,
    pub owners: &'a [Owner],
    pub picks: Vec<&'a Player>,
}

/// The complete application state.
pub struct App {
    pub config: Config,
    pub session: DraftSession,
}

/// Build the draft session from config: load the player pool, then either
/// replay the existing log (`resume`) or start a fresh one.
///
/// Returns the session and whether it was restored from a previous log.
pub fn start_session(config: &Config, resume: bool) -> anyhow::Result<(DraftSession, bool)> {
    let players_path = config.players_path();
    let registry = PlayerRegistry::load(&players_path)
        .with_context(|| format!("failed to load players from {}", players_path.display()))?;

    let log_path = config.draft_log_path();
    if resume && log_path.exists() {
        let log = DraftLog::open(&log_path)
            .with_context(|| format!("failed to open draft log {}", log_path.display()))?;
        let session = DraftSession::resume(config.build_owners(), registry, log)
            .context("failed to replay draft log")?;
        return Ok((session, true));
    }
    if resume {
        info!("No draft log at {}, starting fresh", log_path.display());
    }

    let log = DraftLog::create(&log_path)
        .with_context(|| format!("failed to create draft log {}", log_path.display()))?;
    let session = DraftSession::new(config.build_owners(), registry, log)
        .context("failed to start draft session")?;
    Ok((session, false))
}

impl App {
    pub fn new(config: Config, session: DraftSession) -> Self {
        App { config, session }
    }

    pub fn build_snapshot(&self) -> AppSnapshot<'_> {
        let s = &self.session;
        AppSnapshot {
            league: &self.config.league.name,
            round: s.round(),
            pick: s.pick(),
            total_remaining_budget: s.total_remaining_budget(),
            on_the_clock: s.next_owner().map(|o| o.name()),
            complete: s.is_complete(),
            owners: s.owners(),
            picks: s.registry().sold(),
        }
    }

    /// Run one command against the session.
    pub fn handle_command(&mut self, cmd: Command) -> Result<Outcome, CommandError> {
        debug!("Handling command {:?}", cmd);
        let text = match cmd {
            Command::Status => render::status_line(&self.session),
            Command::Players(filter) => {
                let names: Vec<&str> = self.session.available(&filter).collect();
                if names.is_empty() {
                    "No undrafted players match".to_string()
                } else {
                    names.join("\n")
                }
            }
            Command::Filters => render::filters_view(self.session.registry()),
            Command::Nominate { player, by } => {
                let owner = match by {
                    Some(owner) => owner,
                    None => self
                        .session
                        .next_owner()
                        .map(|o| o.name().to_string())
                        .ok_or_else(|| {
                            DraftError::InvalidInput("every roster is full".into())
                        })?,
                };
                let nominated = self.session.nominate(&owner, &player)?;
                format!("{owner} has nominated {nominated}")
            }
            Command::Draft {
                player,
                owner,
                price,
            } => {
                let p = self.session.player(&player)?;
                if p.nominating_owner.is_none() && !p.is_sold() {
                    return Err(DraftError::InvalidInput(format!(
                        "{player} has not been nominated"
                    ))
                    .into());
                }
                let record = self.session.complete_pick(&player, &owner, price)?;
                let buyer = self.session.owner(&record.buying_owner)?;
                let mut out = format!(
                    "{} has drafted {} for ${}. Budget remaining: ${}. Max bid: ${}",
                    buyer.name(),
                    record.player,
                    record.price,
                    buyer.budget(),
                    buyer.max_bid()
                );
                if buyer.is_mine() {
                    out.push_str(" (my team)");
                }
                if buyer.is_full() {
                    out.push_str(&format!("\n{} has a full roster", buyer.name()));
                }
                out.push('\n');
                out.push_str(&render::status_line(&self.session));
                out
            }
            Command::Undo => {
                let record = self.session.undo_last_pick()?;
                format!(
                    "Reversed pick {} for player: {}, owner: {}, price: ${}\n{}",
                    record.pick,
                    record.player,
                    record.buying_owner,
                    record.price,
                    render::status_line(&self.session)
                )
            }
            Command::Add { player, position } => {
                let p = self.session.add_player(&player, position)?;
                format!("Added {p}")
            }
            Command::Owners => render::owners_view(&self.session),
            Command::Mine => match self.session.my_team() {
                Some(owner) => render::owner_block(owner, self.session.registry()),
                None => "No owner is marked as my team".to_string(),
            },
            Command::Board => render::board_view(&self.session),
            Command::Snapshot => serde_json::to_string_pretty(&self.build_snapshot())?,
            Command::Help => HELP.to_string(),
            Command::Quit => return Ok(Outcome::Quit),
        };
        Ok(Outcome::Continue(text))
    }
}

/// Read commands from `input` until `quit` or end of input, writing results
/// and errors to `output`.
pub fn run<R: BufRead, W: Write>(app: &mut App, input: R, mut output: W) -> anyhow::Result<()> {
    writeln!(output, "{}", render::status_line(&app.session))?;
    write!(output, "> ")?;
    output.flush()?;

    for line in input.lines() {
        let line = line.context("failed to read command")?;
        let result = match parse_command(&line) {
            Ok(Some(cmd)) => app.handle_command(cmd).map(Some),
            Ok(None) => Ok(None),
            Err(e) => Err(CommandError::from(e)),
        };
        match result {
            Ok(Some(Outcome::Quit)) => {
                info!("Quit requested");
                return Ok(());
            }
            Ok(Some(Outcome::Continue(text))) => writeln!(output, "{text}")?,
            Ok(None) => {}
            Err(e) => {
                warn!("Command '{}' failed: {}", line.trim(), e);
                writeln!(output, "error: {e}")?;
            }
        }
        write!(output, "> ")?;
        output.flush()?;
    }

    info!("Input closed");
    Ok(())
}
