// Error kinds raised by the draft ledger.

use std::path::PathBuf;

use thiserror::Error;

/// What kind of record a failed lookup was for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Owner,
    Player,
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntityKind::Owner => write!(f, "owner"),
            EntityKind::Player => write!(f, "player"),
        }
    }
}

/// Every failure the ledger can report. All of them leave the draft state
/// exactly as it was before the failing call.
#[derive(Debug, Error)]
pub enum DraftError {
    #[error("{kind} '{name}' not found")]
    NotFound { kind: EntityKind, name: String },

    #[error("{owner} already has {limit} players")]
    RosterFull { owner: String, limit: usize },

    #[error("{owner} cannot afford a bid of ${price} (max bid ${max_bid})")]
    Unaffordable {
        owner: String,
        price: u32,
        max_bid: u32,
    },

    #[error("{player} was already sold to {buyer}")]
    AlreadySold { player: String, buyer: String },

    #[error("no picks to undo")]
    EmptyLog,

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("CSV error in {path}: {source}")]
    Csv { path: PathBuf, source: csv::Error },

    #[error("malformed draft log {path}: {message}")]
    MalformedLog { path: PathBuf, message: String },
}

impl DraftError {
    pub(crate) fn owner_not_found(name: &str) -> Self {
        DraftError::NotFound {
            kind: EntityKind::Owner,
            name: name.to_string(),
        }
    }

    pub(crate) fn player_not_found(name: &str) -> Self {
        DraftError::NotFound {
            kind: EntityKind::Player,
            name: name.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, DraftError>;
