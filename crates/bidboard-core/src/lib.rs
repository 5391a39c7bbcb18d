// Library root for the auction draft ledger.

pub mod draft;
pub mod error;

pub use draft::ledger::Owner;
pub use draft::log::{DraftLog, PickRecord, NO_OWNER};
pub use draft::player::{Player, PlayerStatus, Position};
pub use draft::registry::{PlayerFilter, PlayerRegistry};
pub use draft::session::DraftSession;
pub use error::{DraftError, EntityKind};
