// Draft domain: owners and their budgets, the player pool, the pick
// sequence, and the on-disk pick log.

pub mod ledger;
pub mod log;
pub mod player;
pub mod registry;
pub mod session;
