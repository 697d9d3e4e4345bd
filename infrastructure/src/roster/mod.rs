//! Roster file loading

mod loader;

pub use loader::{LoadedRoster, RosterEntry, RosterError, RosterLoader};
