//! Scripted (offline) electors

mod elector;

pub use elector::ScriptedElector;
