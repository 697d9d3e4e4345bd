//! Discussion domain
//!
//! Discussion rounds are stored in a [`DiscussionLedger`] together with a
//! participation index. Each elector sees only the rounds it spoke in, but
//! sees those rounds in full (see [`DiscussionLedger::view`]).

pub mod ledger;
pub mod view;

pub use ledger::{DiscussionEntry, DiscussionLedger};
pub use view::{DiscussionView, RoundTranscript};
