//! Ballot domain
//!
//! Voting primitives for the election:
//!
//! - [`VoteTally`]: candidate → count for one voting round
//! - [`ElectionRule`]: threshold a leader must strictly exceed
//! - [`evaluate`]: termination evaluation of a tally
//! - [`BallotRound`]: ledger entry for a completed voting round
//!
//! ```text
//!   votes ──fold──▶ VoteTally ──leader()──▶ Leader
//!                                              │
//!                     ElectionRule::threshold(N)│
//!                                              ▼
//!                               votes > threshold ? Elected : Undecided
//! ```

pub mod round;
pub mod rule;
pub mod tally;

pub use round::{BallotOutcome, BallotRound, evaluate};
pub use rule::ElectionRule;
pub use tally::{Leader, VoteTally};
