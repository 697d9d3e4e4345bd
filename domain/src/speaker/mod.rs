//! Speaker selection for discussion rounds.

pub mod policy;
pub mod selection;

pub use policy::SpeakerPolicy;
pub use selection::{
    Invitation, MAX_URGENCY, MIN_URGENCY, SpeakerSlate, UrgencyScore, select_by_urgency,
    select_random,
};
