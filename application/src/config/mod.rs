//! Application-level configuration.
//!
//! - [`ConclaveParams`]: environment construction (rule, fan-out width, timeouts, seed)
//! - [`RoundPlan`]: driver loop control (speakers, policy, round limit)

pub mod conclave_params;

pub use conclave_params::{
    ConclaveParams, DEFAULT_SPEAKERS_PER_ROUND, DEFAULT_WORKER_CAP, RoundPlan,
};
