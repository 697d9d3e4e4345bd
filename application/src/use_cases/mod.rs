//! Use cases (application services)

pub mod ballot_box;
pub mod environment;
pub mod round_executor;
pub mod run_conclave;

#[cfg(test)]
pub(crate) mod testing;
