//! Progress reporting for fan-out stages

pub mod reporter;
