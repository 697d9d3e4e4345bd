//! Logging infrastructure: structured event transcripts.
//!
//! Provides [`JsonlEventLogger`], a JSONL file writer that implements the
//! [`ConclaveObserver`](conclave_application::ConclaveObserver) port.

mod jsonl_logger;

pub use jsonl_logger::JsonlEventLogger;
