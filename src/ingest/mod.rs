// src/ingest/mod.rs
//! Candidate sources for the digest: a caller-supplied batch file, or the
//! per-date article library written by the ingestion tooling.
//!
//! This is the one boundary where bad input stops the run instead of
//! degrading.

pub mod batch;
pub mod library;
pub mod types;

pub use batch::{load_batch_file, parse_batch};
pub use library::load_library_for_date;
pub use types::InputError;
