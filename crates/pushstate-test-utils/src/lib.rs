//! Shared test fixtures and utilities for pushstate crates.
//!
//! Provides synthetic sensor streams, recording files and state-file rows,
//! plus deterministic RNG setup.

pub mod records;
pub mod states;
pub mod streams;

// ---------------------------------------------------------------------------
// Re-exports for convenience
// ---------------------------------------------------------------------------

pub use records::{push_file_name, write_json_record};
pub use states::{StateRowBuilder, write_state_csv};
pub use streams::{jittered_stream, linear_rows, seeded_rng};
