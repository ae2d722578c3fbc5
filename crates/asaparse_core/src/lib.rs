//! Public library API for decoding ARK: Survival Ascended save property streams.

/// Property-stream decoding, heuristic field recovery, and entity projection.
pub mod save;
