//! Reference resolution and change extraction.
//!
//! Turns repository history into a single [`types::ChangeSet`] per run:
//! [`resolver`] picks the prior point in history, [`extractor`] queries what
//! changed since then and classifies the result.

/// Change set classification.
pub mod extractor;

/// Reference point fallback chain.
pub mod resolver;

/// Change set and reference point types.
pub mod types;
