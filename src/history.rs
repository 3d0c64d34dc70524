//! Read-only access to version-control history.
//!
//! The pipeline never talks to git directly: every query goes through the
//! [`traits::History`] collaborator so tests can swap in a mock and the
//! production implementation ([`git::GitHistory`]) stays in one place.

/// git2-backed history implementation.
pub mod git;

/// Collaborator trait for history queries.
pub mod traits;

/// Normalized commit data returned from history queries.
pub mod types;
