//! Traits related to version-control history
use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;

use crate::{Result, history::types::CommitInfo};

/// Read-only history queries needed to build a change set.
///
/// Revisions are passed as git revspecs (`refs/tags/v1.0.0`, `HEAD~1`,
/// `HEAD`).
#[cfg_attr(test, automock)]
#[async_trait]
pub trait History: Send + Sync {
    /// Best-effort conversion of a shallow clone into full history.
    async fn ensure_full_history(&self) -> Result<()>;
    /// Name of the most recently created tag, if any tag exists.
    async fn latest_tag(&self) -> Result<Option<String>>;
    /// Number of commits reachable from HEAD (0 for an unborn HEAD).
    async fn commit_count(&self) -> Result<usize>;
    /// Unified patch text between two revisions.
    async fn diff(&self, from: &str, to: &str) -> Result<String>;
    /// One `STATUS\tpath` line per file changed between two revisions.
    async fn changed_files(&self, from: &str, to: &str) -> Result<String>;
    /// Commits in `from..to`, newest first.
    async fn log(&self, from: &str, to: &str) -> Result<Vec<CommitInfo>>;
}
