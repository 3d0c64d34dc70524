//! Builds the normalized change set for a reference point.
use log::*;

use crate::{
    Result,
    changes::types::{ChangeSet, ReferencePoint, format_commit_summaries},
    history::traits::History,
};

/// Revision the reference point is compared with.
const HEAD: &str = "HEAD";

/// Raw query results gathered before classification.
#[derive(Debug, Default)]
struct Facts {
    diff: String,
    commit_summaries: String,
    changed_files: String,
}

/// Extract the change set between `reference` and HEAD.
///
/// Never fails: a failing history query becomes [`ChangeSet::Error`], which
/// carries the reason into the changelog instead of aborting the run.
pub async fn extract(
    history: &dyn History,
    reference: Option<&ReferencePoint>,
) -> ChangeSet {
    let Some(reference) = reference else {
        return ChangeSet::Initial;
    };

    info!("getting diff from {reference} to {HEAD}");

    match gather(history, reference).await {
        Ok(facts) => classify(facts),
        Err(err) => {
            error!("error getting diff: {err}");
            ChangeSet::error(format!("Error getting diff: {err}"))
        }
    }
}

async fn gather(
    history: &dyn History,
    reference: &ReferencePoint,
) -> Result<Facts> {
    let from = reference.revspec();

    let diff = history.diff(&from, HEAD).await?;
    let changed_files = history.changed_files(&from, HEAD).await?;
    let commits = history.log(&from, HEAD).await?;

    debug!(
        "diff: {} chars, {} changed file(s), {} commit(s)",
        diff.len(),
        changed_files.lines().count(),
        commits.len()
    );

    Ok(Facts {
        diff,
        commit_summaries: format_commit_summaries(&commits),
        changed_files,
    })
}

/// Ordered decision table over the gathered facts.
///
/// | diff      | commits or files | result        |
/// |-----------|------------------|---------------|
/// | non-blank | any              | `Diff`        |
/// | blank     | present          | `CommitsOnly` |
/// | blank     | absent           | `NoChanges`   |
fn classify(facts: Facts) -> ChangeSet {
    let has_diff = !facts.diff.trim().is_empty();
    let has_metadata = !facts.commit_summaries.trim().is_empty()
        || !facts.changed_files.trim().is_empty();

    match (has_diff, has_metadata) {
        (true, _) => ChangeSet::Diff {
            body: facts.diff,
            commit_summaries: facts.commit_summaries,
            changed_files: facts.changed_files,
        },
        (false, true) => {
            info!("using commit messages instead of diff");
            ChangeSet::CommitsOnly {
                commit_summaries: facts.commit_summaries,
                changed_files: facts.changed_files,
            }
        }
        (false, false) => {
            warn!("no changes found since reference point");
            ChangeSet::NoChanges
        }
    }
}
