//! Resolves the point in history the release is compared against.
use log::*;

use crate::{
    Result, changes::types::ReferencePoint, history::traits::History,
};

/// Minimum number of commits required to compare HEAD with its parent.
const MIN_COMMITS_FOR_OFFSET: usize = 2;

/// Steps of the fallback chain, tried in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    LatestTag,
    PreviousCommit,
    Exhausted,
}

impl Step {
    fn next(self) -> Self {
        match self {
            Step::LatestTag => Step::PreviousCommit,
            Step::PreviousCommit | Step::Exhausted => Step::Exhausted,
        }
    }
}

/// Determine the reference point for the current run.
///
/// Walks the fallback chain latest tag → `HEAD~1` → none. Before that it asks
/// the collaborator to unshallow the checkout; failure to do so is logged and
/// the resolver carries on with whatever history is present.
///
/// # Errors
///
/// Returns an error only when a tag or commit-count query fails.
pub async fn resolve(history: &dyn History) -> Result<Option<ReferencePoint>> {
    if let Err(err) = history.ensure_full_history().await {
        warn!("possibly already full history: {err}");
    }

    let mut step = Step::LatestTag;

    loop {
        let found = match step {
            Step::LatestTag => history
                .latest_tag()
                .await?
                .map(ReferencePoint::Tag),
            Step::PreviousCommit => {
                let count = history.commit_count().await?;
                debug!("repository has {count} commit(s)");
                (count >= MIN_COMMITS_FOR_OFFSET)
                    .then_some(ReferencePoint::Offset(1))
            }
            Step::Exhausted => {
                info!("not enough history for a meaningful diff");
                return Ok(None);
            }
        };

        if let Some(reference) = found {
            info!("using reference point: {reference}");
            return Ok(Some(reference));
        }

        debug!("no reference found at step {step:?}");
        step = step.next();
    }
}
