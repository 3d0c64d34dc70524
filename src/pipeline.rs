//! End-to-end release note synthesis for a single invocation.
//!
//! Stages run strictly in order: resolve a reference point, extract the
//! change set, summarize it, then prepend a versioned entry to the changelog
//! while holding the changelog lock. Only changelog persistence failures are
//! fatal; every other failure is carried into the entry text.
use chrono::{NaiveDate, Utc};
use log::*;
use semver::Version;
use std::path::PathBuf;

use crate::{
    Result,
    changelog::{
        merge::{ChangelogEntry, merge},
        store::ChangelogStore,
        version::VersionParser,
    },
    changes::{
        extractor, resolver,
        types::{ChangeKind, ChangeSet},
    },
    history::traits::History,
    summarizer::{Summarizer, SummarizerSettings, client::TextGenerator},
};

/// Collaborators and settings a [`Pipeline`] is built from.
pub struct PipelineParams {
    pub history: Box<dyn History>,
    pub generator: Box<dyn TextGenerator>,
    pub settings: SummarizerSettings,
    pub changelog_path: PathBuf,
    pub dry_run: bool,
}

#[derive(Debug, Clone, PartialEq)]
/// What a run produced.
pub struct RunOutcome {
    pub version: Version,
    pub summary: String,
    pub change_kind: ChangeKind,
    /// False for dry runs.
    pub written: bool,
}

pub struct Pipeline {
    history: Box<dyn History>,
    generator: Box<dyn TextGenerator>,
    settings: SummarizerSettings,
    store: ChangelogStore,
    versions: VersionParser,
    dry_run: bool,
}

impl Pipeline {
    pub fn new(params: PipelineParams) -> Result<Self> {
        Ok(Self {
            history: params.history,
            generator: params.generator,
            settings: params.settings,
            store: ChangelogStore::new(params.changelog_path),
            versions: VersionParser::new()?,
            dry_run: params.dry_run,
        })
    }

    /// Run every stage and date the new entry with today's UTC date.
    pub async fn run(&self) -> Result<RunOutcome> {
        self.run_on(Utc::now().date_naive()).await
    }

    /// Run every stage, dating the new entry `date`.
    pub async fn run_on(&self, date: NaiveDate) -> Result<RunOutcome> {
        let change_set = self.change_set().await;
        let change_kind = change_set.kind();

        info!("change set kind: {change_kind}");

        let summarizer =
            Summarizer::new(self.generator.as_ref(), self.settings.clone())?;
        let summary = summarizer.summarize(&change_set).await;

        debug!("summary:\n{summary}");

        self.record(summary, change_kind, date)
    }

    async fn change_set(&self) -> ChangeSet {
        match resolver::resolve(self.history.as_ref()).await {
            Ok(reference) => {
                extractor::extract(self.history.as_ref(), reference.as_ref())
                    .await
            }
            Err(err) => {
                error!("failed to resolve reference point: {err}");
                ChangeSet::error(format!(
                    "Error resolving reference point: {err}"
                ))
            }
        }
    }

    /// Version, merge and persist the entry under the changelog lock.
    fn record(
        &self,
        summary: String,
        change_kind: ChangeKind,
        date: NaiveDate,
    ) -> Result<RunOutcome> {
        let _lock = self.store.lock()?;

        let existing = self.store.read()?;
        let version = self.versions.next_version(&existing);
        let entry = ChangelogEntry::new(version.clone(), date, summary);
        let document = merge(&existing, &entry);

        if self.dry_run {
            warn!(
                "dry_run: would write {} with new entry:\n{}",
                self.store.path().display(),
                entry.render()
            );
        } else {
            self.store.write(&document)?;
            info!("added {} to {}", entry.header(), self.store.path().display());
        }

        Ok(RunOutcome {
            version,
            summary: entry.body,
            change_kind,
            written: !self.dry_run,
        })
    }
}
