//! Turns change sets into release note text.
//!
//! Change sets that need no interpretation ([`ChangeSet::Initial`],
//! [`ChangeSet::NoChanges`], [`ChangeSet::Error`]) map to fixed text without
//! any external call. Everything else is chunked, each chunk is summarized by
//! the [`client::TextGenerator`] collaborator, and the per-chunk results are
//! cleaned, deduplicated and joined in chunk order.
use futures_util::{StreamExt, stream};
use log::*;
use std::collections::HashSet;

use crate::{
    Result,
    changes::types::ChangeSet,
    chunker::{self, Chunk},
    summarizer::{
        cleanup::Cleaner, client::TextGenerator, prompt::build_request,
        response::GeneratedText,
    },
};

/// Hedging removal and whitespace normalization.
pub mod cleanup;

/// Text generation collaborator and its HTTP implementation.
pub mod client;

/// Chat request construction.
pub mod prompt;

/// Provider response shapes.
pub mod response;

/// Summary used when the service answered but produced no usable text.
pub const NO_SIGNIFICANT_CHANGES: &str = "No significant changes detected.";

#[derive(Debug, Clone)]
/// Tunables for chunk summarization.
pub struct SummarizerSettings {
    /// Model identifier sent with every request.
    pub model: String,
    /// Maximum characters per chunk.
    pub max_chunk_size: usize,
    /// Maximum number of chunk requests in flight.
    pub concurrency: usize,
    pub max_tokens: u32,
    pub temperature: f32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Result of summarizing a single chunk.
pub enum ChunkOutcome {
    /// Cleaned, non-empty summary text.
    Summary(String),
    /// The service answered without usable text.
    Empty,
    /// The request failed; the message is kept for logging.
    Failed(String),
}

/// Message recorded when every chunk request failed.
pub fn unsummarized_message(body_len: usize, chunk_count: usize) -> String {
    format!(
        "Changes were made but could not be summarized ({body_len} characters across {chunk_count} chunk(s))."
    )
}

/// Exact-duplicate removal keeping the first occurrence of each entry.
pub fn dedup_ordered<I>(summaries: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let mut seen = HashSet::new();
    summaries
        .into_iter()
        .filter(|summary| seen.insert(summary.clone()))
        .collect()
}

/// Combine per-chunk outcomes, given in chunk order, into the final summary.
pub fn combine(outcomes: &[ChunkOutcome], body_len: usize) -> String {
    if !outcomes.is_empty()
        && outcomes.iter().all(|o| matches!(o, ChunkOutcome::Failed(_)))
    {
        return unsummarized_message(body_len, outcomes.len());
    }

    let summaries = outcomes.iter().filter_map(|outcome| match outcome {
        ChunkOutcome::Summary(text) => Some(text.clone()),
        _ => None,
    });

    let unique = dedup_ordered(summaries);

    if unique.is_empty() {
        return NO_SIGNIFICANT_CHANGES.to_string();
    }

    unique.join("\n")
}

/// Summarizes change sets through a text generation collaborator.
pub struct Summarizer<'g> {
    generator: &'g dyn TextGenerator,
    settings: SummarizerSettings,
    cleaner: Cleaner,
}

impl<'g> Summarizer<'g> {
    pub fn new(
        generator: &'g dyn TextGenerator,
        settings: SummarizerSettings,
    ) -> Result<Self> {
        Ok(Self {
            generator,
            settings,
            cleaner: Cleaner::new()?,
        })
    }

    /// Produce the release note body for `change_set`.
    ///
    /// Never fails: per-chunk errors are logged and folded into the combined
    /// result, and total failure degrades to a descriptive message.
    pub async fn summarize(&self, change_set: &ChangeSet) -> String {
        if let Some(summary) = change_set.fixed_summary() {
            debug!(
                "skipping summarization for {} change set",
                change_set.kind()
            );
            return summary.to_string();
        }

        let body = change_set.primary_body();
        let body_len = body.chars().count();
        let chunks = chunker::chunk(&body, self.settings.max_chunk_size);
        let total = chunks.len();

        info!(
            "sending {body_len} chars in {total} chunk(s) to {}",
            self.settings.model
        );

        // buffered (not buffer_unordered) yields results in chunk order
        let outcomes = stream::iter(chunks.iter())
            .map(|chunk| self.summarize_chunk(change_set, chunk, total))
            .buffered(self.settings.concurrency.max(1))
            .collect::<Vec<ChunkOutcome>>()
            .await;

        combine(&outcomes, body_len)
    }

    async fn summarize_chunk(
        &self,
        change_set: &ChangeSet,
        chunk: &Chunk,
        total: usize,
    ) -> ChunkOutcome {
        let part = chunk.index + 1;
        let request = build_request(&self.settings, change_set, chunk, total);

        debug!("chunk {part}/{total}: {} chars", chunk.len());

        match self.generator.generate(&request).await {
            Ok(response) => match response.generated_text() {
                Some(text) => {
                    let cleaned = self.cleaner.clean(&text);
                    if cleaned.is_empty() {
                        warn!("chunk {part}/{total}: summary empty after cleanup");
                        ChunkOutcome::Empty
                    } else {
                        ChunkOutcome::Summary(cleaned)
                    }
                }
                None => {
                    warn!("chunk {part}/{total}: response contained no text");
                    ChunkOutcome::Empty
                }
            },
            Err(err) => {
                error!("chunk {part}/{total}: summarization failed: {err}");
                ChunkOutcome::Failed(err.to_string())
            }
        }
    }
}

#[cfg(test)]
#[path = "./summarizer_tests.rs"]
mod tests;
