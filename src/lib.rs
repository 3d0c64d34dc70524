//! Synthesizes release notes from git history with a hosted language model
//! and prepends them, versioned and dated, to a markdown changelog.
pub mod changelog;
pub mod changes;
pub mod chunker;
pub mod cli;
pub mod config;
pub mod error;
pub mod history;
pub mod pipeline;
pub mod summarizer;

pub use cli::Args;
pub use config::Config;
pub use error::{Result, ScribeError};
pub use pipeline::RunOutcome;

use crate::{
    history::git::GitHistory,
    pipeline::{Pipeline, PipelineParams},
    summarizer::client::InferenceClient,
};

/// Build the production collaborators from `config` and run the pipeline.
pub async fn run(config: Config) -> Result<RunOutcome> {
    let history = GitHistory::open(&config.repo_path, config.git_token)?
        .with_fetch_timeout(config.timeout);

    let generator =
        InferenceClient::new(config.api_url, &config.api_key, config.timeout)?;

    let pipeline = Pipeline::new(PipelineParams {
        history: Box::new(history),
        generator: Box::new(generator),
        settings: config.summarizer,
        changelog_path: config.changelog_path,
        dry_run: config.dry_run,
    })?;

    pipeline.run().await
}

#[cfg(test)]
pub mod test_helpers;
