//! CLI argument parsing.
use clap::Parser;
use std::path::PathBuf;

/// Synthesizes a release note entry for the commits since the last release
/// and prepends it to the changelog.
#[derive(Parser, Debug, Default)]
#[command(version, about, long_about = None)]
pub struct Args {
    #[arg(long, default_value = ".")]
    /// Path to the git repository.
    pub repo: PathBuf,

    #[arg(long, default_value = "")]
    /// Changelog file, relative to the repository. Falls back to
    /// RELEASE_FILE env var, then RELEASE.md.
    pub changelog: String,

    #[arg(long, default_value = "")]
    /// Text generation API key. Falls back to HUGGINGFACE_API_KEY env var.
    pub api_key: String,

    #[arg(long, default_value = "")]
    /// Model identifier. Falls back to RELEASE_SCRIBE_MODEL env var.
    pub model: String,

    #[arg(long, default_value = "")]
    /// Chat completions endpoint. Falls back to RELEASE_SCRIBE_API_URL env
    /// var, then the hosted inference URL for the model.
    pub api_url: String,

    #[arg(long, default_value = "")]
    /// Token used when fetching full history. Falls back to GIT_TOKEN env
    /// var.
    pub git_token: String,

    #[arg(long)]
    /// Maximum characters sent per request. Falls back to
    /// RELEASE_SCRIBE_MAX_CHUNK_SIZE env var.
    pub max_chunk_size: Option<usize>,

    #[arg(long)]
    /// Maximum concurrent requests. Falls back to RELEASE_SCRIBE_CONCURRENCY
    /// env var.
    pub concurrency: Option<usize>,

    #[arg(long)]
    /// Per-request timeout in seconds. Falls back to
    /// RELEASE_SCRIBE_TIMEOUT_SECS env var.
    pub timeout_secs: Option<u64>,

    #[arg(long)]
    /// Maximum tokens generated per chunk.
    pub max_tokens: Option<u32>,

    #[arg(long)]
    /// Sampling temperature.
    pub temperature: Option<f32>,

    #[arg(long, default_value_t = false)]
    /// Summarize and log the new entry without writing the changelog.
    pub dry_run: bool,

    #[arg(long, default_value_t = false)]
    /// Enable debug logging.
    pub debug: bool,
}
