//! Runtime configuration resolved from CLI flags, environment variables and
//! defaults, in that order of precedence.
use reqwest::Url;
use secrecy::SecretString;
use std::{env, path::PathBuf, time::Duration};

use crate::{
    Result, cli::Args, error::ScribeError, summarizer::SummarizerSettings,
};

/// Default model used for summarization.
pub const DEFAULT_MODEL: &str = "microsoft/Phi-3-mini-4k-instruct";
/// Default maximum number of characters per summarization request.
pub const DEFAULT_MAX_CHUNK_SIZE: usize = 2000;
/// Default changelog filename, relative to the repository.
pub const DEFAULT_CHANGELOG_FILE: &str = "RELEASE.md";
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;
pub const DEFAULT_CONCURRENCY: usize = 1;
pub const DEFAULT_MAX_TOKENS: u32 = 512;
pub const DEFAULT_TEMPERATURE: f32 = 0.2;

pub const API_KEY_ENV: &str = "HUGGINGFACE_API_KEY";
pub const MODEL_ENV: &str = "RELEASE_SCRIBE_MODEL";
pub const API_URL_ENV: &str = "RELEASE_SCRIBE_API_URL";
pub const MAX_CHUNK_SIZE_ENV: &str = "RELEASE_SCRIBE_MAX_CHUNK_SIZE";
pub const CHANGELOG_ENV: &str = "RELEASE_FILE";
pub const CONCURRENCY_ENV: &str = "RELEASE_SCRIBE_CONCURRENCY";
pub const TIMEOUT_ENV: &str = "RELEASE_SCRIBE_TIMEOUT_SECS";
pub const GIT_TOKEN_ENV: &str = "GIT_TOKEN";

/// Hosted chat completions endpoint for `model`.
pub fn default_api_url(model: &str) -> String {
    format!(
        "https://router.huggingface.co/hf-inference/models/{model}/v1/chat/completions"
    )
}

/// Fully resolved and validated settings for one run.
#[derive(Debug)]
pub struct Config {
    pub repo_path: PathBuf,
    pub changelog_path: PathBuf,
    pub api_url: Url,
    pub api_key: SecretString,
    pub git_token: Option<SecretString>,
    pub summarizer: SummarizerSettings,
    pub timeout: Duration,
    pub dry_run: bool,
}

impl Config {
    /// Resolve configuration against the process environment.
    pub fn from_args(args: &Args) -> Result<Self> {
        Self::resolve(args, |key| env::var(key).ok())
    }

    /// Resolve configuration with `lookup` standing in for the environment.
    pub fn resolve<F>(args: &Args, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let text = |flag: &str, key: &str| -> Option<String> {
            if !flag.is_empty() {
                return Some(flag.to_string());
            }
            lookup(key).filter(|value| !value.trim().is_empty())
        };

        let api_key = text(&args.api_key, API_KEY_ENV)
            .ok_or_else(|| ScribeError::MissingCredential(API_KEY_ENV.into()))?;

        let model = text(&args.model, MODEL_ENV)
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());

        let api_url = text(&args.api_url, API_URL_ENV)
            .unwrap_or_else(|| default_api_url(&model));
        let api_url = Url::parse(&api_url).map_err(|err| {
            ScribeError::invalid_config(format!(
                "invalid api url {api_url}: {err}"
            ))
        })?;

        let max_chunk_size = number(
            args.max_chunk_size,
            MAX_CHUNK_SIZE_ENV,
            &lookup,
            DEFAULT_MAX_CHUNK_SIZE,
        )?;
        if max_chunk_size == 0 {
            return Err(ScribeError::invalid_config(
                "max chunk size must be greater than 0",
            ));
        }

        let concurrency = number(
            args.concurrency,
            CONCURRENCY_ENV,
            &lookup,
            DEFAULT_CONCURRENCY,
        )?;
        if concurrency == 0 {
            return Err(ScribeError::invalid_config(
                "concurrency must be greater than 0",
            ));
        }

        let timeout_secs =
            number(args.timeout_secs, TIMEOUT_ENV, &lookup, DEFAULT_TIMEOUT_SECS)?;
        if timeout_secs == 0 {
            return Err(ScribeError::invalid_config(
                "timeout must be greater than 0",
            ));
        }

        let changelog = text(&args.changelog, CHANGELOG_ENV)
            .unwrap_or_else(|| DEFAULT_CHANGELOG_FILE.to_string());
        let changelog = PathBuf::from(changelog);
        let changelog_path = if changelog.is_absolute() {
            changelog
        } else {
            args.repo.join(changelog)
        };

        let git_token = text(&args.git_token, GIT_TOKEN_ENV).map(SecretString::from);

        Ok(Self {
            repo_path: args.repo.clone(),
            changelog_path,
            api_url,
            api_key: SecretString::from(api_key),
            git_token,
            summarizer: SummarizerSettings {
                model,
                max_chunk_size,
                concurrency,
                max_tokens: args.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS),
                temperature: args.temperature.unwrap_or(DEFAULT_TEMPERATURE),
            },
            timeout: Duration::from_secs(timeout_secs),
            dry_run: args.dry_run,
        })
    }
}

/// Flag value, else a parsed env value, else `default`.
fn number<T, F>(flag: Option<T>, key: &str, lookup: &F, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    if let Some(value) = flag {
        return Ok(value);
    }

    match lookup(key) {
        Some(raw) if !raw.trim().is_empty() => {
            raw.trim().parse::<T>().map_err(|err| {
                ScribeError::invalid_config(format!(
                    "{key} must be a number, got {raw:?}: {err}"
                ))
            })
        }
        _ => Ok(default),
    }
}
