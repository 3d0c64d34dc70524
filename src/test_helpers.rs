//! Common test helper functions shared across test modules.
//!
//! This module provides reusable utilities for creating scratch repositories,
//! summarizer settings and provider responses, reducing code duplication
//! across different test suites.
use std::{fs, path::Path, process::Command};
use tempfile::TempDir;

use crate::{
    config::{DEFAULT_MAX_CHUNK_SIZE, DEFAULT_MODEL},
    summarizer::{SummarizerSettings, response::ProviderResponse},
};

/// Creates SummarizerSettings with sensible defaults for tests.
pub fn create_test_settings() -> SummarizerSettings {
    SummarizerSettings {
        model: DEFAULT_MODEL.to_string(),
        max_chunk_size: DEFAULT_MAX_CHUNK_SIZE,
        concurrency: 1,
        max_tokens: 256,
        temperature: 0.2,
    }
}

/// Creates a chat-completion shaped provider response carrying `text`.
pub fn chat_response(text: &str) -> ProviderResponse {
    serde_json::from_value(serde_json::json!({
        "choices": [{ "message": { "role": "assistant", "content": text } }]
    }))
    .unwrap()
}

/// Creates a flat text-generation shaped provider response carrying `text`.
pub fn generation_response(text: &str) -> ProviderResponse {
    serde_json::from_value(serde_json::json!([{ "generated_text": text }]))
        .unwrap()
}

/// Scratch git repository driven through the git CLI.
///
/// # Example
/// ```ignore
/// let repo = TestRepo::new();
/// repo.commit("init.txt", "hello", "chore: init");
/// repo.tag("v0.1.0");
/// ```
pub struct TestRepo {
    tmp_dir: TempDir,
}

impl TestRepo {
    /// Initializes an empty repository with a local committer identity.
    pub fn new() -> Self {
        let tmp_dir = TempDir::new().unwrap();
        let repo = Self { tmp_dir };
        repo.git(&["init", "--quiet"]);
        repo.git(&["config", "user.name", "Test User"]);
        repo.git(&["config", "user.email", "test@example.com"]);
        repo.git(&["config", "commit.gpgsign", "false"]);
        repo.git(&["config", "tag.gpgsign", "false"]);
        repo
    }

    pub fn path(&self) -> &Path {
        self.tmp_dir.path()
    }

    /// Runs a git command inside the repository and returns its stdout.
    pub fn git(&self, args: &[&str]) -> String {
        let output = Command::new("git")
            .args(args)
            .current_dir(self.tmp_dir.path())
            .output()
            .unwrap();

        assert!(
            output.status.success(),
            "git {:?} failed: {}",
            args,
            String::from_utf8_lossy(&output.stderr)
        );

        String::from_utf8_lossy(&output.stdout).trim().to_string()
    }

    /// Writes `content` to `file_name`, commits it and returns the new sha.
    pub fn commit(&self, file_name: &str, content: &str, message: &str) -> String {
        fs::write(self.tmp_dir.path().join(file_name), content).unwrap();
        self.git(&["add", file_name]);
        self.git(&["commit", "--quiet", "-m", message]);
        self.git(&["rev-parse", "HEAD"])
    }

    /// Creates an empty commit and returns the new sha.
    pub fn empty_commit(&self, message: &str) -> String {
        self.git(&["commit", "--quiet", "--allow-empty", "-m", message]);
        self.git(&["rev-parse", "HEAD"])
    }

    /// Clones the repository over `file://` with `--depth 1` and returns the
    /// directory holding the shallow clone.
    pub fn shallow_clone(&self) -> TempDir {
        let clone_dir = TempDir::new().unwrap();
        let source = format!("file://{}", self.tmp_dir.path().display());

        let output = Command::new("git")
            .args(["clone", "--quiet", "--depth", "1", &source, "."])
            .current_dir(clone_dir.path())
            .output()
            .unwrap();

        assert!(
            output.status.success(),
            "shallow clone failed: {}",
            String::from_utf8_lossy(&output.stderr)
        );

        clone_dir
    }

    /// Creates a lightweight tag on HEAD.
    pub fn tag(&self, name: &str) {
        self.git(&["tag", name]);
    }

    /// Creates an annotated tag on HEAD with an explicit tagger date.
    pub fn annotated_tag(&self, name: &str, date: &str) {
        let output = Command::new("git")
            .args(["tag", "-a", "-m", name, name])
            .env("GIT_COMMITTER_DATE", date)
            .current_dir(self.tmp_dir.path())
            .output()
            .unwrap();
        assert!(output.status.success(), "failed to create tag {name}");
    }
}
