//! Common test utilities for pipeline tests.
use chrono::NaiveDate;
use std::path::Path;

use crate::{
    history::{git::GitHistory, traits::History},
    pipeline::{Pipeline, PipelineParams},
    summarizer::client::{MockTextGenerator, TextGenerator},
    test_helpers::{TestRepo, chat_response, create_test_settings},
};

pub const CHANGELOG_FILE: &str = "RELEASE.md";

pub fn test_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 5, 17).unwrap()
}

/// Creates a pipeline over arbitrary collaborators writing to
/// `changelog_path`.
pub fn create_test_pipeline(
    history: impl History + 'static,
    generator: impl TextGenerator + 'static,
    changelog_path: &Path,
    dry_run: bool,
) -> Pipeline {
    Pipeline::new(PipelineParams {
        history: Box::new(history),
        generator: Box::new(generator),
        settings: create_test_settings(),
        changelog_path: changelog_path.to_path_buf(),
        dry_run,
    })
    .unwrap()
}

/// Creates a pipeline reading history from `repo` and writing
/// `RELEASE.md` inside it.
pub fn create_repo_pipeline(
    repo: &TestRepo,
    generator: MockTextGenerator,
) -> Pipeline {
    let history = GitHistory::open(repo.path(), None).unwrap();
    create_test_pipeline(
        history,
        generator,
        &repo.path().join(CHANGELOG_FILE),
        false,
    )
}

/// Generator expected to be called exactly `times` times, always answering
/// with `text`.
pub fn generator_returning(
    text: &'static str,
    times: usize,
) -> MockTextGenerator {
    let mut generator = MockTextGenerator::new();
    generator
        .expect_generate()
        .times(times)
        .returning(move |_| Ok(chat_response(text)));
    generator
}

/// Generator that must never be called.
pub fn silent_generator() -> MockTextGenerator {
    let mut generator = MockTextGenerator::new();
    generator.expect_generate().never();
    generator
}

/// Repository with a tagged release followed by one feature commit.
pub fn tagged_repo_with_feature() -> TestRepo {
    let repo = TestRepo::new();
    repo.commit("README.md", "# project\n", "chore: init");
    repo.tag("v1.0.0");
    repo.commit("login.rs", "pub fn login() {}\n", "feat: add login endpoint");
    repo
}
