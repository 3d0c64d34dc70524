use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};

use super::*;
use crate::{
    changes::types::{INITIAL_SUMMARY, NO_CHANGES_SUMMARY},
    error::ScribeError,
    summarizer::client::MockTextGenerator,
    test_helpers::{chat_response, create_test_settings, generation_response},
};

fn diff(body: &str) -> ChangeSet {
    ChangeSet::Diff {
        body: body.into(),
        commit_summaries: "- 0123456: feat: login".into(),
        changed_files: "A\tsrc/login.rs".into(),
    }
}

fn settings_with_chunk_size(max_chunk_size: usize) -> SummarizerSettings {
    SummarizerSettings {
        max_chunk_size,
        ..create_test_settings()
    }
}

/// Chunk body for part `n` of a request, as written by the prompt builder.
fn chunk_text(request: &prompt::ChatRequest) -> String {
    let user = &request.messages[1].content;
    user.rsplit("\n\n").next().unwrap_or("").to_string()
}

#[test]
fn dedup_keeps_first_occurrence_order() {
    let unique = dedup_ordered(vec!["A".into(), "B".into(), "A".into()]);
    assert_eq!(unique, vec!["A".to_string(), "B".to_string()]);
}

#[test]
fn combine_joins_unique_summaries_in_order() {
    let outcomes = vec![
        ChunkOutcome::Summary("A".into()),
        ChunkOutcome::Summary("B".into()),
        ChunkOutcome::Empty,
        ChunkOutcome::Summary("A".into()),
    ];

    assert_eq!(combine(&outcomes, 100), "A\nB");
}

#[test]
fn combine_skips_failed_chunks_when_others_succeed() {
    let outcomes = vec![
        ChunkOutcome::Failed("timeout".into()),
        ChunkOutcome::Summary("- Fixed crash.".into()),
    ];

    assert_eq!(combine(&outcomes, 100), "- Fixed crash.");
}

#[test]
fn combine_reports_total_failure_with_context() {
    let outcomes = vec![
        ChunkOutcome::Failed("timeout".into()),
        ChunkOutcome::Failed("401".into()),
    ];

    let summary = combine(&outcomes, 3500);

    assert_eq!(summary, unsummarized_message(3500, 2));
    assert!(summary.contains("3500 characters"));
    assert!(summary.contains("2 chunk(s)"));
}

#[test]
fn combine_without_text_falls_back() {
    let outcomes = vec![ChunkOutcome::Empty, ChunkOutcome::Empty];
    assert_eq!(combine(&outcomes, 10), NO_SIGNIFICANT_CHANGES);

    let outcomes = vec![ChunkOutcome::Empty, ChunkOutcome::Failed("x".into())];
    assert_eq!(combine(&outcomes, 10), NO_SIGNIFICANT_CHANGES);
}

#[tokio::test]
async fn fixed_change_sets_make_no_calls() {
    let mut generator = MockTextGenerator::new();
    generator.expect_generate().never();

    let summarizer =
        Summarizer::new(&generator, create_test_settings()).unwrap();

    assert_eq!(
        summarizer.summarize(&ChangeSet::Initial).await,
        INITIAL_SUMMARY
    );
    assert_eq!(
        summarizer.summarize(&ChangeSet::NoChanges).await,
        NO_CHANGES_SUMMARY
    );
    assert_eq!(
        summarizer
            .summarize(&ChangeSet::error("Error getting diff: boom"))
            .await,
        "Error getting diff: boom"
    );
}

#[tokio::test]
async fn single_chunk_summary_is_cleaned() {
    let mut generator = MockTextGenerator::new();
    generator
        .expect_generate()
        .times(1)
        .withf(|req| req.messages[1].content.ends_with("+fn login() {}"))
        .returning(|_| {
            Ok(chat_response("- Probably added login endpoint.\n"))
        });

    let summarizer =
        Summarizer::new(&generator, create_test_settings()).unwrap();

    let summary = summarizer.summarize(&diff("+fn login() {}")).await;

    assert_eq!(summary, "- added login endpoint.");
}

#[tokio::test]
async fn one_call_per_chunk_in_order_with_dedup() {
    let mut generator = MockTextGenerator::new();
    generator.expect_generate().times(3).returning(|req| {
        // chunk bodies are "aaaa", "bbbb", "aaaa"
        let text = chunk_text(req);
        if text.starts_with('a') {
            Ok(chat_response("- Updated A."))
        } else {
            Ok(generation_response("- Updated B."))
        }
    });

    let summarizer =
        Summarizer::new(&generator, settings_with_chunk_size(4)).unwrap();

    let summary = summarizer.summarize(&diff("aaaabbbbaaaa")).await;

    assert_eq!(summary, "- Updated A.\n- Updated B.");
}

#[tokio::test]
async fn concurrent_dispatch_preserves_chunk_order() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);

    let mut generator = MockTextGenerator::new();
    generator.expect_generate().times(4).returning(move |req| {
        counter.fetch_add(1, Ordering::SeqCst);
        let text = chunk_text(req);
        Ok(chat_response(&format!("- Changed {text}.")))
    });

    let settings = SummarizerSettings {
        concurrency: 3,
        ..settings_with_chunk_size(2)
    };
    let summarizer = Summarizer::new(&generator, settings).unwrap();

    let summary = summarizer.summarize(&diff("w1x2y3z4")).await;

    assert_eq!(calls.load(Ordering::SeqCst), 4);
    assert_eq!(
        summary,
        "- Changed w1.\n- Changed x2.\n- Changed y3.\n- Changed z4."
    );
}

#[test_log::test(tokio::test)]
async fn partial_failures_do_not_abort() {
    let mut generator = MockTextGenerator::new();
    generator.expect_generate().times(2).returning(|req| {
        if chunk_text(req).starts_with('a') {
            Err(ScribeError::NetworkError("connection reset".into()))
        } else {
            Ok(chat_response("- Fixed crash."))
        }
    });

    let summarizer =
        Summarizer::new(&generator, settings_with_chunk_size(3)).unwrap();

    let summary = summarizer.summarize(&diff("aaabbb")).await;

    assert_eq!(summary, "- Fixed crash.");
}

#[test_log::test(tokio::test)]
async fn total_failure_degrades_to_message() {
    let mut generator = MockTextGenerator::new();
    generator.expect_generate().times(2).returning(|_| {
        Err(ScribeError::AuthenticationError("401 Unauthorized".into()))
    });

    let summarizer =
        Summarizer::new(&generator, settings_with_chunk_size(5)).unwrap();

    let summary = summarizer.summarize(&diff("0123456789")).await;

    assert_eq!(summary, unsummarized_message(10, 2));
}

#[tokio::test]
async fn empty_responses_fall_back_to_no_significant_changes() {
    let mut generator = MockTextGenerator::new();
    generator
        .expect_generate()
        .times(1)
        .returning(|_| Ok(chat_response("   ")));

    let summarizer =
        Summarizer::new(&generator, create_test_settings()).unwrap();

    let summary = summarizer.summarize(&diff("+x")).await;

    assert_eq!(summary, NO_SIGNIFICANT_CHANGES);
}

#[tokio::test]
async fn commits_only_is_summarized_from_commit_block() {
    let mut generator = MockTextGenerator::new();
    generator
        .expect_generate()
        .times(1)
        .withf(|req| {
            req.messages[1]
                .content
                .ends_with("Commit messages:\n- aaaaaaa: Merge branch 'feature'")
        })
        .returning(|_| Ok(chat_response("- Merged feature branch.")));

    let summarizer =
        Summarizer::new(&generator, create_test_settings()).unwrap();

    let change_set = ChangeSet::CommitsOnly {
        commit_summaries: "- aaaaaaa: Merge branch 'feature'".into(),
        changed_files: "".into(),
    };

    assert_eq!(
        summarizer.summarize(&change_set).await,
        "- Merged feature branch."
    );
}
