//! Prompt construction for chunk summarization requests.
use serde::Serialize;

use crate::{
    changes::types::{ChangeSet, CommitLine},
    chunker::Chunk,
    summarizer::SummarizerSettings,
};

pub const SYSTEM_PROMPT: &str = "You are a technical changelog generator. \
Your job is to summarize Git changes as factual, concise, and \
developer-friendly release notes. Use bullet points. Do not include headers, \
version numbers, or dates. Avoid any uncertain language such as \"probably\", \
\"likely\", \"might\" or \"could have\", and avoid a conversational tone.";

const DIFF_INSTRUCTION: &str = "Summarize the following Git diff as bullet \
points for a changelog. Only include technical changes that are clearly \
evident.";

const COMMITS_INSTRUCTION: &str = "Summarize the following commit messages \
and changed files as bullet points for a changelog. Only include technical \
changes that are clearly evident.";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    fn new(role: &str, content: impl Into<String>) -> Self {
        Self {
            role: role.to_string(),
            content: content.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
/// Request body sent to the text generation service for one chunk.
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub max_tokens: u32,
    pub temperature: f32,
    pub stream: bool,
}

/// Room kept for the omission note when context is truncated.
const OMISSION_NOTE_RESERVE: usize = 32;

/// Commit subjects used as context for diff chunks, hashes dropped.
fn commit_context(commit_summaries: &str) -> Vec<String> {
    commit_summaries
        .lines()
        .filter_map(CommitLine::parse)
        .map(|line| format!("- {}", line.subject))
        .collect()
}

/// Join `lines` within `budget` characters, replacing whatever does not fit
/// with a count of the omitted lines.
fn fit_lines(lines: &[String], budget: usize) -> String {
    let total = lines.iter().map(|l| l.chars().count() + 1).sum::<usize>();
    if total <= budget {
        return lines.join("\n");
    }

    let limit = budget.saturating_sub(OMISSION_NOTE_RESERVE);
    let mut used = 0;
    let mut kept = vec![];

    for line in lines {
        let cost = line.chars().count() + 1;
        if used + cost > limit {
            break;
        }
        used += cost;
        kept.push(line.as_str());
    }

    let note = format!("... and {} more", lines.len() - kept.len());
    kept.push(&note);
    kept.join("\n")
}

/// Build the composite request for `chunk`, one of `total` chunks of the
/// change set's primary body.
pub fn build_request(
    settings: &SummarizerSettings,
    change_set: &ChangeSet,
    chunk: &Chunk,
    total: usize,
) -> ChatRequest {
    let mut user = String::new();

    match change_set {
        ChangeSet::Diff {
            commit_summaries,
            changed_files,
            ..
        } => {
            user.push_str(DIFF_INSTRUCTION);

            // context shares half a chunk's budget, commits first
            let context_budget = settings.max_chunk_size / 2;

            let commits = commit_context(commit_summaries);
            let mut used = 0;
            if !commits.is_empty() {
                let block = fit_lines(&commits, context_budget / 2);
                used = block.chars().count();
                user.push_str("\n\nCommit messages:\n");
                user.push_str(&block);
            }

            let files = changed_files
                .lines()
                .filter(|line| !line.trim().is_empty())
                .map(str::to_string)
                .collect::<Vec<String>>();
            if !files.is_empty() {
                let block =
                    fit_lines(&files, context_budget.saturating_sub(used));
                user.push_str("\n\nChanged files:\n");
                user.push_str(&block);
            }

            user.push_str(&format!(
                "\n\nGit diff (part {} of {}):\n\n",
                chunk.index + 1,
                total
            ));
        }
        _ => {
            user.push_str(COMMITS_INSTRUCTION);
            user.push_str(&format!(
                "\n\nChanges (part {} of {}):\n\n",
                chunk.index + 1,
                total
            ));
        }
    }

    user.push_str(&chunk.text);

    ChatRequest {
        model: settings.model.clone(),
        messages: vec![
            ChatMessage::new("system", SYSTEM_PROMPT),
            ChatMessage::new("user", user),
        ],
        max_tokens: settings.max_tokens,
        temperature: settings.temperature,
        stream: false,
    }
}
