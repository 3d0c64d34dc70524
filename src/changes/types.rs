use std::fmt;

use crate::history::types::{CommitInfo, SHORT_ID_LEN};

/// Summary used when there is no prior history to compare against.
pub const INITIAL_SUMMARY: &str = "Initial commit";

/// Summary used when a reference exists but nothing changed since it.
pub const NO_CHANGES_SUMMARY: &str = "No relevant changes detected.";

#[derive(Debug, Clone, PartialEq, Eq)]
/// Prior point in history the current HEAD is compared against.
pub enum ReferencePoint {
    /// A tag name, without the `refs/tags/` prefix.
    Tag(String),
    /// Number of commits before HEAD.
    Offset(u32),
}

impl ReferencePoint {
    /// Revspec understood by git for this reference.
    pub fn revspec(&self) -> String {
        match self {
            ReferencePoint::Tag(name) => format!("refs/tags/{name}"),
            ReferencePoint::Offset(n) => format!("HEAD~{n}"),
        }
    }
}

impl fmt::Display for ReferencePoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReferencePoint::Tag(name) => write!(f, "{name}"),
            ReferencePoint::Offset(n) => write!(f, "HEAD~{n}"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Discriminant of a [`ChangeSet`], used for logging and run outcomes.
pub enum ChangeKind {
    Initial,
    Diff,
    CommitsOnly,
    NoChanges,
    Error,
}

impl fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ChangeKind::Initial => "initial",
            ChangeKind::Diff => "diff",
            ChangeKind::CommitsOnly => "commits-only",
            ChangeKind::NoChanges => "no-changes",
            ChangeKind::Error => "error",
        };
        write!(f, "{name}")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Normalized description of what changed since the reference point.
pub enum ChangeSet {
    /// No usable history exists.
    Initial,
    /// The tree changed; `body` is the full unified patch.
    Diff {
        body: String,
        commit_summaries: String,
        changed_files: String,
    },
    /// The tree is unchanged but commits exist (merge or empty commits).
    CommitsOnly {
        commit_summaries: String,
        changed_files: String,
    },
    /// Nothing at all lies between the reference and HEAD.
    NoChanges,
    /// History could not be read; `reason` becomes the summary.
    Error { reason: String },
}

impl ChangeSet {
    pub fn error(reason: impl Into<String>) -> Self {
        ChangeSet::Error {
            reason: reason.into(),
        }
    }

    pub fn kind(&self) -> ChangeKind {
        match self {
            ChangeSet::Initial => ChangeKind::Initial,
            ChangeSet::Diff { .. } => ChangeKind::Diff,
            ChangeSet::CommitsOnly { .. } => ChangeKind::CommitsOnly,
            ChangeSet::NoChanges => ChangeKind::NoChanges,
            ChangeSet::Error { .. } => ChangeKind::Error,
        }
    }

    /// Deterministic summary for change sets that never reach the external
    /// service, `None` for those that must be summarized.
    pub fn fixed_summary(&self) -> Option<&str> {
        match self {
            ChangeSet::Initial => Some(INITIAL_SUMMARY),
            ChangeSet::NoChanges => Some(NO_CHANGES_SUMMARY),
            ChangeSet::Error { reason } => Some(reason.as_str()),
            ChangeSet::Diff { .. } | ChangeSet::CommitsOnly { .. } => None,
        }
    }

    /// Text that is split into chunks and summarized.
    pub fn primary_body(&self) -> String {
        match self {
            ChangeSet::Diff { body, .. } => body.clone(),
            ChangeSet::CommitsOnly {
                commit_summaries,
                changed_files,
            } => {
                let mut body = String::new();
                if !commit_summaries.is_empty() {
                    body.push_str(&format!(
                        "Commit messages:\n{commit_summaries}"
                    ));
                }
                if !changed_files.is_empty() {
                    if !body.is_empty() {
                        body.push_str("\n\n");
                    }
                    body.push_str(&format!("Changed files:\n{changed_files}"));
                }
                body
            }
            _ => String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// One line of a commit summary block.
///
/// Lines are always written as `- <short-hash>: <subject>`, but lines
/// without a hash (`- <subject>`) are accepted when reading them back.
pub struct CommitLine {
    pub short_id: Option<String>,
    pub subject: String,
}

impl CommitLine {
    pub fn from_commit(commit: &CommitInfo) -> Self {
        Self {
            short_id: Some(commit.short_id.clone()),
            subject: commit.subject().to_string(),
        }
    }

    pub fn parse(line: &str) -> Option<Self> {
        let rest = line.trim().strip_prefix("- ")?.trim();

        if rest.is_empty() {
            return None;
        }

        if let Some((hash, subject)) = rest.split_once(": ")
            && hash.len() >= SHORT_ID_LEN
            && hash.chars().all(|c| c.is_ascii_hexdigit())
        {
            return Some(Self {
                short_id: Some(hash.to_string()),
                subject: subject.trim().to_string(),
            });
        }

        Some(Self {
            short_id: None,
            subject: rest.to_string(),
        })
    }
}

impl fmt::Display for CommitLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.short_id {
            Some(id) => write!(f, "- {id}: {}", self.subject),
            None => write!(f, "- {}", self.subject),
        }
    }
}

/// Renders commits as a newline separated block of [`CommitLine`]s.
pub fn format_commit_summaries(commits: &[CommitInfo]) -> String {
    commits
        .iter()
        .map(|c| CommitLine::from_commit(c).to_string())
        .collect::<Vec<String>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_revspecs() {
        let tag = ReferencePoint::Tag("v1.2.0".into());
        assert_eq!(tag.revspec(), "refs/tags/v1.2.0");
        assert_eq!(tag.to_string(), "v1.2.0");

        let offset = ReferencePoint::Offset(1);
        assert_eq!(offset.revspec(), "HEAD~1");
    }

    #[test]
    fn fixed_summaries_bypass_summarization() {
        assert_eq!(ChangeSet::Initial.fixed_summary(), Some("Initial commit"));
        assert_eq!(
            ChangeSet::error("Error getting diff: boom").fixed_summary(),
            Some("Error getting diff: boom")
        );
        assert_eq!(
            ChangeSet::NoChanges.fixed_summary(),
            Some(NO_CHANGES_SUMMARY)
        );

        let diff = ChangeSet::Diff {
            body: "+x".into(),
            commit_summaries: "".into(),
            changed_files: "".into(),
        };
        assert_eq!(diff.fixed_summary(), None);
        assert_eq!(diff.primary_body(), "+x");
    }

    #[test]
    fn commits_only_body_includes_files() {
        let change_set = ChangeSet::CommitsOnly {
            commit_summaries: "- abc1234: Merge branch 'x'".into(),
            changed_files: "M\tsrc/lib.rs".into(),
        };

        assert_eq!(
            change_set.primary_body(),
            "Commit messages:\n- abc1234: Merge branch 'x'\n\nChanged files:\nM\tsrc/lib.rs"
        );
    }

    #[test]
    fn formats_commit_lines_with_short_hash() {
        let commits = vec![
            CommitInfo::new("0123456789", "fix: crash\n\nbody"),
            CommitInfo::new("abcdef0123", "feat: login"),
        ];

        assert_eq!(
            format_commit_summaries(&commits),
            "- 0123456: fix: crash\n- abcdef0: feat: login"
        );
    }

    #[test]
    fn parses_commit_lines_with_and_without_hash() {
        let with_hash = CommitLine::parse("- 0123456: fix: crash").unwrap();
        assert_eq!(with_hash.short_id.as_deref(), Some("0123456"));
        assert_eq!(with_hash.subject, "fix: crash");

        let without_hash = CommitLine::parse("- fix: crash").unwrap();
        assert_eq!(without_hash.short_id, None);
        assert_eq!(without_hash.subject, "fix: crash");

        assert!(CommitLine::parse("not a bullet").is_none());
        assert!(CommitLine::parse("- ").is_none());
    }
}
