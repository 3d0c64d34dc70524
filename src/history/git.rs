//! Git history access backed by libgit2.
//!
//! This module implements the [`History`] collaborator on top of the `git2`
//! crate. It covers the read-only queries needed to describe what changed
//! since the last release:
//!
//! - Converting a shallow CI checkout into full history (best effort)
//! - Finding the most recently created tag
//! - Counting commits reachable from HEAD
//! - Producing a unified patch and a name-status listing between revisions
//! - Listing the commits between two revisions
//!
//! # Authentication
//!
//! Only [`History::ensure_full_history`] touches the network. It fetches from
//! the `origin` remote using an optional access token, falling back to the
//! local git credential helper and finally to the default credentials.
use async_trait::async_trait;
use git2::{
    Cred, CredentialType, DiffFindOptions, DiffFormat, ErrorCode,
    RemoteCallbacks, Sort,
};
use log::*;
use secrecy::{ExposeSecret, SecretString};
use semver::Version;
use std::{
    cmp::Ordering,
    path::Path,
    time::{Duration, Instant},
};
use tokio::sync::Mutex;

use crate::{
    Result,
    history::{traits::History, types::CommitInfo},
};

/// Remote fetched from when unshallowing a checkout.
const DEFAULT_REMOTE: &str = "origin";

/// Depth value libgit2 interprets as "fetch everything and unshallow".
const UNSHALLOW_DEPTH: i32 = i32::MAX;

/// Username sent alongside a token for HTTPS authentication.
const TOKEN_USERNAME: &str = "x-access-token";

/// Upper bound for the unshallow fetch unless overridden.
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(60);

/// Local repository history queried through libgit2.
///
/// `git2::Repository` is not `Sync`, so the handle lives behind an async
/// mutex and each query holds the lock for its whole duration.
pub struct GitHistory {
    repo: Mutex<git2::Repository>,
    token: Option<SecretString>,
    fetch_timeout: Duration,
}

/// Create Git authentication callbacks for fetching from the remote.
///
/// A configured token wins; otherwise the credential helper from the local
/// git configuration is consulted, then SSH agent and default credentials.
fn get_auth_callbacks<'r>(
    token: Option<String>,
    config: Option<git2::Config>,
) -> RemoteCallbacks<'r> {
    let mut callbacks = RemoteCallbacks::new();
    callbacks.credentials(move |url, username, allowed| {
        if allowed.contains(CredentialType::USER_PASS_PLAINTEXT) {
            if let Some(token) = token.as_deref() {
                return Cred::userpass_plaintext(TOKEN_USERNAME, token);
            }
            if let Some(config) = config.as_ref()
                && let Ok(cred) = Cred::credential_helper(config, url, username)
            {
                return Ok(cred);
            }
        }
        if allowed.contains(CredentialType::SSH_KEY)
            && let Some(username) = username
        {
            return Cred::ssh_key_from_agent(username);
        }
        Cred::default()
    });
    callbacks
}

/// Abort the transfer once `deadline` has passed.
///
/// libgit2 polls these callbacks while data is flowing, so they bound a slow
/// transfer; a remote that never answers is bounded by the server timeouts
/// set in [`set_server_timeouts`].
fn with_deadline(callbacks: &mut RemoteCallbacks<'_>, deadline: Instant) {
    callbacks.transfer_progress(move |_| Instant::now() < deadline);
    callbacks.sideband_progress(move |_| Instant::now() < deadline);
}

/// Bound connecting to and waiting on the remote.
fn set_server_timeouts(timeout: Duration) -> Result<()> {
    let millis = i32::try_from(timeout.as_millis()).unwrap_or(i32::MAX);
    // SAFETY: the options are process-global and only written here, before
    // the fetch that reads them.
    unsafe {
        git2::opts::set_server_connect_timeout_in_milliseconds(millis)?;
        git2::opts::set_server_timeout_in_milliseconds(millis)?;
    }
    Ok(())
}

/// Semver-aware tag name ordering, plain string order otherwise.
fn compare_tag_names(a: &str, b: &str) -> Ordering {
    let parse = |name: &str| Version::parse(name.trim_start_matches('v')).ok();
    match (parse(a), parse(b)) {
        (Some(va), Some(vb)) => va.cmp(&vb).then_with(|| a.cmp(b)),
        _ => a.cmp(b),
    }
}

/// Resolve a revspec to the tree it points at.
fn tree_for<'r>(
    repo: &'r git2::Repository,
    rev: &str,
) -> Result<git2::Tree<'r>> {
    Ok(repo.revparse_single(rev)?.peel_to_tree()?)
}

/// Single-letter status code matching `git diff --name-status`.
fn status_letter(status: git2::Delta) -> char {
    match status {
        git2::Delta::Added => 'A',
        git2::Delta::Deleted => 'D',
        git2::Delta::Modified => 'M',
        git2::Delta::Renamed => 'R',
        git2::Delta::Copied => 'C',
        git2::Delta::Typechange => 'T',
        git2::Delta::Untracked => '?',
        _ => 'X',
    }
}

impl GitHistory {
    /// Open the repository containing `path`.
    ///
    /// The path may point at the working directory or any directory inside
    /// it; discovery walks up the filesystem like the git CLI does.
    ///
    /// # Errors
    ///
    /// Returns an error if no repository can be found at or above `path`.
    pub fn open(path: &Path, token: Option<SecretString>) -> Result<Self> {
        let repo = git2::Repository::discover(path)?;
        debug!(
            "opened repository at {}",
            repo.workdir().unwrap_or(repo.path()).display()
        );
        Ok(Self {
            repo: Mutex::new(repo),
            token,
            fetch_timeout: DEFAULT_FETCH_TIMEOUT,
        })
    }

    /// Bound the unshallow fetch to `timeout`.
    pub fn with_fetch_timeout(mut self, timeout: Duration) -> Self {
        self.fetch_timeout = timeout;
        self
    }

    /// Diff between two revisions with rename detection applied.
    fn tree_diff<'r>(
        repo: &'r git2::Repository,
        from: &str,
        to: &str,
    ) -> Result<git2::Diff<'r>> {
        let old_tree = tree_for(repo, from)?;
        let new_tree = tree_for(repo, to)?;
        let mut diff =
            repo.diff_tree_to_tree(Some(&old_tree), Some(&new_tree), None)?;
        diff.find_similar(Some(DiffFindOptions::new().renames(true)))?;
        Ok(diff)
    }
}

#[async_trait]
impl History for GitHistory {
    /// Fetch the remaining history when the checkout is shallow.
    ///
    /// CI systems commonly clone with `--depth 1`, which hides both tags and
    /// the previous commit. A complete checkout is left untouched.
    ///
    /// # Errors
    ///
    /// Returns an error if the remote is missing, the fetch fails or it runs
    /// past the fetch timeout. Callers treat this as non-fatal and continue
    /// with the history available.
    async fn ensure_full_history(&self) -> Result<()> {
        let repo = self.repo.lock().await;

        if !repo.is_shallow() {
            info!("repository already has full history");
            return Ok(());
        }

        info!("shallow clone detected: fetching full history");

        let token = self.token.as_ref().map(|t| t.expose_secret().to_string());
        let config = repo.config().ok().and_then(|mut c| c.snapshot().ok());

        set_server_timeouts(self.fetch_timeout)?;
        let mut callbacks = get_auth_callbacks(token, config);
        with_deadline(&mut callbacks, Instant::now() + self.fetch_timeout);

        let mut fetch_options = git2::FetchOptions::new();
        fetch_options.depth(UNSHALLOW_DEPTH);
        fetch_options.download_tags(git2::AutotagOption::All);
        fetch_options.remote_callbacks(callbacks);

        let mut remote = repo.find_remote(DEFAULT_REMOTE)?;
        remote.fetch(&[] as &[&str], Some(&mut fetch_options), None)?;

        info!("repository unshallowed successfully");
        Ok(())
    }

    async fn latest_tag(&self) -> Result<Option<String>> {
        let repo = self.repo.lock().await;

        let references = repo
            .references()?
            .filter_map(|r| r.ok())
            .collect::<Vec<git2::Reference>>();

        let mut tags: Vec<(i64, String)> = vec![];

        for reference in references.iter() {
            if reference.is_tag()
                && let Some(name) = reference.name()
                && let Some(stripped) = name.strip_prefix("refs/tags/")
            {
                // annotated tags carry their own creation time, lightweight
                // tags only have the time of the commit they point at
                let tagger_time = reference
                    .peel_to_tag()
                    .ok()
                    .and_then(|tag| tag.tagger().map(|s| s.when().seconds()));

                let created = match tagger_time {
                    Some(time) => time,
                    None => match reference.peel_to_commit() {
                        Ok(commit) => commit.time().seconds(),
                        Err(err) => {
                            debug!("skipping tag {stripped}: {err}");
                            continue;
                        }
                    },
                };

                tags.push((created, stripped.to_string()));
            }
        }

        // newest first, highest version breaks ties
        tags.sort_by(|(t1, n1), (t2, n2)| {
            t2.cmp(t1).then_with(|| compare_tag_names(n2, n1))
        });

        Ok(tags.into_iter().next().map(|(_, name)| name))
    }

    async fn commit_count(&self) -> Result<usize> {
        let repo = self.repo.lock().await;

        match repo.head() {
            Ok(_) => {}
            Err(err)
                if err.code() == ErrorCode::UnbornBranch
                    || err.code() == ErrorCode::NotFound =>
            {
                return Ok(0);
            }
            Err(err) => return Err(err.into()),
        }

        let mut revwalk = repo.revwalk()?;
        revwalk.push_head()?;

        let mut count = 0;
        for id in revwalk {
            id?;
            count += 1;
        }

        Ok(count)
    }

    async fn diff(&self, from: &str, to: &str) -> Result<String> {
        let repo = self.repo.lock().await;
        let diff = Self::tree_diff(&repo, from, to)?;

        let mut patch = String::new();
        diff.print(DiffFormat::Patch, |_delta, _hunk, line| {
            if let origin @ ('+' | '-' | ' ') = line.origin() {
                patch.push(origin);
            }
            patch.push_str(&String::from_utf8_lossy(line.content()));
            true
        })?;

        Ok(patch)
    }

    async fn changed_files(&self, from: &str, to: &str) -> Result<String> {
        let repo = self.repo.lock().await;
        let diff = Self::tree_diff(&repo, from, to)?;

        let lines = diff
            .deltas()
            .filter_map(|delta| {
                let path = delta.new_file().path().or(delta.old_file().path())?;
                Some(format!(
                    "{}\t{}",
                    status_letter(delta.status()),
                    path.display()
                ))
            })
            .collect::<Vec<String>>();

        Ok(lines.join("\n"))
    }

    async fn log(&self, from: &str, to: &str) -> Result<Vec<CommitInfo>> {
        let repo = self.repo.lock().await;

        let mut revwalk = repo.revwalk()?;
        revwalk.set_sorting(Sort::TOPOLOGICAL | Sort::TIME)?;
        revwalk.push_range(&format!("{from}..{to}"))?;

        let mut commits = vec![];

        for id in revwalk {
            let commit = repo.find_commit(id?)?;
            commits.push(CommitInfo::new(
                commit.id().to_string(),
                commit.message().unwrap_or(""),
            ));
        }

        Ok(commits)
    }
}

#[cfg(test)]
#[path = "./git_tests.rs"]
mod tests;
