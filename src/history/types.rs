/// Number of hex characters kept for abbreviated commit hashes.
pub const SHORT_ID_LEN: usize = 7;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// A single commit between a reference point and HEAD.
pub struct CommitInfo {
    pub id: String,
    pub short_id: String,
    pub message: String,
}

impl CommitInfo {
    pub fn new(id: impl Into<String>, message: impl Into<String>) -> Self {
        let id = id.into();
        let short_id = id.chars().take(SHORT_ID_LEN).collect();
        Self {
            id,
            short_id,
            message: message.into(),
        }
    }

    /// First line of the commit message, trimmed.
    pub fn subject(&self) -> &str {
        self.message.lines().next().unwrap_or("").trim()
    }
}
