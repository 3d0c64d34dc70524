use chrono::NaiveDate;
use semver::Version;

#[derive(Debug, Clone, PartialEq, Eq)]
/// A single release block to be prepended to the changelog.
pub struct ChangelogEntry {
    pub version: Version,
    pub date: NaiveDate,
    pub body: String,
}

impl ChangelogEntry {
    pub fn new(
        version: Version,
        date: NaiveDate,
        body: impl Into<String>,
    ) -> Self {
        Self {
            version,
            date,
            body: body.into(),
        }
    }

    /// `## Version <v> - <YYYY-MM-DD>`
    pub fn header(&self) -> String {
        format!(
            "## Version {} - {}",
            self.version,
            self.date.format("%Y-%m-%d")
        )
    }

    /// Header, blank line, body and a trailing blank line.
    pub fn render(&self) -> String {
        format!("{}\n\n{}\n\n", self.header(), self.body.trim_end())
    }
}

/// Prepends `entry` to `existing`, leaving `existing` untouched as a suffix.
pub fn merge(existing: &str, entry: &ChangelogEntry) -> String {
    let mut document = entry.render();
    document.push_str(existing);
    document
}
