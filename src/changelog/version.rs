//! Next-version computation from an existing changelog document.
use log::*;
use regex::Regex;
use semver::Version;

use crate::Result;

/// Matches the newest `## Version X.Y.Z` header line.
const HEADER_PATTERN: &str = r"(?m)^## Version (\d+)\.(\d+)\.(\d+)";

/// Reads the most recent version header out of a changelog.
pub struct VersionParser {
    header: Regex,
}

impl VersionParser {
    pub fn new() -> Result<Self> {
        Ok(Self {
            header: Regex::new(HEADER_PATTERN)?,
        })
    }

    /// Version of the first header in `changelog`, if any.
    pub fn current_version(&self, changelog: &str) -> Option<Version> {
        let caps = self.header.captures(changelog)?;

        let parts = (1..=3)
            .map(|i| caps[i].parse::<u64>())
            .collect::<std::result::Result<Vec<u64>, _>>();

        match parts {
            Ok(parts) => Some(Version::new(parts[0], parts[1], parts[2])),
            Err(err) => {
                warn!(
                    "ignoring unparsable version header {:?}: {err}",
                    &caps[0]
                );
                None
            }
        }
    }

    /// Patch increment of the current version, `0.0.1` when the changelog
    /// has no usable header.
    pub fn next_version(&self, changelog: &str) -> Version {
        let Some(current) = self.current_version(changelog) else {
            return Version::new(0, 0, 1);
        };

        match current.patch.checked_add(1) {
            Some(patch) => Version::new(current.major, current.minor, patch),
            None => {
                warn!("patch component of {current} cannot be incremented");
                Version::new(0, 0, 1)
            }
        }
    }
}
