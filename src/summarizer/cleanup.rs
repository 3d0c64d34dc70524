//! Deterministic post-processing of generated summaries.
use regex::Regex;

use crate::Result;

/// Hedging phrases removed from generated text, matched as whole words.
const HEDGING_PATTERN: &str = r"(?i)\b(?:could have|probably|likely|might)\b";

/// Strips hedging language and whitespace artifacts from model output.
pub struct Cleaner {
    hedging: Regex,
    repeated_spaces: Regex,
    space_before_punctuation: Regex,
}

impl Cleaner {
    pub fn new() -> Result<Self> {
        Ok(Self {
            hedging: Regex::new(HEDGING_PATTERN)?,
            repeated_spaces: Regex::new(r"[ \t]{2,}")?,
            space_before_punctuation: Regex::new(r"[ \t]+([,.;:])")?,
        })
    }

    /// Remove hedging tokens, collapse the whitespace they leave behind and
    /// trim every line. Leading indentation of nested bullets is kept.
    pub fn clean(&self, text: &str) -> String {
        let stripped = self.hedging.replace_all(text, "");

        let lines = stripped
            .lines()
            .map(|line| {
                let indent_len = line.len() - line.trim_start().len();
                let (indent, rest) = line.split_at(indent_len);
                let rest = self.repeated_spaces.replace_all(rest, " ");
                let rest = self.space_before_punctuation.replace_all(&rest, "$1");
                format!("{indent}{}", rest.trim_end())
            })
            .collect::<Vec<String>>();

        lines.join("\n").trim().to_string()
    }
}
