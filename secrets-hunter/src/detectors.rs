//! Detection engines that turn validated candidates into findings.

mod entropy;
mod pattern;

pub use entropy::{calculate_entropy, is_base64_string, is_hex_string, EntropyDetector};
pub use pattern::PatternDetector;

use std::path::Path;

use crate::constants::MAX_CONTEXT_LEN;
use crate::findings::Finding;

/// A detection engine. Detectors run in sequence over the same validated
/// candidates; their outputs are concatenated.
pub trait Detector: Send + Sync {
    /// Short engine name, for logging.
    fn name(&self) -> &'static str;

    /// Examines the candidates extracted from one line and returns zero or
    /// more findings.
    fn detect(
        &self,
        line: &str,
        line_number: usize,
        file: &Path,
        candidates: &[String],
    ) -> Vec<Finding>;
}

/// Builds the context snippet attached to findings: the trimmed line,
/// newlines escaped, truncated to [`MAX_CONTEXT_LEN`] characters.
#[must_use]
pub(crate) fn context_snippet(line: &str) -> String {
    line.trim()
        .replace('\r', "\\r")
        .replace('\n', "\\n")
        .chars()
        .take(MAX_CONTEXT_LEN)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snippet_trims_and_truncates() {
        let long = format!("   {}   ", "x".repeat(300));
        let snippet = context_snippet(&long);
        assert_eq!(snippet.chars().count(), MAX_CONTEXT_LEN);
        assert!(snippet.chars().all(|c| c == 'x'));
    }

    #[test]
    fn snippet_escapes_stray_newlines() {
        assert_eq!(context_snippet("a\rb"), "a\\rb");
    }
}
