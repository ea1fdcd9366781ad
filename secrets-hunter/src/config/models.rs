//! Compiled rule-set model and the raw TOML shape it is built from.

use regex::Regex;
use serde::Deserialize;

/// A named secret-detection rule with its compiled expression.
#[derive(Debug, Clone)]
pub struct SecretPattern {
    /// Unique rule name ("AWS Access Key").
    pub name: String,
    /// Raw pattern text as declared in the rule source.
    pub pattern: String,
    /// Flag names the rule was declared with.
    pub flags: Vec<String>,
    /// Compiled expression.
    pub regex: Regex,
}

/// A compiled expression that keeps its raw source text.
///
/// The raw text is what merge removal/deduplication compares against, and
/// what the rules self-report prints.
#[derive(Debug, Clone)]
pub struct CompiledPattern {
    /// Pattern text as declared.
    pub raw: String,
    /// Compiled expression.
    pub regex: Regex,
}

/// The immutable result of merging base and overlay rule sources.
///
/// All list-valued collections are ordered (first-seen across the merge) and
/// free of duplicates; `secret_patterns` is additionally unique by name.
#[derive(Debug)]
pub struct RuleSet {
    /// Named secret-detection rules, declaration-ordered.
    pub secret_patterns: Vec<SecretPattern>,
    /// False-positive filters, matched case-insensitively against candidates.
    pub exclude_patterns: Vec<CompiledPattern>,
    /// Substrings that mark a variable name as secret-bearing.
    pub secret_keywords: Vec<String>,
    /// Substrings that mark a variable name as a known false positive.
    pub exclude_keywords: Vec<String>,
    /// Two-capture-group expressions: group 1 = variable, group 2 = value.
    pub assignment_patterns: Vec<CompiledPattern>,
    /// File extensions (with leading dot, lowercase) that are never scanned.
    pub ignore_extensions: Vec<String>,
    /// Directory names that are never descended into.
    pub ignore_dirs: Vec<String>,
    /// Exact file names that are never scanned.
    pub ignore_files: Vec<String>,
}

impl RuleSet {
    /// Looks up a secret pattern by its unique name.
    #[must_use]
    pub fn secret_pattern(&self, name: &str) -> Option<&SecretPattern> {
        self.secret_patterns.iter().find(|p| p.name == name)
    }

    /// Whether a variable name looks secret-bearing (case-insensitive
    /// substring match against `secret_keywords`).
    #[must_use]
    pub fn is_secret_var(&self, var: &str) -> bool {
        let var = var.to_lowercase();
        self.secret_keywords
            .iter()
            .any(|kw| var.contains(&kw.to_lowercase()))
    }
}

/// One rule-source file, as deserialized from TOML. Every key is optional;
/// a file only declares the deltas it cares about.
#[derive(Debug, Default, Deserialize)]
pub(super) struct RuleSource {
    #[serde(default)]
    pub(super) secret_patterns: Vec<SecretPatternDecl>,
    #[serde(default)]
    pub(super) remove_secret_patterns: Vec<String>,

    #[serde(default)]
    pub(super) exclude_patterns: Vec<String>,
    #[serde(default)]
    pub(super) remove_exclude_patterns: Vec<String>,

    #[serde(default)]
    pub(super) secret_keywords: Vec<String>,
    #[serde(default)]
    pub(super) remove_secret_keywords: Vec<String>,

    #[serde(default)]
    pub(super) exclude_keywords: Vec<String>,
    #[serde(default)]
    pub(super) remove_exclude_keywords: Vec<String>,

    #[serde(default)]
    pub(super) assignment_patterns: Vec<String>,
    #[serde(default)]
    pub(super) remove_assignment_patterns: Vec<String>,

    #[serde(default)]
    pub(super) ignore: IgnoreSection,
    #[serde(default)]
    pub(super) remove_ignore_dirs: Vec<String>,
    #[serde(default)]
    pub(super) remove_ignore_extensions: Vec<String>,
    #[serde(default)]
    pub(super) remove_ignore_files: Vec<String>,
}

/// The `[ignore]` table of a rule source.
#[derive(Debug, Default, Deserialize)]
pub(super) struct IgnoreSection {
    #[serde(default)]
    pub(super) dirs: Vec<String>,
    #[serde(default)]
    pub(super) extensions: Vec<String>,
    #[serde(default)]
    pub(super) files: Vec<String>,
}

/// A `[[secret_patterns]]` entry of a rule source.
#[derive(Debug, Deserialize)]
pub(super) struct SecretPatternDecl {
    pub(super) name: String,
    pub(super) pattern: String,
    #[serde(default)]
    pub(super) flags: Vec<String>,
}
