//! Rule-source loading and order-sensitive merge.

use anyhow::{bail, Context, Result};
use regex::{Regex, RegexBuilder};
use std::path::Path;

use super::models::{CompiledPattern, RuleSet, RuleSource, SecretPattern};

/// Built-in base rules, always applied before any overlay.
const BASE_SOURCES: [(&str, &str); 2] = [
    ("builtin:patterns.toml", include_str!("base/patterns.toml")),
    ("builtin:ignore.toml", include_str!("base/ignore.toml")),
];

/// Loads the base rule files plus the given overlays, left to right, and
/// compiles the merged result.
///
/// # Errors
///
/// Fails atomically on the first invalid source file: unreadable overlay,
/// TOML syntax or type error, empty pattern/name, unknown regex flag, or
/// invalid regex. The error names the offending file and key.
pub fn load_rule_set<P: AsRef<Path>>(overlays: &[P]) -> Result<RuleSet> {
    let mut state = MergeState::default();

    for (label, text) in BASE_SOURCES {
        let source: RuleSource = toml::from_str(text)
            .with_context(|| format!("invalid rule source {label}"))?;
        state.apply(&source, label)?;
    }

    for overlay in overlays {
        let path = overlay.as_ref();
        let label = path.display().to_string();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("cannot read rule source {label}"))?;
        let source: RuleSource = toml::from_str(&text)
            .with_context(|| format!("invalid rule source {label}"))?;
        state.apply(&source, &label)?;
    }

    Ok(state.freeze())
}

/// Accumulated merge state before the final deduplication pass.
#[derive(Default)]
struct MergeState {
    secret_patterns: Vec<SecretPattern>,
    exclude_patterns: Vec<CompiledPattern>,
    secret_keywords: Vec<String>,
    exclude_keywords: Vec<String>,
    assignment_patterns: Vec<CompiledPattern>,
    ignore_dirs: Vec<String>,
    ignore_extensions: Vec<String>,
    ignore_files: Vec<String>,
}

impl MergeState {
    /// Applies one rule source. Removals run first, against the state built
    /// from earlier files only, so an item added and removed within the same
    /// file survives.
    fn apply(&mut self, source: &RuleSource, file: &str) -> Result<()> {
        for name in &source.remove_secret_patterns {
            self.secret_patterns.retain(|p| &p.name != name);
        }
        retain_not_in(&mut self.exclude_patterns, &source.remove_exclude_patterns, |p| &p.raw);
        retain_not_in(&mut self.secret_keywords, &source.remove_secret_keywords, |s| s);
        retain_not_in(&mut self.exclude_keywords, &source.remove_exclude_keywords, |s| s);
        retain_not_in(
            &mut self.assignment_patterns,
            &source.remove_assignment_patterns,
            |p| &p.raw,
        );
        retain_not_in(&mut self.ignore_dirs, &source.remove_ignore_dirs, |s| s);
        retain_not_in(&mut self.ignore_extensions, &source.remove_ignore_extensions, |s| s);
        retain_not_in(&mut self.ignore_files, &source.remove_ignore_files, |s| s);

        for decl in &source.secret_patterns {
            if decl.name.trim().is_empty() {
                bail!("secret_patterns entry with empty 'name' in {file}");
            }
            if decl.pattern.is_empty() {
                bail!("secret pattern '{}' has an empty 'pattern' in {file}", decl.name);
            }
            let key = format!("secret_patterns[{}]", decl.name);
            let regex = compile_pattern(&decl.pattern, &decl.flags, file, &key)?;
            let compiled = SecretPattern {
                name: decl.name.clone(),
                pattern: decl.pattern.clone(),
                flags: decl.flags.clone(),
                regex,
            };
            // Re-declaring a name replaces pattern and flags wholesale,
            // keeping the original position.
            match self.secret_patterns.iter().position(|p| p.name == decl.name) {
                Some(i) => self.secret_patterns[i] = compiled,
                None => self.secret_patterns.push(compiled),
            }
        }

        for (i, raw) in source.exclude_patterns.iter().enumerate() {
            let key = format!("exclude_patterns[{i}]");
            // Exclude patterns reject candidates regardless of case.
            let regex = compile_with(raw, file, &key, |b| {
                b.case_insensitive(true);
            })?;
            self.exclude_patterns.push(CompiledPattern { raw: raw.clone(), regex });
        }

        self.secret_keywords.extend(source.secret_keywords.iter().cloned());
        self.exclude_keywords.extend(source.exclude_keywords.iter().cloned());

        for (i, raw) in source.assignment_patterns.iter().enumerate() {
            let key = format!("assignment_patterns[{i}]");
            let regex = compile_with(raw, file, &key, |_| {})?;
            self.assignment_patterns.push(CompiledPattern { raw: raw.clone(), regex });
        }

        self.ignore_dirs.extend(source.ignore.dirs.iter().cloned());
        self.ignore_extensions.extend(source.ignore.extensions.iter().cloned());
        self.ignore_files.extend(source.ignore.files.iter().cloned());

        Ok(())
    }

    /// Deduplicates every list (first occurrence wins its position) and
    /// produces the immutable rule set.
    fn freeze(self) -> RuleSet {
        RuleSet {
            secret_patterns: self.secret_patterns,
            exclude_patterns: dedup_by_key(self.exclude_patterns, |p| p.raw.clone()),
            secret_keywords: dedup_by_key(self.secret_keywords, Clone::clone),
            exclude_keywords: dedup_by_key(self.exclude_keywords, Clone::clone),
            assignment_patterns: dedup_by_key(self.assignment_patterns, |p| p.raw.clone()),
            ignore_extensions: dedup_by_key(self.ignore_extensions, Clone::clone),
            ignore_dirs: dedup_by_key(self.ignore_dirs, Clone::clone),
            ignore_files: dedup_by_key(self.ignore_files, Clone::clone),
        }
    }
}

fn retain_not_in<T, F>(items: &mut Vec<T>, removals: &[String], key: F)
where
    F: Fn(&T) -> &String,
{
    if removals.is_empty() {
        return;
    }
    items.retain(|item| !removals.contains(key(item)));
}

fn dedup_by_key<T, F>(items: Vec<T>, key: F) -> Vec<T>
where
    F: Fn(&T) -> String,
{
    let mut seen = rustc_hash::FxHashSet::default();
    items.into_iter().filter(|item| seen.insert(key(item))).collect()
}

/// Compiles a pattern with the declared flag names. Unknown flag names are a
/// load error, reported before any compile attempt.
fn compile_pattern(pattern: &str, flags: &[String], file: &str, key: &str) -> Result<Regex> {
    for flag in flags {
        if !matches!(
            flag.as_str(),
            "IGNORECASE" | "MULTILINE" | "DOTALL" | "VERBOSE" | "ASCII"
        ) {
            bail!("unknown regex flag '{flag}' in {file} ({key})");
        }
    }
    compile_with(pattern, file, key, |builder| {
        for flag in flags {
            match flag.as_str() {
                "IGNORECASE" => {
                    builder.case_insensitive(true);
                }
                "MULTILINE" => {
                    builder.multi_line(true);
                }
                "DOTALL" => {
                    builder.dot_matches_new_line(true);
                }
                "VERBOSE" => {
                    builder.ignore_whitespace(true);
                }
                // "ASCII" is the only remaining possibility after validation.
                _ => {
                    builder.unicode(false);
                }
            }
        }
    })
}

fn compile_with<F>(pattern: &str, file: &str, key: &str, configure: F) -> Result<Regex>
where
    F: FnOnce(&mut RegexBuilder),
{
    let mut builder = RegexBuilder::new(pattern);
    configure(&mut builder);
    builder
        .build()
        .with_context(|| format!("invalid regex in {file} ({key})"))
}
