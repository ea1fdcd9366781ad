//! Caller-owned rule-set cache.
//!
//! Repeated loads with the same overlay files are served from memory. The
//! cache is an explicit object (typically owned by the CLI entry point), so
//! tests can build independent rule sets without cross-test leakage.

use anyhow::{Context, Result};
use rustc_hash::FxHashMap;
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::loader::load_rule_set;
use super::models::RuleSet;

/// Memoizes compiled rule sets, keyed by a content hash of the resolved
/// overlay paths. Base files are always the same and do not contribute.
#[derive(Default)]
pub struct RuleSetCache {
    entries: FxHashMap<String, Arc<RuleSet>>,
}

impl RuleSetCache {
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the rule set for the given overlays, loading and compiling it
    /// on first use.
    ///
    /// # Errors
    ///
    /// Fails if an overlay path cannot be resolved or any rule source is
    /// invalid. A failed load leaves the cache untouched.
    pub fn get_or_load(&mut self, overlays: &[PathBuf]) -> Result<Arc<RuleSet>> {
        let key = cache_key(overlays)?;
        if let Some(rules) = self.entries.get(&key) {
            return Ok(Arc::clone(rules));
        }
        let rules = Arc::new(load_rule_set(overlays)?);
        self.entries.insert(key, Arc::clone(&rules));
        Ok(rules)
    }

    /// Number of distinct overlay sets currently cached.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the cache holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// SHA-256 over the newline-joined canonical overlay paths; empty overlays
/// hash to the empty key.
fn cache_key(overlays: &[PathBuf]) -> Result<String> {
    if overlays.is_empty() {
        return Ok(String::new());
    }
    let mut hasher = Sha256::new();
    for (i, path) in overlays.iter().enumerate() {
        let resolved = resolve(path)?;
        if i > 0 {
            hasher.update(b"\n");
        }
        hasher.update(resolved.to_string_lossy().as_bytes());
    }
    Ok(format!("{:x}", hasher.finalize()))
}

fn resolve(path: &Path) -> Result<PathBuf> {
    path.canonicalize()
        .with_context(|| format!("cannot resolve overlay path {}", path.display()))
}
