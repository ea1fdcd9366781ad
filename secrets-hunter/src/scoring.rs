//! Confidence adjustment from same-line assignment context.

use rustc_hash::FxHashMap;
use std::collections::BTreeSet;
use std::sync::Arc;

use crate::config::RuleSet;
use crate::findings::{Finding, Severity};

/// Re-scores findings once the assignment map for their line is known.
///
/// A finding whose matched value was assigned to a secret-keyword variable
/// is promoted to 100 / CRITICAL; an assignment to any other variable means
/// someone stored the value deliberately but the name gives no corroboration,
/// so it settles at 75 / MEDIUM. Findings with no assignment context keep the
/// detector's initial score.
pub struct ConfidenceScorer {
    rules: Arc<RuleSet>,
}

impl ConfidenceScorer {
    /// Builds a scorer over the given rule set.
    #[must_use]
    pub fn new(rules: Arc<RuleSet>) -> Self {
        Self { rules }
    }

    /// Adjusts each finding in place using the line's assignment map.
    pub fn apply(
        &self,
        findings: &mut [Finding],
        assignments: &FxHashMap<String, BTreeSet<String>>,
    ) {
        for finding in findings {
            let Some(vars) = assignments.get(&finding.matched) else {
                continue;
            };
            let Some(display_var) = self.pick_display_var(vars) else {
                continue;
            };
            if self.rules.is_secret_var(display_var) {
                finding.confidence = 100;
                finding.severity = Severity::Critical;
            } else {
                finding.confidence = 75;
                finding.severity = Severity::Medium;
            }
            finding.context_var = Some(display_var.to_owned());
        }
    }

    /// Picks the variable name to report: the first secret-keyword name in
    /// sorted order, falling back to the first name overall.
    fn pick_display_var<'a>(&self, vars: &'a BTreeSet<String>) -> Option<&'a String> {
        vars.iter()
            .find(|v| self.rules.is_secret_var(v))
            .or_else(|| vars.iter().next())
    }
}
