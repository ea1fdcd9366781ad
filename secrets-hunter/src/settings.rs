//! Runtime scan settings supplied by the caller (CLI boundary).

/// Tunable knobs for a scan, resolved by the boundary layer before the core runs.
///
/// These are intentionally separate from the [`RuleSet`](crate::config::RuleSet):
/// the rule set describes *what* to look for, these describe *how hard* to look.
#[derive(Debug, Clone)]
pub struct ScanSettings {
    /// Shannon entropy threshold for hex-classified candidates.
    pub hex_entropy_threshold: f64,
    /// Shannon entropy threshold for base64-classified candidates.
    pub b64_entropy_threshold: f64,
    /// Candidates shorter than this never reach the detectors.
    pub min_string_length: usize,
    /// Findings below this confidence are dropped at the output boundary.
    pub min_confidence: u8,
    /// Size of the worker pool for directory scans.
    pub max_workers: usize,
    /// Whether match/context text is shown unmasked in reports.
    pub reveal_findings: bool,
}

impl Default for ScanSettings {
    fn default() -> Self {
        Self {
            hex_entropy_threshold: 3.0,
            b64_entropy_threshold: 4.5,
            min_string_length: 10,
            min_confidence: 80,
            max_workers: 4,
            reveal_findings: false,
        }
    }
}
