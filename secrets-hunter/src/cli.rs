//! Command-line interface definition and argument validation.

use clap::Parser;
use std::path::PathBuf;

use crate::constants::{B64_ENTROPY_MAX, HEX_ENTROPY_MAX, MAX_WORKERS_MULTIPLIER};
use crate::settings::ScanSettings;

/// Hunt for hardcoded secrets in source trees.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "secrets-hunter",
    version,
    about = "Scans files and directories for hardcoded secrets",
    long_about = None
)]
pub struct Cli {
    /// File or directory to scan.
    #[arg(default_value = ".")]
    pub target: PathBuf,

    /// TOML rule overlay, merged on top of the built-in rules. Repeatable;
    /// overlays apply in the order given.
    #[arg(long = "config", value_name = "FILE")]
    pub config: Vec<PathBuf>,

    /// Show matched secrets and context in clear text instead of masking.
    #[arg(long)]
    pub reveal_findings: bool,

    /// Write findings to a JSON file instead of the console report.
    #[arg(long = "json", value_name = "FILE")]
    pub json_output: Option<PathBuf>,

    /// Write findings to a SARIF 2.1.0 file instead of the console report.
    #[arg(long = "sarif", value_name = "FILE")]
    pub sarif_output: Option<PathBuf>,

    /// Entropy threshold for hex-classified strings.
    #[arg(
        long = "hex-entropy",
        value_name = "BITS",
        default_value_t = 3.0,
        allow_negative_numbers = true
    )]
    pub hex_entropy: f64,

    /// Entropy threshold for base64-classified strings.
    #[arg(
        long = "b64-entropy",
        value_name = "BITS",
        default_value_t = 4.5,
        allow_negative_numbers = true
    )]
    pub b64_entropy: f64,

    /// Minimum candidate string length.
    #[arg(long = "min-length", value_name = "CHARS", default_value_t = 10)]
    pub min_length: usize,

    /// Number of worker threads for directory scans.
    #[arg(long, value_name = "N", default_value_t = 4)]
    pub workers: usize,

    /// Findings below this confidence are not reported.
    #[arg(long = "min-confidence", value_name = "PERCENT", default_value_t = 80)]
    pub min_confidence: u8,

    /// Default log level (trace, debug, info, warn, error). `RUST_LOG`
    /// overrides it.
    #[arg(long = "log-level", value_name = "LEVEL", default_value = "warn")]
    pub log_level: String,

    /// Print the compiled rule set (after overlays) and exit.
    #[arg(long = "show-rules")]
    pub show_rules: bool,
}

impl Cli {
    /// Cross-field validation that clap's per-argument parsing cannot
    /// express. Returns the first problem found, phrased for the terminal.
    ///
    /// # Errors
    ///
    /// Returns a message describing the invalid argument.
    pub fn validate(&self) -> Result<(), String> {
        if !(0.0..=HEX_ENTROPY_MAX).contains(&self.hex_entropy) {
            return Err(format!(
                "--hex-entropy must be between 0.0 and {HEX_ENTROPY_MAX}"
            ));
        }
        if !(0.0..=B64_ENTROPY_MAX).contains(&self.b64_entropy) {
            return Err(format!(
                "--b64-entropy must be between 0.0 and {B64_ENTROPY_MAX}"
            ));
        }
        if self.min_length == 0 {
            return Err("--min-length must be at least 1".to_owned());
        }
        if self.min_confidence > 100 {
            return Err("--min-confidence must be between 0 and 100".to_owned());
        }
        let max_workers = worker_cap();
        if self.workers == 0 || self.workers > max_workers {
            return Err(format!("--workers must be between 1 and {max_workers}"));
        }
        for overlay in &self.config {
            if overlay.extension().and_then(|e| e.to_str()) != Some("toml") {
                return Err(format!(
                    "--config file '{}' must be a .toml file",
                    overlay.display()
                ));
            }
            if !overlay.is_file() {
                return Err(format!(
                    "--config file '{}' does not exist",
                    overlay.display()
                ));
            }
        }
        for report in [&self.json_output, &self.sarif_output].into_iter().flatten() {
            let parent = match report.parent() {
                Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
                _ => PathBuf::from("."),
            };
            if !parent.is_dir() {
                return Err(format!(
                    "output directory '{}' does not exist",
                    parent.display()
                ));
            }
        }
        Ok(())
    }

    /// Resolves the scan settings these arguments describe.
    #[must_use]
    pub fn settings(&self) -> ScanSettings {
        ScanSettings {
            hex_entropy_threshold: self.hex_entropy,
            b64_entropy_threshold: self.b64_entropy,
            min_string_length: self.min_length,
            min_confidence: self.min_confidence,
            max_workers: self.workers,
            reveal_findings: self.reveal_findings,
        }
    }
}

/// Upper bound for `--workers`: twice the available cores, never below the
/// default worker count.
#[must_use]
pub fn worker_cap() -> usize {
    let cores = std::thread::available_parallelism().map_or(2, std::num::NonZeroUsize::get);
    (cores * MAX_WORKERS_MULTIPLIER).max(4)
}
