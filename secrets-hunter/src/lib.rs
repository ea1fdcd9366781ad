//! Secrets Hunter: scans files and directory trees for hardcoded secrets.
//!
//! The pipeline per line is: extract candidate strings, validate them
//! (length, false-positive excludes), run the pattern and entropy detectors,
//! then adjust confidence from the line's assignment context. Rules come
//! from embedded base TOML files plus user overlays merged in order.
//!
//! The library core ([`SecretsHunter`]) is silent and side-effect free apart
//! from reading the scanned files; console output, progress, exports, and
//! masking all live in the [`output`] and [`entry_point`] boundary layers.

pub mod cli;
pub mod config;
pub mod constants;
pub mod detectors;
pub mod entry_point;
pub mod extractor;
pub mod file_handler;
pub mod findings;
pub mod output;
pub mod scanner;
pub mod scoring;
pub mod settings;
pub mod validators;

pub use findings::{DetectionMethod, Finding, ScanResult, Severity};
pub use scanner::SecretsHunter;
pub use settings::ScanSettings;
