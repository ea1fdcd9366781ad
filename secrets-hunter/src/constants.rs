//! Hard limits and tuning constants shared across the scanner.

/// Lines longer than this abort the rest of the file (minified/binary-like content).
pub const MAX_LINE_LENGTH: usize = 50_000;

/// A run of this many identical consecutive characters aborts the rest of the file.
pub const MAX_REPEAT_RUN: usize = 1_000;

/// Number of bytes sniffed from the head of a file for binary detection.
pub const SNIFF_LEN: usize = 2048;

/// Minimum fraction of printable bytes for a file to be treated as text.
pub const TEXT_RATIO: f64 = 0.85;

/// Upper bound accepted for `--hex-entropy`.
pub const HEX_ENTROPY_MAX: f64 = 4.5;

/// Upper bound accepted for `--b64-entropy`.
pub const B64_ENTROPY_MAX: f64 = 6.0;

/// `--workers` is capped at `available cores * MAX_WORKERS_MULTIPLIER`.
pub const MAX_WORKERS_MULTIPLIER: usize = 2;

/// Minimum inner length of a quoted span worth extracting.
pub const MIN_QUOTED_LEN: usize = 4;

/// Minimum length of an unquoted candidate token.
pub const MIN_UNQUOTED_LEN: usize = 8;

/// Characters stripped from both ends of an extracted candidate.
pub const STRIP_CHARS: &str = "\"'`,;()[]{}<>";

/// Maximum length of the context snippet attached to a finding.
pub const MAX_CONTEXT_LEN: usize = 100;
