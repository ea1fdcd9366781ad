//! Human-readable console report.

use colored::Colorize;
use std::io::Write;

use crate::findings::{Finding, Severity};

const RULE_WIDTH: usize = 80;

/// Print the banner header.
///
/// # Errors
///
/// Returns an error if writing to the output fails.
pub fn print_header(writer: &mut impl Write) -> std::io::Result<()> {
    writeln!(writer)?;
    writeln!(
        writer,
        "{}",
        "╔════════════════════════════════════════╗".cyan()
    )?;
    writeln!(
        writer,
        "{}",
        "║  Secrets Hunter — Scan Results         ║".cyan().bold()
    )?;
    writeln!(
        writer,
        "{}",
        "╚════════════════════════════════════════╝".cyan()
    )?;
    writeln!(writer)?;
    Ok(())
}

/// Print the findings report. Expects findings already filtered, masked,
/// and sorted by [`format_findings`](super::format_findings).
///
/// # Errors
///
/// Returns an error if writing to the output fails.
pub fn print_report(writer: &mut impl Write, findings: &[Finding]) -> std::io::Result<()> {
    if findings.is_empty() {
        writeln!(writer, "{}", "✓ No secrets detected!".green())?;
        return Ok(());
    }

    let plural = if findings.len() == 1 { "" } else { "s" };
    writeln!(
        writer,
        "{}",
        format!("⚠ Found {} potential secret{plural}:", findings.len())
            .red()
            .bold()
    )?;
    writeln!(writer, "{}", "=".repeat(RULE_WIDTH))?;

    for finding in findings {
        writeln!(writer)?;
        writeln!(writer, "File: {}", finding.file.display().to_string().bold())?;
        writeln!(
            writer,
            "  Line {}: {}",
            finding.line,
            finding.rule.as_str().yellow()
        )?;
        writeln!(writer, "    Match: {}", finding.matched)?;
        writeln!(
            writer,
            "    Detection: {} ({}, confidence {}%)",
            finding.detection_method,
            severity_tag(finding.severity),
            finding.confidence
        )?;
        if let Some(var) = &finding.context_var {
            writeln!(writer, "    Variable: {var}")?;
        }
        if !finding.context.is_empty() {
            writeln!(writer, "    Context: {}", finding.context.dimmed())?;
        }
        writeln!(writer, "{}", "-".repeat(RULE_WIDTH))?;
    }
    Ok(())
}

fn severity_tag(severity: Severity) -> colored::ColoredString {
    match severity {
        Severity::Critical => severity.to_string().red().bold(),
        Severity::High => severity.to_string().red(),
        Severity::Medium => severity.to_string().yellow(),
        Severity::Low => severity.to_string().normal(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::findings::DetectionMethod;
    use std::path::PathBuf;

    fn finding() -> Finding {
        Finding {
            file: PathBuf::from("src/cfg.py"),
            line: 12,
            rule: "AWS Access Key".to_owned(),
            matched: "***MASKED***".to_owned(),
            context: "***MASKED***".to_owned(),
            severity: Severity::Critical,
            confidence: 100,
            detection_method: DetectionMethod::Pattern,
            context_var: Some("api_key".to_owned()),
        }
    }

    #[test]
    fn empty_report_prints_all_clear() {
        let mut buf = Vec::new();
        print_report(&mut buf, &[]).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.contains("No secrets detected"));
    }

    #[test]
    fn report_lists_finding_fields() {
        let mut buf = Vec::new();
        print_report(&mut buf, &[finding()]).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.contains("Found 1 potential secret:"));
        assert!(text.contains("src/cfg.py"));
        assert!(text.contains("Line 12"));
        assert!(text.contains("AWS Access Key"));
        assert!(text.contains("***MASKED***"));
        assert!(text.contains("Variable: api_key"));
    }
}
