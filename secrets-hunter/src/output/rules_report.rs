//! Self-report of the compiled rule set, for `--show-rules`.

use std::io::Write;

use crate::config::RuleSet;

const WIDTH: usize = 70;

/// Print the compiled rule set, section by section.
///
/// Pattern sections keep declaration order (it is meaningful for overlays);
/// keyword and ignore sections are printed sorted for easy scanning.
///
/// # Errors
///
/// Returns an error if writing to the output fails.
pub fn print_rules_report(writer: &mut impl Write, rules: &RuleSet) -> std::io::Result<()> {
    writeln!(writer, "Compiled Rule Set")?;
    writeln!(writer, "{}", "─".repeat(WIDTH))?;

    section(writer, "secret_patterns", rules.secret_patterns.len())?;
    for pattern in &rules.secret_patterns {
        if pattern.flags.is_empty() {
            writeln!(writer, "  - {}: /{}/", pattern.name, pattern.pattern)?;
        } else {
            writeln!(
                writer,
                "  - {}: /{}/  flags={}",
                pattern.name,
                pattern.pattern,
                pattern.flags.join("|")
            )?;
        }
    }

    section(writer, "exclude_patterns", rules.exclude_patterns.len())?;
    for pattern in &rules.exclude_patterns {
        writeln!(writer, "  - /{}/", pattern.raw)?;
    }

    sorted_section(writer, "secret_keywords", &rules.secret_keywords)?;
    sorted_section(writer, "exclude_keywords", &rules.exclude_keywords)?;

    section(writer, "assignment_patterns", rules.assignment_patterns.len())?;
    for pattern in &rules.assignment_patterns {
        writeln!(writer, "  - /{}/", pattern.raw)?;
    }

    compact_section(writer, "ignore_extensions", &rules.ignore_extensions, 6)?;
    compact_section(writer, "ignore_dirs", &rules.ignore_dirs, 4)?;
    compact_section(writer, "ignore_files", &rules.ignore_files, 3)?;
    writeln!(writer)?;
    Ok(())
}

fn section(writer: &mut impl Write, title: &str, count: usize) -> std::io::Result<()> {
    writeln!(writer, "\n{title} ({count})")?;
    writeln!(writer, "{}", "-".repeat(WIDTH))
}

fn sorted_section(writer: &mut impl Write, title: &str, items: &[String]) -> std::io::Result<()> {
    section(writer, title, items.len())?;
    let mut sorted: Vec<&String> = items.iter().collect();
    sorted.sort_by_key(|s| s.to_lowercase());
    for item in sorted {
        writeln!(writer, "  - {item}")?;
    }
    Ok(())
}

fn compact_section(
    writer: &mut impl Write,
    title: &str,
    items: &[String],
    columns: usize,
) -> std::io::Result<()> {
    section(writer, title, items.len())?;
    let mut sorted: Vec<&str> = items.iter().map(String::as_str).collect();
    sorted.sort_by_key(|s| s.to_lowercase());
    for chunk in sorted.chunks(columns) {
        writeln!(writer, "  - {}", chunk.join(", "))?;
    }
    Ok(())
}
