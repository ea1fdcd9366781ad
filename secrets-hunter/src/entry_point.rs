//! Program entry: wires CLI arguments, logging, rule loading, the scanner,
//! and the reporters together.

use anyhow::Result;
use clap::error::ErrorKind;
use clap::Parser;
use colored::Colorize;
use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::cli::Cli;
use crate::config::RuleSetCache;
use crate::output::{self, console, progress, rules_report};
use crate::scanner::SecretsHunter;

/// Runs the scanner with the given arguments (program name excluded),
/// writing reports to stdout. Returns the process exit code: 0 clean,
/// 1 scan failure, 2 usage error.
///
/// # Errors
///
/// Returns an error only for I/O failures while writing reports.
pub fn run_with_args(args: Vec<String>) -> Result<i32> {
    let mut stdout = std::io::stdout();
    run_with_args_to(args, &mut stdout)
}

/// [`run_with_args`] against an arbitrary writer, for tests.
///
/// # Errors
///
/// Returns an error only for I/O failures while writing reports.
pub fn run_with_args_to<W: Write>(args: Vec<String>, writer: &mut W) -> Result<i32> {
    let mut argv = vec!["secrets-hunter".to_owned()];
    argv.extend(args);

    let cli = match Cli::try_parse_from(&argv) {
        Ok(cli) => cli,
        Err(err) if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            write!(writer, "{err}")?;
            return Ok(0);
        }
        Err(err) => {
            eprintln!("{err}");
            return Ok(2);
        }
    };

    init_logging(&cli.log_level);

    if let Err(message) = cli.validate() {
        eprintln!("{} {message}", "error:".red().bold());
        return Ok(2);
    }

    let mut cache = RuleSetCache::new();
    let rules = match cache.get_or_load(&cli.config) {
        Ok(rules) => rules,
        Err(err) => {
            eprintln!("{} {err:#}", "error:".red().bold());
            return Ok(1);
        }
    };

    if cli.show_rules {
        rules_report::print_rules_report(writer, &rules)?;
        return Ok(0);
    }

    let cancel = Arc::new(AtomicBool::new(false));
    {
        let cancel = Arc::clone(&cancel);
        // Fails when a handler is already installed (e.g. repeated calls in
        // one process); scanning still works, Ctrl-C just aborts hard.
        ctrlc::set_handler(move || cancel.store(true, Ordering::Relaxed)).ok();
    }

    let settings = cli.settings();
    let hunter =
        SecretsHunter::new(rules, settings.clone()).with_cancel_flag(Arc::clone(&cancel));

    // The scanner sets the bar's length once it has collected the file
    // list, so the tree is only walked once.
    let bar = if cli.target.is_dir() {
        progress::create_progress_bar(0)
    } else {
        progress::create_spinner()
    };
    let hunter = hunter.with_progress(bar.clone());

    let result = hunter.scan(&cli.target);
    bar.finish_and_clear();

    if !result.success {
        eprintln!("{}", "Scan did not complete.".red().bold());
        return Ok(1);
    }

    let findings = output::format_findings(result.findings, &settings);
    let mut exported = false;
    if let Some(path) = &cli.json_output {
        output::reports::export_json(&findings, path)?;
        exported = true;
    }
    if let Some(path) = &cli.sarif_output {
        output::reports::export_sarif(&findings, path)?;
        exported = true;
    }
    if !exported {
        console::print_header(writer)?;
        console::print_report(writer, &findings)?;
    }
    Ok(0)
}

/// Initializes tracing once per process. `RUST_LOG` wins over `--log-level`;
/// repeated initialization (tests) is ignored.
fn init_logging(default_level: &str) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .ok();
}
