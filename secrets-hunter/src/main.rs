//! Binary entry point. Delegates to the shared `entry_point::run_with_args()`
//! so the CLI and library behave identically.

use std::process::ExitCode;

use secrets_hunter::entry_point;

fn main() -> ExitCode {
    match entry_point::run_with_args(std::env::args().skip(1).collect()) {
        Ok(code) => ExitCode::from(u8::try_from(code).unwrap_or(1)),
        Err(err) => {
            eprintln!("Error: {err:#}");
            ExitCode::FAILURE
        }
    }
}
