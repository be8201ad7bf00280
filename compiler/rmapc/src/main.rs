//! rmapc command-line entry point.

use std::io::{self, Write};
use std::process::ExitCode;

use rmapc::{init_tracing, run, Config, DriverError, USAGE};

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.is_empty() || args.iter().any(|a| a == "-h" || a == "--help") {
        println!("{USAGE}");
        return ExitCode::SUCCESS;
    }

    let config = match Config::from_args(&args) {
        Ok(config) => config,
        Err(message) => {
            eprintln!("error: {message}");
            eprintln!();
            eprintln!("{USAGE}");
            return ExitCode::from(2);
        }
    };
    init_tracing(config.verbose);

    let stdout = io::stdout();
    let mut stdout = stdout.lock();
    let result = run(&config, &mut stdout);
    // Diagnostics follow whatever output was written.
    let _ = stdout.flush();

    match result {
        Ok(report) => {
            for path in &report.written {
                tracing::info!(path = %path.display(), "wrote");
            }
            for failure in &report.failures {
                eprintln!("{failure}");
            }
            if report.is_success() {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            }
        }
        Err(DriverError::Build { diagnostic }) => {
            eprintln!("{diagnostic}");
            ExitCode::FAILURE
        }
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}
