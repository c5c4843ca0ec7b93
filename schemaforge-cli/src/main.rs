//! schemaforge command-line compiler
//!
//! Reads JSON Schema documents and prints (or writes) the generated Rust
//! declarations. Any failure exits with status 2 and one diagnostic line.

use clap::Parser;
use clap::error::ErrorKind;
use schemaforge_cli::{Cli, CliError, run};
use std::io;
use std::process::ExitCode;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Exit status for every failure.
const FAILURE: u8 = 2;

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            let _ = err.print();
            return ExitCode::SUCCESS;
        }
        Err(err) => return fail(&CliError::from_clap(&err)),
    };

    init_tracing(cli.verbose);

    let stdin = io::stdin();
    let stdout = io::stdout();
    match run(&cli, &mut stdin.lock(), &mut stdout.lock()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => fail(&err),
    }
}

fn fail(err: &CliError) -> ExitCode {
    eprintln!("schemaforge: {err}");
    ExitCode::from(FAILURE)
}

/// Logs go to stderr; `RUST_LOG` overrides the verbosity flags.
fn init_tracing(verbose: u8) {
    let base_filter = match std::env::var("RUST_LOG") {
        Ok(filter) => filter,
        Err(_) => match verbose {
            0 => "warn".to_string(),
            1 => "info".to_string(),
            2 => "debug".to_string(),
            _ => "trace".to_string(),
        },
    };
    let filter = EnvFilter::try_new(&base_filter).unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(verbose >= 2)
                .with_writer(io::stderr)
                .compact(),
        )
        .init();
}
