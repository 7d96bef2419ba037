use std::io;
use std::process::ExitCode;

use clap::error::ErrorKind;
use tracing_subscriber::EnvFilter;

use bang_options::{fatal, OptionsError, OptionsLoader};

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .with_writer(io::stderr)
        .init();

    let options = match OptionsLoader::new().load_from(std::env::args_os()) {
        Ok(options) => options,
        Err(OptionsError::Usage(e))
            if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) =>
        {
            e.exit()
        }
        Err(e) => return fatal(&mut io::stderr(), &e),
    };

    // Stdout carries everything but the database password; the connector
    // reads that from the library value.
    match serde_json::to_string_pretty(&options) {
        Ok(json) => {
            println!("{json}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Cannot serialize options: {e}");
            ExitCode::FAILURE
        }
    }
}
