//! Sellerdesk command-line dashboard.

use std::{io, process::ExitCode};

use tracing::error;

mod cli;

fn main() -> ExitCode {
    let cli = match cli::Cli::load() {
        Ok(cli) => cli,
        Err(error) => {
            _ = error.print();

            return if error.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    if let Err(source) = cli::logging::init(&cli.logging) {
        #[expect(
            clippy::print_stderr,
            reason = "logging not initialized, must use eprintln for setup errors"
        )]
        {
            eprintln!("Logging error: {source}");
        }

        return ExitCode::FAILURE;
    }

    match cli.run(io::stdout().lock()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(source) => {
            error!(error = %source, "command failed");

            #[expect(
                clippy::print_stderr,
                reason = "command errors are reported to the user even when logs are filtered"
            )]
            {
                eprintln!("Error: {source}");
            }

            ExitCode::FAILURE
        }
    }
}
