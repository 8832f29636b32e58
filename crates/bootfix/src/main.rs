//! Bootfix - Boot repair & recovery utility

use anyhow::Result;
use bootfix::banner::print_banner;
use bootfix::cli::Cli;
use bootfix::errors::EXIT_NO_OPERATION;
use bootfix::{logging, VERSION};
use bootfix_common::{BootFixer, BootfixError};
use clap::{CommandFactory, Parser};
use tracing::{debug, error};

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    print_banner(VERSION);

    let Some(operation) = cli.operation() else {
        Cli::command().print_help()?;
        println!("\nNo operation specified. Use --help for usage information.");
        std::process::exit(EXIT_NO_OPERATION);
    };

    let fixer = BootFixer::new(cli.session());
    match fixer.run(&operation) {
        Ok(outcome) => debug!("{} finished: {:?}", operation.name(), outcome),
        // Procedures already logged their own failures
        Err(e @ (BootfixError::Io(_) | BootfixError::Json(_))) => {
            error!("{} failed: {}", operation.name(), e)
        }
        Err(e) => debug!("{} failed [{}]: {}", operation.name(), e.code(), e),
    }

    Ok(())
}
