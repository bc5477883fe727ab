#![deny(missing_docs)]

//! # Tsgen CLI
//!
//! Command Line Interface for the OpenAPI -> TypeScript model generator.
//!
//! Supported Commands:
//! - `generate`: Loads one or more API description documents and emits
//!   TypeScript model files.

use clap::{Parser, Subcommand};
use tsgen_core::GenResult;

mod generate;

#[derive(Parser, Debug)]
#[clap(author, version, about = "TypeScript model generator CLI")]
struct Cli {
    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generates TypeScript models from API description documents.
    Generate(generate::GenerateArgs),
}

fn main() -> GenResult<()> {
    let cli = Cli::parse();

    match &cli.command {
        Commands::Generate(args) => generate::execute(args)?,
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verify_cli_structure() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
