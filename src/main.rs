use anyhow::Result;
use clap::Parser;

use zoneatlas::cli::{Cli, Commands};
use zoneatlas::commands;

fn main() -> Result<()> {
    let cli = Cli::parse();
    match &cli.command {
        Commands::Inspect(args) => commands::inspect(&cli, args),
        Commands::Score(args) => commands::score(&cli, args),
        Commands::Rings(args) => commands::rings(&cli, args),
    }
}
