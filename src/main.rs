use anyhow::Result;
use clap::Parser;
use finman::cli::Cli;

fn main() -> Result<()> {
    let cli = Cli::parse();
    cli.run()
}
