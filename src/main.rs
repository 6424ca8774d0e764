use clap::Parser;
use megacity_report::cli::{run, Cli};
use megacity_report::error::Result;

fn main() -> Result<()> {
    let cli = Cli::parse();
    run(cli)
}
