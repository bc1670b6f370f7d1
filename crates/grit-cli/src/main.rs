mod commands;

use std::process;

use clap::Parser;

use commands::Commands;

#[derive(Parser)]
#[command(name = "grit", about = "A minimal git client speaking smart HTTP")]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,
}

fn main() {
    let cli = Cli::parse();

    match commands::run(cli) {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("fatal: {e}");
            process::exit(128);
        }
    }
}
