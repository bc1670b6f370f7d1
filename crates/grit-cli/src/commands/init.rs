use std::io::{self, Write};

use anyhow::Result;
use clap::Args;
use grit_repository::Repository;

#[derive(Args)]
pub struct InitArgs {}

pub fn run(_args: &InitArgs) -> Result<i32> {
    Repository::init(std::env::current_dir()?)?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    writeln!(out, "Initialized git directory")?;
    Ok(0)
}
