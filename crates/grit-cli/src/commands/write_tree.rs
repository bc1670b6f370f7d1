use std::io::{self, Write};

use anyhow::Result;
use clap::Args;
use grit_repository::snapshot_tree;

use super::open_repo;

#[derive(Args)]
pub struct WriteTreeArgs {}

pub fn run(_args: &WriteTreeArgs) -> Result<i32> {
    let repo = open_repo()?;
    let oid = snapshot_tree(&repo, repo.root())?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    writeln!(out, "{}", oid.to_hex())?;
    Ok(0)
}
