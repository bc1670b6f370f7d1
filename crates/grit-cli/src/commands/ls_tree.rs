use std::io::{self, Write};

use anyhow::{anyhow, bail, Result};
use bstr::ByteSlice;
use clap::Args;
use grit_hash::ObjectId;
use grit_object::{Commit, ObjectType, Tree};

use super::open_repo;

#[derive(Args)]
pub struct LsTreeArgs {
    /// Show only entry names
    #[arg(long)]
    name_only: bool,

    /// Tree (or commit) id to list
    object: String,
}

pub fn run(args: &LsTreeArgs) -> Result<i32> {
    let repo = open_repo()?;
    let oid = ObjectId::from_hex(&args.object)?;

    let (obj_type, payload) = repo
        .store()
        .read(&oid)?
        .ok_or_else(|| anyhow!("object not found: {}", args.object))?;

    // A commit id is accepted and resolved to its tree.
    let tree_payload = match obj_type {
        ObjectType::Tree => payload,
        ObjectType::Commit => {
            let commit = Commit::parse(&payload)?;
            repo.store()
                .read(&commit.tree)?
                .ok_or_else(|| anyhow!("tree not found: {}", commit.tree))?
                .1
        }
        other => bail!("not a tree object: {} is a {}", args.object, other),
    };

    let tree = Tree::parse(&tree_payload)?;
    let stdout = io::stdout();
    let mut out = stdout.lock();

    for entry in tree.iter() {
        if args.name_only {
            writeln!(out, "{}", entry.name.as_bstr())?;
        } else {
            let type_name = if entry.mode.is_tree() {
                "tree"
            } else if entry.mode.is_gitlink() {
                "commit"
            } else {
                "blob"
            };
            writeln!(
                out,
                "{:06o} {} {}\t{}",
                entry.mode.raw(),
                type_name,
                entry.oid.to_hex(),
                entry.name.as_bstr(),
            )?;
        }
    }

    Ok(0)
}
