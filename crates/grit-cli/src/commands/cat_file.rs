use std::io::{self, Write};

use anyhow::{anyhow, bail, Result};
use bstr::ByteSlice;
use clap::Args;
use grit_hash::ObjectId;
use grit_object::{ObjectType, Tree};

use super::open_repo;

#[derive(Args)]
pub struct CatFileArgs {
    /// Pretty-print the object content
    #[arg(short = 'p')]
    pretty: bool,

    /// Object id
    object: String,
}

pub fn run(args: &CatFileArgs) -> Result<i32> {
    if !args.pretty {
        bail!("usage: cat-file -p <object>");
    }
    let repo = open_repo()?;
    let oid = ObjectId::from_hex(&args.object)?;

    let (obj_type, payload) = repo
        .store()
        .read(&oid)?
        .ok_or_else(|| anyhow!("object not found: {}", args.object))?;

    let stdout = io::stdout();
    let mut out = stdout.lock();

    match obj_type {
        // Tree payloads are binary; print them the way ls-tree would.
        ObjectType::Tree => {
            let tree = Tree::parse(&payload)?;
            for entry in tree.iter() {
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
        ObjectType::Blob | ObjectType::Commit | ObjectType::Tag => {
            out.write_all(&payload)?;
        }
    }

    Ok(0)
}
