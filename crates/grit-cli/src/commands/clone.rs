use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::Args;
use grit_pack::{verify_checksum, Unpacker};
use grit_protocol::fetch;
use grit_repository::{checkout_commit, Repository, DEFAULT_BRANCH_REF};
use grit_transport::HttpClient;

#[derive(Args)]
pub struct CloneArgs {
    /// Repository URL
    repository: String,

    /// Destination directory
    directory: Option<PathBuf>,
}

pub fn run(args: &CloneArgs) -> Result<i32> {
    let stderr = io::stderr();
    let mut err = stderr.lock();

    let dest = match &args.directory {
        Some(dir) => dir.clone(),
        None => infer_directory(&args.repository)?,
    };

    if dest.exists() && std::fs::read_dir(&dest)?.next().is_some() {
        bail!(
            "destination path '{}' already exists and is not an empty directory",
            dest.display()
        );
    }

    writeln!(err, "Cloning into '{}'...", dest.display())?;

    std::fs::create_dir_all(&dest)?;
    let repo = Repository::init(&dest)?;

    let client = HttpClient::new(&args.repository)?;
    let (head, pack) = fetch::fetch_pack(&client)?;

    if let Err(e) = verify_checksum(&pack) {
        writeln!(err, "warning: {e}")?;
    }

    let ids = Unpacker::new(repo.store()).unpack(&pack)?;
    writeln!(err, "Unpacked {} objects.", ids.len())?;

    repo.write_head_symref(DEFAULT_BRANCH_REF)?;
    repo.write_ref(DEFAULT_BRANCH_REF, &head)?;

    checkout_commit(&repo, &head)?;

    Ok(0)
}

/// Derive a destination directory from the repository URL.
fn infer_directory(url: &str) -> Result<PathBuf> {
    let name = url
        .trim_end_matches('/')
        .rsplit('/')
        .next()
        .unwrap_or(url)
        .trim_end_matches(".git");
    if name.is_empty() {
        bail!("cannot infer directory name from '{url}'");
    }
    Ok(PathBuf::from(name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn infers_directory_from_url() {
        assert_eq!(
            infer_directory("https://example.com/a/repo.git").unwrap(),
            PathBuf::from("repo")
        );
        assert_eq!(
            infer_directory("https://example.com/a/repo").unwrap(),
            PathBuf::from("repo")
        );
        assert_eq!(
            infer_directory("https://example.com/a/repo/").unwrap(),
            PathBuf::from("repo")
        );
    }

    #[test]
    fn rejects_unusable_urls() {
        assert!(infer_directory(".git").is_err());
    }
}
