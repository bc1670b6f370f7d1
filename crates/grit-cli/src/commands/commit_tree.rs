use std::io::{self, Write};

use anyhow::{bail, Result};
use bstr::BString;
use clap::Args;
use grit_hash::ObjectId;
use grit_object::{Commit, ObjectType, Signature};

use super::open_repo;

#[derive(Args)]
pub struct CommitTreeArgs {
    /// Tree object id
    tree: String,

    /// Parent commit id (repeatable)
    #[arg(short = 'p', value_name = "parent")]
    parent: Vec<String>,

    /// Commit message
    #[arg(short = 'm')]
    message: String,
}

pub fn run(args: &CommitTreeArgs) -> Result<i32> {
    let repo = open_repo()?;

    let tree = ObjectId::from_hex(&args.tree)?;
    if !repo.store().contains(&tree) {
        bail!("not a valid object name: {}", args.tree);
    }

    let parents = args
        .parent
        .iter()
        .map(|p| ObjectId::from_hex(p))
        .collect::<Result<Vec<_>, _>>()?;

    let mut message = BString::from(args.message.as_str());
    if !message.ends_with(b"\n") {
        message.push(b'\n');
    }

    let commit = Commit {
        tree,
        parents,
        author: signature_from_env("GIT_AUTHOR_NAME", "GIT_AUTHOR_EMAIL", "GIT_AUTHOR_DATE"),
        committer: signature_from_env(
            "GIT_COMMITTER_NAME",
            "GIT_COMMITTER_EMAIL",
            "GIT_COMMITTER_DATE",
        ),
        extra_headers: Vec::new(),
        message,
    };

    let oid = repo.store().write(ObjectType::Commit, &commit.serialize())?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    writeln!(out, "{}", oid.to_hex())?;
    Ok(0)
}

/// Build an identity from the environment, falling back to a fixed default
/// identity and the current local time.
fn signature_from_env(name_var: &str, email_var: &str, date_var: &str) -> Signature {
    let name = std::env::var(name_var).unwrap_or_else(|_| "Unknown".to_string());
    let email = std::env::var(email_var).unwrap_or_else(|_| "unknown@unknown".to_string());

    let (timestamp, tz_offset) = std::env::var(date_var)
        .ok()
        .and_then(|raw| parse_raw_date(&raw))
        .unwrap_or_else(now);

    Signature::new(name, email, timestamp, tz_offset)
}

/// Parse git's raw date format: `<epoch-seconds> <+HHMM|-HHMM>`.
fn parse_raw_date(raw: &str) -> Option<(i64, i32)> {
    let mut parts = raw.split_ascii_whitespace();
    let timestamp: i64 = parts.next()?.parse().ok()?;

    let tz = parts.next().unwrap_or("+0000");
    let sign = match tz.as_bytes().first()? {
        b'+' => 1,
        b'-' => -1,
        _ => return None,
    };
    if tz.len() != 5 {
        return None;
    }
    let digits: i32 = tz[1..].parse().ok()?;
    Some((timestamp, sign * ((digits / 100) * 60 + digits % 100)))
}

fn now() -> (i64, i32) {
    let now = chrono::Local::now();
    let offset_minutes = now.offset().local_minus_utc() / 60;
    (now.timestamp(), offset_minutes)
}
