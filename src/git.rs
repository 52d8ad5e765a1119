//! # Git Plumbing
//!
//! Thin wrappers around the system `git` command, which automatically
//! handles SSH keys, credential helpers and anything else configured in
//! `~/.gitconfig`.
//!
//! Remote reference discovery shells out to
//! `git ls-remote --heads --tags <url> <patterns...>` so that pattern
//! matching happens on the server side; the output parser only extracts
//! short ref names. Everything here works on a plain working copy at a
//! given path; the higher-level [`crate::repository::RepositorySource`]
//! trait decides when these calls happen.

use std::fs;
use std::path::Path;

use crate::error::{Error, Result};
use crate::exec::{execute, try_execute, ExecOutput};
use crate::rank::RemoteRef;

/// List refs matching `patterns` on a single remote repository.
pub fn list_remote_refs(url: &str, patterns: &[String]) -> Result<Vec<RemoteRef>> {
    let mut args = vec!["ls-remote", "--heads", "--tags", url];
    args.extend(patterns.iter().map(String::as_str));

    let out = execute("git", &args, None, ExecOutput::Capture).map_err(|e| Error::Discovery {
        url: url.to_string(),
        stderr: e.captured_output().unwrap_or_default().to_string(),
    })?;

    Ok(parse_ls_remote(url, out.as_deref().unwrap_or_default()))
}

/// Parse `git ls-remote` output into [`RemoteRef`]s.
///
/// Each line is `<oid>\t<refpath>`; only the last path component is kept.
/// Peeled entries for annotated tags (`refs/tags/X^{}`) duplicate the tag
/// itself and are dropped.
pub fn parse_ls_remote(url: &str, output: &str) -> Vec<RemoteRef> {
    output
        .lines()
        .filter_map(|line| line.split_whitespace().last())
        .filter(|ref_path| !ref_path.ends_with("^{}"))
        .filter_map(|ref_path| ref_path.rsplit('/').next())
        .map(|name| RemoteRef {
            url: url.to_string(),
            name: name.to_string(),
        })
        .collect()
}

/// Shallow-clone a single ref into `work_dir`.
pub fn clone_ref(url: &str, ref_name: &str, work_dir: &Path, depth: u32) -> Result<()> {
    if let Some(parent) = work_dir.parent() {
        fs::create_dir_all(parent)?;
    }

    let depth = depth.to_string();
    let target = work_dir.to_string_lossy().into_owned();
    execute(
        "git",
        &[
            "clone",
            "--branch",
            ref_name,
            "--depth",
            depth.as_str(),
            url,
            target.as_str(),
        ],
        None,
        ExecOutput::Capture,
    )?;

    Ok(())
}

/// Fast-forward the current branch from `origin`.
///
/// Detached checkouts (a tag was cloned) have nothing to pull; the call is
/// a no-op for them.
pub fn pull(work_dir: &Path) -> Result<()> {
    match current_branch(work_dir) {
        Some(branch) => {
            execute(
                "git",
                &["pull", "origin", &branch],
                Some(work_dir),
                ExecOutput::Capture,
            )?;
            Ok(())
        }
        None => {
            log::debug!("{}: detached checkout, skipping pull", work_dir.display());
            Ok(())
        }
    }
}

/// Commit id of `HEAD`.
pub fn current_commit(work_dir: &Path) -> Result<String> {
    let out = execute(
        "git",
        &["rev-parse", "HEAD"],
        Some(work_dir),
        ExecOutput::Capture,
    )?;
    Ok(out.unwrap_or_default().trim().to_string())
}

/// Short name of the checked-out branch, or `None` when detached.
pub fn current_branch(work_dir: &Path) -> Option<String> {
    let out = try_execute(
        "git",
        &["symbolic-ref", "--short", "HEAD"],
        Some(work_dir),
        ExecOutput::Capture,
    )?;
    let branch = out.trim();
    if branch.is_empty() {
        None
    } else {
        Some(branch.to_string())
    }
}

/// Tag pointing at `HEAD`, if any.
pub fn current_tag(work_dir: &Path) -> Option<String> {
    let out = try_execute(
        "git",
        &["tag", "--points-at", "HEAD"],
        Some(work_dir),
        ExecOutput::Capture,
    )?;
    let tag = out.lines().next().unwrap_or("").trim();
    if tag.is_empty() {
        None
    } else {
        Some(tag.to_string())
    }
}

/// Number of commits in `from..to`, or `None` when either end is not
/// resolvable in the local (possibly shallow) history.
pub fn commit_distance(work_dir: &Path, from: &str, to: &str) -> Option<u64> {
    let range = format!("{}..{}", from, to);
    let out = try_execute(
        "git",
        &["rev-list", &range, "--count"],
        Some(work_dir),
        ExecOutput::Capture,
    )?;
    out.trim().parse().ok()
}

/// Append `pattern` to `.git/info/exclude` unless some line already
/// contains it.
pub fn append_exclude(work_dir: &Path, pattern: &str) -> Result<()> {
    let exclude_path = work_dir.join(".git").join("info").join("exclude");

    let existing = match fs::read_to_string(&exclude_path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            if let Some(parent) = exclude_path.parent() {
                fs::create_dir_all(parent)?;
            }
            String::new()
        }
        Err(e) => return Err(e.into()),
    };

    if existing.lines().any(|line| line.contains(pattern)) {
        return Ok(());
    }

    let mut content = existing;
    if !content.is_empty() && !content.ends_with('\n') {
        content.push('\n');
    }
    content.push_str(pattern);
    content.push('\n');
    fs::write(&exclude_path, content)?;

    Ok(())
}

/// Whether `work_dir` holds a git working copy.
pub fn has_working_copy(work_dir: &Path) -> bool {
    work_dir.join(".git").exists()
}
